use crate::domain::model::{CleaningRules, ExtractedInputs, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn order_path(&self) -> &str;
    fn template_path(&self) -> &str;
    fn template_sheet(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file_name(&self) -> &str;
    fn write_summary(&self) -> bool;
    fn rules(&self) -> &CleaningRules;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractedInputs>;
    async fn transform(&self, inputs: ExtractedInputs) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
