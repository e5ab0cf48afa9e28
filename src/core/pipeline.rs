use std::path::Path;

use crate::adapters::workbook::{
    read_order_table, read_removal_config, read_removal_config_csv, write_order_table,
};
use crate::core::transform::transform;
use crate::core::{ConfigProvider, ExtractedInputs, Pipeline, Storage, TransformResult};
use crate::utils::error::Result;

pub const SUMMARY_FILE_NAME: &str = "summary.json";

pub struct OrderCleanerPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> OrderCleanerPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }
}

fn is_csv(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OrderCleanerPipeline<S, C> {
    async fn extract(&self) -> Result<ExtractedInputs> {
        tracing::debug!("Reading order file: {}", self.config.order_path());
        let order_bytes = self.storage.read_file(self.config.order_path()).await?;
        let order = read_order_table(&order_bytes)?;

        let template_path = self.config.template_path();
        tracing::debug!("Reading removal template: {}", template_path);
        let template_bytes = self.storage.read_file(template_path).await?;
        let removal = if is_csv(template_path) {
            read_removal_config_csv(&template_bytes)?
        } else {
            read_removal_config(&template_bytes, self.config.template_sheet())?
        };

        if removal.is_empty() {
            tracing::warn!("Removal template has no usable records, nothing will be cleared");
        }
        if !removal.skipped.is_empty() {
            tracing::warn!(
                "{} removal template row(s) were skipped",
                removal.skipped.len()
            );
        }

        Ok(ExtractedInputs { order, removal })
    }

    async fn transform(&self, inputs: ExtractedInputs) -> Result<TransformResult> {
        let rules = self.config.rules();
        tracing::debug!(
            "Protected supplier '{}', dropped prefix '{}', {} header row(s)",
            rules.protected_supplier,
            rules.dropped_header_prefix,
            rules.header_rows
        );
        transform(&inputs.order, &inputs.removal, rules)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.output_file(self.config.output_file_name());

        let workbook = write_order_table(&result.table)?;
        tracing::debug!("Writing workbook ({} bytes) to {}", workbook.len(), output_path);
        self.storage.write_file(&output_path, &workbook).await?;

        if self.config.write_summary() {
            let summary_path = self.output_file(SUMMARY_FILE_NAME);
            let json = serde_json::to_string_pretty(&result.summary)?;
            self.storage.write_file(&summary_path, json.as_bytes()).await?;
            tracing::debug!("Summary saved to {}", summary_path);
        }

        Ok(output_path)
    }
}
