use crate::core::{Pipeline, TransformSummary};
use crate::utils::error::Result;

/// Output location and run summary of one completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: String,
    pub summary: TransformSummary,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting order cleaning run");

        // Extract
        let inputs = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted sheet '{}' ({} rows) and {} removal record(s)",
            inputs.order.sheet_name,
            inputs.order.row_count(),
            inputs.removal.records.len()
        );

        // Transform
        let result = self.pipeline.transform(inputs).await?;
        let summary = result.summary.clone();
        tracing::info!(
            "Cleared {} cell(s) in {} column(s), dropped {} column(s)",
            summary.cleared_cells,
            summary.columns_to_clear_count,
            summary.dropped_columns_count
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunReport {
            output_path,
            summary,
        })
    }

    /// Extract and transform only; nothing is written.
    pub async fn dry_run(&self) -> Result<TransformSummary> {
        let inputs = self.pipeline.extract().await?;
        let result = self.pipeline.transform(inputs).await?;
        Ok(result.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExtractedInputs, TransformResult};
    use crate::domain::model::{Cell, OrderTable, RemovalConfig};
    use crate::utils::error::CleanerError;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubPipeline {
        fail_transform: bool,
        loaded: AtomicBool,
    }

    impl StubPipeline {
        fn new(fail_transform: bool) -> Self {
            Self {
                fail_transform,
                loaded: AtomicBool::new(false),
            }
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<ExtractedInputs> {
            Ok(ExtractedInputs {
                order: OrderTable::new("TDSheet", vec![vec![Cell::from("header")]]),
                removal: RemovalConfig::default(),
            })
        }

        async fn transform(&self, inputs: ExtractedInputs) -> Result<TransformResult> {
            if self.fail_transform {
                return Err(CleanerError::schema("supplier column missing"));
            }
            Ok(TransformResult {
                summary: TransformSummary {
                    sheet_name: inputs.order.sheet_name.clone(),
                    ..Default::default()
                },
                table: inputs.order,
            })
        }

        async fn load(&self, _result: TransformResult) -> Result<String> {
            self.loaded.store(true, Ordering::SeqCst);
            Ok("out/cleaned.xlsx".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_reports_output_path() {
        let engine = EtlEngine::new(StubPipeline::new(false));
        let report = engine.run().await.unwrap();

        assert_eq!(report.output_path, "out/cleaned.xlsx");
        assert_eq!(report.summary.sheet_name, "TDSheet");
    }

    #[tokio::test]
    async fn test_fatal_error_writes_nothing() {
        let engine = EtlEngine::new(StubPipeline::new(true));
        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, CleanerError::SchemaError { .. }));
        assert!(!engine.pipeline().loaded.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dry_run_does_not_load() {
        let engine = EtlEngine::new(StubPipeline::new(false));
        let summary = engine.dry_run().await.unwrap();

        assert_eq!(summary.sheet_name, "TDSheet");
        assert!(!engine.pipeline().loaded.load(Ordering::SeqCst));
    }
}
