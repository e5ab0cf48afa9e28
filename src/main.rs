use clap::Parser;
use order_cleaner::adapters::preview::preview_table;
use order_cleaner::adapters::workbook::read_order_table;
use order_cleaner::core::ConfigProvider;
use order_cleaner::utils::error::{CleanerError, ErrorSeverity};
use order_cleaner::utils::{logger, validation::Validate};
use order_cleaner::{CliConfig, EtlEngine, LocalStorage, OrderCleanerPipeline};

fn report_error(context: &str, e: &CleanerError) -> i32 {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn exit_on_error(context: &str, e: &CleanerError) {
    let code = report_error(context, e);
    if code > 0 {
        std::process::exit(code);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting order-cleaner");
    tracing::debug!("CLI config: {:?}", cli);

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            exit_on_error("Failed to load settings", &e);
            return Ok(());
        }
    };

    if let Err(e) = settings.validate() {
        exit_on_error("Configuration validation failed", &e);
        return Ok(());
    }

    tracing::info!("📁 Order: {}", settings.order_path());
    tracing::info!("📋 Template: {}", settings.template_path());
    tracing::info!(
        "🛡️ Protected supplier: {}",
        settings.rules().protected_supplier
    );

    let storage = LocalStorage::new(".");
    let pipeline = OrderCleanerPipeline::new(storage, settings);
    let engine = EtlEngine::new(pipeline);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        match engine.dry_run().await {
            Ok(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
            Err(e) => exit_on_error("Dry run failed", &e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(report) => {
            println!("✅ Cleaning completed.");
            println!("📁 Output saved to: {}", report.output_path);
            println!("{}", serde_json::to_string_pretty(&report.summary)?);

            if let Some(limit) = cli.preview {
                match std::fs::read(&report.output_path)
                    .map_err(CleanerError::from)
                    .and_then(|bytes| read_order_table(&bytes))
                {
                    Ok(table) => {
                        println!();
                        println!("{}", preview_table(&table, limit));
                    }
                    Err(e) => {
                        tracing::warn!("Preview not available, but the file is ready: {}", e)
                    }
                }
            }
        }
        Err(e) => exit_on_error("Order cleaning failed", &e),
    }

    Ok(())
}
