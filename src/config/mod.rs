pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::model::CleaningRules;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_positive_number,
    Validate,
};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::domain::model::NicknameMatch;
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_TEMPLATE_PATH: &str = "config/client_removal_template.csv";
pub const DEFAULT_TEMPLATE_SHEET: &str = "clients_to_clear";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "Ori_Nabiji_შეკვეთა(ასატვირთი).xlsx";

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];
const TEMPLATE_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanerSettings {
    pub order_path: String,
    pub template_path: String,
    pub template_sheet: String,
    pub output_path: String,
    pub output_file_name: String,
    pub write_summary: bool,
    pub rules: CleaningRules,
}

impl CleanerSettings {
    /// Built-in defaults for `order_path`.
    pub fn new(order_path: impl Into<String>) -> Self {
        Self {
            order_path: order_path.into(),
            template_path: DEFAULT_TEMPLATE_PATH.to_string(),
            template_sheet: DEFAULT_TEMPLATE_SHEET.to_string(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_file_name: DEFAULT_OUTPUT_FILE_NAME.to_string(),
            write_summary: false,
            rules: CleaningRules::default(),
        }
    }

    /// Overlays every value set in the settings file.
    pub fn apply_toml(&mut self, toml: &TomlConfig) {
        if let Some(v) = &toml.input.template {
            self.template_path = v.clone();
        }
        if let Some(v) = &toml.input.template_sheet {
            self.template_sheet = v.clone();
        }
        if let Some(v) = &toml.rules.supplier_header {
            self.rules.supplier_header = v.clone();
        }
        if let Some(v) = &toml.rules.protected_supplier {
            self.rules.protected_supplier = v.clone();
        }
        if let Some(v) = &toml.rules.dropped_header_prefix {
            self.rules.dropped_header_prefix = v.clone();
        }
        if let Some(v) = toml.rules.header_rows {
            self.rules.header_rows = v;
        }
        if let Some(v) = toml.rules.nickname_match {
            self.rules.nickname_match = v;
        }
        if let Some(v) = &toml.output.path {
            self.output_path = v.clone();
        }
        if let Some(v) = &toml.output.file_name {
            self.output_file_name = v.clone();
        }
        if let Some(v) = toml.output.summary {
            self.write_summary = v;
        }
    }
}

impl ConfigProvider for CleanerSettings {
    fn order_path(&self) -> &str {
        &self.order_path
    }

    fn template_path(&self) -> &str {
        &self.template_path
    }

    fn template_sheet(&self) -> &str {
        &self.template_sheet
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file_name(&self) -> &str {
        &self.output_file_name
    }

    fn write_summary(&self) -> bool {
        self.write_summary
    }

    fn rules(&self) -> &CleaningRules {
        &self.rules
    }
}

impl Validate for CleanerSettings {
    fn validate(&self) -> Result<()> {
        validate_path("order", &self.order_path)?;
        validate_file_extension("order", &self.order_path, WORKBOOK_EXTENSIONS)?;

        validate_path("template", &self.template_path)?;
        validate_file_extension("template", &self.template_path, TEMPLATE_EXTENSIONS)?;
        validate_non_empty_string("template_sheet", &self.template_sheet)?;

        validate_path("output_path", &self.output_path)?;
        validate_path("output_file", &self.output_file_name)?;
        validate_file_extension("output_file", &self.output_file_name, &["xlsx"])?;

        validate_non_empty_string("supplier_header", &self.rules.supplier_header)?;
        validate_non_empty_string("protected_supplier", &self.rules.protected_supplier)?;
        validate_non_empty_string("dropped_header_prefix", &self.rules.dropped_header_prefix)?;
        validate_positive_number("header_rows", self.rules.header_rows, 1)?;

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "order-cleaner")]
#[command(about = "Produce a cleaned copy of a promotional order workbook")]
pub struct CliConfig {
    /// Order workbook to clean (first sheet is used)
    #[arg(long)]
    pub order: String,

    /// Removal template (.xlsx/.xls/.ods or .csv)
    #[arg(long)]
    pub template: Option<String>,

    /// Sheet holding the removal records
    #[arg(long)]
    pub template_sheet: Option<String>,

    /// Directory the cleaned workbook is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// File name of the cleaned workbook
    #[arg(long)]
    pub output_file: Option<String>,

    /// Rows with this supplier are never touched
    #[arg(long)]
    pub protected_supplier: Option<String>,

    /// Columns whose first-row header starts with this are dropped
    #[arg(long)]
    pub drop_prefix: Option<String>,

    /// First-row header of the supplier column
    #[arg(long)]
    pub supplier_header: Option<String>,

    /// Number of header rows above the data
    #[arg(long)]
    pub header_rows: Option<usize>,

    /// How shop nicknames are compared
    #[arg(long, value_enum)]
    pub nickname_match: Option<NicknameMatch>,

    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write summary.json next to the cleaned workbook
    #[arg(long)]
    pub summary: bool,

    /// Print the first N rows of the cleaned sheet
    #[arg(long)]
    pub preview: Option<usize>,

    /// Show what would be cleared without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Command line flags over the settings file over built-in defaults.
    pub fn resolve(&self) -> Result<CleanerSettings> {
        let mut settings = CleanerSettings::new(self.order.clone());

        if let Some(path) = &self.config {
            tracing::info!("Loading settings from: {}", path);
            settings.apply_toml(&TomlConfig::from_file(path)?);
        }

        if let Some(v) = &self.template {
            settings.template_path = v.clone();
        }
        if let Some(v) = &self.template_sheet {
            settings.template_sheet = v.clone();
        }
        if let Some(v) = &self.output_path {
            settings.output_path = v.clone();
        }
        if let Some(v) = &self.output_file {
            settings.output_file_name = v.clone();
        }
        if let Some(v) = &self.protected_supplier {
            settings.rules.protected_supplier = v.clone();
        }
        if let Some(v) = &self.drop_prefix {
            settings.rules.dropped_header_prefix = v.clone();
        }
        if let Some(v) = &self.supplier_header {
            settings.rules.supplier_header = v.clone();
        }
        if let Some(v) = self.header_rows {
            settings.rules.header_rows = v;
        }
        if let Some(v) = self.nickname_match {
            settings.rules.nickname_match = v;
        }
        if self.summary {
            settings.write_summary = true;
        }

        Ok(settings)
    }
}
