use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;

use crate::utils::error::CleanerError;

/// A loosely typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excel serial date value.
    DateTime(f64),
    /// Literal error text such as `#N/A`.
    Error(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text rendering used for header matching and previews.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(s) | Cell::Error(s) => Cow::Borrowed(s.as_str()),
            Cell::Int(n) => Cow::Owned(n.to_string()),
            Cell::Float(f) | Cell::DateTime(f) => Cow::Owned(f.to_string()),
            Cell::Bool(b) => Cow::Owned(b.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// One sheet of an order workbook. Row 0 is the nickname header row.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTable {
    pub sheet_name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl OrderTable {
    pub fn new(sheet_name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Numeric shop identifier. `#003#` and `3` are the same shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShopCode(pub u64);

impl std::fmt::Display for ShopCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalRecord {
    pub shop_code: ShopCode,
    pub shop_nickname: Option<String>,
}

/// One data row of the removal template before validation.
#[derive(Debug, Clone, Default)]
pub struct RawRemovalRow {
    /// 1-based row number in the source sheet.
    pub row_number: usize,
    pub shop_code: Cell,
    pub shop_nickname: Cell,
    pub notes: Cell,
}

#[derive(Debug, Default)]
pub struct RemovalConfig {
    pub records: Vec<RemovalRecord>,
    /// Rows dropped by the partial-tolerance policy.
    pub skipped: Vec<CleanerError>,
}

impl RemovalConfig {
    pub fn from_records(records: Vec<RemovalRecord>) -> Self {
        Self {
            records,
            skipped: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn shop_codes(&self) -> HashSet<ShopCode> {
        self.records.iter().map(|r| r.shop_code).collect()
    }

    pub fn nicknames(&self) -> HashSet<&str> {
        self.records
            .iter()
            .filter_map(|r| r.shop_nickname.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NicknameMatch {
    #[default]
    Exact,
    Trimmed,
}

impl NicknameMatch {
    pub fn normalize<'a>(&self, value: &'a str) -> &'a str {
        match self {
            NicknameMatch::Exact => value,
            NicknameMatch::Trimmed => value.trim(),
        }
    }
}

pub const DEFAULT_SUPPLIER_HEADER: &str = "ძირითადი მომწოდებელი";
pub const DEFAULT_PROTECTED_SUPPLIER: &str = "გაგრა პლუსი";
pub const DEFAULT_DROPPED_HEADER_PREFIX: &str = "დასავლეთი";

/// Literal values that steer one transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningRules {
    pub supplier_header: String,
    pub protected_supplier: String,
    pub dropped_header_prefix: String,
    /// Rows before this index are headers and are never cleared.
    pub header_rows: usize,
    pub nickname_match: NicknameMatch,
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self {
            supplier_header: DEFAULT_SUPPLIER_HEADER.to_string(),
            protected_supplier: DEFAULT_PROTECTED_SUPPLIER.to_string(),
            dropped_header_prefix: DEFAULT_DROPPED_HEADER_PREFIX.to_string(),
            header_rows: 1,
            nickname_match: NicknameMatch::Exact,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSummary {
    pub sheet_name: String,
    pub columns_to_clear_count: usize,
    pub dropped_columns_count: usize,
    pub rows_eligible_by_supplier_rule: usize,
    pub protected_rows: usize,
    pub cleared_cells: usize,
    pub protected_supplier: String,
    pub skipped_config_records: usize,
}

/// Both inputs, parsed and ready for the transformer.
#[derive(Debug)]
pub struct ExtractedInputs {
    pub order: OrderTable,
    pub removal: RemovalConfig,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: OrderTable,
    pub summary: TransformSummary,
}
