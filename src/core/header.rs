//! Header-token parsing for order sheet columns.
//!
//! A shop column is identified by a nickname in row 0 and, usually, a
//! `#<digits>#` marker somewhere in the header rows (for example the address
//! row `#003# ქ.თბილისი, წყნეთის ქ. #2`). Parsing never fails: a header
//! without a marker simply yields no shop code.

use crate::domain::model::{Cell, OrderTable, ShopCode};
use regex::Regex;
use std::sync::OnceLock;

fn shop_code_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"#(\d+)#").unwrap())
}

/// First `#<digits>#` marker in `text`, if any.
pub fn extract_shop_code(text: &str) -> Option<ShopCode> {
    shop_code_marker()
        .captures_iter(text)
        .find_map(|caps| caps[1].parse::<u64>().ok())
        .map(ShopCode)
}

/// Identifying tokens of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIdentity {
    pub index: usize,
    pub nickname: String,
    pub shop_code: Option<ShopCode>,
}

impl ColumnIdentity {
    /// Reads the nickname from row 0 and the first shop code marker found in
    /// rows `0..header_rows`.
    pub fn from_table(table: &OrderTable, index: usize, header_rows: usize) -> Self {
        let nickname = table
            .cell(0, index)
            .map(|c| c.as_text().into_owned())
            .unwrap_or_default();

        let shop_code = (0..header_rows.max(1))
            .filter_map(|row| table.cell(row, index))
            .find_map(|cell| match cell {
                Cell::Text(text) => extract_shop_code(text),
                _ => None,
            });

        Self {
            index,
            nickname,
            shop_code,
        }
    }
}

/// Index of the first row-0 cell whose trimmed text equals `label`.
pub fn find_column(header: &[Cell], label: &str) -> Option<usize> {
    let label = label.trim();
    header.iter().position(|c| c.as_text().trim() == label)
}
