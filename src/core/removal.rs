use crate::domain::model::{Cell, RawRemovalRow, RemovalConfig, RemovalRecord, ShopCode};
use crate::utils::error::{CleanerError, Result};

/// Parses a `shop_code` cell. Accepts integers, integral floats and digit
/// text with an optional trailing `.0` (how spreadsheets round-trip codes).
pub fn parse_shop_code(cell: &Cell) -> Option<ShopCode> {
    match cell {
        Cell::Int(n) => u64::try_from(*n).ok().map(ShopCode),
        Cell::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64 => {
            Some(ShopCode(*f as u64))
        }
        Cell::Text(text) => {
            let text = text.trim();
            let digits = text.strip_suffix(".0").unwrap_or(text);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse::<u64>().ok().map(ShopCode)
        }
        _ => None,
    }
}

fn nickname_of(cell: &Cell) -> Option<String> {
    let text = cell.as_text();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Validates one template row. `Ok(None)` means the row is blank.
pub fn parse_record(row: &RawRemovalRow) -> Result<Option<RemovalRecord>> {
    let blank = |c: &Cell| c.as_text().trim().is_empty();
    if blank(&row.shop_code) && blank(&row.shop_nickname) && blank(&row.notes) {
        return Ok(None);
    }

    if blank(&row.shop_code) {
        return Err(CleanerError::ConfigError {
            row: row.row_number,
            message: "shop_code is missing".to_string(),
        });
    }

    let shop_code = parse_shop_code(&row.shop_code).ok_or_else(|| CleanerError::ConfigError {
        row: row.row_number,
        message: format!("shop_code '{}' is not a number", row.shop_code.as_text()),
    })?;

    Ok(Some(RemovalRecord {
        shop_code,
        shop_nickname: nickname_of(&row.shop_nickname),
    }))
}

/// Builds a [`RemovalConfig`], skipping malformed rows instead of failing.
pub fn build_removal_config<I>(rows: I) -> RemovalConfig
where
    I: IntoIterator<Item = RawRemovalRow>,
{
    let mut config = RemovalConfig::default();

    for row in rows {
        match parse_record(&row) {
            Ok(Some(record)) => config.records.push(record),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Skipping removal template row: {}", e);
                config.skipped.push(e);
            }
        }
    }

    tracing::debug!(
        "Removal config: {} records, {} skipped",
        config.records.len(),
        config.skipped.len()
    );
    config
}
