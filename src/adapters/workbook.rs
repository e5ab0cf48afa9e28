//! Spreadsheet decoding and encoding.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use rust_xlsxwriter::{Format, Workbook};

use crate::core::removal::build_removal_config;
use crate::domain::model::{Cell, OrderTable, RawRemovalRow, RemovalConfig};
use crate::utils::error::{CleanerError, Result};

/// Template column names. The `_optional` spellings come from the packaged
/// template.
mod cols {
    pub const SHOP_CODE: &[&str] = &["shop_code"];
    pub const SHOP_NICKNAME: &[&str] = &["shop_nickname", "shop_nickname_optional"];
    pub const NOTES: &[&str] = &["notes", "notes_optional"];
}

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(n) => Cell::Int(*n),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

/// Converts a calamine range into rows anchored at A1, so leading blank
/// rows and columns keep their position.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<Cell>> {
    let (start_row, start_col) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Vec::new(),
    };

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut out = vec![Cell::Empty; start_col];
        out.extend(row.iter().map(to_cell));
        rows.push(out);
    }
    rows
}

/// Reads the first sheet of an order workbook (xlsx, xlsm, xlsb, xls, ods).
pub fn read_order_table(bytes: &[u8]) -> Result<OrderTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| CleanerError::schema("order workbook has no sheets"))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let rows = range_to_rows(&range);
    if rows.is_empty() {
        return Err(CleanerError::schema(format!(
            "order sheet '{}' is empty",
            sheet_name
        )));
    }

    tracing::debug!(
        "Read order sheet '{}' ({} rows x {} columns)",
        sheet_name,
        rows.len(),
        range.width()
    );
    Ok(OrderTable::new(sheet_name, rows))
}

fn find_header(header: &[String], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.iter().any(|n| h.trim() == *n))
}

/// Maps header-named rows into raw template rows. `first_row_number` is the
/// 1-based sheet row of `rows[0]`.
fn removal_rows(
    header: &[String],
    rows: Vec<Vec<Cell>>,
    first_row_number: usize,
) -> Result<Vec<RawRemovalRow>> {
    let code_col = find_header(header, cols::SHOP_CODE).ok_or_else(|| {
        CleanerError::schema("template must contain a column named 'shop_code'")
    })?;
    let nickname_col = find_header(header, cols::SHOP_NICKNAME);
    let notes_col = find_header(header, cols::NOTES);

    let take = |row: &[Cell], col: Option<usize>| {
        col.and_then(|c| row.get(c)).cloned().unwrap_or_default()
    };

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| RawRemovalRow {
            row_number: first_row_number + idx,
            shop_code: take(&row, Some(code_col)),
            shop_nickname: take(&row, nickname_col),
            notes: take(&row, notes_col),
        })
        .collect())
}

/// Reads the removal template from `sheet` of a workbook.
pub fn read_removal_config(bytes: &[u8], sheet: &str) -> Result<RemovalConfig> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(CleanerError::schema(format!(
            "template has no sheet named '{}'",
            sheet
        )));
    }

    let range = workbook.worksheet_range(sheet)?;
    let mut rows = range_to_rows(&range).into_iter();
    let header: Vec<String> = rows
        .next()
        .map(|r| r.iter().map(|c| c.as_text().into_owned()).collect())
        .unwrap_or_default();

    let raw = removal_rows(&header, rows.collect(), 2)?;
    Ok(build_removal_config(raw))
}

/// Reads the removal template from CSV with a header row.
pub fn read_removal_config_csv(bytes: &[u8]) -> Result<RemovalConfig> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    let raw = removal_rows(&header, rows, 2)?;
    Ok(build_removal_config(raw))
}

/// Encodes `table` as a single-sheet `.xlsx` under its own sheet name.
///
/// Error cells are written as their literal text (`#N/A` reads back as a
/// string, not an error value). Every other cell keeps its type.
pub fn write_order_table(table: &OrderTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&table.sheet_name)?;

    for (row_idx, row) in table.rows.iter().enumerate() {
        let r = u32::try_from(row_idx)
            .map_err(|_| CleanerError::processing("too many rows for an xlsx sheet"))?;

        for (col_idx, cell) in row.iter().enumerate() {
            let c = u16::try_from(col_idx)
                .map_err(|_| CleanerError::processing("too many columns for an xlsx sheet"))?;

            match cell {
                Cell::Empty => {}
                Cell::Text(s) | Cell::Error(s) => {
                    worksheet.write_string(r, c, s)?;
                }
                Cell::Int(n) => {
                    worksheet.write_number(r, c, *n as f64)?;
                }
                Cell::Float(f) => {
                    worksheet.write_number(r, c, *f)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                Cell::DateTime(serial) => {
                    worksheet.write_number_with_format(r, c, *serial, &date_format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ShopCode;

    fn template_bytes(sheet: &str, header: &[&str], rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name(sheet).unwrap();
        for (c, h) in header.iter().enumerate() {
            ws.write_string(0, c as u16, *h).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                match value.parse::<f64>() {
                    Ok(n) => ws.write_number(r as u32 + 1, c as u16, n).unwrap(),
                    Err(_) => ws.write_string(r as u32 + 1, c as u16, *value).unwrap(),
                };
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_write_then_read_keeps_sheet_and_values() {
        let table = OrderTable::new(
            "TDSheet",
            vec![
                vec![Cell::from("ძირითადი მომწოდებელი"), Cell::from("ვაკე")],
                vec![Cell::from("OtherCo"), Cell::Empty],
                vec![Cell::from("გაგრა პლუსი"), Cell::Float(12.5)],
            ],
        );

        let bytes = write_order_table(&table).unwrap();
        let read = read_order_table(&bytes).unwrap();

        assert_eq!(read.sheet_name, "TDSheet");
        assert_eq!(read.row_count(), 3);
        assert_eq!(read.rows[0], table.rows[0]);
        assert!(read.cell(1, 1).map_or(true, Cell::is_empty));
        assert_eq!(read.cell(2, 1), Some(&Cell::Float(12.5)));
    }

    #[test]
    fn test_read_order_table_anchors_grid_at_a1() {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(1, 1, "ძირითადი მომწოდებელი").unwrap();
        ws.write_string(1, 2, "ვაკე #3#").unwrap();
        ws.write_string(2, 1, "OtherCo").unwrap();
        ws.write_number(2, 2, 4.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = read_order_table(&bytes).unwrap();

        assert_eq!(table.row_count(), 3);
        assert!(table.rows[0].iter().all(Cell::is_empty));
        assert_eq!(table.cell(1, 0), Some(&Cell::Empty));
        assert_eq!(table.cell(1, 1), Some(&Cell::from("ძირითადი მომწოდებელი")));
        assert_eq!(table.cell(2, 2), Some(&Cell::Float(4.0)));
    }

    #[test]
    fn test_read_order_table_rejects_empty_sheet() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let bytes = workbook.save_to_buffer().unwrap();

        let err = read_order_table(&bytes).unwrap_err();
        assert!(matches!(err, CleanerError::SchemaError { .. }));
    }

    #[test]
    fn test_error_cells_are_written_as_text() {
        let table = OrderTable::new(
            "TDSheet",
            vec![vec![Cell::from("ძირითადი მომწოდებელი"), Cell::Error("#N/A".to_string())]],
        );

        let read = read_order_table(&write_order_table(&table).unwrap()).unwrap();
        assert_eq!(read.cell(0, 1), Some(&Cell::from("#N/A")));
    }

    #[test]
    fn test_read_removal_config_with_optional_columns() {
        let bytes = template_bytes(
            "clients_to_clear",
            &["shop_code", "shop_nickname_optional", "notes_optional"],
            &[&["3", "ვაკე", "closed"], &["", "", ""], &["abc", "", ""], &["465", "", ""]],
        );

        let config = read_removal_config(&bytes, "clients_to_clear").unwrap();

        assert_eq!(config.records.len(), 2);
        assert_eq!(config.records[0].shop_code, ShopCode(3));
        assert_eq!(config.records[0].shop_nickname.as_deref(), Some("ვაკე"));
        assert_eq!(config.records[1].shop_code, ShopCode(465));
        assert_eq!(config.skipped.len(), 1);
        assert!(matches!(
            config.skipped[0],
            CleanerError::ConfigError { row: 4, .. }
        ));
    }

    #[test]
    fn test_read_removal_config_requires_shop_code_column() {
        let bytes = template_bytes("clients_to_clear", &["code"], &[&["3"]]);
        let err = read_removal_config(&bytes, "clients_to_clear").unwrap_err();
        assert!(matches!(err, CleanerError::SchemaError { .. }));
    }

    #[test]
    fn test_read_removal_config_requires_sheet() {
        let bytes = template_bytes("Sheet1", &["shop_code"], &[&["3"]]);
        let err = read_removal_config(&bytes, "clients_to_clear").unwrap_err();
        assert!(matches!(err, CleanerError::SchemaError { .. }));
    }

    #[test]
    fn test_read_removal_config_csv() {
        let csv = "shop_code,shop_nickname,notes\n003,ვაკე,\n,,\n037,,moved\n";
        let config = read_removal_config_csv(csv.as_bytes()).unwrap();

        assert_eq!(config.records.len(), 2);
        assert_eq!(config.records[1].shop_code, ShopCode(37));
        assert!(config.skipped.is_empty());
    }
}
