use std::collections::{BTreeSet, HashSet};

use crate::core::header::{find_column, ColumnIdentity};
use crate::domain::model::{
    Cell, CleaningRules, OrderTable, RemovalConfig, TransformResult, TransformSummary,
};
use crate::utils::error::{CleanerError, Result};

/// Columns whose shop code or nickname appears in the removal config.
/// The supplier column is never a target.
pub fn target_columns(
    table: &OrderTable,
    removal: &RemovalConfig,
    rules: &CleaningRules,
    supplier_col: usize,
) -> BTreeSet<usize> {
    let codes = removal.shop_codes();
    let nicknames: HashSet<&str> = removal
        .nicknames()
        .into_iter()
        .map(|n| rules.nickname_match.normalize(n))
        .collect();

    (0..table.column_count())
        .filter(|&col| col != supplier_col)
        .map(|col| ColumnIdentity::from_table(table, col, rules.header_rows))
        .filter(|id| {
            let by_code = id.shop_code.is_some_and(|code| codes.contains(&code));
            let by_nickname = {
                let nickname = rules.nickname_match.normalize(&id.nickname);
                !nickname.is_empty() && nicknames.contains(nickname)
            };
            by_code || by_nickname
        })
        .map(|id| id.index)
        .collect()
}

/// Columns whose row-0 header starts with the dropped prefix.
pub fn dropped_columns(table: &OrderTable, prefix: &str) -> BTreeSet<usize> {
    if prefix.is_empty() {
        return BTreeSet::new();
    }

    table
        .header()
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.as_text().trim().starts_with(prefix))
        .map(|(idx, _)| idx)
        .collect()
}

fn is_protected(row: &[Cell], supplier_col: usize, protected_supplier: &str) -> bool {
    row.get(supplier_col)
        .is_some_and(|cell| cell.as_text().trim() == protected_supplier.trim())
}

/// Produces a cleaned copy of `table`: target cells blanked in every
/// non-protected data row, dropped-prefix columns removed. `table` is left
/// untouched.
pub fn transform(
    table: &OrderTable,
    removal: &RemovalConfig,
    rules: &CleaningRules,
) -> Result<TransformResult> {
    let supplier_col = find_column(table.header(), &rules.supplier_header).ok_or_else(|| {
        CleanerError::schema(format!(
            "could not find supplier column '{}' in the first row",
            rules.supplier_header
        ))
    })?;

    let targets = target_columns(table, removal, rules, supplier_col);
    let dropped = dropped_columns(table, &rules.dropped_header_prefix);

    tracing::debug!(
        "Supplier column {}, target columns {:?}, dropped columns {:?}",
        supplier_col,
        targets,
        dropped
    );

    let mut summary = TransformSummary {
        sheet_name: table.sheet_name.clone(),
        columns_to_clear_count: targets.len(),
        dropped_columns_count: dropped.len(),
        protected_supplier: rules.protected_supplier.clone(),
        skipped_config_records: removal.skipped.len(),
        ..Default::default()
    };

    let mut rows = Vec::with_capacity(table.row_count());
    for (row_idx, row) in table.rows.iter().enumerate() {
        let clearable = if row_idx < rules.header_rows {
            false
        } else if is_protected(row, supplier_col, &rules.protected_supplier) {
            summary.protected_rows += 1;
            false
        } else {
            summary.rows_eligible_by_supplier_rule += 1;
            true
        };

        let mut out = Vec::with_capacity(row.len().saturating_sub(dropped.len()));
        for (col_idx, cell) in row.iter().enumerate() {
            if dropped.contains(&col_idx) {
                continue;
            }
            if clearable && targets.contains(&col_idx) {
                if !cell.is_empty() {
                    summary.cleared_cells += 1;
                }
                out.push(Cell::Empty);
            } else {
                out.push(cell.clone());
            }
        }
        rows.push(out);
    }

    Ok(TransformResult {
        table: OrderTable::new(table.sheet_name.clone(), rows),
        summary,
    })
}
