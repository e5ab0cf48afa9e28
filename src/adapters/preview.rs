use crate::domain::model::OrderTable;

/// First `limit` rows of `table`, tab separated, one line per row.
pub fn preview_table(table: &OrderTable, limit: usize) -> String {
    table
        .rows
        .iter()
        .take(limit)
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_text().replace(['\t', '\n'], " "))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Cell;

    #[test]
    fn test_preview_limits_rows() {
        let table = OrderTable::new(
            "TDSheet",
            vec![
                vec![Cell::from("ძირითადი მომწოდებელი"), Cell::from("ვაკე")],
                vec![Cell::from("OtherCo"), Cell::Empty],
                vec![Cell::from("line\nbreak"), Cell::Int(2)],
            ],
        );

        assert_eq!(preview_table(&table, 2), "ძირითადი მომწოდებელი\tვაკე\nOtherCo\t");
        assert_eq!(preview_table(&table, 10).lines().count(), 3);
        assert!(preview_table(&table, 10).ends_with("line break\t2"));
    }
}
