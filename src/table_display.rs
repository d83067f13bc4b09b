use crate::data::datatable::DataTable;
use crate::data::types::ColumnType;
use crate::error::Result;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use crossterm::style::Stylize;

/// Builds a comfy-table view of `limit` display rows from `start`. Number
/// columns are right aligned and missing values show as `NULL`.
pub fn build_table(table: &DataTable, start: usize, limit: usize) -> Result<Table> {
    let mut view = Table::new();
    view.set_content_arrangement(ContentArrangement::Dynamic);

    let headers: Vec<Cell> = table
        .headers()
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
        .collect();
    view.set_header(headers);

    let types = table.types();

    for row in table.iter_window(start, Some(limit))? {
        let cells: Vec<Cell> = row
            .iter()
            .zip(&types)
            .map(|(value, column_type)| {
                let cell = if value.is_null() {
                    Cell::new("NULL").add_attribute(Attribute::Dim)
                } else {
                    Cell::new(column_type.format(value))
                };
                if matches!(column_type, ColumnType::Number(_)) {
                    cell.set_alignment(CellAlignment::Right)
                } else {
                    cell
                }
            })
            .collect();
        view.add_row(cells);
    }

    Ok(view)
}

pub fn display_table(table: &DataTable, start: usize, limit: usize) -> Result<()> {
    if table.is_empty() {
        println!("{}", "No rows.".yellow());
        return Ok(());
    }

    let view = build_table(table, start, limit)?;
    let shown = limit.min(table.row_count().saturating_sub(start));

    println!("{view}");
    println!(
        "\n{}",
        format!("{} of {} rows shown", shown, table.row_count()).green()
    );
    Ok(())
}
