use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use csvcheck_core::{ParseError, ParsedTable, TypedRecord, ValidatedRow};

use crate::report::ValidationSummary;

pub fn print_rows(file: &Path, rows: &ParsedTable) {
    println!("File: {}", file.display());
    let Some((header, data)) = rows.split_first() else {
        println!("(no rows)");
        return;
    };
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut table = Table::new();
    let mut header_cells = vec![header_cell("#")];
    header_cells.extend((0..width).map(|idx| match header.get(idx) {
        Some(name) => header_cell(name),
        None => dim_cell("-"),
    }));
    table.set_header(header_cells);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, row) in data.iter().enumerate() {
        let mut cells = vec![dim_cell(idx + 1)];
        cells.extend((0..width).map(|col| match row.get(col) {
            Some(value) => Cell::new(value),
            None => dim_cell("-"),
        }));
        table.add_row(cells);
    }
    println!("{table}");
    println!("{} data rows", data.len());
}

pub fn print_validation(
    file: &Path,
    rows: &[ValidatedRow<TypedRecord>],
    summary: &ValidationSummary,
) {
    println!("File: {}", file.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Status"),
        header_cell("Record / Errors"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Center);
    for (idx, row) in rows.iter().enumerate() {
        let (status, detail) = match row {
            ValidatedRow::Valid { record } => (status_cell(true), Cell::new(record_text(record))),
            ValidatedRow::Invalid { errors, .. } => (
                status_cell(false),
                Cell::new(
                    errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
                .fg(Color::Red),
            ),
        };
        table.add_row(vec![Cell::new(idx + 1), status, detail]);
    }
    println!("{table}");
    print_totals(summary);
}

pub fn print_parse_error(file: &Path, error: &ParseError) {
    eprintln!("File: {}", file.display());
    eprintln!("error[{}]: {error}", error.code());
}

fn print_totals(summary: &ValidationSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Valid"),
        header_cell("Invalid"),
    ]);
    apply_totals_table_style(&mut table);
    table.add_row(vec![
        Cell::new(summary.rows).add_attribute(Attribute::Bold),
        count_cell(summary.valid, Color::Green),
        count_cell(summary.invalid, Color::Red),
    ]);
    println!("{table}");
}

fn record_text(record: &TypedRecord) -> String {
    record
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_cell(valid: bool) -> Cell {
    if valid {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Fixed(8)),
        ColumnConstraint::UpperBoundary(Width::Fixed(8)),
        ColumnConstraint::LowerBoundary(Width::Percentage(60)),
    ]);
}

fn apply_totals_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
