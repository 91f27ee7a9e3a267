use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mrdc_model::{EntityOutcome, RunSummary};

/// Prints the per-entity run table, with failed entities detailed after it.
pub fn print_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("Table"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Dropped"),
        header_cell("Output"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    for index in [2, 3, 4] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 6, CellAlignment::Center);

    let mut rows_in = 0usize;
    let mut rows_out = 0usize;
    for outcome in &summary.outcomes {
        rows_in += outcome.rows_in;
        rows_out += outcome.rows_out;
        table.add_row(vec![
            Cell::new(outcome.entity.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(outcome.entity.table_name()),
            Cell::new(outcome.rows_in),
            Cell::new(outcome.rows_out),
            dropped_cell(outcome.rows_dropped()),
            output_cell(outcome),
            status_cell(outcome),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("all entities")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(rows_in).add_attribute(Attribute::Bold),
        Cell::new(rows_out).add_attribute(Attribute::Bold),
        dropped_cell(rows_in.saturating_sub(rows_out)).add_attribute(Attribute::Bold),
        dim_cell("-"),
        total_status_cell(summary),
    ]);
    println!("{table}");

    let failures: Vec<&EntityOutcome> = summary
        .outcomes
        .iter()
        .filter(|outcome| !outcome.succeeded())
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for outcome in failures {
            eprintln!(
                "- {}: {}",
                outcome.entity,
                outcome.error.as_deref().unwrap_or("unknown")
            );
        }
    }
}

/// Condensed style for listing tables (`standards`).
pub fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn output_cell(outcome: &EntityOutcome) -> Cell {
    let name = outcome
        .output
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned());
    match name {
        Some(name) => Cell::new(name),
        None => dim_cell("-"),
    }
}

fn status_cell(outcome: &EntityOutcome) -> Cell {
    if outcome.succeeded() {
        Cell::new("ok")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn total_status_cell(summary: &RunSummary) -> Cell {
    if summary.has_failures() {
        Cell::new(format!("{} FAILED", summary.failure_count()))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("ok")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    }
}

fn dropped_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
