use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tlc_pipeline::{AggregateRebuild, RefreshReport, RunReport};

pub fn print_run_summary(report: &RunReport) {
    let mode = if report.full_reload {
        "full reload"
    } else {
        "append"
    };
    println!("Database: {} ({mode})", report.database);
    if report.database_created {
        println!("Created database {}", report.database);
    }
    if let Some(zones) = report.zones_loaded {
        println!("Zones loaded: {zones}");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Rows in"),
        header_cell("Loaded"),
        header_cell("Dropped"),
        header_cell("Chunks"),
        header_cell("Time (ms)"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for file in &report.files {
        table.add_row(vec![
            Cell::new(&file.source),
            Cell::new(file.rows_in),
            Cell::new(file.rows_loaded),
            count_cell(file.rows_dropped, Color::Yellow),
            Cell::new(file.chunks),
            Cell::new(file.elapsed_ms),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.rows_read()).add_attribute(Attribute::Bold),
        Cell::new(report.rows_loaded()).add_attribute(Attribute::Bold),
        count_cell(report.rows_dropped(), Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(report.elapsed_ms).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_schema_findings(report);
    print_aggregates_table(&report.aggregates);

    if !report.skipped_files.is_empty() {
        eprintln!("Skipped:");
        for file in &report.skipped_files {
            eprintln!("- {file}");
        }
    }
}

pub fn print_refresh_summary(report: &RefreshReport) {
    println!("Database: {}", report.database);
    print_aggregates_table(&report.aggregates);
    println!("Refreshed in {} ms", report.elapsed_ms);
}

fn print_schema_findings(report: &RunReport) {
    if report.schema.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Missing columns"),
        header_cell("Unmapped columns"),
    ]);
    apply_table_style(&mut table);
    for finding in &report.schema {
        table.add_row(vec![
            Cell::new(&finding.source),
            list_cell(&finding.missing_columns),
            list_cell(&finding.dropped_columns),
        ]);
    }
    println!();
    println!("Schema findings:");
    println!("{table}");
}

fn print_aggregates_table(aggregates: &[AggregateRebuild]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Aggregate"),
        header_cell("Indexes"),
        header_cell("Time (ms)"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for rebuild in aggregates {
        table.add_row(vec![
            Cell::new(&rebuild.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(rebuild.indexes),
            Cell::new(rebuild.elapsed_ms),
        ]);
    }
    println!();
    println!("Aggregates:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
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

fn count_cell(count: u64, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn list_cell(values: &[String]) -> Cell {
    if values.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(values.join(", "))
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
