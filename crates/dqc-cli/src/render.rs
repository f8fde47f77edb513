//! Terminal rendering of compliance results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dqc_model::ComplianceReport;
use dqc_report::SessionReport;

pub fn print_check_summary(report: &ComplianceReport) {
    println!("Scan: {}", report.scan);
    if report.is_compliant() {
        println!("Compliant: all constraints satisfied");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Parameter"),
        header_cell("Value"),
        header_cell("Expected"),
        header_cell("Pass"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for verdict in &report.verdicts {
        let value = verdict
            .actual
            .as_ref()
            .map_or_else(|| "N/A".to_string(), ToString::to_string);
        table.add_row(vec![
            Cell::new(&verdict.field),
            Cell::new(value),
            Cell::new(&verdict.expected),
            pass_cell(verdict.passed),
        ]);
    }
    println!("{table}");
    println!("Failures: {}", report.failure_count());
}

pub fn print_session_summary(report: &SessionReport) {
    if report.is_compliant() {
        println!("Compliant: all acquisitions satisfied their reference schemas");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Acquisition"),
        header_cell("Parameter"),
        header_cell("Value"),
        header_cell("Expected"),
        header_cell("Pass"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    for entry in &report.entries {
        table.add_row(vec![
            Cell::new(&entry.acquisition)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&entry.parameter),
            Cell::new(&entry.value),
            Cell::new(&entry.expected),
            pass_cell(entry.pass),
        ]);
    }
    println!("{table}");
    println!("Failures: {}", report.entries.len());
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn pass_cell(passed: bool) -> Cell {
    if passed {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗").fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
