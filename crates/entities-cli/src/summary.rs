use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use entities_thumbs::ThumbnailReport;

use crate::types::CompileResult;

pub fn print_summary(result: &CompileResult) {
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None if result.dry_run && !result.has_errors() => {
            println!("Dry run: no output written");
        }
        None => {}
    }
    if !result.kinds.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Kind"), header_cell("Records")]);
        apply_summary_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        let mut total = 0usize;
        for summary in &result.kinds {
            total += summary.records;
            table.add_row(vec![
                Cell::new(summary.kind)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                count_cell(summary.records, Color::Reset),
            ]);
        }
        table.add_row(vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(total).add_attribute(Attribute::Bold),
        ]);
        println!("{table}");
    }
    if let Some(report) = &result.thumbnails {
        print_thumbnail_table(report);
    }
    if result.has_errors() {
        eprintln!("Invalid records:");
        for error in &result.errors {
            eprintln!("- {error}");
            eprintln!("  record: {}", error.dump);
        }
    }
}

fn print_thumbnail_table(report: &ThumbnailReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Requested"),
        header_cell("Duplicates"),
        header_cell("Created"),
        header_cell("Present"),
        header_cell("Skipped"),
        header_cell("Failed"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.requested),
        dim_or_plain(report.duplicates),
        count_cell(report.created, Color::Green),
        dim_or_plain(report.already_present),
        dim_or_plain(report.skipped),
        count_cell(report.failed, Color::Red),
    ]);
    println!();
    println!("Thumbnails:");
    println!("{table}");
}

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
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_or_plain(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
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
