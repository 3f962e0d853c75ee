use std::collections::BTreeSet;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::ExtractResult;

pub fn print_summary(result: &ExtractResult) {
    if let Some(path) = &result.output {
        println!("Output: {} ({})", path.display(), result.format.as_str());
    }
    if result.skipped > 0 {
        println!("Skipped by genus filter: {}", result.skipped);
    }

    let kinds: BTreeSet<&str> = result
        .documents
        .iter()
        .flat_map(|d| d.kinds.keys().map(String::as_str))
        .collect();

    let mut table = Table::new();
    let mut header = vec![header_cell("Document"), header_cell("Sentences")];
    header.extend(kinds.iter().map(|kind| header_cell(kind)));
    header.push(header_cell("Traits"));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_sentences = 0usize;
    let mut total_traits = 0usize;
    for document in &result.documents {
        total_sentences += document.sentences;
        total_traits += document.traits;
        let mut row = vec![
            Cell::new(&document.id).fg(Color::Blue),
            Cell::new(document.sentences),
        ];
        row.extend(kinds.iter().map(|kind| match document.kinds.get(*kind) {
            Some(count) => Cell::new(count),
            None => dim_cell("-"),
        }));
        row.push(Cell::new(document.traits).add_attribute(Attribute::Bold));
        table.add_row(row);
    }

    let mut total = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_sentences).add_attribute(Attribute::Bold),
    ];
    total.extend(kinds.iter().map(|kind| {
        let count: usize = result
            .documents
            .iter()
            .filter_map(|d| d.kinds.get(*kind))
            .sum();
        Cell::new(count).add_attribute(Attribute::Bold)
    }));
    total.push(Cell::new(total_traits).add_attribute(Attribute::Bold));
    table.add_row(total);

    println!("{table}");
    println!(
        "{} documents in {} ms",
        result.documents.len(),
        result.elapsed_ms
    );
}

pub fn apply_table_style(table: &mut Table) {
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
