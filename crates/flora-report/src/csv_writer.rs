//! CSV output: one row per document, one column per expanded trait field.
//!
//! Records are grouped under `{name}.{qualifiers}` headers, where the
//! qualifiers are the sorted `sex`, `location` and `group` values. Each group
//! also gets a `.raw` column with the matched source text. A group whose
//! records each hold a single text value collapses into one joined cell; size
//! groups are converted to millimeters; every other group is enumerated as
//! `{header}.{i}.{field}`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use flora_model::{Document, FieldValue};
use flora_normalization::{format_numeric, to_millimeters};
use flora_terms::TermRegistry;
use tracing::debug;

use crate::error::{RenderError, Result};

const QUALIFIERS: &[&str] = &["sex", "location", "group"];
const RAW_SEPARATOR: &str = " | ";

/// Expanded columns of one document, keyed by header.
pub type Row = BTreeMap<String, String>;

/// Fields of one record that are not qualifiers.
type Values<'a> = BTreeMap<&'a str, &'a FieldValue>;

/// Expands a document's records into columns.
pub fn build_columns(document: &Document, terms: &TermRegistry, default_part: &str) -> Row {
    let mut groups: BTreeMap<String, Vec<Values<'_>>> = BTreeMap::new();
    let mut raw: BTreeMap<String, Vec<&str>> = BTreeMap::new();

    for record in &document.traits {
        let mut qualifiers: Vec<String> = QUALIFIERS
            .iter()
            .filter_map(|key| record.get(key).map(ToString::to_string))
            .collect();
        qualifiers.sort();
        let header = std::iter::once(record.name(default_part))
            .chain(qualifiers)
            .collect::<Vec<_>>()
            .join(".");

        let values: Values<'_> = record
            .fields
            .iter()
            .filter(|(key, _)| !QUALIFIERS.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value))
            .collect();
        raw.entry(header.clone()).or_default().push(document.raw(record));
        groups.entry(header).or_default().push(values);
    }

    let mut row = Row::new();
    for (header, texts) in raw {
        row.insert(format!("{header}.raw"), texts.join(RAW_SEPARATOR));
    }
    for (header, records) in &groups {
        if let Some(joined) = joined_text(records) {
            row.insert(header.clone(), joined);
        } else if header.ends_with("_size") {
            extract_sizes(&mut row, header, records, terms);
        } else {
            extract_traits(&mut row, header, records);
        }
    }
    row
}

/// Sorted distinct values when every record holds the same single text field.
fn joined_text(records: &[Values<'_>]) -> Option<String> {
    let keys: BTreeSet<&str> = records.iter().flat_map(|r| r.keys().copied()).collect();
    if keys.len() != 1 {
        return None;
    }
    let values = records
        .iter()
        .flat_map(|r| r.values())
        .map(|value| value.as_text())
        .collect::<Option<BTreeSet<&str>>>()?;
    Some(values.into_iter().collect::<Vec<_>>().join(", "))
}

fn extract_traits(row: &mut Row, header: &str, records: &[Values<'_>]) {
    for (i, record) in records.iter().enumerate() {
        for (field, value) in record {
            row.insert(format!("{header}.{}.{field}", i + 1), value.to_string());
        }
    }
}

/// Size values in millimeters. Lengths and widths borrow each other's units
/// when their own are missing.
fn extract_sizes(row: &mut Row, header: &str, records: &[Values<'_>], terms: &TermRegistry) {
    for (i, record) in records.iter().enumerate() {
        let length_units = units_of(record, "length").or_else(|| units_of(record, "width"));
        let width_units = units_of(record, "width").or_else(|| units_of(record, "length"));

        for (field, value) in record {
            let key = format!("{header}.{}.{field}", i + 1);
            let (dim, suffix) = field.split_once('_').unwrap_or((*field, ""));
            let cell = match (dim, suffix) {
                (_, "units") => value.to_string(),
                ("length", _) => convert(value, length_units, terms),
                ("width", _) => convert(value, width_units, terms),
                _ => convert(value, units_of(record, dim), terms),
            };
            row.insert(key, cell);
        }
    }
}

fn units_of<'a>(record: &Values<'a>, dim: &str) -> Option<&'a str> {
    let key = format!("{dim}_units");
    record.get(key.as_str()).copied().and_then(FieldValue::as_text)
}

fn convert(value: &FieldValue, units: Option<&str>, terms: &TermRegistry) -> String {
    value
        .as_f64()
        .zip(units)
        .and_then(|(number, units)| to_millimeters(number, units, terms))
        .map(format_numeric)
        .unwrap_or_else(|| value.to_string())
}

/// Writes documents as CSV, sorted by id, with `id` and `text` first.
pub fn write_csv<W: Write>(
    writer: W,
    documents: &[Document],
    terms: &TermRegistry,
    default_part: &str,
) -> Result<()> {
    let mut documents: Vec<&Document> = documents.iter().collect();
    documents.sort_by(|a, b| a.id.cmp(&b.id));
    let rows: Vec<Row> = documents
        .iter()
        .map(|document| build_columns(document, terms, default_part))
        .collect();
    let columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["id", "text"].into_iter().chain(columns.iter().copied()))?;
    for (document, row) in documents.iter().zip(&rows) {
        let cells = columns
            .iter()
            .map(|column| row.get(*column).map(String::as_str).unwrap_or(""));
        csv.write_record(
            [document.id.as_str(), document.text.as_str()]
                .into_iter()
                .chain(cells),
        )?;
    }
    csv.flush()?;
    debug!(rows = rows.len(), columns = columns.len() + 2, "wrote csv");
    Ok(())
}

/// Writes the CSV to `path`, creating parent directories.
pub fn write_csv_file(
    path: &Path,
    documents: &[Document],
    terms: &TermRegistry,
    default_part: &str,
) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| RenderError::write(parent, e))?;
    }
    let file = File::create(path).map_err(|e| RenderError::write(path, e))?;
    write_csv(file, documents, terms, default_part)
}
