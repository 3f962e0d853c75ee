use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use flora_model::TermLabel;

use crate::error::{Result, TermsError};

/// One row of `terms.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRow {
    pub label: TermLabel,
    pub pattern: String,
    pub replace: Option<String>,
    pub category: Option<String>,
}

/// Reads CSV rows into header-keyed maps with trimmed values.
pub(crate) fn read_csv_rows<R: Read>(reader: R, path: &Path) -> Result<Vec<BTreeMap<String, String>>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|error| TermsError::csv(path, &error))?
        .clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| TermsError::csv(path, &error))?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .trim()
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

fn required<'a>(row: &'a BTreeMap<String, String>, column: &str, path: &Path) -> Result<&'a str> {
    row.get(column)
        .map(String::as_str)
        .ok_or_else(|| TermsError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

fn optional(row: &BTreeMap<String, String>, column: &str) -> Option<String> {
    row.get(column)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_lowercase())
}

/// Parses `terms.csv` (`label,pattern,replace,category`).
pub fn load_term_rows<R: Read>(reader: R, path: &Path) -> Result<Vec<TermRow>> {
    let rows = read_csv_rows(reader, path)?;
    let mut terms = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        // header is line 1
        let line = idx + 2;
        let label_text = required(row, "label", path)?;
        let label: TermLabel = label_text
            .parse()
            .map_err(|_| TermsError::UnknownLabel {
                path: path.to_path_buf(),
                line,
                label: label_text.to_string(),
            })?;
        let pattern = required(row, "pattern", path)?.to_lowercase();
        if pattern.is_empty() {
            return Err(TermsError::EmptyPattern {
                path: path.to_path_buf(),
                line,
            });
        }
        terms.push(TermRow {
            label,
            pattern,
            replace: optional(row, "replace"),
            category: optional(row, "category"),
        });
    }
    Ok(terms)
}

/// Parses `units.csv` (`units,millimeters`) into unit → millimeter factors.
pub fn load_unit_factors<R: Read>(reader: R, path: &Path) -> Result<BTreeMap<String, f64>> {
    let rows = read_csv_rows(reader, path)?;
    let mut factors = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let units = required(row, "units", path)?.to_lowercase();
        let value = required(row, "millimeters", path)?;
        let factor: f64 = value.parse().map_err(|_| TermsError::InvalidNumber {
            path: path.to_path_buf(),
            line: idx + 2,
            value: value.to_string(),
        })?;
        factors.insert(units, factor);
    }
    Ok(factors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_term_rows() {
        let csv = "label,pattern,replace,category\n\
                   part,Leaves,leaf,\n\
                   descriptor,woody,,woodiness\n";
        let rows = load_term_rows(csv.as_bytes(), Path::new("terms.csv")).expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pattern, "leaves");
        assert_eq!(rows[0].replace.as_deref(), Some("leaf"));
        assert_eq!(rows[0].category, None);
        assert_eq!(rows[1].category.as_deref(), Some("woodiness"));
    }

    #[test]
    fn test_unknown_label_reports_line() {
        let csv = "label,pattern,replace,category\npart,leaf,,\nbogus,x,,\n";
        let error = load_term_rows(csv.as_bytes(), Path::new("terms.csv")).unwrap_err();
        assert!(matches!(error, TermsError::UnknownLabel { line: 3, .. }));
    }

    #[test]
    fn test_load_unit_factors() {
        let csv = "units,millimeters\nmm,1\ncm,10\nµm,0.001\n";
        let factors = load_unit_factors(csv.as_bytes(), Path::new("units.csv")).expect("units");
        assert_eq!(factors.get("cm"), Some(&10.0));
        assert_eq!(factors.get("µm"), Some(&0.001));
    }

    #[test]
    fn test_bad_factor_is_an_error() {
        let csv = "units,millimeters\nmm,one\n";
        let error = load_unit_factors(csv.as_bytes(), Path::new("units.csv")).unwrap_err();
        assert!(matches!(error, TermsError::InvalidNumber { line: 2, .. }));
    }
}
