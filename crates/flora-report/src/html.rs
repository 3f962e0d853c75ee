//! HTML report: one table row per document with highlighted text and the
//! extracted traits grouped by name.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use flora_model::{Document, TraitKind, TraitRecord};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use crate::error::{RenderError, Result};
use crate::markup::{Highlight, Style, render_markup};

/// Number of distinct trait colors before they repeat.
pub const CLASS_COUNT: usize = 57;

const SKIPPED_FIELDS: &[&str] = &["raw_value"];

#[derive(Debug, Clone)]
pub struct HtmlOptions {
    pub title: String,
    pub default_part: String,
    /// Render part mentions in bold.
    pub highlight_parts: bool,
}

impl HtmlOptions {
    pub fn new(title: impl Into<String>, default_part: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            default_part: default_part.into(),
            highlight_parts: true,
        }
    }
}

/// CSS class of every trait name in a report, assigned in name order.
#[derive(Debug, Clone, Default)]
pub struct TraitClasses {
    classes: BTreeMap<String, usize>,
}

impl TraitClasses {
    pub fn new(documents: &[Document], default_part: &str) -> Self {
        let names: BTreeSet<String> = documents
            .iter()
            .flat_map(|d| d.traits.iter())
            .filter(|r| r.kind != TraitKind::Part)
            .map(|r| r.name(default_part))
            .collect();
        Self {
            classes: names
                .into_iter()
                .enumerate()
                .map(|(i, name)| (name, i % CLASS_COUNT))
                .collect(),
        }
    }

    pub fn class(&self, name: &str) -> String {
        format!("c{}", self.classes.get(name).copied().unwrap_or(0))
    }
}

/// Highlights for one document's traits.
pub fn highlights(
    document: &Document,
    classes: &TraitClasses,
    options: &HtmlOptions,
) -> Vec<Highlight> {
    document
        .traits
        .iter()
        .filter_map(|record| {
            let name = record.name(&options.default_part);
            let style = if record.kind == TraitKind::Part {
                if !options.highlight_parts {
                    return None;
                }
                Style::Bold
            } else {
                Style::Class(classes.class(&name))
            };
            Some(Highlight::new(record.start, record.end, style).with_title(name.replace('_', " ")))
        })
        .collect()
}

fn stylesheet() -> String {
    let mut css = String::from(
        "body { font-family: sans-serif; }\n\
         table { border-collapse: collapse; }\n\
         td, th { border: 1px solid #bbb; padding: 4px; vertical-align: top; }\n\
         td.text { line-height: 1.6; max-width: 60em; }\n",
    );
    for i in 0..CLASS_COUNT {
        let hue = (i * 137) % 360;
        css.push_str(&format!(".c{i} {{ background-color: hsl({hue}, 70%, 85%); }}\n"));
    }
    css
}

fn text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// `field: value` lines of one record.
fn format_record(record: &TraitRecord) -> Vec<String> {
    record
        .fields
        .iter()
        .filter(|(name, _)| !SKIPPED_FIELDS.contains(&name.as_str()))
        .map(|(name, value)| format!("{name}: {value}"))
        .collect()
}

fn write_traits<W: Write>(
    xml: &mut Writer<W>,
    document: &Document,
    classes: &TraitClasses,
    options: &HtmlOptions,
) -> Result<()> {
    let mut grouped: BTreeMap<String, Vec<&TraitRecord>> = BTreeMap::new();
    for record in document.traits.iter().filter(|r| r.kind != TraitKind::Part) {
        grouped
            .entry(record.name(&options.default_part))
            .or_default()
            .push(record);
    }

    xml.write_event(Event::Start(BytesStart::new("table")))?;
    for (name, records) in &grouped {
        xml.write_event(Event::Start(BytesStart::new("tr")))?;
        let mut label = BytesStart::new("td");
        label.push_attribute(("class", classes.class(name).as_str()));
        xml.write_event(Event::Start(label))?;
        xml.write_event(Event::Text(BytesText::new(&name.replace('_', " "))))?;
        xml.write_event(Event::End(BytesEnd::new("td")))?;

        xml.write_event(Event::Start(BytesStart::new("td")))?;
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                xml.write_event(Event::Empty(BytesStart::new("hr")))?;
            }
            for (j, line) in format_record(record).iter().enumerate() {
                if j > 0 {
                    xml.write_event(Event::Empty(BytesStart::new("br")))?;
                }
                xml.write_event(Event::Text(BytesText::new(line)))?;
            }
        }
        xml.write_event(Event::End(BytesEnd::new("td")))?;
        xml.write_event(Event::End(BytesEnd::new("tr")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("table")))?;
    Ok(())
}

fn write_report<W: Write>(
    xml: &mut Writer<W>,
    documents: &[Document],
    options: &HtmlOptions,
) -> Result<()> {
    let classes = TraitClasses::new(documents, &options.default_part);
    let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    xml.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    xml.write_event(Event::Start(BytesStart::new("html")))?;
    xml.write_event(Event::Start(BytesStart::new("head")))?;
    let mut meta = BytesStart::new("meta");
    meta.push_attribute(("charset", "utf-8"));
    xml.write_event(Event::Empty(meta))?;
    text_element(xml, "title", &options.title)?;
    text_element(xml, "style", &stylesheet())?;
    xml.write_event(Event::End(BytesEnd::new("head")))?;

    xml.write_event(Event::Start(BytesStart::new("body")))?;
    text_element(xml, "h1", &options.title)?;
    text_element(xml, "p", &format!("Created {created}"))?;

    xml.write_event(Event::Start(BytesStart::new("table")))?;
    xml.write_event(Event::Start(BytesStart::new("tr")))?;
    for heading in ["Document", "Text", "Traits"] {
        text_element(xml, "th", heading)?;
    }
    xml.write_event(Event::End(BytesEnd::new("tr")))?;

    for document in documents {
        let markup = render_markup(&document.text, &highlights(document, &classes, options))?;
        xml.write_event(Event::Start(BytesStart::new("tr")))?;
        text_element(xml, "td", &document.id)?;
        let mut cell = BytesStart::new("td");
        cell.push_attribute(("class", "text"));
        xml.write_event(Event::Start(cell))?;
        xml.write_event(Event::Text(BytesText::from_escaped(markup.as_str())))?;
        xml.write_event(Event::End(BytesEnd::new("td")))?;
        xml.write_event(Event::Start(BytesStart::new("td")))?;
        write_traits(xml, document, &classes, options)?;
        xml.write_event(Event::End(BytesEnd::new("td")))?;
        xml.write_event(Event::End(BytesEnd::new("tr")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("table")))?;
    xml.write_event(Event::End(BytesEnd::new("body")))?;
    xml.write_event(Event::End(BytesEnd::new("html")))?;
    Ok(())
}

/// Renders the report to a string.
pub fn render_html(documents: &[Document], options: &HtmlOptions) -> Result<String> {
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_report(&mut xml, documents, options)?;
    Ok(String::from_utf8_lossy(&xml.into_inner()).into_owned())
}

/// Writes the report to `path`, creating parent directories.
pub fn write_html(path: &Path, documents: &[Document], options: &HtmlOptions) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| RenderError::write(parent, e))?;
    }
    let file = File::create(path).map_err(|e| RenderError::write(path, e))?;
    let mut xml = Writer::new_with_indent(BufWriter::new(file), b' ', 2);
    write_report(&mut xml, documents, options)?;
    xml.into_inner()
        .flush()
        .map_err(|e| RenderError::write(path, e))?;
    debug!(path = %path.display(), documents = documents.len(), "wrote html report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        let mut document = Document::new("acer", "Leaves 3–5 cm, red.");
        document.traits = vec![
            TraitRecord::new(TraitKind::Part, 0, 6).with_field("part", "leaf"),
            TraitRecord::new(TraitKind::Size, 7, 13)
                .with_field("part", "leaf")
                .with_field("length_low", 3.0)
                .with_field("length_high", 5.0)
                .with_field("length_units", "cm"),
            TraitRecord::new(TraitKind::Color, 15, 18)
                .with_field("part", "leaf")
                .with_field("color", vec!["red".to_string()])
                .with_field("raw_value", "red"),
        ];
        document
    }

    #[test]
    fn test_classes_follow_name_order() {
        let classes = TraitClasses::new(&[document()], "plant");
        assert_eq!(classes.class("leaf_color"), "c0");
        assert_eq!(classes.class("leaf_size"), "c1");
    }

    #[test]
    fn test_parts_are_bold_only_when_asked() {
        let document = document();
        let classes = TraitClasses::new(std::slice::from_ref(&document), "plant");
        let mut options = HtmlOptions::new("Traits", "plant");
        let bold = highlights(&document, &classes, &options);
        assert_eq!(bold[0].style, Style::Bold);
        assert_eq!(bold[1].title.as_deref(), Some("leaf size"));

        options.highlight_parts = false;
        assert_eq!(highlights(&document, &classes, &options).len(), 2);
    }

    #[test]
    fn test_format_record_skips_raw_value() {
        let document = document();
        assert_eq!(format_record(&document.traits[2]), vec!["color: red", "part: leaf"]);
    }

    #[test]
    fn test_report_contains_markup_and_traits() {
        let html = render_html(&[document()], &HtmlOptions::new("Traits", "plant")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<strong title="part">Leaves</strong>"#));
        assert!(html.contains(r#"<span class="c1" title="leaf size">3–5 cm</span>"#));
        assert!(html.contains("length_units: cm"));
        assert!(!html.contains("raw_value"));
    }
}
