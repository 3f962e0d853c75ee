use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use flora_core::{GenusFilter, TraitPipeline};
use flora_model::{Document, ExtractOptions};
use flora_report::{HtmlOptions, render_html, write_csv, write_csv_file, write_html};
use flora_terms::TermRegistry;
use tracing::{error, info, info_span};

use flora_cli::config::load_options;
use flora_cli::input::{discover_inputs, load_treatment};

use crate::cli::{ExtractArgs, OutputFormatArg, TermsArgs};
use crate::summary::apply_table_style;
use crate::types::{DocumentSummary, ExtractResult};

const REPORT_TITLE: &str = "Extracted traits";

pub fn run_terms(args: &TermsArgs) -> Result<()> {
    let terms = TermRegistry::load(args.terms_dir.as_deref()).context("load terms")?;
    let mut table = Table::new();
    table.set_header(vec!["Label", "Terms"]);
    apply_table_style(&mut table);
    for (label, count) in terms.label_counts() {
        table.add_row(vec![label.to_string(), count.to_string()]);
    }
    table.add_row(vec!["units".to_string(), terms.unit_factors().len().to_string()]);
    println!("{table}");
    Ok(())
}

/// File options with command-line flags layered on top.
fn extract_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    let mut options = load_options(args.config.as_deref())?;
    if !args.traits.is_empty() {
        options.trait_filters.clone_from(&args.traits);
    }
    if !args.genera.is_empty() {
        options.genus_filters.clone_from(&args.genera);
    }
    if let Some(part) = &args.default_part {
        options.default_part.clone_from(part);
    }
    if args.terms_dir.is_some() {
        options.terms_dir.clone_from(&args.terms_dir);
    }
    if args.whole_text {
        options.select_treatment = false;
    }
    if args.no_highlight_parts {
        options.highlight_parts = false;
    }
    Ok(options)
}

pub fn run_extract(args: &ExtractArgs) -> Result<ExtractResult> {
    let started = Instant::now();
    let span = info_span!("extract", format = args.format.as_str());
    let _guard = span.enter();

    let options = extract_options(args)?;
    let terms = TermRegistry::load(options.terms_dir.as_deref()).context("load terms")?;
    let genus_filter = GenusFilter::new(&options.genus_filters).context("genus filter")?;
    let pipeline =
        TraitPipeline::new(terms, options.clone()).context("build extraction pipeline")?;

    let files = discover_inputs(&args.inputs)?;
    let mut documents = Vec::with_capacity(files.len());
    let mut skipped = 0;
    for path in &files {
        let treatment = load_treatment(path)?;
        if !genus_filter.matches(&treatment.taxon()) {
            skipped += 1;
            continue;
        }
        let document = pipeline
            .parse(&treatment.id, &treatment.text)
            .with_context(|| format!("extract {}", path.display()))?;
        documents.push(document);
    }
    info!(
        documents = documents.len(),
        skipped,
        duration_ms = started.elapsed().as_millis(),
        "extraction complete"
    );

    let write_start = Instant::now();
    write_output(args, &documents, &pipeline).inspect_err(|e| {
        error!(error = %e, "failed to write output");
    })?;
    info!(
        duration_ms = write_start.elapsed().as_millis(),
        "output written"
    );

    Ok(ExtractResult {
        format: args.format,
        output: args.output.clone(),
        documents: documents.iter().map(summarize).collect(),
        skipped,
        elapsed_ms: started.elapsed().as_millis(),
    })
}

fn write_output(args: &ExtractArgs, documents: &[Document], pipeline: &TraitPipeline) -> Result<()> {
    let options = pipeline.options();
    let terms = pipeline.terms();
    let html_options = HtmlOptions {
        highlight_parts: options.highlight_parts,
        ..HtmlOptions::new(REPORT_TITLE, options.default_part.as_str())
    };
    match (&args.output, args.format) {
        (Some(path), OutputFormatArg::Json) => {
            create_parent(path)?;
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, documents)
                .with_context(|| format!("write {}", path.display()))?;
            writer.flush().with_context(|| format!("write {}", path.display()))?;
        }
        (Some(path), OutputFormatArg::Csv) => {
            write_csv_file(path, documents, terms, &options.default_part)?;
        }
        (Some(path), OutputFormatArg::Html) => {
            write_html(path, documents, &html_options)?;
        }
        (None, OutputFormatArg::Json) => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, documents).context("write json")?;
            writeln!(stdout)?;
        }
        (None, OutputFormatArg::Csv) => {
            write_csv(io::stdout().lock(), documents, terms, &options.default_part)?;
        }
        (None, OutputFormatArg::Html) => {
            println!("{}", render_html(documents, &html_options)?);
        }
    }
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

fn summarize(document: &Document) -> DocumentSummary {
    let mut kinds = BTreeMap::new();
    for record in &document.traits {
        *kinds.entry(record.kind.to_string()).or_insert(0) += 1;
    }
    DocumentSummary {
        id: document.id.clone(),
        sentences: document.sentences.len(),
        traits: document.traits.len(),
        kinds,
    }
}
