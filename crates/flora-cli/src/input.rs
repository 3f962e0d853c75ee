//! Treatment file discovery and loading.
//!
//! Inputs are files or directories. Directories are scanned (not recursively)
//! for `.html`, `.htm` and `.txt` files. HTML pages are reduced to text with
//! block elements turned into paragraph breaks, so treatment selection can
//! still tell the description paragraph apart.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use quick_xml::escape::unescape;
use regex::Regex;
use tracing::{debug, warn};

const TEXT_EXTENSIONS: &[&str] = &["html", "htm", "txt"];

static DROP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|head)\b.*?</(script|style|head)\s*>")
        .expect("DROP_RE regex is invalid")
});
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*(br|/p|/div|/tr|/table|/h[1-6]|/li)\b[^>]*>")
        .expect("BLOCK_RE regex is invalid")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("TAG_RE regex is invalid"));
static SPACES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\u{a0}]+").expect("SPACES_RE regex is invalid"));
static BREAKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \n]*\n").expect("BREAKS_RE regex is invalid"));

/// A loaded treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treatment {
    /// File stem, used as the document id.
    pub id: String,
    pub path: PathBuf,
    pub text: String,
}

impl Treatment {
    /// Taxon name guessed from the file name: `Acer_rubrum.html` → `Acer rubrum`.
    pub fn taxon(&self) -> String {
        self.id.replace('_', " ")
    }
}

fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Expands directories into their treatment files, sorted by file name.
/// Explicit file arguments are kept whatever their extension.
pub fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            bail!("input not found: {}", input.display());
        }
        let mut found = Vec::new();
        let entries =
            fs::read_dir(input).with_context(|| format!("read directory {}", input.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("read directory {}", input.display()))?
                .path();
            if path.is_file() && has_text_extension(&path) {
                found.push(path);
            }
        }
        if found.is_empty() {
            warn!(dir = %input.display(), "no treatment files found");
        }
        found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        files.extend(found);
    }
    debug!(files = files.len(), "discovered inputs");
    Ok(files)
}

/// Plain text of an HTML page, with block boundaries as blank lines.
pub fn html_to_text(html: &str) -> String {
    let text = DROP_RE.replace_all(html, "");
    let text = BLOCK_RE.replace_all(&text, "\n\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = text.replace("&nbsp;", " ");
    let unescaped = unescape(&text).map(Cow::into_owned);
    let text = match unescaped {
        Ok(unescaped) => unescaped,
        Err(error) => {
            debug!(%error, "leaving entities escaped");
            text
        }
    };
    let text = SPACES_RE.replace_all(&text, " ");
    BREAKS_RE.replace_all(&text, "\n\n").trim().to_string()
}

/// Loads one treatment file.
pub fn load_treatment(path: &Path) -> Result<Treatment> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_html = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));
    let text = if is_html { html_to_text(&raw) } else { raw };
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Treatment {
        id,
        path: path.to_path_buf(),
        text,
    })
}
