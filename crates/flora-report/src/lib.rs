//! Output for extracted traits.
//!
//! - **Markup**: nested highlight tags over overlapping spans
//! - **HTML**: a report table with highlighted treatment text
//! - **CSV**: one row per document with expanded trait columns

pub mod csv_writer;
pub mod error;
pub mod html;
pub mod markup;

pub use csv_writer::{Row, build_columns, write_csv, write_csv_file};
pub use error::{RenderError, Result};
pub use html::{CLASS_COUNT, HtmlOptions, TraitClasses, render_html, write_html};
pub use markup::{Cut, Highlight, Style, cuts_for, insert_markup, render_markup};
