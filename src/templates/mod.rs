//! Gitignore template corpus
//!
//! Indexing, lookup, and aggregation over a read-only directory of
//! `<name>.gitignore` files.

mod aggregate;
mod error;
mod index;
mod lookup;

pub use aggregate::{capitalize, get_templates, parse_names, render_section};
pub use error::TemplateError;
pub use index::{format_listing, TemplateEntry, TemplateIndex};

/// File suffix every template carries
pub const TEMPLATE_SUFFIX: &str = ".gitignore";
