//! Template aggregation
//!
//! Turns a raw comma separated request into one text response holding a
//! section per requested template, in request order.

use super::error::TemplateError;
use super::index::TemplateIndex;

/// Split a raw request into template names.
///
/// Surrounding commas and whitespace are removed first, then each token is
/// trimmed. Empty tokens are kept and later fail lookup as `NotFound("")`.
pub fn parse_names(raw: &str) -> Vec<String> {
    raw.trim_matches(|c: char| c == ',' || c.is_whitespace())
        .split(',')
        .map(|name| name.trim().to_string())
        .collect()
}

/// Titlecase the first character and lowercase the rest
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut capitalized = String::with_capacity(name.len());
    match titlecase_digraph(first) {
        Some(title) => capitalized.push(title),
        None => capitalized.extend(first.to_uppercase()),
    }
    capitalized.push_str(&chars.as_str().to_lowercase());
    capitalized
}

/// Latin digraphs whose titlecase form differs from their uppercase form
const fn titlecase_digraph(c: char) -> Option<char> {
    match c {
        '\u{01C4}'..='\u{01C6}' => Some('\u{01C5}'),
        '\u{01C7}'..='\u{01C9}' => Some('\u{01C8}'),
        '\u{01CA}'..='\u{01CC}' => Some('\u{01CB}'),
        '\u{01F1}'..='\u{01F3}' => Some('\u{01F2}'),
        _ => None,
    }
}

/// Render one response section: header line, blank line, content
pub fn render_section(name: &str, content: &str) -> String {
    format!("## {}\n\n{content}\n", capitalize(name))
}

/// Resolve every requested template and concatenate their sections.
///
/// The first name that does not resolve aborts the whole request; nothing
/// resolved before it is returned.
pub fn get_templates(index: &TemplateIndex, raw: &str) -> Result<String, TemplateError> {
    let mut response = String::new();

    for name in parse_names(raw) {
        let entry = index.find(&name)?;
        let content = entry.read_content()?;
        response.push_str(&render_section(&name, &content));
    }

    Ok(response.trim().to_string())
}
