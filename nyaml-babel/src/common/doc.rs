//! Doc text in both directions
//!
//! nyaml writes a doc either as one block literal or as a list of parts; in
//! NXDL it is the text of a `<doc>` element. Parts that cite an external
//! standard are kept in nyaml as a structured `xref` mapping and rendered in
//! NXDL as a two-line reStructuredText reference:
//!
//! ```text
//! This concept is related to term `T`_ of the S standard.
//! .. _T: U
//! ```

use super::tables::{escape_for_yaml, revert_yaml_escapes};
use crate::error::{ConversionError, Result};
use crate::formats::nyaml::loader::load_value;
use crate::formats::nyaml::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

const XREF_KEYS: &[&str] = &["term", "spec", "url"];

static XREF_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"This concept is related to term `([^`:]+)`_ of the (.*?) standard\.\s+\.\. _([^:]+): ([^\s]+)",
    )
    .expect("valid regex")
});

static BLANK_LINE_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

static LINK_TARGET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\.\. _").expect("valid regex"));

/// Drop whitespace-only lines at the top and bottom.
pub fn clean_empty_lines<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(s), Some(e)) => lines[s..=e].to_vec(),
        _ => Vec::new(),
    }
}

/// Expand tabs to the next multiple of `tab_size` columns.
pub fn expand_tabs(text: &str, tab_size: usize) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = tab_size - column % tab_size;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;
    let mut rest = text.trim();

    while !rest.is_empty() {
        let gap_end = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        let gap = &rest[..gap_end];
        rest = &rest[gap_end..];
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];
        rest = &rest[word_end..];
        if word.is_empty() {
            break;
        }

        let word_len = word.chars().count();
        let gap_len = gap.chars().count();
        if line.is_empty() {
            line.push_str(word);
            line_len = word_len;
        } else if line_len + gap_len + word_len <= width {
            line.push_str(gap);
            line.push_str(word);
            line_len += gap_len + word_len;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Normalize a plain doc part for NXDL: booleans, escapes, wrapping, tabs.
fn format_plain_part(text: &str, width: usize) -> String {
    let mut text = revert_yaml_escapes(text.trim());
    if text == "True" {
        text = "true".to_string();
    } else if text == "False" {
        text = "false".to_string();
    }
    let text = text.trim();

    let formatted = if text.contains('\n') {
        let lines: Vec<&str> = text.split('\n').collect();
        clean_empty_lines(&lines).join("\n")
    } else if text.chars().count() > width {
        wrap(text, width).join("\n")
    } else {
        text.to_string()
    };
    expand_tabs(&formatted, 4).trim().to_string()
}

/// Format one doc part for NXDL, resolving `xref:` parts. `line` is where the
/// doc key sits in the nyaml source.
pub fn format_part(part: &str, width: usize, line: usize) -> Result<String> {
    let clean = part.trim();
    if clean.starts_with("xref:") {
        parse_xref(clean, line)
    } else {
        Ok(format_plain_part(clean, width))
    }
}

/// Text of a `<doc>` element built from one or more nyaml doc parts.
pub fn render_doc<S: AsRef<str>>(parts: &[S], width: usize, line: usize) -> Result<String> {
    let mut text = String::new();
    for part in parts {
        text.push('\n');
        text.push_str(&format_part(part.as_ref(), width, line)?);
        text.push('\n');
    }
    Ok(text)
}

/// A citation of a term in an external standard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xref {
    pub spec: String,
    pub term: String,
    pub url: String,
}

impl Xref {
    /// The two-line reStructuredText form stored in NXDL.
    pub fn to_nxdl_text(&self) -> String {
        format!(
            "This concept is related to term `{}`_ of the {} standard.\n.. _{}: {}",
            self.term, self.spec, self.term, self.url
        )
    }

    /// Recognize the NXDL form inside a doc part.
    pub fn find(text: &str) -> Option<Xref> {
        let caps = XREF_TEXT.captures(text)?;
        let term = caps.get(1)?.as_str();
        if caps.get(3)?.as_str() != term {
            return None;
        }
        Some(Xref {
            term: term.to_string(),
            spec: caps.get(2)?.as_str().to_string(),
            url: caps.get(4)?.as_str().to_string(),
        })
    }
}

fn invalid_xref(line: usize, message: impl Into<String>) -> ConversionError {
    ConversionError::InvalidXref {
        line,
        message: message.into(),
    }
}

/// Parse an `xref:` doc part and render it as NXDL text.
pub fn parse_xref(text: &str, line: usize) -> Result<String> {
    let line_count = text.lines().count();
    let value = load_value(text).map_err(|_| {
        invalid_xref(
            line,
            "Found invalid xref. Please make sure that your xref entries are valid yaml.",
        )
    })?;
    let entries = match value.as_mapping().and_then(|m| m.get("xref")) {
        Some(Value::Mapping(entries)) => entries.clone(),
        Some(Value::Null) | None => Default::default(),
        Some(_) => {
            return Err(invalid_xref(
                line,
                "Invalid xref. It contains nested or duplicate keys.",
            ))
        }
    };

    if line_count != entries.len() + 1 {
        return Err(invalid_xref(
            line,
            "Invalid xref. It contains nested or duplicate keys.",
        ));
    }
    if line_count > 4 {
        return Err(invalid_xref(line, "Invalid xref. Too many keys."));
    }
    if let Some(key) = entries.keys().find(|k| !XREF_KEYS.contains(k)) {
        return Err(invalid_xref(
            line,
            format!("Invalid xref key `{key}`. Must be one of `term`, `spec` or `url`."),
        ));
    }

    let field = |key: &str, default: &str| -> String {
        entries
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };
    Ok(Xref {
        term: field("term", "NO TERM"),
        spec: field("spec", "NO SPECIFICATION"),
        url: field("url", "NO URL"),
    }
    .to_nxdl_text())
}

/// Re-indent doc or comment text for nyaml at `depth`.
///
/// The result starts with a newline unless the text is empty. Multi-line text
/// keeps its relative indentation, shifted so the first non-blank line sits
/// one level below `depth`; lines left of that column are clamped to it.
pub fn reflow(text: Option<&str>, depth: usize, unit: usize) -> String {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return String::new();
    };
    let text = escape_for_yaml(text);
    let yaml_indent = (depth + 1) * unit;

    if !text.contains('\n') {
        return format!("\n{}{}", " ".repeat(yaml_indent), text.trim());
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let lines = clean_empty_lines(&lines);
    let indent_of = |line: &str| line.len() - line.trim_start().len();
    let first_indent = lines
        .iter()
        .find(|l| !l.trim().is_empty())
        .map(|l| indent_of(l))
        .filter(|&n| n > 0)
        .unwrap_or(yaml_indent);

    let mut out = String::new();
    for line in lines {
        out.push('\n');
        let content = line.trim();
        if content.is_empty() {
            continue;
        }
        let shifted = (indent_of(line) + yaml_indent).saturating_sub(first_indent);
        out.push_str(&" ".repeat(shifted.max(yaml_indent)));
        out.push_str(content);
    }
    out
}

/// nyaml lines for a doc-like entry `tag` at `depth`.
pub fn emit_doc(tag: &str, text: Option<&str>, depth: usize, unit: usize) -> String {
    let indent = " ".repeat(depth * unit);
    let text = reflow(text, depth, unit);

    let mut parts: Vec<String> = Vec::new();
    for piece in BLANK_LINE_SPLIT.split(&text) {
        match parts.last_mut() {
            Some(last) if LINK_TARGET.is_match(piece) => {
                last.push_str("\n\n");
                last.push_str(piece);
            }
            _ => parts.push(piece.to_string()),
        }
    }

    let mut has_xref = false;
    let rendered: Vec<String> = parts
        .iter()
        .filter(|p| p.is_empty() || !p.trim().is_empty())
        .map(|part| match Xref::find(part) {
            Some(xref) => {
                has_xref = true;
                let inner = " ".repeat((depth + 1) * unit);
                let leaf = " ".repeat((depth + 2) * unit);
                format!(
                    "\n{inner}xref:\n{leaf}spec: {}\n{leaf}term: {}\n{leaf}url: {}",
                    xref.spec, xref.term, xref.url
                )
            }
            None => part.clone(),
        })
        .collect();

    if rendered.len() == 1 {
        return format!("{indent}{tag}: |{}\n", rendered[0]);
    }
    if has_xref {
        let mut out = format!("{indent}{tag}:\n");
        for part in rendered {
            let part = if part.starts_with('\n') {
                part
            } else {
                format!("\n{part}")
            };
            out.push_str(&format!("{indent}- |{part}\n"));
        }
        return out;
    }
    format!("{indent}{tag}: |{text}\n")
}
