//! Dimensions of a field
//!
//! Four nyaml notations describe the same `(rank, [(index, value, extras)])`
//! structure:
//!
//! - rank only: `dimensions: {rank: 2}`
//! - shorthand: `dimensions: {dim: (nx, ny)}`, optionally with `rank`
//! - legacy shorthand: `dimensions: {rank: 2, dim: [[1, nx], [2, ny]]}`
//! - full: `dimensions: {rank: 2, 1: {value: nx}, 2: {value: ny, ref: x}}`
//!
//! A bare string `dimensions: (nx, ny)` sets the rank from the entry count.
//! The emitter writes the shortest notation that loses nothing.

use super::doc::{emit_doc, render_doc};
use super::tables::{describe, revert_yaml_escapes, yaml_entry, NXDL_DIM_ATTRIBUTES};
use crate::error::{ConversionError, Result};
use crate::formats::nyaml::value::{Mapping, Value};
use crate::ir::XmlElement;
use once_cell::sync::Lazy;
use regex::Regex;

static SHORTHAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\([A-Za-z0-9_, ]+\)$").expect("valid regex"));

static INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

static SHORTHAND_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"));

/// Attributes that force the full notation
const EXTRA_DIM_ATTRIBUTES: &[&str] = &["ref", "required", "incr", "refindex"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dim {
    pub index: String,
    pub attributes: Vec<(String, String)>,
}

impl Dim {
    pub fn value(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == "value")
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub rank: Option<String>,
    /// Text of the `<doc>` element
    pub doc: Option<String>,
    pub dims: Vec<Dim>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    RankOnly,
    Shorthand,
    Full,
}

fn invalid(line: usize, message: impl Into<String>) -> ConversionError {
    ConversionError::InvalidDimensions {
        line,
        message: message.into(),
    }
}

fn shorthand_entries(text: &str) -> Vec<(usize, String)> {
    text[1..text.len() - 1]
        .replace(' ', "")
        .split(',')
        .enumerate()
        .filter(|(_, v)| !v.is_empty())
        .map(|(i, v)| (i + 1, v.to_string()))
        .collect()
}

fn scalar_text(value: &Value) -> Option<String> {
    value.as_scalar().map(|s| s.xml_text())
}

fn doc_parts(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    }
}

impl Dimensions {
    /// Parse any of the nyaml notations of a `dimensions`/`dim` value.
    pub fn from_yaml(value: &Value, line: usize, doc_width: usize) -> Result<Self> {
        match value {
            Value::Null => Ok(Dimensions::default()),
            Value::Scalar(s) => {
                let text = s.text.trim();
                if !SHORTHAND.is_match(text) {
                    return Err(invalid(
                        line,
                        format!("dimensions '{text}' must look like (a, b)"),
                    ));
                }
                let entries = shorthand_entries(text);
                Ok(Dimensions {
                    rank: Some(entries.len().to_string()),
                    doc: None,
                    dims: entries
                        .into_iter()
                        .map(|(i, v)| Dim {
                            index: i.to_string(),
                            attributes: vec![("value".to_string(), v)],
                        })
                        .collect(),
                })
            }
            Value::Mapping(map) => Self::from_mapping(map, line, doc_width),
            Value::Sequence(_) => Err(invalid(
                line,
                "dimensions must be a mapping or a (a, b) string",
            )),
        }
    }

    fn from_mapping(map: &Mapping, line: usize, doc_width: usize) -> Result<Self> {
        let mut dims = Dimensions {
            rank: map.get("rank").and_then(scalar_text),
            doc: match map.get("doc") {
                Some(doc) => Some(render_doc(&doc_parts(doc), doc_width, line)?),
                None => None,
            },
            dims: Vec::new(),
        };

        let has_index = map.keys().any(|k| INDEX.is_match(k));
        if has_index {
            for (key, entry) in map.iter() {
                if key == "rank" || key == "doc" {
                    continue;
                }
                if !INDEX.is_match(key) {
                    return Err(invalid(
                        line,
                        format!("'{key}' is not a dimension index"),
                    ));
                }
                let entry = entry.as_mapping().ok_or_else(|| {
                    invalid(line, format!("dimension {key} must be a mapping"))
                })?;
                let mut attributes = Vec::new();
                for (attr, val) in entry.iter() {
                    if !NXDL_DIM_ATTRIBUTES.contains(&attr) {
                        return Err(invalid(
                            line,
                            format!(
                                "dim attribute '{attr}' is not in {}",
                                describe(NXDL_DIM_ATTRIBUTES)
                            ),
                        ));
                    }
                    let text = scalar_text(val).unwrap_or_default();
                    attributes.push((attr.to_string(), revert_yaml_escapes(text.trim())));
                }
                dims.dims.push(Dim {
                    index: key.to_string(),
                    attributes,
                });
            }
            return Ok(dims);
        }

        if let Some(key) = map
            .keys()
            .find(|k| !matches!(*k, "rank" | "doc" | "dim"))
        {
            return Err(invalid(
                line,
                format!("'{key}' is not allowed in dimensions"),
            ));
        }

        match map.get("dim") {
            None => Ok(dims),
            Some(Value::Scalar(s)) => {
                let text = s.text.trim();
                if !SHORTHAND.is_match(text) {
                    return Err(invalid(line, format!("dim '{text}' must look like (a, b)")));
                }
                dims.dims = shorthand_entries(text)
                    .into_iter()
                    .map(|(i, v)| Dim {
                        index: i.to_string(),
                        attributes: vec![("value".to_string(), v)],
                    })
                    .collect();
                Ok(dims)
            }
            Some(Value::Sequence(entries)) => {
                if dims.rank.is_none() {
                    return Err(invalid(line, "a dim list needs an explicit rank"));
                }
                for entry in entries {
                    let pair: Vec<String> = entry
                        .as_sequence()
                        .unwrap_or_default()
                        .iter()
                        .filter_map(scalar_text)
                        .collect();
                    match pair.as_slice() {
                        [index, value] if !index.is_empty() && !value.is_empty() => {
                            dims.dims.push(Dim {
                                index: index.clone(),
                                attributes: vec![("value".to_string(), value.clone())],
                            })
                        }
                        _ => {
                            return Err(invalid(
                                line,
                                "each dim entry must be a pair [index, value]",
                            ))
                        }
                    }
                }
                Ok(dims)
            }
            Some(other) => Err(invalid(
                line,
                format!("dim must be a (a, b) string, found {}", other.kind()),
            )),
        }
    }

    /// The `<dimensions>` element.
    pub fn to_element(&self) -> XmlElement {
        let mut element = XmlElement::new("dimensions");
        if let Some(rank) = &self.rank {
            element.set("rank", rank.clone());
        }
        if let Some(doc) = &self.doc {
            let mut doc_element = XmlElement::new("doc");
            doc_element.text = Some(doc.clone());
            element.push(doc_element);
        }
        for dim in &self.dims {
            let mut dim_element = XmlElement::new("dim");
            dim_element.set("index", dim.index.clone());
            for (key, value) in &dim.attributes {
                dim_element.set(key.clone(), value.clone());
            }
            element.push(dim_element);
        }
        element
    }

    /// Read a `<dimensions>` element.
    pub fn from_element(element: &XmlElement) -> Result<Self> {
        let mut dims = Dimensions {
            rank: element.get("rank").map(str::to_string),
            doc: element.child("doc").map(|d| d.text.clone().unwrap_or_default()),
            dims: Vec::new(),
        };
        for dim in element.elements().filter(|e| e.name == "dim") {
            let index = dim
                .get("index")
                .filter(|i| !i.is_empty())
                .ok_or_else(|| {
                    ConversionError::Structure(
                        "Found a dim element that has no index attribute".to_string(),
                    )
                })?;
            let mut attributes = Vec::new();
            for (key, value) in &dim.attributes {
                if key == "index" {
                    continue;
                }
                if !NXDL_DIM_ATTRIBUTES.contains(&key.as_str()) {
                    return Err(ConversionError::UnwantedAttribute {
                        node: "dim".to_string(),
                        attr: key.clone(),
                        allowed: describe(NXDL_DIM_ATTRIBUTES),
                    });
                }
                attributes.push((key.clone(), value.clone()));
            }
            dims.dims.push(Dim {
                index: index.to_string(),
                attributes,
            });
        }
        Ok(dims)
    }

    /// Shortest notation that keeps every attribute.
    pub fn notation(&self) -> Notation {
        if self.dims.is_empty() {
            if self.rank.is_some() {
                return Notation::RankOnly;
            }
            return Notation::Full;
        }
        let sequential = self
            .dims
            .iter()
            .enumerate()
            .all(|(i, d)| d.index == (i + 1).to_string());
        let plain = self.dims.iter().all(|d| {
            d.attributes
                .iter()
                .all(|(k, _)| !EXTRA_DIM_ATTRIBUTES.contains(&k.as_str()))
                && d.value().is_some_and(|v| SHORTHAND_VALUE.is_match(v))
        });
        if sequential && plain {
            Notation::Shorthand
        } else {
            Notation::Full
        }
    }

    /// nyaml lines for the `dimensions` entry at `depth`.
    pub fn to_yaml(&self, depth: usize, unit: usize) -> String {
        let indent = " ".repeat(depth * unit);
        let inner = " ".repeat((depth + 1) * unit);
        let mut out = format!("{indent}dimensions:\n");
        if let Some(rank) = &self.rank {
            out.push_str(&yaml_entry("rank", rank, depth + 1, unit));
        }
        if let Some(doc) = &self.doc {
            out.push_str(&emit_doc("doc", Some(doc), depth + 1, unit));
        }

        match self.notation() {
            Notation::RankOnly => {}
            Notation::Shorthand => {
                let values: Vec<&str> = self.dims.iter().filter_map(Dim::value).collect();
                if values.len() == 1 {
                    out.push_str(&format!("{inner}dim: ({},)\n", values[0]));
                } else {
                    out.push_str(&format!("{inner}dim: ({})\n", values.join(", ")));
                }
            }
            Notation::Full => {
                let mut sorted: Vec<&Dim> = self.dims.iter().collect();
                sorted.sort_by_key(|d| d.index.parse::<u64>().unwrap_or(u64::MAX));
                for dim in sorted {
                    let attributes: Vec<&(String, String)> =
                        dim.attributes.iter().filter(|(_, v)| !v.is_empty()).collect();
                    if attributes.is_empty() {
                        continue;
                    }
                    out.push_str(&format!("{inner}{}:\n", dim.index));
                    for (key, value) in attributes {
                        out.push_str(&yaml_entry(key, value, depth + 2, unit));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::nyaml::loader::load_value;

    fn from_yaml(source: &str) -> Result<Dimensions> {
        let value = load_value(source).unwrap();
        let dims = value.as_mapping().unwrap().get("dimensions").unwrap().clone();
        Dimensions::from_yaml(&dims, 9, 80)
    }

    fn values(d: &Dimensions) -> Vec<(&str, Option<&str>)> {
        d.dims.iter().map(|d| (d.index.as_str(), d.value())).collect()
    }

    #[test]
    fn rank_only() {
        let d = from_yaml("dimensions:\n  rank: 1\n  doc: A vector.\n").unwrap();
        assert_eq!(d.rank.as_deref(), Some("1"));
        assert_eq!(d.doc.as_deref(), Some("\nA vector.\n"));
        assert_eq!(d.notation(), Notation::RankOnly);
    }

    #[test]
    fn shorthand_with_and_without_rank() {
        let d = from_yaml("dimensions:\n  dim: (nx, ny)\n").unwrap();
        assert_eq!(d.rank, None);
        assert_eq!(values(&d), vec![("1", Some("nx")), ("2", Some("ny"))]);

        let d = from_yaml("dimensions:\n  rank: 1\n  dim: (n,)\n").unwrap();
        assert_eq!(d.rank.as_deref(), Some("1"));
        assert_eq!(values(&d), vec![("1", Some("n"))]);
    }

    #[test]
    fn bare_string_sets_rank() {
        let d = from_yaml("dimensions: (a, b, c)\n").unwrap();
        assert_eq!(d.rank.as_deref(), Some("3"));
        assert_eq!(d.dims.len(), 3);
    }

    #[test]
    fn legacy_list_needs_rank() {
        let d = from_yaml("dimensions:\n  rank: 2\n  dim: [[1, nx], [2, ny]]\n").unwrap();
        assert_eq!(values(&d), vec![("1", Some("nx")), ("2", Some("ny"))]);
        assert!(from_yaml("dimensions:\n  dim: [[1, nx]]\n").is_err());
    }

    #[test]
    fn full_notation_normalizes_booleans() {
        let d = from_yaml(
            "dimensions:\n  rank: 2\n  1:\n    value: n\n  2:\n    ref: x\n    required: False\n",
        )
        .unwrap();
        assert_eq!(d.dims[1].attributes[1], ("required".into(), "false".into()));
        assert_eq!(d.notation(), Notation::Full);
    }

    #[test]
    fn unknown_dim_attribute_names_line() {
        let err = from_yaml("dimensions:\n  1:\n    size: 3\n").unwrap_err();
        assert!(matches!(err, ConversionError::InvalidDimensions { line: 9, .. }));
        assert!(err.to_string().contains("'size'"));
    }

    #[test]
    fn element_round_trip_keeps_everything() {
        let d = from_yaml("dimensions:\n  rank: 2\n  dim: (nx, ny)\n").unwrap();
        assert_eq!(Dimensions::from_element(&d.to_element()).unwrap(), d);
    }

    #[test]
    fn emits_one_notation_per_case() {
        let rank_only = Dimensions {
            rank: Some("2".into()),
            ..Default::default()
        };
        assert_eq!(rank_only.to_yaml(1, 2), "  dimensions:\n    rank: 2\n");

        let shorthand = from_yaml("dimensions:\n  rank: 1\n  dim: (n,)\n").unwrap();
        assert_eq!(
            shorthand.to_yaml(0, 2),
            "dimensions:\n  rank: 1\n  dim: (n,)\n"
        );

        let full = from_yaml("dimensions:\n  rank: 1\n  1:\n    value: n\n    ref: x\n").unwrap();
        assert_eq!(
            full.to_yaml(0, 2),
            "dimensions:\n  rank: 1\n  1:\n    value: n\n    ref: x\n"
        );
    }

    #[test]
    fn full_notation_values_with_colons_read_back() {
        let d = Dimensions {
            rank: Some("1".into()),
            doc: None,
            dims: vec![Dim {
                index: "1".into(),
                attributes: vec![
                    ("value".into(), "n".into()),
                    ("ref".into(), "a: b".into()),
                ],
            }],
        };
        let text = d.to_yaml(0, 2);
        assert_eq!(
            text,
            "dimensions:\n  rank: 1\n  1:\n    value: n\n    ref: |\n      a: b\n"
        );
        assert_eq!(from_yaml(&text).unwrap(), d);
    }

    #[test]
    fn out_of_order_indices_use_full_notation() {
        let d = Dimensions {
            rank: None,
            doc: None,
            dims: vec![
                Dim {
                    index: "2".into(),
                    attributes: vec![("value".into(), "b".into())],
                },
                Dim {
                    index: "1".into(),
                    attributes: vec![("value".into(), "a".into())],
                },
            ],
        };
        assert_eq!(d.notation(), Notation::Full);
        assert_eq!(d.to_yaml(0, 2), "dimensions:\n  1:\n    value: a\n  2:\n    value: b\n");
    }
}
