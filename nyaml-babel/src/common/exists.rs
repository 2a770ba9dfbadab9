//! Occurrence constraints
//!
//! nyaml folds `minOccurs`, `maxOccurs`, `optional`, `recommended` and
//! `required` into one `exists` entry. The keyword form and the bounds form are
//! mutually exclusive.

use crate::error::{ConversionError, Result};
use crate::formats::nyaml::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Optional,
    Recommended,
    Required,
}

impl Flag {
    pub fn keyword(self) -> &'static str {
        match self {
            Flag::Optional => "optional",
            Flag::Recommended => "recommended",
            Flag::Required => "required",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Min(String),
    /// `unbounded` in NXDL, `infty` in nyaml
    Max(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occurrence {
    Flag(Flag),
    /// Explicit bounds in declaration order
    Bounds(Vec<Bound>),
}

fn max_to_xml(value: &str) -> String {
    if value == "infty" {
        "unbounded".to_string()
    } else {
        value.to_string()
    }
}

fn max_to_yaml(value: &str) -> String {
    if value == "unbounded" {
        "infty".to_string()
    } else {
        value.to_string()
    }
}

impl Occurrence {
    /// Parse the value of an `exists` key declared on `line`.
    pub fn from_yaml(value: &Value, line: usize) -> Result<Self> {
        let invalid = || ConversionError::InvalidExists { line };
        match value {
            Value::Scalar(s) => match s.text.as_str() {
                "optional" => Ok(Occurrence::Flag(Flag::Optional)),
                "recommended" => Ok(Occurrence::Flag(Flag::Recommended)),
                "required" => Ok(Occurrence::Flag(Flag::Required)),
                _ => Err(invalid()),
            },
            Value::Sequence(items) => {
                let words: Vec<&str> = items
                    .iter()
                    .map(|v| v.as_str().ok_or_else(invalid))
                    .collect::<Result<_>>()?;
                let bounds = match words.as_slice() {
                    ["min", n] => vec![Bound::Min(n.to_string())],
                    ["max", m] => vec![Bound::Max(max_to_xml(m))],
                    ["min", n, "max", m] => {
                        vec![Bound::Min(n.to_string()), Bound::Max(max_to_xml(m))]
                    }
                    ["max", m, "min", n] => {
                        vec![Bound::Max(max_to_xml(m)), Bound::Min(n.to_string())]
                    }
                    _ => return Err(invalid()),
                };
                Ok(Occurrence::Bounds(bounds))
            }
            _ => Err(invalid()),
        }
    }

    /// NXDL attributes in the order they are written.
    pub fn xml_attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Occurrence::Flag(Flag::Optional) => vec![("optional", "true".to_string())],
            Occurrence::Flag(Flag::Recommended) => vec![("recommended", "true".to_string())],
            Occurrence::Flag(Flag::Required) => vec![("optional", "false".to_string())],
            Occurrence::Bounds(bounds) => bounds
                .iter()
                .map(|b| match b {
                    Bound::Min(n) => ("minOccurs", n.clone()),
                    Bound::Max(m) => ("maxOccurs", m.clone()),
                })
                .collect(),
        }
    }

    /// Collect the occurrence attributes of an NXDL element.
    ///
    /// `location` prefixes the conflict message, e.g. `"Field 'data': "`.
    pub fn from_xml_attributes<'a, I>(attributes: I, location: &str) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut flag = None;
        let mut bounds = Vec::new();
        for (key, value) in attributes {
            let value = value.trim();
            match key {
                "minOccurs" => bounds.push(Bound::Min(value.to_string())),
                "maxOccurs" => bounds.push(Bound::Max(value.to_string())),
                "optional" | "required" | "recommended" => {
                    let truthy = value.eq_ignore_ascii_case("true");
                    flag = Some(match (key, truthy) {
                        ("optional", true) | ("required", false) => Flag::Optional,
                        ("optional", false) | ("required", true) => Flag::Required,
                        (_, true) => Flag::Recommended,
                        (_, false) => Flag::Optional,
                    });
                }
                _ => {}
            }
        }
        match (flag, bounds.is_empty()) {
            (Some(_), false) => Err(ConversionError::OccurrenceConflict {
                location: location.to_string(),
            }),
            (Some(flag), true) => Ok(Some(Occurrence::Flag(flag))),
            (None, false) => Ok(Some(Occurrence::Bounds(bounds))),
            (None, true) => Ok(None),
        }
    }

    /// Value of the nyaml `exists` entry.
    pub fn to_yaml(&self) -> String {
        match self {
            Occurrence::Flag(flag) => flag.keyword().to_string(),
            Occurrence::Bounds(bounds) => {
                let words: Vec<String> = bounds
                    .iter()
                    .map(|b| match b {
                        Bound::Min(n) => format!("min, {n}"),
                        Bound::Max(m) => format!("max, {}", max_to_yaml(m)),
                    })
                    .collect();
                format!("[{}]", words.join(", "))
            }
        }
    }

    /// Order-independent form used to compare two documents.
    pub fn normalized(&self) -> Vec<(&'static str, String)> {
        let mut attrs = self.xml_attributes();
        attrs.sort();
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::nyaml::loader::load_value;

    fn parse(source: &str) -> Result<Occurrence> {
        Occurrence::from_yaml(&load_value(source).unwrap(), 3)
    }

    fn attrs(o: &Occurrence) -> Vec<(&'static str, String)> {
        o.xml_attributes()
    }

    #[test]
    fn keywords_map_to_flags() {
        assert_eq!(attrs(&parse("optional").unwrap()), vec![("optional", "true".into())]);
        assert_eq!(
            attrs(&parse("recommended").unwrap()),
            vec![("recommended", "true".into())]
        );
        assert_eq!(attrs(&parse("required").unwrap()), vec![("optional", "false".into())]);
    }

    #[test]
    fn bounds_keep_order_and_map_infty() {
        assert_eq!(attrs(&parse("[min, 1]").unwrap()), vec![("minOccurs", "1".into())]);
        assert_eq!(attrs(&parse("[max, 3]").unwrap()), vec![("maxOccurs", "3".into())]);
        assert_eq!(
            attrs(&parse("[min, 1, max, infty]").unwrap()),
            vec![("minOccurs", "1".into()), ("maxOccurs", "unbounded".into())]
        );
        assert_eq!(
            attrs(&parse("[max, 2, min, 0]").unwrap()),
            vec![("maxOccurs", "2".into()), ("minOccurs", "0".into())]
        );
    }

    #[test]
    fn malformed_exists_reports_line() {
        for source in ["sometimes", "[min]", "[min, 1, min, 2]", "~"] {
            let err = parse(source).unwrap_err();
            assert_eq!(err, ConversionError::InvalidExists { line: 3 }, "{source}");
        }
    }

    #[test]
    fn xml_flags_reverse_map() {
        let cases = [
            (("optional", "true"), "optional"),
            (("optional", "false"), "required"),
            (("recommended", "true"), "recommended"),
            (("required", "true"), "required"),
            (("required", "false"), "optional"),
        ];
        for (attr, expected) in cases {
            let occurrence = Occurrence::from_xml_attributes([attr], "").unwrap().unwrap();
            assert_eq!(occurrence.to_yaml(), expected);
        }
    }

    #[test]
    fn xml_bounds_reverse_map() {
        let occurrence =
            Occurrence::from_xml_attributes([("minOccurs", "0"), ("maxOccurs", "unbounded")], "")
                .unwrap()
                .unwrap();
        assert_eq!(occurrence.to_yaml(), "[min, 0, max, infty]");
    }

    #[test]
    fn mixing_flags_and_bounds_is_an_error() {
        let err = Occurrence::from_xml_attributes(
            [("minOccurs", "0"), ("optional", "true")],
            "Field 'data': ",
        )
        .unwrap_err();
        assert!(matches!(err, ConversionError::OccurrenceConflict { .. }));
        assert!(err.to_string().starts_with("Field 'data': "));
    }

    #[test]
    fn no_occurrence_attributes() {
        let none = Occurrence::from_xml_attributes([("name", "x")], "").unwrap();
        assert!(none.is_none());
    }
}
