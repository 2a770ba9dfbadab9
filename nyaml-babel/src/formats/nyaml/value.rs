//! Ordered value tree for loaded nyaml documents.
//!
//! Mapping order is the order of declaration; re-declaring a key keeps its
//! slot and replaces the value. Scalars keep their raw text so that numbers
//! such as `1.0` or `01` reach the XML exactly as written.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub text: String,
    /// Plain (unquoted, non-block) scalars are subject to boolean normalization.
    pub plain: bool,
}

impl Scalar {
    pub fn plain(text: impl Into<String>) -> Self {
        Scalar {
            text: text.into(),
            plain: true,
        }
    }

    /// Text as it should appear in an XML attribute.
    pub fn xml_text(&self) -> String {
        if self.plain {
            match self.text.as_str() {
                "true" | "True" | "TRUE" => return "true".to_string(),
                "false" | "False" | "FALSE" => return "false".to_string(),
                _ => {}
            }
        }
        self.text.clone()
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().map(|s| s.text.as_str())
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Null, an empty scalar, or an empty collection.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Scalar(s) => s.text.is_empty(),
            Value::Sequence(items) => items.is_empty(),
            Value::Mapping(m) => m.is_empty(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "an empty value",
            Value::Scalar(_) => "a scalar",
            Value::Sequence(_) => "a sequence",
            Value::Mapping(_) => "a mapping",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(String, Value)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One step on the way from the document root to a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Identity of a key: the chain of keys and sequence indices leading to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath(Vec<PathSegment>);

impl KeyPath {
    pub fn root() -> Self {
        KeyPath(Vec::new())
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        KeyPath(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        KeyPath(segments)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// Source lines of every key, built once while loading.
#[derive(Debug, Clone, Default)]
pub struct PositionMap {
    lines: HashMap<KeyPath, usize>,
    by_line: BTreeMap<usize, String>,
}

impl PositionMap {
    pub fn record(&mut self, path: KeyPath, key: &str, line: usize) {
        self.lines.insert(path, line);
        self.by_line.entry(line).or_insert_with(|| key.to_string());
    }

    /// 1-based line of the key at `path`.
    pub fn line_of(&self, path: &KeyPath) -> Option<usize> {
        self.lines.get(path).copied()
    }

    /// The first key declared on `line`, if any.
    pub fn key_at_line(&self, line: usize) -> Option<&str> {
        self.by_line.get(&line).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_keeps_slot() {
        let mut map = Mapping::new();
        map.insert("a".into(), Value::Null);
        map.insert("b".into(), Value::Null);
        map.insert("a".into(), Value::Scalar(Scalar::plain("x")));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a").and_then(Value::as_str), Some("x"));
    }

    #[test]
    fn plain_booleans_normalize() {
        assert_eq!(Scalar::plain("True").xml_text(), "true");
        let quoted = Scalar {
            text: "True".into(),
            plain: false,
        };
        assert_eq!(quoted.xml_text(), "True");
    }

    #[test]
    fn paths_distinguish_nesting() {
        let a = KeyPath::root().child("NXtest").child("doc");
        let b = KeyPath::root().child("doc");
        assert_ne!(a, b);
        assert_eq!(a.depth(), 2);
    }
}
