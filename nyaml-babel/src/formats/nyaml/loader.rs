//! Line-tagging loader
//!
//! Drives the `yaml-rust2` event parser and assembles an ordered [`Mapping`]
//! while recording, for every key, the 1-based line it was declared on. The
//! positions live in a [`PositionMap`] next to the tree rather than inside it.

use super::value::{KeyPath, Mapping, PositionMap, Scalar, Value};
use crate::error::{ConversionError, Result};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// A loaded nyaml document.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub root: Mapping,
    pub positions: PositionMap,
}

impl LoadedDocument {
    /// Line of the key reached by `path`, or 0 when unknown.
    pub fn line(&self, path: &KeyPath) -> usize {
        self.positions.line_of(path).unwrap_or(0)
    }
}

/// Load a nyaml document whose top level must be a mapping.
pub fn load(source: &str) -> Result<LoadedDocument> {
    let (root, positions) = load_tree(source)?;
    match root {
        Some(Value::Mapping(root)) => Ok(LoadedDocument { root, positions }),
        Some(other) => Err(ConversionError::Structure(format!(
            "A nyaml definition must be a mapping at top level, found {}",
            other.kind()
        ))),
        None => Err(ConversionError::Structure(
            "The nyaml definition is empty".to_string(),
        )),
    }
}

/// Load any YAML value, discarding positions. Empty input loads as null.
pub fn load_value(source: &str) -> Result<Value> {
    let (root, _) = load_tree(source)?;
    Ok(root.unwrap_or(Value::Null))
}

fn load_tree(source: &str) -> Result<(Option<Value>, PositionMap)> {
    let mut receiver = TreeReceiver::default();
    let mut parser = Parser::new_from_str(source);
    parser
        .load(&mut receiver, false)
        .map_err(|e| ConversionError::YamlSyntax(e.to_string()))?;
    if let Some(err) = receiver.error {
        return Err(err);
    }
    Ok((receiver.root, receiver.positions))
}

enum Frame {
    Mapping {
        path: KeyPath,
        map: Mapping,
        key: Option<String>,
    },
    Sequence {
        path: KeyPath,
        items: Vec<Value>,
    },
}

#[derive(Default)]
struct TreeReceiver {
    stack: Vec<Frame>,
    root: Option<Value>,
    positions: PositionMap,
    error: Option<ConversionError>,
}

impl MarkedEventReceiver for TreeReceiver {
    fn on_event(&mut self, event: Event, mark: Marker) {
        if self.error.is_some() || self.root.is_some() {
            return;
        }
        match event {
            Event::Scalar(text, style, ..) => self.scalar(text, style, mark),
            Event::MappingStart(..) => self.open(mark, true),
            Event::SequenceStart(..) => self.open(mark, false),
            Event::MappingEnd | Event::SequenceEnd => self.close(),
            Event::Alias(..) => self.fail(mark, "aliases are not supported in nyaml"),
            _ => {}
        }
    }
}

impl TreeReceiver {
    fn fail(&mut self, mark: Marker, message: &str) {
        self.error = Some(ConversionError::YamlSyntax(format!(
            "{message} at line {} column {}",
            mark.line(),
            mark.col() + 1
        )));
    }

    fn scalar(&mut self, text: String, style: TScalarStyle, mark: Marker) {
        if let Some(Frame::Mapping { path, key, .. }) = self.stack.last_mut() {
            if key.is_none() {
                self.positions.record(path.child(&text), &text, mark.line());
                *key = Some(text);
                return;
            }
        }
        let plain = style == TScalarStyle::Plain;
        let value = if plain && matches!(text.as_str(), "" | "~" | "null" | "Null" | "NULL") {
            Value::Null
        } else {
            Value::Scalar(Scalar { text, plain })
        };
        self.attach(value);
    }

    fn open(&mut self, mark: Marker, mapping: bool) {
        let path = match self.stack.last() {
            None => KeyPath::root(),
            Some(Frame::Mapping { key: None, .. }) => {
                self.fail(mark, "complex mapping keys are not supported in nyaml");
                return;
            }
            Some(Frame::Mapping {
                path, key: Some(k), ..
            }) => path.child(k),
            Some(Frame::Sequence { path, items }) => path.index(items.len()),
        };
        self.stack.push(if mapping {
            Frame::Mapping {
                path,
                map: Mapping::new(),
                key: None,
            }
        } else {
            Frame::Sequence {
                path,
                items: Vec::new(),
            }
        });
    }

    fn close(&mut self) {
        let value = match self.stack.pop() {
            Some(Frame::Mapping { map, .. }) => Value::Mapping(map),
            Some(Frame::Sequence { items, .. }) => Value::Sequence(items),
            None => return,
        };
        self.attach(value);
    }

    fn attach(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Mapping { map, key, .. }) => {
                if let Some(k) = key.take() {
                    map.insert(k, value);
                }
            }
            Some(Frame::Sequence { items, .. }) => items.push(value),
        }
    }
}
