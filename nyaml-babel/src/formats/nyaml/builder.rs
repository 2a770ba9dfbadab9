//! Text→XML builder
//!
//! Walks a loaded nyaml document and produces the NXDL element tree. Every key
//! is classified once into a [`KeyKind`]; the members of an element are then
//! split into whitelisted attributes, a handful of structural keywords and
//! leftovers, which are dispatched as child elements. Members are only marked
//! as visited, the loaded tree is never modified.
//!
//! Comment blocks are looked up by the (key, line) anchor of whatever is being
//! built and placed in front of the resulting element. Comments sitting on an
//! attribute line end up in front of the element that owns the attribute.

use super::comments::{CommentBlock, CommentCollector};
use super::loader::LoadedDocument;
use super::value::{KeyPath, Mapping, Value};
use crate::common::dimensions::Dimensions;
use crate::common::doc::render_doc;
use crate::common::exists::Occurrence;
use crate::common::tables::{
    describe, revert_yaml_escapes, DEFINITION_ATTRIBUTES, DEFINITION_CATEGORIES, NAME_TYPES,
    YAML_ATTRIBUTE_ATTRIBUTES, YAML_FIELD_ATTRIBUTES, YAML_GROUP_ATTRIBUTES, YAML_LINK_ATTRIBUTES,
};
use crate::error::{ConversionError, Result};
use crate::ir::{NxdlDocument, XmlElement, XmlNode};
use crate::options::ConversionOptions;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

static GROUP_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^NX[a-zA-Z]").expect("valid regex"));

/// Mixed-case names shaped like `DATA_x` or `data_X`, i.e. a partial name
static PARTIAL_NAME: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"^[A-Z]*[a-z0-9_.]*$").expect("valid regex"),
        Regex::new(r"^[a-z0-9_.]*[A-Z]*$").expect("valid regex"),
    ]
});

/// Marker in front of attribute keys
const ATTRIBUTE_MARKER: &str = "\\@";

/// Name and type of a concept key such as `data(NX_FLOAT)` or `(NXentry)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub name: String,
    /// Empty when the key has no bracket
    pub type_: String,
    /// The bracket came before the name
    pub type_first: bool,
}

impl Concept {
    /// Split `key` into name and type. Only keys with exactly one `(` and one
    /// `)` carry a type.
    pub fn parse(key: &str) -> Self {
        if key.matches('(').count() == 1 && key.matches(')').count() == 1 {
            if let (Some(open), Some(close)) = (key.find('('), key.find(')')) {
                if open < close {
                    let head = &key[..open];
                    return Concept {
                        name: format!("{head}{}", &key[close + 1..]),
                        type_: key[open + 1..close].to_string(),
                        type_first: head.is_empty() || head == ATTRIBUTE_MARKER,
                    };
                }
            }
        }
        Concept {
            name: key.to_string(),
            type_: String::new(),
            type_first: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Doc,
    Unit,
    Enumeration,
    Dimensions,
    Exists,
}

/// What a nyaml key turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind {
    Link(String),
    Choice(String),
    Symbols,
    Group(Concept),
    /// The concept name has its `\@` marker removed
    Attribute(Concept),
    Keyword(Keyword),
    Field(Concept),
}

impl KeyKind {
    /// Classify `key`, declared on `line`. The first matching rule wins.
    pub fn classify(key: &str, line: usize) -> Result<Self> {
        let concept = Concept::parse(key);
        if concept.name.is_empty() && concept.type_.is_empty() {
            return Err(ConversionError::ImproperKey { line });
        }
        if let Some(name) = key.strip_suffix("(link)") {
            return Ok(KeyKind::Link(name.to_string()));
        }
        if let Some(name) = key.strip_suffix("(choice)") {
            return Ok(KeyKind::Choice(name.to_string()));
        }
        if key == "symbols" {
            return Ok(KeyKind::Symbols);
        }
        if GROUP_TYPE.is_match(&concept.type_) {
            return Ok(KeyKind::Group(concept));
        }
        if let Some(name) = concept.name.strip_prefix(ATTRIBUTE_MARKER) {
            if name.is_empty() {
                return Err(ConversionError::UnknownElement {
                    key: key.to_string(),
                    line,
                });
            }
            return Ok(KeyKind::Attribute(Concept {
                name: name.to_string(),
                ..concept
            }));
        }
        let keyword = match key {
            "doc" => Some(Keyword::Doc),
            "unit" => Some(Keyword::Unit),
            "enumeration" => Some(Keyword::Enumeration),
            "dimensions" | "dim" => Some(Keyword::Dimensions),
            "exists" => Some(Keyword::Exists),
            _ => None,
        };
        if let Some(keyword) = keyword {
            return Ok(KeyKind::Keyword(keyword));
        }
        if !concept.name.is_empty() {
            return Ok(KeyKind::Field(concept));
        }
        if !concept.type_.is_empty() {
            return Err(ConversionError::MissingFieldName { line });
        }
        Err(ConversionError::UnknownElement {
            key: key.to_string(),
            line,
        })
    }
}

/// Element kinds that are built from a key and a mapping of members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Field,
    Group,
    Attribute,
    Link,
    Choice,
}

impl Component {
    fn tag(self) -> &'static str {
        match self {
            Component::Field => "field",
            Component::Group => "group",
            Component::Attribute => "attribute",
            Component::Link => "link",
            Component::Choice => "choice",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Component::Field => "Field",
            Component::Group => "Group",
            Component::Attribute => "Attribute",
            Component::Link => "Link",
            Component::Choice => "Choice",
        }
    }

    fn allowed(self) -> &'static [&'static str] {
        match self {
            Component::Field => YAML_FIELD_ATTRIBUTES,
            Component::Group => YAML_GROUP_ATTRIBUTES,
            Component::Attribute => YAML_ATTRIBUTE_ATTRIBUTES,
            Component::Link => YAML_LINK_ATTRIBUTES,
            Component::Choice => &[],
        }
    }

    fn takes_dimensions(self) -> bool {
        matches!(self, Component::Field | Component::Attribute)
    }

    fn takes_name_type(self) -> bool {
        matches!(
            self,
            Component::Field | Component::Group | Component::Attribute
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LetterCase {
    Lower,
    Upper,
    Mixed,
}

/// Case of a name, looking at cased letters only. Names without any cased
/// letter count as mixed.
fn letter_case(name: &str) -> LetterCase {
    let cased: Vec<char> = name
        .chars()
        .filter(|c| c.is_lowercase() || c.is_uppercase())
        .collect();
    if cased.is_empty() {
        LetterCase::Mixed
    } else if cased.iter().all(|c| c.is_lowercase()) {
        LetterCase::Lower
    } else if cased.iter().all(|c| c.is_uppercase()) {
        LetterCase::Upper
    } else {
        LetterCase::Mixed
    }
}

fn advise_name_type(name: &str, line: usize) {
    if letter_case(name) == LetterCase::Mixed && PARTIAL_NAME.iter().any(|r| r.is_match(name)) {
        warn!(
            "Line {line}: '{name}' looks like a partial name, consider adding 'nameType: partial'"
        );
    }
}

/// Attribute text of a scalar member, `None` for anything else.
fn attribute_text(value: &Value) -> Option<String> {
    value
        .as_scalar()
        .map(|s| revert_yaml_escapes(s.xml_text().trim()))
}

/// One XML comment per run of the block.
fn block_nodes(block: &CommentBlock) -> Result<Vec<XmlNode>> {
    block
        .runs()
        .iter()
        .map(|run| {
            let text = run.join("\n");
            if text.contains("--") || text.ends_with('-') {
                return Err(ConversionError::InvalidComment {
                    line: block.source_line(),
                });
            }
            Ok(XmlNode::Comment(run.clone()))
        })
        .collect()
}

struct Member<'v> {
    key: &'v str,
    value: &'v Value,
    path: KeyPath,
    line: usize,
}

struct Builder<'a> {
    document: &'a LoadedDocument,
    comments: &'a CommentCollector,
    options: &'a ConversionOptions,
}

/// Build the NXDL tree of a loaded document.
pub fn build(
    document: &LoadedDocument,
    comments: &CommentCollector,
    options: &ConversionOptions,
) -> Result<NxdlDocument> {
    Builder {
        document,
        comments,
        options,
    }
    .build_definition()
}

impl<'a> Builder<'a> {
    fn member<'v>(&self, key: &'v str, value: &'v Value, parent: &KeyPath) -> Member<'v> {
        let path = parent.child(key);
        let line = self.document.line(&path);
        Member {
            key,
            value,
            path,
            line,
        }
    }

    fn comment_nodes(&self, key: &str, line: usize) -> Result<Vec<XmlNode>> {
        match self.comments.lookup(key, line) {
            Some(block) => block_nodes(block),
            None => Ok(Vec::new()),
        }
    }

    fn push_comments(&self, parent: &mut XmlElement, key: &str, line: usize) -> Result<()> {
        parent.children.extend(self.comment_nodes(key, line)?);
        Ok(())
    }

    fn build_definition(&self) -> Result<NxdlDocument> {
        let root = &self.document.root;
        let top = KeyPath::root();
        let mut definition = XmlElement::new("definition");
        let mut preamble = Vec::new();
        let mut doc: Option<Vec<XmlNode>> = None;
        let mut symbols: Option<Vec<XmlNode>> = None;
        let mut body: Option<Member> = None;

        for (key, value) in root.iter() {
            let member = self.member(key, value, &top);
            debug!("Line {}: root key '{}'", member.line, key);
            match key {
                "doc" => {
                    if value.is_empty() {
                        return Err(ConversionError::Structure(format!(
                            "Line {}: the root-level doc must not be empty",
                            member.line
                        )));
                    }
                    let mut nodes = self.comment_nodes(key, member.line)?;
                    nodes.push(XmlNode::Element(self.doc_element(value, member.line)?));
                    doc = Some(nodes);
                }
                "symbols" => {
                    let mut nodes = self.comment_nodes(key, member.line)?;
                    nodes.push(XmlNode::Element(self.build_symbols(&member)?));
                    symbols = Some(nodes);
                }
                _ if DEFINITION_ATTRIBUTES.contains(&key) && value.as_mapping().is_none() => {
                    preamble.extend(self.comment_nodes(key, member.line)?);
                    let text = attribute_text(value).unwrap_or_default();
                    definition.set(key, text);
                }
                _ if key.contains("NX")
                    && body.is_none()
                    && (value.as_mapping().is_some() || value.is_null()) =>
                {
                    preamble.extend(self.comment_nodes(key, member.line)?);
                    set_definition_name(&mut definition, key);
                    body = Some(member);
                }
                _ => {
                    return Err(ConversionError::ImproperRoot {
                        key: key.to_string(),
                        line: member.line,
                    })
                }
            }
        }

        match definition.get("category") {
            Some(category) if DEFINITION_CATEGORIES.contains(&category) => {}
            Some(category) => {
                return Err(ConversionError::Structure(format!(
                    "Definition category '{category}' is not one of {}",
                    describe(DEFINITION_CATEGORIES)
                )))
            }
            None => {
                return Err(ConversionError::Structure(
                    "Required root-level keyword 'category' is missing!".to_string(),
                ))
            }
        }
        let doc = doc.ok_or_else(|| {
            ConversionError::Structure("Required root-level keyword 'doc' is missing!".to_string())
        })?;
        let body = body.ok_or_else(|| {
            ConversionError::Structure(
                "Required root-level NX... key naming the definition is missing!".to_string(),
            )
        })?;
        if !definition.has("type") {
            definition.set("type", "group");
        }

        definition.children.extend(symbols.unwrap_or_default());
        definition.children.extend(doc);
        if let Value::Mapping(members) = body.value {
            self.dispatch_all(&mut definition, members, &body.path)?;
        }
        if let Some(block) = self.comments.file_end() {
            definition.children.extend(block_nodes(block)?);
        }

        Ok(NxdlDocument {
            preamble,
            root: definition,
        })
    }

    fn doc_element(&self, value: &Value, line: usize) -> Result<XmlElement> {
        self.doc_with_width(value, line, self.options.doc_wrap_width)
    }

    fn doc_with_width(&self, value: &Value, line: usize, width: usize) -> Result<XmlElement> {
        let parts: Vec<&str> = match value {
            Value::Null => vec![""],
            Value::Scalar(s) => vec![s.text.as_str()],
            Value::Sequence(items) => items
                .iter()
                .map(|item| {
                    item.as_str().ok_or_else(|| {
                        ConversionError::Structure(format!(
                            "Line {line}: doc parts must be text, found {}",
                            item.kind()
                        ))
                    })
                })
                .collect::<Result<_>>()?,
            Value::Mapping(_) => {
                return Err(ConversionError::Structure(format!(
                    "Line {line}: doc must be text, found {}",
                    value.kind()
                )))
            }
        };
        let mut doc = XmlElement::new("doc");
        doc.text = Some(render_doc(&parts, width, line)?);
        Ok(doc)
    }

    fn build_symbols(&self, symbols: &Member) -> Result<XmlElement> {
        let entries = symbols
            .value
            .as_mapping()
            .ok_or_else(|| ConversionError::InvalidSymbols {
                line: symbols.line,
                message: "symbols must map symbol names to their docs".to_string(),
            })?;
        let mut element = XmlElement::new("symbols");
        for (key, value) in entries.iter() {
            let entry = self.member(key, value, &symbols.path);
            self.push_comments(&mut element, key, entry.line)?;
            if key == "doc" {
                let doc =
                    self.doc_with_width(value, entry.line, self.options.symbols_doc_wrap_width)?;
                element.push(doc);
                continue;
            }
            let text = value
                .as_str()
                .filter(|text| !text.trim().is_empty())
                .ok_or_else(|| ConversionError::InvalidSymbols {
                    line: entry.line,
                    message: format!("symbol '{key}' needs a non-empty doc string"),
                })?;
            let mut symbol = XmlElement::new("symbol");
            symbol.set("name", key);
            let mut doc = XmlElement::new("doc");
            doc.text = Some(render_doc(&[text], self.options.doc_wrap_width, entry.line)?);
            symbol.push(doc);
            element.push(symbol);
        }
        Ok(element)
    }

    fn dispatch_all(&self, parent: &mut XmlElement, members: &Mapping, path: &KeyPath) -> Result<()> {
        for (key, value) in members.iter() {
            let member = self.member(key, value, path);
            self.dispatch(parent, &member)?;
        }
        Ok(())
    }

    fn dispatch(&self, parent: &mut XmlElement, member: &Member) -> Result<()> {
        let kind = KeyKind::classify(member.key, member.line)?;
        debug!("Line {}: '{}' is {:?}", member.line, member.key, kind);
        match kind {
            KeyKind::Link(name) => self.build_component(parent, Component::Link, &name, None, member),
            KeyKind::Choice(name) => {
                self.build_component(parent, Component::Choice, &name, None, member)
            }
            KeyKind::Symbols => Err(ConversionError::InvalidSymbols {
                line: member.line,
                message: "symbols tables are only allowed at the root level".to_string(),
            }),
            KeyKind::Group(concept) => {
                self.build_component(parent, Component::Group, "", Some(&concept), member)
            }
            KeyKind::Attribute(concept) => {
                self.build_component(parent, Component::Attribute, "", Some(&concept), member)
            }
            KeyKind::Field(concept) => {
                self.build_component(parent, Component::Field, "", Some(&concept), member)
            }
            KeyKind::Keyword(keyword) => self.apply_keyword(parent, keyword, member),
        }
    }

    /// A structural keyword found among the leftovers of `parent`.
    fn apply_keyword(&self, parent: &mut XmlElement, keyword: Keyword, member: &Member) -> Result<()> {
        match keyword {
            Keyword::Doc => {
                self.push_comments(parent, member.key, member.line)?;
                let doc = self.doc_element(member.value, member.line)?;
                parent.push(doc);
            }
            Keyword::Unit => {
                self.push_comments(parent, member.key, member.line)?;
                if let Some(units) = attribute_text(member.value) {
                    parent.set("units", units);
                }
            }
            Keyword::Exists => {
                self.push_comments(parent, member.key, member.line)?;
                let occurrence = Occurrence::from_yaml(member.value, member.line)?;
                for (key, value) in occurrence.xml_attributes() {
                    parent.set(key, value);
                }
            }
            Keyword::Enumeration => {
                self.push_comments(parent, member.key, member.line)?;
                let enumeration = self.build_enumeration(member)?;
                parent.push(enumeration);
            }
            Keyword::Dimensions => {
                let mut comments = self.comment_nodes(member.key, member.line)?;
                self.nested_comments(member.value, &member.path, &mut comments)?;
                parent.children.extend(comments);
                let dimensions =
                    Dimensions::from_yaml(member.value, member.line, self.options.doc_wrap_width)?;
                parent.push(dimensions.to_element());
            }
        }
        Ok(())
    }

    /// Comments bound to any key below `path`, in source order.
    fn nested_comments(&self, value: &Value, path: &KeyPath, out: &mut Vec<XmlNode>) -> Result<()> {
        if let Value::Mapping(members) = value {
            for (key, inner) in members.iter() {
                let member = self.member(key, inner, path);
                out.extend(self.comment_nodes(key, member.line)?);
                self.nested_comments(inner, &member.path, out)?;
            }
        }
        Ok(())
    }

    fn build_component(
        &self,
        parent: &mut XmlElement,
        component: Component,
        link_name: &str,
        concept: Option<&Concept>,
        member: &Member,
    ) -> Result<()> {
        let members = match member.value {
            Value::Mapping(members) => Some(members),
            value if value.is_empty() => None,
            value => {
                return Err(ConversionError::ExpectedMapping {
                    key: member.key.to_string(),
                    line: member.line,
                    found: value.kind().to_string(),
                })
            }
        };

        let mut element = XmlElement::new(component.tag());
        let mut leading = self.comment_nodes(member.key, member.line)?;
        let name = match concept {
            Some(concept) => {
                if concept.type_first {
                    element.set("type", concept.type_.as_str());
                }
                if !concept.name.is_empty() {
                    element.set("name", concept.name.as_str());
                }
                if !concept.type_first && !concept.type_.is_empty() {
                    element.set("type", concept.type_.as_str());
                }
                concept.name.as_str()
            }
            None => {
                element.set("name", link_name);
                link_name
            }
        };

        let allowed = component.allowed();
        let mut hinted = false;
        let mut leftovers = Vec::new();
        for (key, value) in members.into_iter().flat_map(Mapping::iter) {
            let attr = self.member(key, value, &member.path);
            match key {
                "doc" => {
                    self.push_comments(&mut element, key, attr.line)?;
                    let doc = self.doc_element(value, attr.line)?;
                    element.push(doc);
                }
                "exists" if allowed.contains(&"exists") => {
                    leading.extend(self.comment_nodes(key, attr.line)?);
                    let occurrence = Occurrence::from_yaml(value, attr.line)?;
                    for (key, value) in occurrence.xml_attributes() {
                        element.set(key, value);
                    }
                }
                "nameType" if component.takes_name_type() => {
                    leading.extend(self.comment_nodes(key, attr.line)?);
                    hinted = self.apply_name_type(&mut element, name, value, attr.line)?;
                }
                "unit" if allowed.contains(&"unit") && value.as_scalar().is_some() => {
                    leading.extend(self.comment_nodes(key, attr.line)?);
                    if let Some(units) = attribute_text(value) {
                        element.set("units", units);
                    }
                }
                "dimensions" | "dim" if component.takes_dimensions() => {
                    self.apply_keyword(&mut element, Keyword::Dimensions, &attr)?;
                }
                _ if allowed.contains(&key) && value.as_scalar().is_some() => {
                    leading.extend(self.comment_nodes(key, attr.line)?);
                    if let Some(text) = attribute_text(value) {
                        element.set(key, text);
                    }
                }
                _ => leftovers.push(attr),
            }
        }

        Occurrence::from_xml_attributes(
            element
                .attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
            &format!("Line {}: {} '{}': ", member.line, component.label(), name),
        )?;
        if component.takes_name_type() && !hinted {
            advise_name_type(name, member.line);
        }
        check_skipped(component, &leftovers)?;
        for leftover in &leftovers {
            self.dispatch(&mut element, leftover)?;
        }

        parent.children.extend(leading);
        parent.push(element);
        Ok(())
    }

    /// Apply an explicit `nameType`. Returns whether the hint was accepted.
    fn apply_name_type(
        &self,
        element: &mut XmlElement,
        name: &str,
        hint: &Value,
        line: usize,
    ) -> Result<bool> {
        let value = hint.as_str().map(str::trim).unwrap_or_default();
        if NAME_TYPES.contains(&value) {
            element.set("nameType", value);
            return Ok(true);
        }
        match letter_case(name) {
            LetterCase::Mixed => {
                warn!(
                    "Line {line}: nameType '{value}' of '{name}' is not one of {}, ignoring it",
                    describe(NAME_TYPES)
                );
                Ok(false)
            }
            LetterCase::Lower | LetterCase::Upper => Err(ConversionError::InvalidNameType {
                key: name.to_string(),
                value: value.to_string(),
                line,
            }),
        }
    }

    fn build_enumeration(&self, member: &Member) -> Result<XmlElement> {
        let mut enumeration = XmlElement::new("enumeration");
        match member.value {
            Value::Sequence(items) => push_items(&mut enumeration, items, member.line)?,
            Value::Mapping(entries) => {
                for (key, value) in entries.iter() {
                    let entry = self.member(key, value, &member.path);
                    self.push_comments(&mut enumeration, key, entry.line)?;
                    match key {
                        "open_enum" => {
                            if attribute_text(value).as_deref() == Some("true") {
                                enumeration.set("open", "true");
                            }
                        }
                        "items" => {
                            let items = value.as_sequence().ok_or_else(|| {
                                ConversionError::InvalidEnumeration {
                                    line: entry.line,
                                    message: "enumeration items must be a list".to_string(),
                                }
                            })?;
                            push_items(&mut enumeration, items, entry.line)?;
                        }
                        _ => {
                            let mut item = XmlElement::new("item");
                            item.set("value", key);
                            match value {
                                Value::Mapping(members) => {
                                    self.dispatch_all(&mut item, members, &entry.path)?
                                }
                                value if value.is_null() => {}
                                value => {
                                    return Err(ConversionError::InvalidEnumeration {
                                        line: entry.line,
                                        message: format!(
                                            "enumeration item '{key}' must hold a mapping such as its doc, found {}",
                                            value.kind()
                                        ),
                                    })
                                }
                            }
                            enumeration.push(item);
                        }
                    }
                }
            }
            value => {
                return Err(ConversionError::InvalidEnumeration {
                    line: member.line,
                    message: format!(
                        "enumeration must be a list of items or a mapping, found {}",
                        value.kind()
                    ),
                })
            }
        }
        Ok(enumeration)
    }
}

/// `name` and `extends` from the root body key: `NXfoo(NXbar)`, `(NXbar)NXfoo`
/// or plain `NXfoo`.
fn set_definition_name(definition: &mut XmlElement, key: &str) {
    match (key.rfind('('), key.rfind(')')) {
        (Some(0), Some(close)) => {
            definition.set("extends", &key[1..close]);
            definition.set("name", &key[close + 1..]);
        }
        (Some(open), Some(close)) if open < close => {
            definition.set("name", &key[..open]);
            definition.set("extends", &key[open + 1..close]);
        }
        _ => {
            definition.set("name", key);
            definition.set("extends", "NXobject");
        }
    }
}

fn push_items(enumeration: &mut XmlElement, items: &[Value], line: usize) -> Result<()> {
    for value in items {
        let text = value
            .as_str()
            .ok_or_else(|| ConversionError::InvalidEnumeration {
                line,
                message: format!("enumeration items must be plain values, found {}", value.kind()),
            })?;
        let mut item = XmlElement::new("item");
        item.set("value", text);
        enumeration.push(item);
    }
    Ok(())
}

/// Leftover members that still carry a value must be child elements; plain
/// values there mean an attribute the component does not allow.
fn check_skipped(component: Component, leftovers: &[Member]) -> Result<()> {
    for member in leftovers {
        if matches!(member.key, "doc" | "enumeration" | "dimensions" | "dim")
            || member.key.contains(ATTRIBUTE_MARKER)
            || member.key.contains("NX")
        {
            continue;
        }
        let has_value = match member.value {
            Value::Scalar(s) => !s.text.is_empty(),
            Value::Sequence(items) => !items.is_empty(),
            _ => false,
        };
        if has_value {
            return Err(ConversionError::SkippedAttribute {
                attr: member.key.to_string(),
                component: component.label().to_string(),
                line: member.line,
                allowed: describe(component.allowed()),
            });
        }
    }
    Ok(())
}
