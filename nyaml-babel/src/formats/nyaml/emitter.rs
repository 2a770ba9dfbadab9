//! XML→text emitter
//!
//! Writes an NXDL tree as nyaml. The root is special: its doc, symbols and
//! attributes are collected first and written as plain root keys, followed by
//! the `name(extends):` key that holds the body. Comments found ahead of the
//! `<definition>` element are written after the symbols table, right above
//! the root attributes. Everything below the root is written in document
//! order, one nesting level per element.

use crate::common::dimensions::Dimensions;
use crate::common::doc::{emit_doc, reflow};
use crate::common::exists::Occurrence;
use crate::common::tables::{
    describe, yaml_entry, DEFINITION_CATEGORIES, NXDL_ATTRIBUTE_ATTRIBUTES,
    NXDL_FIELD_ATTRIBUTES, NXDL_GROUP_ATTRIBUTES, NXDL_LINK_ATTRIBUTES, OCCURRENCE_ATTRIBUTES,
};
use crate::copyright::is_copyright_comment;
use crate::error::{ConversionError, Result};
use crate::ir::{NxdlDocument, XmlElement, XmlNode};
use crate::options::ConversionOptions;

/// Root attributes that are not written as `key: value`
const ROOT_KEY_ATTRIBUTES: &[&str] = &["name", "extends", "category", "schemaLocation"];

/// Emit `doc` as nyaml text.
pub fn emit_nyaml(doc: &NxdlDocument, options: &ConversionOptions) -> Result<String> {
    let mut emitter = Emitter {
        out: String::new(),
        unit: options.nyaml_indent,
        after_comment: false,
    };
    emitter.definition(doc)?;
    Ok(emitter.out)
}

/// Whether `value` can be written as a plain YAML scalar inside a flow list or
/// as a mapping key.
fn is_plain_safe(value: &str) -> bool {
    !value.is_empty()
        && value.trim() == value
        && !value.contains([',', '[', ']', '{', '}', '#', ':', '\'', '"', '\n', '\t'])
        && !value.starts_with(['-', '?', '&', '*', '!', '|', '>', '%', '@', '`'])
        && !matches!(value, "~" | "null" | "Null" | "NULL")
}

fn quoted(value: &str) -> String {
    if is_plain_safe(value) {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

/// Occurrence conflicts name the element they were found on.
fn location(kind: &str, key: &str) -> String {
    format!("{kind} '{key}': ")
}

fn check_attributes(element: &XmlElement, node: &str, allowed: &[&str]) -> Result<()> {
    match element
        .attributes
        .iter()
        .find(|(key, _)| !allowed.contains(&key.as_str()))
    {
        Some((key, _)) => Err(ConversionError::UnwantedAttribute {
            node: node.to_string(),
            attr: key.clone(),
            allowed: describe(allowed),
        }),
        None => Ok(()),
    }
}

fn missing(element: &XmlElement, node: &str, requirement: &str) -> ConversionError {
    let attributes: Vec<String> = element
        .attributes
        .iter()
        .map(|(k, v)| format!("{k}=\"{v}\""))
        .collect();
    ConversionError::MissingName {
        node: node.to_string(),
        requirement: requirement.to_string(),
        attributes: format!("[{}]", attributes.join(", ")),
    }
}

struct Emitter {
    out: String,
    unit: usize,
    after_comment: bool,
}

impl Emitter {
    fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.unit)
    }

    fn line(&mut self, depth: usize, text: &str) {
        let indent = self.indent(depth);
        self.out.push_str(&indent);
        self.out.push_str(text);
        self.out.push('\n');
        self.after_comment = false;
    }

    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
        self.after_comment = false;
    }

    fn doc(&mut self, tag: &str, text: Option<&str>, depth: usize) {
        let rendered = emit_doc(tag, text, depth, self.unit);
        self.raw(&rendered);
    }

    fn entry(&mut self, depth: usize, key: &str, value: &str) {
        let rendered = yaml_entry(key, value, depth, self.unit);
        self.raw(&rendered);
    }

    fn comment(&mut self, lines: &[String], depth: usize) {
        let text = lines.join("\n");
        if is_copyright_comment(&text) {
            return;
        }
        if self.after_comment {
            self.out.push('\n');
        }
        let base = (depth + 1) * self.unit;
        let indent = self.indent(depth);
        for line in reflow(Some(&text), depth, self.unit).lines().skip(1) {
            let leading = line.len() - line.trim_start().len();
            let content = line[leading.min(base)..].trim_end();
            let content = if content.is_empty() {
                "#".to_string()
            } else if content.starts_with('#') {
                content.to_string()
            } else {
                format!("# {content}")
            };
            self.out.push_str(&format!("{indent}{content}\n"));
        }
        self.after_comment = true;
    }

    fn definition(&mut self, doc: &NxdlDocument) -> Result<()> {
        let root = &doc.root;
        if root.name != "definition" {
            return Err(ConversionError::UnexpectedElement {
                tag: root.name.clone(),
                parent: "document".to_string(),
            });
        }

        let category = root
            .get("category")
            .filter(|c| DEFINITION_CATEGORIES.contains(c))
            .ok_or_else(|| {
                ConversionError::Structure(format!(
                    "Definition does not get any category from {}",
                    describe(DEFINITION_CATEGORIES)
                ))
            })?;
        self.line(0, &format!("category: {category}"));

        let mut pending: Vec<&XmlNode> = Vec::new();
        let mut root_doc: Option<(Vec<&XmlNode>, &XmlElement)> = None;
        let mut symbols: Option<(Vec<&XmlNode>, &XmlElement)> = None;
        let mut body: Vec<&XmlNode> = Vec::new();
        for node in &root.children {
            match node {
                XmlNode::Comment(_) => pending.push(node),
                XmlNode::Element(e) if e.name == "doc" && root_doc.is_none() => {
                    root_doc = Some((std::mem::take(&mut pending), e));
                }
                XmlNode::Element(e) if e.name == "symbols" && symbols.is_none() => {
                    symbols = Some((std::mem::take(&mut pending), e));
                }
                XmlNode::Element(_) => {
                    body.append(&mut pending);
                    body.push(node);
                }
            }
        }
        body.append(&mut pending);

        if let Some((comments, doc)) = root_doc {
            self.nodes(&comments, 0, "definition")?;
            self.doc("doc", doc.text.as_deref(), 0);
        }
        if let Some((comments, table)) = symbols {
            self.nodes(&comments, 0, "definition")?;
            self.symbols(table)?;
        }

        // Comments ahead of <definition> sit right above the root attributes.
        for node in &doc.preamble {
            if let XmlNode::Comment(lines) = node {
                self.comment(lines, 0);
            }
        }

        for (key, value) in &root.attributes {
            if !ROOT_KEY_ATTRIBUTES.contains(&key.as_str()) {
                self.entry(0, key, value);
            }
        }

        let name = root
            .get("name")
            .ok_or_else(|| missing(root, "definition", "name"))?;
        let position = |key: &str| root.attributes.iter().position(|(k, _)| k == key);
        let key = match root.get("extends") {
            Some(extends) if position("extends") < position("name") => {
                format!("({extends}){name}")
            }
            Some(extends) => format!("{name}({extends})"),
            None => name.to_string(),
        };
        self.line(0, &format!("{key}:"));
        self.nodes(&body, 1, "definition")
    }

    fn symbols(&mut self, table: &XmlElement) -> Result<()> {
        self.line(0, "symbols:");
        for node in &table.children {
            match node {
                XmlNode::Comment(lines) => self.comment(lines, 1),
                XmlNode::Element(e) if e.name == "doc" => self.doc("doc", e.text.as_deref(), 1),
                XmlNode::Element(e) if e.name == "symbol" => {
                    let name = e.get("name").ok_or_else(|| missing(e, "symbol", "name"))?;
                    for child in &e.children {
                        if let XmlNode::Comment(lines) = child {
                            self.comment(lines, 1);
                        }
                    }
                    let text = e
                        .child("doc")
                        .and_then(|d| d.text.as_deref())
                        .or_else(|| e.get("doc"));
                    self.doc(name, text, 1);
                }
                XmlNode::Element(e) => {
                    return Err(ConversionError::UnexpectedElement {
                        tag: e.name.clone(),
                        parent: "symbols".to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    fn nodes(&mut self, nodes: &[&XmlNode], depth: usize, parent: &str) -> Result<()> {
        for node in nodes {
            self.node(node, depth, parent)?;
        }
        Ok(())
    }

    fn children(&mut self, element: &XmlElement, depth: usize) -> Result<()> {
        for node in &element.children {
            self.node(node, depth, &element.name)?;
        }
        Ok(())
    }

    fn node(&mut self, node: &XmlNode, depth: usize, parent: &str) -> Result<()> {
        let element = match node {
            XmlNode::Comment(lines) => {
                self.comment(lines, depth);
                return Ok(());
            }
            XmlNode::Element(element) => element,
        };
        match element.name.as_str() {
            "field" => self.concept(element, depth, "Field", NXDL_FIELD_ATTRIBUTES),
            "group" => self.concept(element, depth, "Group", NXDL_GROUP_ATTRIBUTES),
            "attribute" => self.attribute(element, depth),
            "link" => self.link(element, depth),
            "choice" => self.choice(element, depth),
            "doc" => {
                self.doc("doc", element.text.as_deref(), depth);
                Ok(())
            }
            "enumeration" => self.enumeration(element, depth),
            "dimensions" => self.dimensions(element, depth),
            other => Err(ConversionError::UnexpectedElement {
                tag: other.to_string(),
                parent: parent.to_string(),
            }),
        }
    }

    /// Everything but `name` and `type`, one level below the key.
    fn member_attributes(&mut self, element: &XmlElement, depth: usize, at: &str) -> Result<()> {
        let occurrence = Occurrence::from_xml_attributes(
            element
                .attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
            at,
        )?;
        let mut exists_written = false;
        for (key, value) in &element.attributes {
            match key.as_str() {
                "name" | "type" => {}
                key if OCCURRENCE_ATTRIBUTES.contains(&key) => {
                    if !exists_written {
                        if let Some(occurrence) = &occurrence {
                            self.line(depth, &format!("exists: {}", occurrence.to_yaml()));
                        }
                        exists_written = true;
                    }
                }
                "units" => self.entry(depth, "unit", value),
                key => self.entry(depth, key, value),
            }
        }
        Ok(())
    }

    /// A field or a group: `name(type):` or `(type)name:`.
    fn concept(
        &mut self,
        element: &XmlElement,
        depth: usize,
        kind: &str,
        allowed: &[&str],
    ) -> Result<()> {
        let node = element.name.as_str();
        check_attributes(element, node, allowed)?;
        let mut key = String::new();
        for (attr, value) in &element.attributes {
            match attr.as_str() {
                "name" => key.push_str(value),
                "type" => key = format!("{key}({value})"),
                _ => {}
            }
        }
        if node == "field" && !element.has("name") {
            return Err(missing(element, node, "name"));
        }
        if key.is_empty() {
            return Err(missing(element, node, "name or type"));
        }
        self.line(depth, &format!("{key}:"));
        self.member_attributes(element, depth + 1, &location(kind, &key))?;
        self.children(element, depth + 1)
    }

    fn attribute(&mut self, element: &XmlElement, depth: usize) -> Result<()> {
        check_attributes(element, "attribute", NXDL_ATTRIBUTE_ATTRIBUTES)?;
        let name = element
            .get("name")
            .ok_or_else(|| missing(element, "attribute", "name"))?;
        let key = match element.get("type") {
            Some(type_) => format!("\\@{name}({type_})"),
            None => format!("\\@{name}"),
        };
        self.line(depth, &format!("{key}:"));
        self.member_attributes(element, depth + 1, &location("Attribute", name))?;
        self.children(element, depth + 1)
    }

    fn link(&mut self, element: &XmlElement, depth: usize) -> Result<()> {
        check_attributes(element, "link", NXDL_LINK_ATTRIBUTES)?;
        let name = element
            .get("name")
            .ok_or_else(|| missing(element, "link", "name"))?;
        self.line(depth, &format!("{name}(link):"));
        for (key, value) in &element.attributes {
            if key != "name" {
                self.entry(depth + 1, key, value);
            }
        }
        self.children(element, depth + 1)
    }

    fn choice(&mut self, element: &XmlElement, depth: usize) -> Result<()> {
        check_attributes(element, "choice", &["name"]).map_err(|err| match err {
            ConversionError::UnwantedAttribute { node, attr, .. } => {
                ConversionError::UnwantedAttribute {
                    node,
                    attr,
                    allowed: describe(&[]),
                }
            }
            other => other,
        })?;
        let name = element
            .get("name")
            .ok_or_else(|| missing(element, "choice", "name"))?;
        self.line(depth, &format!("{name}(choice):"));
        self.children(element, depth + 1)
    }

    fn enumeration(&mut self, element: &XmlElement, depth: usize) -> Result<()> {
        let open = element
            .get("open")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
        let mut items = Vec::new();
        for child in element.elements() {
            if child.name != "item" {
                return Err(ConversionError::UnexpectedElement {
                    tag: child.name.clone(),
                    parent: "enumeration".to_string(),
                });
            }
            let value = child
                .get("value")
                .ok_or_else(|| missing(child, "item", "value"))?;
            items.push(value);
        }
        let documented = element
            .elements()
            .any(|item| !item.children.is_empty());
        let commented = element
            .children
            .iter()
            .any(|node| matches!(node, XmlNode::Comment(_)));

        if documented {
            self.line(depth, "enumeration:");
            if open {
                self.line(depth + 1, "open_enum: true");
            }
            for node in &element.children {
                match node {
                    XmlNode::Comment(lines) => self.comment(lines, depth + 1),
                    XmlNode::Element(item) => {
                        let value = item.get("value").unwrap_or_default();
                        self.line(depth + 1, &format!("{}:", quoted(value)));
                        self.children(item, depth + 2)?;
                    }
                }
            }
            return Ok(());
        }

        let list: Vec<String> = items.iter().map(|v| quoted(v)).collect();
        let list = format!("[{}]", list.join(", "));
        if open || commented {
            self.line(depth, "enumeration:");
            for node in &element.children {
                if let XmlNode::Comment(lines) = node {
                    self.comment(lines, depth + 1);
                }
            }
            if open {
                self.line(depth + 1, "open_enum: true");
            }
            self.line(depth + 1, &format!("items: {list}"));
        } else {
            self.line(depth, &format!("enumeration: {list}"));
        }
        Ok(())
    }

    fn dimensions(&mut self, element: &XmlElement, depth: usize) -> Result<()> {
        check_attributes(element, "dimensions", &["rank"])?;
        for node in &element.children {
            match node {
                XmlNode::Comment(lines) => self.comment(lines, depth),
                XmlNode::Element(dim) => {
                    for inner in &dim.children {
                        if let XmlNode::Comment(lines) = inner {
                            self.comment(lines, depth);
                        }
                    }
                }
            }
        }
        let dimensions = Dimensions::from_element(element)?;
        let rendered = dimensions.to_yaml(depth, self.unit);
        self.raw(&rendered);
        Ok(())
    }
}
