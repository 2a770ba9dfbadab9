//! NXDL parser
//!
//! Reads NXDL text with `roxmltree` and copies it into the shared element
//! tree. Comments are kept as nodes in document order, which is what lets the
//! emitter put them back in front of the right nyaml key.

use crate::error::{ConversionError, Result};
use crate::ir::{NxdlDocument, XmlElement, XmlNode};
use roxmltree::{Document, Node, NodeType};

/// Parse NXDL text into an [`NxdlDocument`].
pub fn parse_nxdl(source: &str) -> Result<NxdlDocument> {
    let xml = Document::parse(source).map_err(|e| ConversionError::XmlSyntax(e.to_string()))?;

    let mut preamble = Vec::new();
    let mut trailing = Vec::new();
    let mut root: Option<XmlElement> = None;
    for node in xml.root().children() {
        match node.node_type() {
            NodeType::Comment if root.is_none() => preamble.push(comment(node)),
            NodeType::Comment => trailing.push(comment(node)),
            NodeType::Element => root = Some(element(node)),
            _ => {}
        }
    }

    let mut root = root.ok_or_else(|| {
        ConversionError::Structure("The NXDL document has no root element".to_string())
    })?;
    if root.name != "definition" {
        return Err(ConversionError::Structure(format!(
            "The root element of an NXDL document must be <definition>, found <{}>",
            root.name
        )));
    }
    root.children.extend(trailing);
    Ok(NxdlDocument { preamble, root })
}

fn comment(node: Node) -> XmlNode {
    let text = node.text().unwrap_or_default();
    XmlNode::Comment(text.split('\n').map(str::to_string).collect())
}

fn element(node: Node) -> XmlElement {
    let mut element = XmlElement::new(node.tag_name().name());
    for attribute in node.attributes() {
        element.set(attribute.name(), attribute.value());
    }
    if element.name == "doc" {
        let text: String = node
            .children()
            .filter(|child| child.is_text())
            .filter_map(|child| child.text())
            .collect();
        element.text = Some(text);
    }
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => element.push(self::element(child)),
            NodeType::Comment => element.children.push(comment(child)),
            _ => {}
        }
    }
    element
}
