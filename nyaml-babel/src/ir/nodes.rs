//! Element tree shared by both directions of the translator.
//!
//! Attribute order is significant: NXDL authors read `name` before `type` or
//! the other way round depending on how the nyaml key was spelled, and the
//! writer reproduces whatever order the builder recorded.

/// A node inside an element's content.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Comment text, one entry per line, without the `<!--`/`-->` framing.
    Comment(Vec<String>),
}

/// An NXDL element with ordered attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Character content. Only `doc` elements carry text.
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set an attribute, keeping the position of an existing one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn push(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    pub fn push_comment(&mut self, lines: Vec<String>) {
        self.children.push(XmlNode::Comment(lines));
    }

    /// Iterate over element children, skipping comments.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Comment(_) => None,
        })
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }
}

/// A whole NXDL document: the comments in front of `<definition>` and the
/// definition itself. Namespace declarations and the schema location are not
/// part of the tree, the writer adds them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NxdlDocument {
    pub preamble: Vec<XmlNode>,
    pub root: XmlElement,
}
