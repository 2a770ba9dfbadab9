//! NXDL serializer
//!
//! Writes the element tree as NXDL text. Attribute order is taken from the
//! tree. Docs get their own indentation level: every line of the body is
//! indented one step deeper than `<doc>`, and `</doc>` is aligned with the
//! opening tag. Elements without content self-close.

use crate::common::tables::{NXDL_NAMESPACE, SCHEMA_LOCATION, XSI_NAMESPACE};
use crate::copyright::is_copyright_comment;
use crate::error::Result;
use crate::ir::{NxdlDocument, XmlElement, XmlNode};
use crate::options::ConversionOptions;

/// Serialize a document, preamble and copyright header included.
pub fn serialize_nxdl(doc: &NxdlDocument, options: &ConversionOptions) -> Result<String> {
    let mut writer = NxdlWriter::new(options.nxdl_indent);
    writer.push("<?xml version='1.0' encoding='UTF-8'?>\n");
    writer.push(&format!(
        "<?xml-stylesheet type=\"text/xsl\" href=\"{}\"?>\n",
        escape_attribute(&options.stylesheet)
    ));
    writer.push(&format!("<!--\n{}-->\n", options.copyright_text()));
    for node in &doc.preamble {
        if let XmlNode::Comment(lines) = node {
            if !is_copyright_comment(&lines.join("\n")) {
                writer.write_comment(lines, 0);
            }
        }
    }
    writer.write_definition(&doc.root);
    Ok(writer.finish())
}

struct NxdlWriter {
    out: String,
    unit: usize,
}

impl NxdlWriter {
    fn new(unit: usize) -> Self {
        NxdlWriter {
            out: String::new(),
            unit,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn indent(&mut self, level: usize) {
        self.out.push_str(&" ".repeat(level * self.unit));
    }

    fn write_attributes<'a, I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = &'a (String, String)>,
    {
        for (key, value) in attributes {
            self.out
                .push_str(&format!(" {key}=\"{}\"", escape_attribute(value)));
        }
    }

    fn write_definition(&mut self, root: &XmlElement) {
        self.push(&format!(
            "<{} xmlns=\"{NXDL_NAMESPACE}\" xmlns:xsi=\"{XSI_NAMESPACE}\"",
            root.name
        ));
        self.write_attributes(
            root.attributes
                .iter()
                .filter(|(k, _)| k != "schemaLocation" && !k.starts_with("xmlns")),
        );
        self.push(&format!(" xsi:schemaLocation=\"{SCHEMA_LOCATION}\""));
        self.write_content(root, 0);
    }

    fn write_node(&mut self, node: &XmlNode, level: usize) {
        match node {
            XmlNode::Comment(lines) => self.write_comment(lines, level),
            XmlNode::Element(element) => self.write_element(element, level),
        }
    }

    fn write_element(&mut self, element: &XmlElement, level: usize) {
        self.indent(level);
        self.push(&format!("<{}", element.name));
        self.write_attributes(&element.attributes);
        if element.name == "doc" {
            self.write_doc_body(element, level);
        } else {
            self.write_content(element, level);
        }
    }

    /// Close the start tag and write children, or self-close.
    fn write_content(&mut self, element: &XmlElement, level: usize) {
        if element.children.is_empty() {
            self.push("/>\n");
            return;
        }
        self.push(">\n");
        for child in &element.children {
            self.write_node(child, level + 1);
        }
        self.indent(level);
        self.push(&format!("</{}>\n", element.name));
    }

    fn write_doc_body(&mut self, doc: &XmlElement, level: usize) {
        let text = doc.text.as_deref().unwrap_or_default();
        if text.is_empty() {
            self.push("/>\n");
            return;
        }
        if !text.contains('\n') {
            self.push(&format!(">{}</doc>\n", escape_text(text)));
            return;
        }
        self.push(">\n");
        let body = text.strip_prefix('\n').unwrap_or(text);
        let body = body.strip_suffix('\n').unwrap_or(body);
        for line in body.split('\n') {
            if !line.is_empty() {
                self.indent(level + 1);
                self.push(&escape_text(line));
            }
            self.push("\n");
        }
        self.indent(level);
        self.push("</doc>\n");
    }

    fn write_comment(&mut self, lines: &[String], level: usize) {
        self.indent(level);
        if let [line] = lines {
            self.push(&format!("<!-- {} -->\n", line.trim()));
            return;
        }
        self.push("<!--\n");
        for line in lines {
            if !line.trim().is_empty() {
                self.indent(level + 1);
                self.push(line.trim_end());
            }
            self.push("\n");
        }
        self.indent(level);
        self.push("-->\n");
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(text: &str) -> String {
    escape_text(text)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
}
