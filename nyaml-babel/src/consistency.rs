//! Round-trip consistency checks
//!
//! A conversion is consistent when feeding its output through the opposite
//! direction gives back an equivalent definition. Equivalence is structural:
//! element names and attributes must match, doc text must carry the same
//! words, and the comments must appear in the same order above the same
//! keys. Attribute order, doc wrapping and the spelling of occurrence
//! constraints do not matter.

use crate::common::exists::Occurrence;
use crate::common::tables::OCCURRENCE_ATTRIBUTES;
use crate::copyright::is_copyright_comment;
use crate::embed::split_embedded;
use crate::error::Result;
use crate::format::Format;
use crate::formats::nyaml::comments::CommentCollector;
use crate::formats::nyaml::loader;
use crate::formats::nyaml::value::KeyPath;
use crate::formats::{NxdlFormat, NyamlFormat};
use crate::ir::{NxdlDocument, XmlElement, XmlNode};
use crate::options::ConversionOptions;
use crate::transforms::{convert_nyaml, nxdl_to_nyaml, nyaml_to_nxdl};
use std::fmt;

/// One mismatch between two documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Element path such as `/definition/group[NXentry]/field[data]`
    pub path: String,
    pub message: String,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Result of a round trip.
#[derive(Debug, Clone)]
pub struct ConsistencyReport {
    /// Output of the requested conversion
    pub converted: String,
    /// `converted` fed back through the opposite direction
    pub round_trip: String,
    pub differences: Vec<Difference>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Convert nyaml to NXDL and back, and compare the definitions.
pub fn check_nyaml(source: &str, options: &ConversionOptions) -> Result<ConsistencyReport> {
    let converted = nyaml_to_nxdl(source, options)?;
    let round_trip = nxdl_to_nyaml(&converted, options)?;

    let nyaml = NyamlFormat::new(options.clone());
    let original = split_embedded(source).yaml;
    let returned = split_embedded(&round_trip).yaml;
    let mut differences = compare_documents(&nyaml.parse(original)?, &nyaml.parse(returned)?);
    differences.extend(compare_comment_blocks(original, returned)?);
    Ok(ConsistencyReport {
        converted,
        round_trip,
        differences,
    })
}

/// Convert NXDL to nyaml and back, and compare the definitions.
pub fn check_nxdl(source: &str, options: &ConversionOptions) -> Result<ConsistencyReport> {
    let converted = nxdl_to_nyaml(source, options)?;
    // The embedded copy would make the way back trivially identical.
    let round_trip = convert_nyaml(split_embedded(&converted).yaml, options)?;

    let nxdl = NxdlFormat::new(options.clone());
    let differences = compare_documents(&nxdl.parse(source)?, &nxdl.parse(&round_trip)?);
    Ok(ConsistencyReport {
        converted,
        round_trip,
        differences,
    })
}

/// Structural comparison of two documents.
pub fn compare_documents(expected: &NxdlDocument, actual: &NxdlDocument) -> Vec<Difference> {
    let mut differences = Vec::new();
    compare_elements(&expected.root, &actual.root, "", true, &mut differences);

    let expected_comments = comment_lines(expected);
    let actual_comments = comment_lines(actual);
    if expected_comments != actual_comments {
        let at = expected_comments
            .iter()
            .zip(&actual_comments)
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| expected_comments.len().min(actual_comments.len()));
        differences.push(Difference {
            path: "/".to_string(),
            message: format!(
                "comments differ at comment line {}: expected {:?}, found {:?}",
                at + 1,
                expected_comments.get(at),
                actual_comments.get(at)
            ),
        });
    }
    differences
}

/// Compare the comment blocks of two nyaml sources, text and anchor key.
///
/// Comments above a root attribute other than `category` or above the body
/// key all land ahead of `<definition>`, so they share one anchor.
pub fn compare_comment_blocks(expected: &str, actual: &str) -> Result<Vec<Difference>> {
    let expected = anchored_blocks(expected)?;
    let actual = anchored_blocks(actual)?;
    let mut differences = Vec::new();
    if expected.len() != actual.len() {
        differences.push(Difference {
            path: "/".to_string(),
            message: format!(
                "nyaml comment blocks differ: expected {} blocks, found {}",
                expected.len(),
                actual.len()
            ),
        });
    }
    for (index, (want, found)) in expected.iter().zip(&actual).enumerate() {
        if want.1 != found.1 {
            differences.push(Difference {
                path: "/".to_string(),
                message: format!(
                    "nyaml comment block {} differs: expected {:?}, found {:?}",
                    index + 1,
                    want.1,
                    found.1
                ),
            });
        } else if want.0 != found.0 {
            differences.push(Difference {
                path: "/".to_string(),
                message: format!(
                    "nyaml comment block {} moved from {} to {}",
                    index + 1,
                    want.0,
                    found.0
                ),
            });
        }
    }
    Ok(differences)
}

/// Anchor label and text of every comment block in a nyaml source.
fn anchored_blocks(source: &str) -> Result<Vec<(String, Vec<String>)>> {
    let document = loader::load(source)?;
    let collector = CommentCollector::collect(source, &document.positions);
    let top = KeyPath::root();
    let header: Vec<(&str, usize)> = document
        .root
        .keys()
        .filter(|key| !matches!(*key, "category" | "doc" | "symbols"))
        .map(|key| (key, document.line(&top.child(key))))
        .collect();

    Ok(collector
        .blocks()
        .iter()
        .map(|block| {
            let label = match block.anchor() {
                None => "the end of the file".to_string(),
                Some(anchor)
                    if header
                        .iter()
                        .any(|&(key, line)| key == anchor.key && line == anchor.line) =>
                {
                    "the definition header".to_string()
                }
                Some(anchor) => format!("'{}'", anchor.key),
            };
            (label, block.lines().map(str::to_string).collect())
        })
        .collect())
}

fn segment(element: &XmlElement) -> String {
    match element.get("name").or_else(|| element.get("type")) {
        Some(id) => format!("{}[{id}]", element.name),
        None => element.name.clone(),
    }
}

fn normalized_attributes(element: &XmlElement, is_root: bool) -> Vec<(String, String)> {
    let mut attributes: Vec<(String, String)> = element
        .attributes
        .iter()
        .filter(|(k, _)| k != "schemaLocation" && !OCCURRENCE_ATTRIBUTES.contains(&k.as_str()))
        .map(|(k, v)| {
            let value = match v.trim() {
                "True" => "true".to_string(),
                "False" => "false".to_string(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect();

    let occurrence = Occurrence::from_xml_attributes(
        element
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
        "",
    );
    match occurrence {
        Ok(Some(occurrence)) => attributes.extend(
            occurrence
                .normalized()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v)),
        ),
        Ok(None) => {}
        Err(_) => attributes.push(("exists".to_string(), "conflict".to_string())),
    }

    if is_root {
        for (key, default) in [("extends", "NXobject"), ("type", "group")] {
            if !element.has(key) {
                attributes.push((key.to_string(), default.to_string()));
            }
        }
    }
    attributes.sort();
    attributes
}

fn words(text: Option<&str>) -> Vec<&str> {
    text.map(|t| t.split_whitespace().collect())
        .unwrap_or_default()
}

fn compare_elements(
    expected: &XmlElement,
    actual: &XmlElement,
    parent: &str,
    is_root: bool,
    differences: &mut Vec<Difference>,
) {
    let path = format!("{parent}/{}", segment(expected));
    if expected.name != actual.name {
        differences.push(Difference {
            path,
            message: format!("expected <{}>, found <{}>", expected.name, actual.name),
        });
        return;
    }

    let expected_attributes = normalized_attributes(expected, is_root);
    let actual_attributes = normalized_attributes(actual, is_root);
    if expected_attributes != actual_attributes {
        differences.push(Difference {
            path: path.clone(),
            message: format!(
                "attributes differ: expected {expected_attributes:?}, found {actual_attributes:?}"
            ),
        });
    }

    if words(expected.text.as_deref()) != words(actual.text.as_deref()) {
        differences.push(Difference {
            path: path.clone(),
            message: "doc text differs".to_string(),
        });
    }

    let expected_children: Vec<&XmlElement> = expected.elements().collect();
    let actual_children: Vec<&XmlElement> = actual.elements().collect();
    if expected_children.len() != actual_children.len() {
        differences.push(Difference {
            path: path.clone(),
            message: format!(
                "expected {} child elements, found {}",
                expected_children.len(),
                actual_children.len()
            ),
        });
    }
    for (e, a) in expected_children.iter().zip(&actual_children) {
        compare_elements(e, a, &path, false, differences);
    }
}

/// Comment lines in document order, `#` framing and copyright removed.
fn comment_lines(doc: &NxdlDocument) -> Vec<String> {
    fn visit(nodes: &[XmlNode], out: &mut Vec<String>) {
        for node in nodes {
            match node {
                XmlNode::Comment(lines) => {
                    if is_copyright_comment(&lines.join("\n")) {
                        continue;
                    }
                    out.extend(
                        lines
                            .iter()
                            .map(|l| l.trim().trim_start_matches('#').trim().to_string())
                            .filter(|l| !l.is_empty()),
                    );
                }
                XmlNode::Element(element) => visit(&element.children, out),
            }
        }
    }
    let mut out = Vec::new();
    visit(&doc.preamble, &mut out);
    visit(&doc.root.children, &mut out);
    out
}
