//! Static tables shared by both directions
//!
//! Attribute whitelists exist in two spellings: the NXDL one (what may appear
//! on the XML element) and the nyaml one, where `units` is written `unit` and
//! the occurrence attributes may be folded into `exists`.

/// Namespace of NXDL 3.1 definitions
pub const NXDL_NAMESPACE: &str = "http://definition.nexusformat.org/nxdl/3.1";

/// XML Schema instance namespace, used for `xsi:schemaLocation`
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Value of `xsi:schemaLocation` on every generated definition
pub const SCHEMA_LOCATION: &str = "http://definition.nexusformat.org/nxdl/3.1 ../nxdl.xsd";

/// Root attributes that may be given as plain root keys in nyaml
pub const DEFINITION_ATTRIBUTES: &[&str] = &[
    "deprecated",
    "ignoreExtraGroups",
    "category",
    "type",
    "ignoreExtraFields",
    "ignoreExtraAttributes",
    "restricts",
];

/// XML attributes that collapse into the nyaml `exists` entry
pub const OCCURRENCE_ATTRIBUTES: &[&str] =
    &["minOccurs", "maxOccurs", "optional", "recommended", "required"];

pub const NXDL_FIELD_ATTRIBUTES: &[&str] = &[
    "optional",
    "recommended",
    "name",
    "type",
    "axes",
    "axis",
    "data_offset",
    "interpretation",
    "long_name",
    "maxOccurs",
    "minOccurs",
    "nameType",
    "primary",
    "signal",
    "stride",
    "units",
    "required",
    "deprecated",
];

pub const NXDL_GROUP_ATTRIBUTES: &[&str] = &[
    "optional",
    "recommended",
    "name",
    "type",
    "maxOccurs",
    "minOccurs",
    "deprecated",
    "nameType",
];

pub const NXDL_ATTRIBUTE_ATTRIBUTES: &[&str] = &[
    "name",
    "type",
    "units",
    "nameType",
    "optional",
    "recommended",
    "required",
    "minOccurs",
    "maxOccurs",
    "deprecated",
];

pub const NXDL_LINK_ATTRIBUTES: &[&str] = &["name", "target", "napimount"];

/// Attributes of a single `<dim>` besides `index`
pub const NXDL_DIM_ATTRIBUTES: &[&str] = &["value", "required", "ref", "incr", "refindex"];

pub const YAML_FIELD_ATTRIBUTES: &[&str] = &[
    "optional",
    "recommended",
    "name",
    "type",
    "axes",
    "axis",
    "data_offset",
    "interpretation",
    "long_name",
    "maxOccurs",
    "minOccurs",
    "nameType",
    "primary",
    "signal",
    "stride",
    "unit",
    "required",
    "deprecated",
    "exists",
];

pub const YAML_GROUP_ATTRIBUTES: &[&str] = &[
    "optional",
    "recommended",
    "name",
    "type",
    "maxOccurs",
    "minOccurs",
    "deprecated",
    "nameType",
    "exists",
];

pub const YAML_ATTRIBUTE_ATTRIBUTES: &[&str] = &[
    "name",
    "type",
    "unit",
    "nameType",
    "optional",
    "recommended",
    "required",
    "minOccurs",
    "maxOccurs",
    "deprecated",
    "exists",
];

pub const YAML_LINK_ATTRIBUTES: &[&str] = &["name", "target", "napimount"];

/// Accepted values of the `nameType` hint
pub const NAME_TYPES: &[&str] = &["specified", "any", "partial"];

/// Categories a definition may declare
pub const DEFINITION_CATEGORIES: &[&str] = &["base", "application"];

/// Substitutions applied when XML text is written into nyaml
const XML_TO_YAML_ESCAPES: &[(&str, &str)] = &[("\t", "    ")];

/// Substitutions applied when nyaml text is written into XML
const YAML_TO_XML_ESCAPES: &[(&str, &str)] = &[("':'", ":")];

/// Replace characters that the YAML side cannot carry verbatim
pub fn escape_for_yaml(text: &str) -> String {
    apply(text, XML_TO_YAML_ESCAPES)
}

/// Undo [`escape_for_yaml`]-style substitutions on the way back to XML
pub fn revert_yaml_escapes(text: &str) -> String {
    apply(text, YAML_TO_XML_ESCAPES)
}

/// Whether a value has to go into a `|` block to stay a plain string.
fn needs_block(value: &str) -> bool {
    value.contains([':', '#', '\n'])
        || value.starts_with([
            '-', '?', '[', ']', '{', '}', ',', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
        ])
        || matches!(value, "~" | "null" | "Null" | "NULL")
}

/// `key: value` at `depth`, switching to a `|` block when the value is not plain.
pub fn yaml_entry(key: &str, value: &str, depth: usize, unit: usize) -> String {
    let indent = " ".repeat(depth * unit);
    let value = escape_for_yaml(value.trim());
    if value.is_empty() {
        return format!("{indent}{key}: ''\n");
    }
    if !needs_block(&value) {
        return format!("{indent}{key}: {value}\n");
    }
    let inner = " ".repeat((depth + 1) * unit);
    let mut out = format!("{indent}{key}: |\n");
    for line in value.split('\n') {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{inner}{}\n", line.trim_end()));
        }
    }
    out
}

fn apply(text: &str, table: &[(&str, &str)]) -> String {
    let mut out = text.to_string();
    for (from, to) in table {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    out
}

/// Render a whitelist the way error messages show it
pub fn describe(list: &[&str]) -> String {
    format!("[{}]", list.join(", "))
}
