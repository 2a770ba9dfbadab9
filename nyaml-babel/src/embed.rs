//! Embedded NXDL and hash cache
//!
//! A nyaml file produced from an NXDL file may carry the source NXDL as a
//! trailing comment block, introduced by a divider line and the SHA-256 of the
//! nyaml text above it. When the nyaml part is converted back unchanged, the
//! embedded NXDL can be returned as is.

use sha2::{Digest, Sha256};

/// Divider line between the nyaml text and the embedded NXDL.
pub const HASH_DIVIDER: &str =
    "# ++++++++++++++++++++++++++++++++++ SHA HASH ++++++++++++++++++++++++++++++++++";

/// Hex encoded SHA-256 of `text`.
pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Append `nxdl` to `yaml` as a comment block under the hash divider.
pub fn append_nxdl(yaml: &str, nxdl: &str) -> String {
    let mut out = String::with_capacity(yaml.len() + nxdl.len() * 2);
    out.push_str(yaml);
    out.push('\n');
    out.push_str(HASH_DIVIDER);
    out.push('\n');
    out.push_str(&format!("# {}\n", sha256_hex(yaml)));
    for line in nxdl.lines() {
        if line.is_empty() {
            out.push_str("#\n");
        } else {
            out.push_str("# ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// A nyaml source split at the hash divider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedNxdl<'a> {
    /// The nyaml text above the divider.
    pub yaml: &'a str,
    /// Hash recorded under the divider.
    pub hash: Option<String>,
    /// Embedded NXDL with the comment framing removed.
    pub nxdl: Option<String>,
}

impl EmbeddedNxdl<'_> {
    /// The embedded NXDL, if the nyaml part still matches the recorded hash.
    pub fn cached(&self) -> Option<&str> {
        match (&self.hash, &self.nxdl) {
            (Some(hash), Some(nxdl)) if *hash == sha256_hex(self.yaml) => Some(nxdl),
            _ => None,
        }
    }
}

/// Split `source` into its nyaml part and the embedded NXDL, if any.
pub fn split_embedded(source: &str) -> EmbeddedNxdl<'_> {
    let Some(start) = find_divider(source) else {
        return EmbeddedNxdl {
            yaml: source,
            hash: None,
            nxdl: None,
        };
    };

    // The divider is preceded by the newline that `append_nxdl` inserts.
    let yaml = source[..start]
        .strip_suffix('\n')
        .unwrap_or(&source[..start]);
    let mut rest = source[start..].lines().skip(1);
    let hash = rest
        .next()
        .map(|line| line.trim_start_matches('#').trim().to_string())
        .filter(|h| !h.is_empty());

    let mut nxdl = String::new();
    for line in rest {
        let text = line
            .strip_prefix("# ")
            .or_else(|| line.strip_prefix('#'))
            .unwrap_or(line);
        nxdl.push_str(text);
        nxdl.push('\n');
    }

    EmbeddedNxdl {
        yaml,
        hash,
        nxdl: if nxdl.is_empty() { None } else { Some(nxdl) },
    }
}

fn find_divider(source: &str) -> Option<usize> {
    let mut offset = 0;
    for line in source.split_inclusive('\n') {
        if line.starts_with(HASH_DIVIDER) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = "category: base\ndoc: |\n  A test.\nNXtest(NXobject):\n";
    const NXDL: &str = "<?xml version='1.0' encoding='UTF-8'?>\n\n<definition name=\"NXtest\"/>\n";

    #[test]
    fn hash_is_lowercase_hex() {
        let hash = sha256_hex("abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn appended_block_splits_back() {
        let combined = append_nxdl(YAML, NXDL);
        let split = split_embedded(&combined);
        assert_eq!(split.yaml, YAML);
        assert_eq!(split.nxdl.as_deref(), Some(NXDL));
        assert_eq!(split.cached(), Some(NXDL));
    }

    #[test]
    fn edited_yaml_invalidates_cache() {
        let combined = append_nxdl(YAML, NXDL).replacen("A test.", "Edited.", 1);
        let split = split_embedded(&combined);
        assert!(split.nxdl.is_some());
        assert!(split.cached().is_none());
    }

    #[test]
    fn source_without_divider_is_all_yaml() {
        let split = split_embedded(YAML);
        assert_eq!(split.yaml, YAML);
        assert!(split.hash.is_none());
        assert!(split.cached().is_none());
    }
}
