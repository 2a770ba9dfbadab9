//! Comment collector
//!
//! YAML parsers drop comments, so they are recovered from the raw text. Each
//! contiguous run of `#` lines is held back until the next line that declares
//! a key; the block is then bound to that (key, line) anchor. The builder asks
//! for the block of every key it materializes and emits it as XML comments in
//! front of the element.
//!
//! Blank lines split a block into runs. Every run becomes its own XML comment,
//! which is how the emitter separates consecutive comments again.

use super::value::PositionMap;
use crate::embed::HASH_DIVIDER;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A line that opens a `|` or `>` block scalar.
static BLOCK_SCALAR_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^\s*-|:)\s+[|>][0-9+\-]*\s*$").expect("valid regex"));

/// Where a comment block belongs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub key: String,
    pub line: usize,
}

/// Contiguous comment lines bound to the element they precede.
#[derive(Debug, Clone)]
pub struct CommentBlock {
    runs: Vec<Vec<String>>,
    anchor: Option<Anchor>,
    source_line: usize,
}

impl CommentBlock {
    /// Runs of comment text, `#` framing removed, one run per XML comment.
    pub fn runs(&self) -> &[Vec<String>] {
        &self.runs
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    /// Comments after the last key of the file.
    pub fn is_file_end(&self) -> bool {
        self.anchor.is_none()
    }

    /// Line of the first comment in the block.
    pub fn source_line(&self) -> usize {
        self.source_line
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.runs.iter().flatten().map(String::as_str)
    }
}

impl PartialEq for CommentBlock {
    fn eq(&self, other: &Self) -> bool {
        self.lines().eq(other.lines())
    }
}

/// All comment blocks of a nyaml source, indexable by anchor.
#[derive(Debug, Clone, Default)]
pub struct CommentCollector {
    blocks: Vec<CommentBlock>,
    index: HashMap<Anchor, usize>,
}

impl CommentCollector {
    /// Scan `source` and bind comment runs to the keys recorded in `positions`.
    pub fn collect(source: &str, positions: &PositionMap) -> Self {
        let mut collector = CommentCollector::default();
        let mut pending: Vec<Vec<String>> = Vec::new();
        let mut pending_start = 0;
        let mut gap = false;
        let mut block_indent: Option<usize> = None;

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            if raw.starts_with(HASH_DIVIDER) {
                break;
            }
            let trimmed = raw.trim();
            let indent = raw.len() - raw.trim_start().len();

            if let Some(parent) = block_indent {
                if trimmed.is_empty() || indent > parent {
                    continue;
                }
                block_indent = None;
            }

            if trimmed.is_empty() {
                gap = true;
                continue;
            }

            if trimmed.starts_with('#') {
                if pending.is_empty() {
                    pending_start = line_no;
                    pending.push(Vec::new());
                } else if gap {
                    pending.push(Vec::new());
                }
                gap = false;
                if let Some(run) = pending.last_mut() {
                    run.push(strip_comment_marker(trimmed));
                }
                continue;
            }

            gap = false;
            if BLOCK_SCALAR_START.is_match(raw.trim_end()) {
                block_indent = Some(indent);
            }
            if pending.is_empty() {
                continue;
            }
            if let Some(key) = positions.key_at_line(line_no) {
                let anchor = Anchor {
                    key: key.to_string(),
                    line: line_no,
                };
                collector.index.insert(anchor.clone(), collector.blocks.len());
                collector.blocks.push(CommentBlock {
                    runs: std::mem::take(&mut pending),
                    anchor: Some(anchor),
                    source_line: pending_start,
                });
            }
        }

        if !pending.is_empty() {
            collector.blocks.push(CommentBlock {
                runs: pending,
                anchor: None,
                source_line: pending_start,
            });
        }
        collector
    }

    /// Block bound to `key` declared on `line`.
    pub fn lookup(&self, key: &str, line: usize) -> Option<&CommentBlock> {
        let anchor = Anchor {
            key: key.to_string(),
            line,
        };
        self.index.get(&anchor).map(|&i| &self.blocks[i])
    }

    /// Trailing comments that follow the last key of the file.
    pub fn file_end(&self) -> Option<&CommentBlock> {
        self.blocks.last().filter(|b| b.is_file_end())
    }

    pub fn blocks(&self) -> &[CommentBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// `# text` → `text`; a bare `#` becomes an empty line; `#text` stays as is.
fn strip_comment_marker(line: &str) -> String {
    if line == "#" {
        String::new()
    } else if let Some(rest) = line.strip_prefix("# ") {
        rest.to_string()
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::nyaml::loader::load;

    fn collect(source: &str) -> CommentCollector {
        let doc = load(source).unwrap();
        CommentCollector::collect(source, &doc.positions)
    }

    #[test]
    fn binds_block_to_following_key() {
        let source = "category: base\n# about the body\n# second line\nNXtest:\n  data:\n";
        let comments = collect(source);
        let block = comments.lookup("NXtest", 4).unwrap();
        assert_eq!(block.runs(), &[vec!["about the body", "second line"]]);
        assert_eq!(block.source_line(), 2);
        assert!(comments.lookup("category", 1).is_none());
    }

    #[test]
    fn blank_line_starts_a_new_run() {
        let source = "# one\n\n# two\ncategory: base\n";
        let comments = collect(source);
        let block = comments.lookup("category", 4).unwrap();
        assert_eq!(block.runs().len(), 2);
    }

    #[test]
    fn hash_lines_inside_block_scalars_are_content() {
        let source = "doc: |\n  # not a comment\n  text\n# real\nNXtest:\n";
        let comments = collect(source);
        assert_eq!(comments.len(), 1);
        let block = comments.lookup("NXtest", 5).unwrap();
        assert_eq!(block.lines().collect::<Vec<_>>(), vec!["real"]);
    }

    #[test]
    fn trailing_comments_form_file_end_block() {
        let source = "NXtest:\n  data:\n  # closing remark\n";
        let comments = collect(source);
        let tail = comments.file_end().unwrap();
        assert!(tail.is_file_end());
        assert_eq!(tail.lines().collect::<Vec<_>>(), vec!["closing remark"]);
    }

    #[test]
    fn equality_ignores_position() {
        let a = collect("# same\na: 1\n");
        let b = collect("b: 2\n\n# same\nc: 3\n");
        assert_eq!(a.blocks(), b.blocks());
    }

    #[test]
    fn stops_at_embedded_nxdl() {
        let source = format!("a: 1\n{HASH_DIVIDER}\n# 0123\n# <definition/>\n");
        let comments = collect(&source);
        assert!(comments.is_empty());
    }
}
