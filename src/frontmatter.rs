//! Front-matter splitting, parsing, and serialization for MDX documents.
//!
//! A content document opens with a `---` fence, carries a YAML metadata block
//! up to the next `---` line, and everything after is the body:
//!
//! ```text
//! ---
//! title: "Stern-Brocot tree"
//! date: "2026-02-25T21:30:00+09:00"
//! tags: ["math", "algorithms"]
//! ---
//!
//! Body text...
//! ```
//!
//! The metadata block is kept as a [`serde_yaml_ng::Mapping`] rather than a
//! typed struct: the tooling must round-trip keys it doesn't know about, and
//! the canonical field-ordering pass in [`crate::metadata`] relies on the
//! mapping preserving insertion order.
//!
//! A document with no opening fence parses as an empty mapping plus the full
//! text as body. The validator counts on this: such a file reports every
//! required field as missing instead of failing to parse.

use serde_yaml_ng::Mapping;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front matter block is not terminated by a closing ---")]
    Unterminated,
    #[error("invalid YAML in front matter: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error("front matter is not a mapping")]
    NotAMapping,
}

/// A parsed content document: YAML metadata plus raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Front-matter keys and values, in file order.
    pub matter: Mapping,
    /// Everything after the closing fence, untouched. The content hash is
    /// computed over exactly this string.
    pub body: String,
}

impl Document {
    /// Parse a document from its full text.
    pub fn parse(text: &str) -> Result<Self, FrontMatterError> {
        let Some(rest) = text.strip_prefix("---\n").or_else(|| {
            // Tolerate CRLF on the opening fence line only; the YAML parser
            // handles CRLF inside the block.
            text.strip_prefix("---\r\n")
        }) else {
            return Ok(Self {
                matter: Mapping::new(),
                body: text.to_string(),
            });
        };

        let Some(end) = find_closing_fence(rest) else {
            return Err(FrontMatterError::Unterminated);
        };
        let (yaml, body) = rest.split_at(end.block_end);

        let matter = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml_ng::from_str(yaml)? {
                serde_yaml_ng::Value::Mapping(m) => m,
                _ => return Err(FrontMatterError::NotAMapping),
            }
        };

        Ok(Self {
            matter,
            body: body[end.fence_len..].to_string(),
        })
    }

    /// Serialize back to document text: fenced YAML followed by the body.
    pub fn to_text(&self) -> Result<String, FrontMatterError> {
        let yaml = serde_yaml_ng::to_string(&self.matter)?;
        Ok(format!("---\n{}---\n{}", yaml, self.body))
    }

    /// Look up a front-matter value by key.
    pub fn get(&self, key: &str) -> Option<&serde_yaml_ng::Value> {
        self.matter.get(key)
    }

    /// Look up a front-matter string value by key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.matter.get(key).and_then(|v| v.as_str())
    }
}

struct FenceMatch {
    /// Byte offset where the YAML block ends (start of the fence line).
    block_end: usize,
    /// Length of the fence line itself, including its newline if present.
    fence_len: usize,
}

/// Find the first line that is exactly `---` (modulo a trailing CR).
fn find_closing_fence(text: &str) -> Option<FenceMatch> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" {
            return Some(FenceMatch {
                block_end: offset,
                fence_len: line.len(),
            });
        }
        offset += line.len();
    }
    None
}
