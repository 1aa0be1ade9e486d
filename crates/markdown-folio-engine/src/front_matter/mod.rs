//! # Front Matter
//!
//! A document may start with a metadata block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: A
//! date: 2024-03-01
//! ---
//! Body text
//! ```
//!
//! [`split`] separates that block from the body, and a [`MetadataDecoder`]
//! turns the block into a [`FrontMatter`] record. Most documents have no
//! front matter at all, which is not an error.

mod decode;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

pub use decode::{DecodeError, MetadataDecoder, YamlDecoder};

/// The delimiter line that opens and closes a metadata block.
pub const DELIMITER: &str = "---";

/// Metadata decoded from a document's front matter.
///
/// Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A document split into its metadata block and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<'a> {
    /// Lines strictly between the two delimiter lines, joined with `\n`.
    pub metadata: Option<String>,
    /// Lines after the closing delimiter, or the untouched input when there
    /// is no front matter.
    pub body: Cow<'a, str>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrontMatterError {
    #[error("front matter opened on line 1 is never closed by a `{DELIMITER}` line")]
    Unterminated,
}

/// Separates an optional leading metadata block from the document body.
///
/// The first line, trimmed, must be exactly `---` to open a block; the next
/// line that trims to `---` closes it. An opened block with no closing line
/// is an error rather than being read as body text.
pub fn split(raw: &str) -> Result<Split<'_>, FrontMatterError> {
    let lines: Vec<&str> = raw.split('\n').collect();

    if lines.first().map(|l| l.trim()) != Some(DELIMITER) {
        return Ok(Split {
            metadata: None,
            body: Cow::Borrowed(raw),
        });
    }

    let close = lines
        .iter()
        .skip(1)
        .position(|l| l.trim() == DELIMITER)
        .map(|i| i + 1)
        .ok_or(FrontMatterError::Unterminated)?;

    Ok(Split {
        metadata: Some(lines[1..close].join("\n")),
        body: Cow::Owned(lines[close + 1..].join("\n")),
    })
}
