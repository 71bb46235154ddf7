//! Inventory codec: the ordered item list <-> one text column.
//!
//! The canonical form is [`DelimitedCodec`]:
//!
//! ```text
//! ["Sword", "Shield", "Potion"]  ->  Sword,Shield,Potion
//! ["A,B", "C"]                   ->  A\,B,C
//! ["back\slash"]                 ->  back\\slash
//! ["Sword", ""]                  ->  Sword,\_
//! [""]                           ->  \_
//! []                             ->  (empty string)
//! ```
//!
//! Tokens are joined with `,`. Inside a token `,` is written as `\,` and `\`
//! as `\\`. An empty token is written as `\_`, which must make up the whole
//! field; this keeps `[""]` apart from `[]`. No other escape exists.
//!
//! [`JsonCodec`] stores a JSON array instead and accepts any token text.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while converting between an item list and its text form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The item list could not be turned into text.
    #[error("inventory cannot be encoded: {reason}")]
    Unencodable {
        /// What the encoder rejected.
        reason: String,
    },

    /// Stored text is not in the canonical encoding.
    #[error("malformed inventory text at byte {position}: {reason}")]
    Malformed {
        /// Byte offset where decoding gave up.
        position: usize,
        /// What was wrong.
        reason: String,
    },
}

/// Paired encode/decode functions for the inventory column.
///
/// Implementations must satisfy `decode(encode(x)?)? == x` for every list they
/// accept, and must fail rather than drop or reorder items.
pub trait InventoryCodec: fmt::Debug + Send + Sync {
    /// Encode an ordered item list into a single text value.
    ///
    /// # Errors
    /// Returns [`CodecError::Unencodable`] if an item cannot be represented.
    fn encode(&self, items: &[String]) -> Result<String, CodecError>;

    /// Decode a stored text value back into the ordered item list.
    ///
    /// # Errors
    /// Returns [`CodecError::Malformed`] if `text` is not canonical.
    fn decode(&self, text: &str) -> Result<Vec<String>, CodecError>;
}

// ---------------------------------------------------------------------------
// Delimited codec
// ---------------------------------------------------------------------------

/// Comma-separated inventory with backslash escaping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelimitedCodec;

impl DelimitedCodec {
    /// Character between two item tokens.
    pub const SEPARATOR: char = ',';
    /// Character that makes the following separator or escape literal.
    pub const ESCAPE: char = '\\';
    /// Follows [`Self::ESCAPE`] to stand for an empty item.
    pub const EMPTY_ITEM: char = '_';
}

impl InventoryCodec for DelimitedCodec {
    fn encode(&self, items: &[String]) -> Result<String, CodecError> {
        let mut out = String::with_capacity(items.iter().map(|i| i.len() + 1).sum());
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                out.push(Self::SEPARATOR);
            }
            if item.is_empty() {
                out.push(Self::ESCAPE);
                out.push(Self::EMPTY_ITEM);
                continue;
            }
            for ch in item.chars() {
                if ch == Self::SEPARATOR || ch == Self::ESCAPE {
                    out.push(Self::ESCAPE);
                }
                out.push(ch);
            }
        }
        Ok(out)
    }

    fn decode(&self, text: &str) -> Result<Vec<String>, CodecError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        let mut current = String::new();
        // Set after `\_`; the field has to end right there.
        let mut empty_item = false;
        let mut chars = text.char_indices();

        while let Some((position, ch)) = chars.next() {
            if empty_item && ch != Self::SEPARATOR {
                return Err(CodecError::Malformed {
                    position,
                    reason: "empty-item marker followed by more text".to_string(),
                });
            }
            match ch {
                Self::ESCAPE => match chars.next() {
                    Some((_, next)) if next == Self::SEPARATOR || next == Self::ESCAPE => {
                        current.push(next);
                    }
                    Some((_, Self::EMPTY_ITEM)) if current.is_empty() => empty_item = true,
                    Some((at, Self::EMPTY_ITEM)) => {
                        return Err(CodecError::Malformed {
                            position: at,
                            reason: "empty-item marker inside a non-empty item".to_string(),
                        });
                    }
                    Some((at, next)) => {
                        return Err(CodecError::Malformed {
                            position: at,
                            reason: format!("unknown escape sequence '\\{next}'"),
                        });
                    }
                    None => {
                        return Err(CodecError::Malformed {
                            position,
                            reason: "dangling escape at end of text".to_string(),
                        });
                    }
                },
                Self::SEPARATOR => {
                    if current.is_empty() && !empty_item {
                        return Err(CodecError::Malformed {
                            position,
                            reason: "empty item before separator".to_string(),
                        });
                    }
                    items.push(std::mem::take(&mut current));
                    empty_item = false;
                }
                _ => current.push(ch),
            }
        }

        if current.is_empty() && !empty_item {
            return Err(CodecError::Malformed {
                position: text.len(),
                reason: "empty item after trailing separator".to_string(),
            });
        }
        items.push(current);
        Ok(items)
    }
}

// ---------------------------------------------------------------------------
// JSON codec
// ---------------------------------------------------------------------------

/// Inventory stored as a JSON array of strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl InventoryCodec for JsonCodec {
    fn encode(&self, items: &[String]) -> Result<String, CodecError> {
        serde_json::to_string(items).map_err(|e| CodecError::Unencodable {
            reason: e.to_string(),
        })
    }

    fn decode(&self, text: &str) -> Result<Vec<String>, CodecError> {
        serde_json::from_str(text).map_err(|e| CodecError::Malformed {
            position: byte_offset(text, e.line(), e.column()),
            reason: e.to_string(),
        })
    }
}

/// Translate serde_json's 1-based line/column into a byte offset.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Which codec a store uses for the inventory column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecKind {
    /// [`DelimitedCodec`].
    #[default]
    Delimited,
    /// [`JsonCodec`].
    Json,
}

impl CodecKind {
    /// Build the codec this kind names.
    #[must_use]
    pub fn codec(self) -> Box<dyn InventoryCodec> {
        match self {
            Self::Delimited => Box::new(DelimitedCodec),
            Self::Json => Box::new(JsonCodec),
        }
    }
}

/// Encode with the canonical [`DelimitedCodec`].
///
/// # Errors
/// Never fails for the delimited form; the `Result` mirrors
/// [`InventoryCodec::encode`].
pub fn encode(items: &[String]) -> Result<String, CodecError> {
    DelimitedCodec.encode(items)
}

/// Decode with the canonical [`DelimitedCodec`].
///
/// # Errors
/// Returns [`CodecError::Malformed`] if `text` is not canonical.
pub fn decode(text: &str) -> Result<Vec<String>, CodecError> {
    DelimitedCodec.decode(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
