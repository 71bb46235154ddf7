//! Error types for the Personagem core library.

use thiserror::Error;

use crate::codec::CodecError;
use crate::record::CharacterId;
use crate::rules::RuleViolation;

/// Top-level error type for all Personagem operations.
#[derive(Error, Debug)]
pub enum PersonagemError {
    /// No stored record has the given identifier.
    #[error("Character not found: {0}")]
    NotFound(CharacterId),

    /// The inventory could not be encoded into its text column.
    #[error("Inventory encoding error: {0}")]
    Encoding(#[from] CodecError),

    /// A stored inventory column does not match the configured encoding.
    #[error("Malformed inventory stored for character {id}: {source}")]
    MalformedStorage {
        /// Row the bad column was read from.
        id: CharacterId,
        /// What the decoder rejected.
        source: CodecError,
    },

    /// The record broke one or more of the opt-in character rules.
    #[error("Character rules violated: {}", format_violations(.0))]
    RuleViolation(Vec<RuleViolation>),

    /// `SQLite` persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_violations(violations: &[RuleViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, PersonagemError>;
