//! # Personagem Core Library
//!
//! Persisted role-playing character records.
//!
//! A [`Character`] is a flat, self-contained record: identity, class, level,
//! combat stats and an ordered inventory. The record itself holds no rules;
//! it only stores values. Two pieces sit around it:
//!
//! - **Inventory codec** — the item list is stored as a single text column.
//!   [`codec::DelimitedCodec`] is the canonical form (`,` separated, `\`
//!   escaped, `\_` for an empty item) and round-trips every item list.
//! - **Store** — a [`CharacterStore`] saves, finds and deletes records by
//!   identifier and owns identifier allocation.
//!
//! Validation is opt-in through [`rules::CharacterRules`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod rules;
pub mod store;

pub use codec::{CodecError, CodecKind, DelimitedCodec, InventoryCodec, JsonCodec};
pub use config::PersonagemConfig;
pub use error::PersonagemError;
pub use record::{Character, CharacterId, Inventory};
pub use store::{CharacterStore, MemoryStore, SqliteStore};
