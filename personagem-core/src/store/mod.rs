//! Persistence collaborator: save, find and delete characters by id.
//!
//! A store owns identifier allocation. Saving a record with no id inserts it
//! and writes the new id back into the record; saving a record that already
//! has an id replaces the whole stored row. Ids only grow and are never
//! handed out twice, even after a delete.
//!
//! Both stores keep the inventory as encoded text, exactly as it sits in the
//! `SQLite` column, so a codec failure shows up the same way everywhere.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use tracing::warn;

use crate::codec::InventoryCodec;
use crate::error::{PersonagemError, Result};
use crate::record::{Character, CharacterId, Inventory};
use crate::rules::CharacterRules;

/// Storage for [`Character`] records keyed by [`CharacterId`].
pub trait CharacterStore {
    /// Insert `character` if it has no id, otherwise replace the row with its
    /// id. On insert the new id is written into `character`.
    ///
    /// # Errors
    /// - [`PersonagemError::NotFound`] if the record carries an id with no row.
    /// - [`PersonagemError::Encoding`] if the inventory cannot be encoded.
    /// - [`PersonagemError::RuleViolation`] if rules are enforced and broken.
    fn save(&self, character: &mut Character) -> Result<CharacterId>;

    /// Look up a record.
    ///
    /// # Errors
    /// Returns [`PersonagemError::MalformedStorage`] if the stored inventory
    /// does not decode.
    fn find_by_id(&self, id: CharacterId) -> Result<Option<Character>>;

    /// Remove a record.
    ///
    /// # Errors
    /// Returns [`PersonagemError::NotFound`] if no row has `id`.
    fn delete(&self, id: CharacterId) -> Result<()>;

    /// Up to `limit` records in ascending id order, skipping the first `offset`.
    ///
    /// # Errors
    /// Fails on the first row whose inventory does not decode.
    fn list(&self, offset: usize, limit: usize) -> Result<Vec<Character>>;

    /// Number of stored records.
    ///
    /// # Errors
    /// Returns a backend error if the count cannot be read.
    fn count(&self) -> Result<usize>;

    /// Like [`find_by_id`](Self::find_by_id) but absence is an error.
    ///
    /// # Errors
    /// Returns [`PersonagemError::NotFound`] if no row has `id`.
    fn get(&self, id: CharacterId) -> Result<Character> {
        self.find_by_id(id)?.ok_or(PersonagemError::NotFound(id))
    }
}

// ---------------------------------------------------------------------------
// Stored row
// ---------------------------------------------------------------------------

/// A record as it sits in storage: one value per column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CharacterRow {
    id: i64,
    name: String,
    adventurer_name: String,
    class: String,
    level: i32,
    inventory: String,
    strength: i32,
    defense: i32,
}

impl CharacterRow {
    /// Flatten `character` for writing. The id is filled in by the caller.
    fn encode(
        character: &Character,
        codec: &dyn InventoryCodec,
        rules: Option<&CharacterRules>,
    ) -> Result<Self> {
        if let Some(rules) = rules {
            rules.check(character)?;
        }
        Ok(Self {
            id: character.id().map_or(0, |id| id.0),
            name: character.name().to_owned(),
            adventurer_name: character.adventurer_name().to_owned(),
            class: character.class().to_owned(),
            level: character.level(),
            inventory: character.encoded_inventory(codec)?,
            strength: character.strength(),
            defense: character.defense(),
        })
    }

    /// Rebuild the record. A bad inventory column is reported, never dropped.
    fn decode(self, codec: &dyn InventoryCodec) -> Result<Character> {
        let id = CharacterId(self.id);
        let inventory = Inventory::decode(codec, &self.inventory).map_err(|source| {
            warn!(character = %id, error = %source, "Stored inventory does not decode");
            PersonagemError::MalformedStorage { id, source }
        })?;

        let mut character = Character::new();
        character.set_id(Some(id));
        character.set_name(self.name);
        character.set_adventurer_name(self.adventurer_name);
        character.set_class(self.class);
        character.set_level(self.level);
        character.set_inventory(inventory);
        character.set_strength(self.strength);
        character.set_defense(self.defense);
        Ok(character)
    }
}
