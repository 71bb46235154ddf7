//! In-process character store.
//!
//! Keeps encoded rows in a map behind a mutex. Nothing survives the process;
//! useful for tests and for callers that only need a scratch collaborator.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::debug;

use super::{CharacterRow, CharacterStore};
use crate::codec::{DelimitedCodec, InventoryCodec};
use crate::config::PersonagemConfig;
use crate::error::{PersonagemError, Result};
use crate::record::{Character, CharacterId};
use crate::rules::CharacterRules;

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    rows: BTreeMap<i64, CharacterRow>,
}

/// Map-backed [`CharacterStore`].
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<State>,
    codec: Box<dyn InventoryCodec>,
    rules: Option<CharacterRules>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            state: Mutex::new(State::default()),
            codec: Box::new(DelimitedCodec),
            rules: None,
        }
    }
}

impl MemoryStore {
    /// Empty store using the canonical codec and no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store configured like a [`SqliteStore`](super::SqliteStore).
    #[must_use]
    pub fn with_config(config: &PersonagemConfig) -> Self {
        Self {
            state: Mutex::new(State::default()),
            codec: config.inventory.format.codec(),
            rules: config
                .rules
                .enforce_on_save
                .then(|| CharacterRules::from(&config.rules)),
        }
    }
}

impl CharacterStore for MemoryStore {
    fn save(&self, character: &mut Character) -> Result<CharacterId> {
        let mut row = CharacterRow::encode(character, self.codec.as_ref(), self.rules.as_ref())?;
        let mut state = self.state.lock();

        let id = if let Some(id) = character.id() {
            let Some(slot) = state.rows.get_mut(&id.0) else {
                return Err(PersonagemError::NotFound(id));
            };
            *slot = row;
            id
        } else {
            state.last_id += 1;
            let id = CharacterId(state.last_id);
            row.id = id.0;
            state.rows.insert(id.0, row);
            character.set_id(Some(id));
            id
        };

        debug!(character = %id, "Saved character");
        Ok(id)
    }

    fn find_by_id(&self, id: CharacterId) -> Result<Option<Character>> {
        let row = self.state.lock().rows.get(&id.0).cloned();
        row.map(|row| row.decode(self.codec.as_ref())).transpose()
    }

    fn delete(&self, id: CharacterId) -> Result<()> {
        self.state
            .lock()
            .rows
            .remove(&id.0)
            .map(|_| ())
            .ok_or(PersonagemError::NotFound(id))
    }

    fn list(&self, offset: usize, limit: usize) -> Result<Vec<Character>> {
        let rows: Vec<CharacterRow> = self
            .state
            .lock()
            .rows
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        rows.into_iter()
            .map(|row| row.decode(self.codec.as_ref()))
            .collect()
    }

    fn count(&self) -> Result<usize> {
        Ok(self.state.lock().rows.len())
    }
}
