//! `SQLite` character store.
//!
//! One row per character, one column per attribute:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS characters (
//!     id              INTEGER PRIMARY KEY AUTOINCREMENT,
//!     name            TEXT    NOT NULL,
//!     adventurer_name TEXT    NOT NULL,
//!     class           TEXT    NOT NULL,
//!     level           INTEGER NOT NULL,
//!     inventory       TEXT    NOT NULL,
//!     strength        INTEGER NOT NULL,
//!     defense         INTEGER NOT NULL,
//!     updated_at      TEXT    NOT NULL
//! );
//! ```
//!
//! `AUTOINCREMENT` keeps ids strictly increasing and stops `SQLite` from
//! reusing the id of a deleted row.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use tracing::{debug, info};

use super::{CharacterRow, CharacterStore};
use crate::codec::InventoryCodec;
use crate::config::PersonagemConfig;
use crate::error::{PersonagemError, Result};
use crate::record::{Character, CharacterId};
use crate::rules::CharacterRules;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS characters (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT    NOT NULL,
    adventurer_name TEXT    NOT NULL,
    class           TEXT    NOT NULL,
    level           INTEGER NOT NULL,
    inventory       TEXT    NOT NULL,
    strength        INTEGER NOT NULL,
    defense         INTEGER NOT NULL,
    updated_at      TEXT    NOT NULL
);";

const COLUMNS: &str = "id, name, adventurer_name, class, level, inventory, strength, defense";

/// Handle to an open `SQLite` database of characters.
///
/// # Usage
///
/// ```no_run
/// # use personagem_core::{Character, CharacterStore, PersonagemConfig, SqliteStore};
/// let store = SqliteStore::open("characters.db", &PersonagemConfig::default())?;
/// let mut hero = Character::new();
/// hero.set_name("Ana");
/// hero.inventory_mut().push("Sword");
/// let id = store.save(&mut hero)?;
/// let loaded = store.get(id)?;
/// assert_eq!(loaded.inventory().as_slice(), ["Sword".to_string()]);
/// # Ok::<(), personagem_core::PersonagemError>(())
/// ```
pub struct SqliteStore {
    conn: Connection,
    codec: Box<dyn InventoryCodec>,
    rules: Option<CharacterRules>,
    db_path: PathBuf,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .field("codec", &self.codec)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) a database at `path`.
    ///
    /// The schema is created if missing. WAL mode is enabled when
    /// `config.persistence.wal_mode` is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`PersonagemError::Database`] on `SQLite` failures.
    pub fn open<P: AsRef<Path>>(path: P, config: &PersonagemConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;
        if config.persistence.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

        let store = Self::from_connection(conn, db_path, config)?;
        info!(
            path = %store.db_path.display(),
            wal = config.persistence.wal_mode,
            codec = ?config.inventory.format,
            "Character store opened"
        );
        Ok(store)
    }

    /// Open an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`PersonagemError::Database`] on `SQLite` failures.
    pub fn open_in_memory(config: &PersonagemConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, PathBuf::from(":memory:"), config)
    }

    fn from_connection(
        conn: Connection,
        db_path: PathBuf,
        config: &PersonagemConfig,
    ) -> Result<Self> {
        conn.busy_timeout(Duration::from_millis(u64::from(config.persistence.busy_timeout_ms)))?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn,
            codec: config.inventory.format.codec(),
            rules: config
                .rules
                .enforce_on_save
                .then(|| CharacterRules::from(&config.rules)),
            db_path,
        })
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<CharacterRow> {
        Ok(CharacterRow {
            id: row.get("id")?,
            name: row.get("name")?,
            adventurer_name: row.get("adventurer_name")?,
            class: row.get("class")?,
            level: row.get("level")?,
            inventory: row.get("inventory")?,
            strength: row.get("strength")?,
            defense: row.get("defense")?,
        })
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Copy the database to `dest_path` using `SQLite`'s online-backup API.
    ///
    /// # Errors
    ///
    /// Returns [`PersonagemError::Database`] on `SQLite` failures.
    pub fn backup<P: AsRef<Path>>(&self, dest_path: P) -> Result<()> {
        let start = Instant::now();
        let mut dest = Connection::open(dest_path.as_ref())?;
        let backup = rusqlite::backup::Backup::new(&self.conn, &mut dest)?;
        backup.run_to_completion(256, Duration::from_millis(50), None)?;

        info!(
            dest = %dest_path.as_ref().display(),
            elapsed_ms = start.elapsed().as_millis(),
            "Database backup completed"
        );
        Ok(())
    }

    /// Run `PRAGMA integrity_check`. `Ok(false)` means corruption was found.
    ///
    /// # Errors
    ///
    /// Returns [`PersonagemError::Database`] if the check itself fails.
    pub fn integrity_check(&self) -> Result<bool> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        Ok(result == "ok")
    }

    /// Path to the database file (or `:memory:`).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl CharacterStore for SqliteStore {
    fn save(&self, character: &mut Character) -> Result<CharacterId> {
        let start = Instant::now();
        let row = CharacterRow::encode(character, self.codec.as_ref(), self.rules.as_ref())?;
        let now = Utc::now().to_rfc3339();

        let id = if let Some(id) = character.id() {
            let updated = self.conn.execute(
                "UPDATE characters SET
                    name = ?2, adventurer_name = ?3, class = ?4, level = ?5,
                    inventory = ?6, strength = ?7, defense = ?8, updated_at = ?9
                 WHERE id = ?1",
                params![
                    id.0,
                    row.name,
                    row.adventurer_name,
                    row.class,
                    row.level,
                    row.inventory,
                    row.strength,
                    row.defense,
                    now
                ],
            )?;
            if updated == 0 {
                return Err(PersonagemError::NotFound(id));
            }
            id
        } else {
            self.conn.execute(
                "INSERT INTO characters
                    (name, adventurer_name, class, level, inventory, strength, defense, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    row.name,
                    row.adventurer_name,
                    row.class,
                    row.level,
                    row.inventory,
                    row.strength,
                    row.defense,
                    now
                ],
            )?;
            let id = CharacterId(self.conn.last_insert_rowid());
            character.set_id(Some(id));
            id
        };

        debug!(
            character = %id,
            items = character.inventory().len(),
            bytes = row.inventory.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Saved character"
        );
        Ok(id)
    }

    fn find_by_id(&self, id: CharacterId) -> Result<Option<Character>> {
        let start = Instant::now();
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT {COLUMNS} FROM characters WHERE id = ?1"))?;
        let Some(row) = stmt.query_row(params![id.0], Self::read_row).optional()? else {
            return Ok(None);
        };

        let character = row.decode(self.codec.as_ref())?;
        debug!(
            character = %id,
            items = character.inventory().len(),
            elapsed_us = start.elapsed().as_micros(),
            "Loaded character"
        );
        Ok(Some(character))
    }

    fn delete(&self, id: CharacterId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM characters WHERE id = ?1", params![id.0])?;
        if deleted == 0 {
            return Err(PersonagemError::NotFound(id));
        }
        debug!(character = %id, "Deleted character");
        Ok(())
    }

    fn list(&self, offset: usize, limit: usize) -> Result<Vec<Character>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {COLUMNS} FROM characters ORDER BY id ASC LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt.query_map(
            params![
                i64::try_from(limit).unwrap_or(i64::MAX),
                i64::try_from(offset).unwrap_or(i64::MAX)
            ],
            Self::read_row,
        )?;

        let mut characters = Vec::new();
        for row in rows {
            characters.push(row?.decode(self.codec.as_ref())?);
        }
        Ok(characters)
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM characters", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
