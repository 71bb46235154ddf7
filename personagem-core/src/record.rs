//! The character record.
//!
//! [`Character`] is a plain value: every attribute has a getter and a setter,
//! and setters replace the value without checking it. Rules, if any, are
//! applied by callers through [`crate::rules`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, InventoryCodec};
use crate::rules::KnownClass;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Store-assigned record key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub i64);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Ordered list of item tokens a character carries.
///
/// Duplicates are allowed and order is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(Vec<String>);

impl Inventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an item at the end.
    pub fn push(&mut self, item: impl Into<String>) {
        self.0.push(item.into());
    }

    /// Remove the first occurrence of `item`. Returns `true` if one was removed.
    pub fn remove(&mut self, item: &str) -> bool {
        match self.0.iter().position(|i| i == item) {
            Some(pos) => {
                self.0.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Whether `item` is carried at least once.
    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.0.iter().any(|i| i == item)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the inventory holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Items in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterate over items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Encode with `codec`.
    ///
    /// # Errors
    /// Propagates the codec's [`CodecError`].
    pub fn encode(&self, codec: &dyn InventoryCodec) -> Result<String, CodecError> {
        codec.encode(&self.0)
    }

    /// Decode `text` with `codec`.
    ///
    /// # Errors
    /// Propagates the codec's [`CodecError`].
    pub fn decode(codec: &dyn InventoryCodec, text: &str) -> Result<Self, CodecError> {
        codec.decode(text).map(Self)
    }
}

impl From<Vec<String>> for Inventory {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}

impl From<Inventory> for Vec<String> {
    fn from(inventory: Inventory) -> Self {
        inventory.0
    }
}

impl<S: Into<String>> FromIterator<S> for Inventory {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for Inventory {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// One character's data unit, keyed by [`CharacterId`] once stored.
///
/// A fresh record has no id, empty text fields, zero numbers and an empty
/// inventory. The id is normally filled in by
/// [`CharacterStore::save`](crate::store::CharacterStore::save); setting it by
/// hand tells the store the record already exists, so the next save replaces
/// that row instead of inserting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    id: Option<CharacterId>,
    name: String,
    adventurer_name: String,
    class: String,
    level: i32,
    inventory: Inventory,
    strength: i32,
    defense: i32,
}

impl Character {
    /// Create an empty, unsaved record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store-assigned id, `None` until first saved.
    #[must_use]
    pub fn id(&self) -> Option<CharacterId> {
        self.id
    }

    /// Replace the id.
    pub fn set_id(&mut self, id: Option<CharacterId>) {
        self.id = id;
    }

    /// Player-facing name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// In-game alias.
    #[must_use]
    pub fn adventurer_name(&self) -> &str {
        &self.adventurer_name
    }

    /// Replace the in-game alias.
    pub fn set_adventurer_name(&mut self, adventurer_name: impl Into<String>) {
        self.adventurer_name = adventurer_name.into();
    }

    /// Free-text archetype label.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Replace the archetype label.
    pub fn set_class(&mut self, class: impl Into<String>) {
        self.class = class.into();
    }

    /// The class label parsed as one of the standard archetypes, if it is one.
    #[must_use]
    pub fn known_class(&self) -> Option<KnownClass> {
        self.class.parse().ok()
    }

    /// Progression tier.
    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Replace the level.
    pub fn set_level(&mut self, level: i32) {
        self.level = level;
    }

    /// Carried items.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Carried items, mutably.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Replace the inventory.
    pub fn set_inventory(&mut self, inventory: impl Into<Inventory>) {
        self.inventory = inventory.into();
    }

    /// The inventory as it is written to its storage column.
    ///
    /// # Errors
    /// Returns [`CodecError`] if `codec` cannot represent an item.
    pub fn encoded_inventory(&self, codec: &dyn InventoryCodec) -> Result<String, CodecError> {
        self.inventory.encode(codec)
    }

    /// Replace the inventory from its storage-column text.
    ///
    /// On error the current inventory is left untouched.
    ///
    /// # Errors
    /// Returns [`CodecError::Malformed`] if `text` is not valid for `codec`.
    pub fn set_encoded_inventory(
        &mut self,
        codec: &dyn InventoryCodec,
        text: &str,
    ) -> Result<(), CodecError> {
        self.inventory = Inventory::decode(codec, text)?;
        Ok(())
    }

    /// Combat attribute.
    #[must_use]
    pub fn strength(&self) -> i32 {
        self.strength
    }

    /// Replace strength.
    pub fn set_strength(&mut self, strength: i32) {
        self.strength = strength;
    }

    /// Combat attribute.
    #[must_use]
    pub fn defense(&self) -> i32 {
        self.defense
    }

    /// Replace defense.
    pub fn set_defense(&mut self, defense: i32) {
        self.defense = defense;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DelimitedCodec, JsonCodec};

    fn sample() -> Character {
        let mut c = Character::new();
        c.set_name("Ana");
        c.set_adventurer_name("Lâmina Rubra");
        c.set_class("Guerreiro");
        c.set_level(3);
        c.set_strength(6);
        c.set_defense(4);
        c.set_inventory(vec!["Sword".to_string(), "Shield".to_string()]);
        c
    }

    #[test]
    fn new_record_is_zeroed() {
        let c = Character::new();
        assert_eq!(c.id(), None);
        assert_eq!(c.name(), "");
        assert_eq!(c.adventurer_name(), "");
        assert_eq!(c.class(), "");
        assert_eq!(c.level(), 0);
        assert_eq!(c.strength(), 0);
        assert_eq!(c.defense(), 0);
        assert!(c.inventory().is_empty());
    }

    #[test]
    fn setting_level_leaves_other_fields_alone() {
        let mut c = sample();
        c.set_id(Some(CharacterId(9)));
        let before = c.clone();

        c.set_level(42);

        assert_eq!(c.level(), 42);
        assert_eq!(c.strength(), before.strength());
        assert_eq!(c.defense(), before.defense());
        assert_eq!(c.inventory(), before.inventory());
        assert_eq!(c.id(), before.id());
        assert_eq!(c.name(), before.name());
    }

    #[test]
    fn setters_do_not_validate() {
        let mut c = Character::new();
        c.set_level(-5);
        c.set_strength(i32::MIN);
        c.set_defense(1_000);
        assert_eq!(c.level(), -5);
        assert_eq!(c.strength(), i32::MIN);
        assert_eq!(c.defense(), 1_000);
    }

    #[test]
    fn encoded_inventory_uses_given_codec() {
        let c = sample();
        assert_eq!(c.encoded_inventory(&DelimitedCodec).expect("encode"), "Sword,Shield");
        assert_eq!(
            c.encoded_inventory(&JsonCodec).expect("encode"),
            r#"["Sword","Shield"]"#
        );
    }

    #[test]
    fn bad_encoded_inventory_keeps_previous_items() {
        let mut c = sample();
        let err = c.set_encoded_inventory(&DelimitedCodec, "Sword,,Shield");
        assert!(err.is_err());
        assert_eq!(c.inventory().len(), 2);
    }

    #[test]
    fn inventory_remove_takes_first_match() {
        let mut inv: Inventory = ["Potion", "Sword", "Potion"].into_iter().collect();
        assert!(inv.remove("Potion"));
        assert_eq!(inv.as_slice(), ["Sword".to_string(), "Potion".to_string()]);
        assert!(!inv.remove("Bow"));
        assert!(inv.contains("Potion"));
    }

    #[test]
    fn known_class_is_optional() {
        let mut c = sample();
        assert_eq!(c.known_class(), Some(KnownClass::Guerreiro));
        c.set_class("Necromancer");
        assert_eq!(c.known_class(), None);
        assert_eq!(c.class(), "Necromancer");
    }
}
