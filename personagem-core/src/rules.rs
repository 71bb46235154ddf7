//! Opt-in character rules.
//!
//! The record accepts any value; these checks are for callers that want the
//! classic point-buy limits (level at least 1, each combat attribute within
//! `0..=10`, strength + defense at most 10). Stores only run them when
//! `rules.enforce_on_save` is set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RulesConfig;
use crate::error::{PersonagemError, Result};
use crate::record::Character;

/// One broken rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    /// `name` is empty.
    #[error("name must not be empty")]
    EmptyName,

    /// `level` is below the configured minimum.
    #[error("level {level} is below the minimum of {min}")]
    LevelBelowMinimum {
        /// Offending level.
        level: i32,
        /// Configured minimum.
        min: i32,
    },

    /// A combat attribute is outside `0..=max`.
    #[error("{attribute} {value} is outside 0..={max}")]
    AttributeOutOfRange {
        /// `"strength"` or `"defense"`.
        attribute: &'static str,
        /// Offending value.
        value: i32,
        /// Configured maximum.
        max: i32,
    },

    /// Strength and defense together exceed the point budget.
    #[error("strength + defense = {total} exceeds {max} points")]
    TooManyPoints {
        /// Strength plus defense.
        total: i64,
        /// Configured budget.
        max: i32,
    },
}

/// Limits checked by [`CharacterRules::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterRules {
    /// Lowest accepted level.
    pub min_level: i32,
    /// Highest accepted value for each combat attribute.
    pub max_attribute: i32,
    /// Highest accepted strength + defense.
    pub max_points: i32,
}

impl Default for CharacterRules {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_attribute: 10,
            max_points: 10,
        }
    }
}

impl From<&RulesConfig> for CharacterRules {
    fn from(config: &RulesConfig) -> Self {
        Self {
            min_level: config.min_level,
            max_attribute: config.max_attribute,
            max_points: config.max_points,
        }
    }
}

impl CharacterRules {
    /// Every rule `character` breaks, in a stable order.
    #[must_use]
    pub fn violations(&self, character: &Character) -> Vec<RuleViolation> {
        let mut out = Vec::new();

        if character.name().is_empty() {
            out.push(RuleViolation::EmptyName);
        }
        if character.level() < self.min_level {
            out.push(RuleViolation::LevelBelowMinimum {
                level: character.level(),
                min: self.min_level,
            });
        }
        for (attribute, value) in [
            ("strength", character.strength()),
            ("defense", character.defense()),
        ] {
            if !(0..=self.max_attribute).contains(&value) {
                out.push(RuleViolation::AttributeOutOfRange {
                    attribute,
                    value,
                    max: self.max_attribute,
                });
            }
        }
        let total = i64::from(character.strength()) + i64::from(character.defense());
        if total > i64::from(self.max_points) {
            out.push(RuleViolation::TooManyPoints {
                total,
                max: self.max_points,
            });
        }

        out
    }

    /// Check `character` against every rule.
    ///
    /// # Errors
    /// Returns [`PersonagemError::RuleViolation`] listing all broken rules.
    pub fn check(&self, character: &Character) -> Result<()> {
        let violations = self.violations(character);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(PersonagemError::RuleViolation(violations))
        }
    }
}

// ---------------------------------------------------------------------------
// Standard classes
// ---------------------------------------------------------------------------

/// The standard archetypes. The record's class stays free text; this only
/// recognises the usual labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownClass {
    /// Warrior.
    Guerreiro,
    /// Mage.
    Mago,
    /// Archer.
    Arqueiro,
    /// Rogue.
    Ladino,
    /// Bard.
    Bardo,
}

impl KnownClass {
    /// All standard archetypes.
    pub const ALL: [Self; 5] = [
        Self::Guerreiro,
        Self::Mago,
        Self::Arqueiro,
        Self::Ladino,
        Self::Bardo,
    ];

    /// Canonical label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Guerreiro => "Guerreiro",
            Self::Mago => "Mago",
            Self::Arqueiro => "Arqueiro",
            Self::Ladino => "Ladino",
            Self::Bardo => "Bardo",
        }
    }
}

impl fmt::Display for KnownClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The label is not one of [`KnownClass::ALL`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown class label: {0:?}")]
pub struct UnknownClass(pub String);

impl FromStr for KnownClass {
    type Err = UnknownClass;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownClass(s.to_string()))
    }
}
