//! The six ability scores and the containers that hold them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// Hard ceiling for any ability score once improvements are applied.
pub const ABILITY_CEILING: u8 = 20;

/// Inclusive range accepted for manually entered or slider scores.
pub const MANUAL_RANGE: RangeInclusive<u8> = 1..=20;

/// A raw input fell outside the range its mode allows.
///
/// This is the only error that aborts a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputDomainError {
    #[error("{ability} score {value} is out of range ({min}-{max}) for {mode}")]
    ScoreOutOfRange {
        ability: Ability,
        value: u8,
        min: u8,
        max: u8,
        mode: &'static str,
    },

    #[error("Level {0} is out of range (1-20)")]
    LevelOutOfRange(u8),

    #[error("Unknown {kind}: {value}")]
    UnknownName { kind: &'static str, value: String },
}

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    /// All abilities in canonical order.
    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Ability {
    type Err = InputDomainError;

    /// Accepts the full name or the three-letter abbreviation, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Ability::all()
            .into_iter()
            .find(|a| {
                a.name().eq_ignore_ascii_case(needle) || a.abbreviation().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| InputDomainError::UnknownName {
                kind: "ability",
                value: s.to_string(),
            })
    }
}

/// Ability scores container.
///
/// One field per ability, so a finalized set can never miss or duplicate a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    /// Every ability set to the same value.
    pub fn uniform(value: u8) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    /// Build from values listed in canonical ability order.
    pub fn from_array(values: [u8; 6]) -> Self {
        let [str, dex, con, int, wis, cha] = values;
        Self::new(str, dex, con, int, wis, cha)
    }

    pub fn to_array(&self) -> [u8; 6] {
        Ability::all().map(|a| self.get(a))
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Add `bonus` to one ability. Saturates rather than wrapping.
    pub fn add(&mut self, ability: Ability, bonus: u8) {
        let current = self.get(ability);
        self.set(ability, current.saturating_add(bonus));
    }

    /// Iterate `(ability, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, u8)> + '_ {
        Ability::all().into_iter().map(move |a| (a, self.get(a)))
    }

    /// Reject the set if any score falls outside `range`.
    pub fn check_range(
        &self,
        range: RangeInclusive<u8>,
        mode: &'static str,
    ) -> Result<(), InputDomainError> {
        for (ability, value) in self.iter() {
            if !range.contains(&value) {
                return Err(InputDomainError::ScoreOutOfRange {
                    ability,
                    value,
                    min: *range.start(),
                    max: *range.end(),
                    mode,
                });
            }
        }
        Ok(())
    }

    /// Compact one-line form: `STR: 15 | DEX: 14 | ...`.
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(a, v)| format!("{}: {v}", a.abbreviation()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(10)
    }
}
