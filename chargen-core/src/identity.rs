//! Identity selections: class, background, alignment and gender.
//!
//! Every selection is a closed enum parsed once at the boundary. Nothing
//! downstream compares display labels.

use crate::abilities::InputDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase with spaces, hyphens and underscores removed.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find the entry of `all` whose display name matches `s`, ignoring case
/// and separators.
pub(crate) fn parse_named<T: Copy>(
    s: &str,
    all: &[T],
    name: fn(&T) -> &'static str,
    kind: &'static str,
) -> Result<T, InputDomainError> {
    let needle = normalize(s);
    all.iter()
        .find(|item| normalize(name(item)) == needle)
        .copied()
        .ok_or_else(|| InputDomainError::UnknownName {
            kind,
            value: s.to_string(),
        })
}

// ============================================================================
// Classes
// ============================================================================

/// D&D character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
    Artificer,
    BloodHunter,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Druid => "Druid",
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Monk => "Monk",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Sorcerer => "Sorcerer",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Wizard => "Wizard",
            CharacterClass::Artificer => "Artificer",
            CharacterClass::BloodHunter => "Blood Hunter",
        }
    }

    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Barbarian,
            CharacterClass::Bard,
            CharacterClass::Cleric,
            CharacterClass::Druid,
            CharacterClass::Fighter,
            CharacterClass::Monk,
            CharacterClass::Paladin,
            CharacterClass::Ranger,
            CharacterClass::Rogue,
            CharacterClass::Sorcerer,
            CharacterClass::Warlock,
            CharacterClass::Wizard,
            CharacterClass::Artificer,
            CharacterClass::BloodHunter,
        ]
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = InputDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, CharacterClass::all(), CharacterClass::name, "class")
    }
}

// ============================================================================
// Backgrounds
// ============================================================================

/// D&D 5e character backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Background {
    Acolyte,
    Charlatan,
    Criminal,
    Entertainer,
    FolkHero,
    GuildArtisan,
    Hermit,
    Noble,
    Outlander,
    Sage,
    Sailor,
    Soldier,
    Urchin,
}

impl Background {
    pub fn name(&self) -> &'static str {
        match self {
            Background::Acolyte => "Acolyte",
            Background::Charlatan => "Charlatan",
            Background::Criminal => "Criminal",
            Background::Entertainer => "Entertainer",
            Background::FolkHero => "Folk Hero",
            Background::GuildArtisan => "Guild Artisan",
            Background::Hermit => "Hermit",
            Background::Noble => "Noble",
            Background::Outlander => "Outlander",
            Background::Sage => "Sage",
            Background::Sailor => "Sailor",
            Background::Soldier => "Soldier",
            Background::Urchin => "Urchin",
        }
    }

    pub fn all() -> &'static [Background] {
        &[
            Background::Acolyte,
            Background::Charlatan,
            Background::Criminal,
            Background::Entertainer,
            Background::FolkHero,
            Background::GuildArtisan,
            Background::Hermit,
            Background::Noble,
            Background::Outlander,
            Background::Sage,
            Background::Sailor,
            Background::Soldier,
            Background::Urchin,
        ]
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Background {
    type Err = InputDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, Background::all(), Background::name, "background")
    }
}

// ============================================================================
// Alignment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    LawfulGood,
    NeutralGood,
    ChaoticGood,
    LawfulNeutral,
    TrueNeutral,
    ChaoticNeutral,
    LawfulEvil,
    NeutralEvil,
    ChaoticEvil,
}

impl Alignment {
    pub fn name(&self) -> &'static str {
        match self {
            Alignment::LawfulGood => "Lawful Good",
            Alignment::NeutralGood => "Neutral Good",
            Alignment::ChaoticGood => "Chaotic Good",
            Alignment::LawfulNeutral => "Lawful Neutral",
            Alignment::TrueNeutral => "True Neutral",
            Alignment::ChaoticNeutral => "Chaotic Neutral",
            Alignment::LawfulEvil => "Lawful Evil",
            Alignment::NeutralEvil => "Neutral Evil",
            Alignment::ChaoticEvil => "Chaotic Evil",
        }
    }

    pub fn all() -> &'static [Alignment] {
        &[
            Alignment::LawfulGood,
            Alignment::NeutralGood,
            Alignment::ChaoticGood,
            Alignment::LawfulNeutral,
            Alignment::TrueNeutral,
            Alignment::ChaoticNeutral,
            Alignment::LawfulEvil,
            Alignment::NeutralEvil,
            Alignment::ChaoticEvil,
        ]
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Alignment {
    type Err = InputDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, Alignment::all(), Alignment::name, "alignment")
    }
}

// ============================================================================
// Gender and pronouns
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    NonBinary,
}

/// Pronoun set used by backstory text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pronouns {
    /// Capitalized, sentence-initial form.
    pub subject: &'static str,
    pub object: &'static str,
    pub possessive: &'static str,
}

impl Gender {
    pub fn name(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::NonBinary => "Non-binary",
        }
    }

    pub fn pronouns(&self) -> Pronouns {
        match self {
            Gender::Male => Pronouns {
                subject: "He",
                object: "him",
                possessive: "his",
            },
            Gender::Female => Pronouns {
                subject: "She",
                object: "her",
                possessive: "her",
            },
            Gender::NonBinary => Pronouns {
                subject: "They",
                object: "them",
                possessive: "their",
            },
        }
    }

    pub fn all() -> &'static [Gender] {
        &[Gender::Male, Gender::Female, Gender::NonBinary]
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Gender {
    type Err = InputDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(s, Gender::all(), Gender::name, "gender")
    }
}

impl fmt::Display for Pronouns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.subject, self.object, self.possessive)
    }
}
