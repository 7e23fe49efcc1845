//! Racial (lineage) ability bonuses.
//!
//! Lineage bonuses are applied once at character creation and never clamp to
//! the ability ceiling; the ceiling is only enforced when improvements are
//! spent.

use crate::abilities::{Ability, AbilityScores, InputDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Default pair used when a flexible choice is missing or invalid.
pub const DEFAULT_FLEXIBLE_PAIR: [Ability; 2] = [Ability::Dexterity, Ability::Constitution];

/// Shape of a lineage's ability bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineageModifier {
    /// +1 to every ability.
    Uniform,
    /// Fixed bonuses to listed abilities only.
    Fixed(&'static [(Ability, u8)]),
    /// Fixed bonuses plus +1 to two caller-chosen abilities.
    FixedWithFlexible(&'static [(Ability, u8)]),
}

impl LineageModifier {
    /// Abilities that already receive a fixed bonus.
    fn fixed_targets(&self) -> &'static [(Ability, u8)] {
        match self {
            LineageModifier::Uniform => &[],
            LineageModifier::Fixed(bonuses) | LineageModifier::FixedWithFlexible(bonuses) => {
                *bonuses
            }
        }
    }

    /// Largest bonus `ability` can receive from this modifier.
    pub fn max_bonus(&self, ability: Ability) -> u8 {
        let fixed = self
            .fixed_targets()
            .iter()
            .find(|(a, _)| *a == ability)
            .map(|(_, bonus)| *bonus);
        match (self, fixed) {
            (LineageModifier::Uniform, _) => 1,
            (_, Some(bonus)) => bonus,
            (LineageModifier::FixedWithFlexible(_), None) => 1,
            (LineageModifier::Fixed(_), None) => 0,
        }
    }

    /// Sum of every bonus this modifier grants.
    pub fn total_bonus(&self) -> u8 {
        let fixed: u8 = self.fixed_targets().iter().map(|(_, bonus)| bonus).sum();
        match self {
            LineageModifier::Uniform => 6,
            LineageModifier::Fixed(_) => fixed,
            LineageModifier::FixedWithFlexible(_) => fixed + 2,
        }
    }

    /// Resolve a caller's flexible choice into the pair actually applied.
    ///
    /// More than two entries are truncated to the first two. Anything that is
    /// then not exactly two distinct abilities outside the fixed targets falls
    /// back to [`DEFAULT_FLEXIBLE_PAIR`].
    pub fn resolve_flexible(&self, choice: Option<&[Ability]>) -> [Ability; 2] {
        let fixed = self.fixed_targets();
        let candidate = choice.map(|c| &c[..c.len().min(2)]);

        match candidate {
            Some(&[a, b])
                if a != b && !fixed.iter().any(|(f, _)| *f == a || *f == b) =>
            {
                [a, b]
            }
            _ => {
                debug!(?choice, "Flexible lineage choice invalid or missing, using default pair");
                DEFAULT_FLEXIBLE_PAIR
            }
        }
    }

    /// Apply this modifier to `base`, returning a new set.
    pub fn apply(&self, base: &AbilityScores, flexible_choice: Option<&[Ability]>) -> AbilityScores {
        let mut out = *base;
        match self {
            LineageModifier::Uniform => {
                for ability in Ability::all() {
                    out.add(ability, 1);
                }
            }
            LineageModifier::Fixed(bonuses) => {
                for &(ability, bonus) in *bonuses {
                    out.add(ability, bonus);
                }
            }
            LineageModifier::FixedWithFlexible(bonuses) => {
                for &(ability, bonus) in *bonuses {
                    out.add(ability, bonus);
                }
                for ability in self.resolve_flexible(flexible_choice) {
                    out.add(ability, 1);
                }
            }
        }
        out
    }
}

/// D&D 5e playable races (PHB, no subraces).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceType {
    Dragonborn,
    Dwarf,
    Elf,
    Gnome,
    HalfElf,
    HalfOrc,
    Halfling,
    Human,
    Tiefling,
}

impl RaceType {
    pub fn name(&self) -> &'static str {
        match self {
            RaceType::Dragonborn => "Dragonborn",
            RaceType::Dwarf => "Dwarf",
            RaceType::Elf => "Elf",
            RaceType::Gnome => "Gnome",
            RaceType::HalfElf => "Half-Elf",
            RaceType::HalfOrc => "Half-Orc",
            RaceType::Halfling => "Halfling",
            RaceType::Human => "Human",
            RaceType::Tiefling => "Tiefling",
        }
    }

    /// The lineage bonus table entry for this race.
    pub fn modifier(&self) -> LineageModifier {
        use Ability::*;
        match self {
            RaceType::Dragonborn => LineageModifier::Fixed(&[(Strength, 2), (Charisma, 1)]),
            RaceType::Dwarf => LineageModifier::Fixed(&[(Constitution, 2)]),
            RaceType::Elf => LineageModifier::Fixed(&[(Dexterity, 2)]),
            RaceType::Gnome => LineageModifier::Fixed(&[(Intelligence, 2)]),
            RaceType::HalfElf => LineageModifier::FixedWithFlexible(&[(Charisma, 2)]),
            RaceType::HalfOrc => LineageModifier::Fixed(&[(Strength, 2), (Constitution, 1)]),
            RaceType::Halfling => LineageModifier::Fixed(&[(Dexterity, 2)]),
            RaceType::Human => LineageModifier::Uniform,
            RaceType::Tiefling => LineageModifier::Fixed(&[(Charisma, 2), (Intelligence, 1)]),
        }
    }

    /// Apply this race's bonuses to `base`.
    pub fn apply(&self, base: &AbilityScores, flexible_choice: Option<&[Ability]>) -> AbilityScores {
        self.modifier().apply(base, flexible_choice)
    }

    /// Whether the race grants a caller-chosen +1/+1.
    pub fn has_flexible_bonus(&self) -> bool {
        matches!(self.modifier(), LineageModifier::FixedWithFlexible(_))
    }

    /// Get ability bonus description for display.
    pub fn ability_bonuses(&self) -> &'static str {
        match self {
            RaceType::Dragonborn => "+2 Strength, +1 Charisma",
            RaceType::Dwarf => "+2 Constitution",
            RaceType::Elf => "+2 Dexterity",
            RaceType::Gnome => "+2 Intelligence",
            RaceType::HalfElf => "+2 Charisma, +1 to two others",
            RaceType::HalfOrc => "+2 Strength, +1 Constitution",
            RaceType::Halfling => "+2 Dexterity",
            RaceType::Human => "+1 to all abilities",
            RaceType::Tiefling => "+2 Charisma, +1 Intelligence",
        }
    }

    /// Naming style hint handed to the text generator.
    pub fn name_style(&self) -> &'static str {
        match self {
            RaceType::Dragonborn => "powerful, draconic names, often harsh and guttural",
            RaceType::Dwarf => "gritty, earthy Dwarven names that sound sturdy and traditional",
            RaceType::Elf => "elegant, melodic Elvish names with lyrical qualities",
            RaceType::Gnome => "quirky, playful names with a touch of cleverness or whimsy",
            RaceType::HalfElf => "a blend of Elvish elegance and Human familiarity",
            RaceType::HalfOrc => {
                "rough, strong-sounding names with Orcish grit and Human influence"
            }
            RaceType::Halfling => "cheerful, simple names with a rural, friendly tone",
            RaceType::Human => "classic medieval fantasy names with cultural variety",
            RaceType::Tiefling => "mysterious, dark names, often with infernal or celestial flair",
        }
    }

    pub fn all() -> &'static [RaceType] {
        &[
            RaceType::Dragonborn,
            RaceType::Dwarf,
            RaceType::Elf,
            RaceType::Gnome,
            RaceType::HalfElf,
            RaceType::HalfOrc,
            RaceType::Halfling,
            RaceType::Human,
            RaceType::Tiefling,
        ]
    }
}

impl fmt::Display for RaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for RaceType {
    type Err = InputDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::identity::parse_named(s, RaceType::all(), RaceType::name, "race")
    }
}
