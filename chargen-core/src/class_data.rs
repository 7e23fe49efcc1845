//! Per-class data used by the ability engines.
//!
//! Contains the point-buy priority pair, any class-specific improvement
//! schedule, and a short improvement strategy tip for all 14 classes.

use crate::abilities::Ability;
use crate::identity::CharacterClass;

/// Class-specific data for ability score generation and progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassData {
    /// The two abilities auto-optimize raises first, in priority order.
    pub priority_abilities: Option<[Ability; 2]>,
    /// Levels granting an ability score improvement, if the class deviates
    /// from the default schedule.
    pub improvement_levels: Option<&'static [u8]>,
    /// Advice shown when an improvement is available.
    pub improvement_tip: &'static str,
}

impl CharacterClass {
    /// Get class data for ability score generation.
    pub fn data(&self) -> ClassData {
        use Ability::*;
        match self {
            CharacterClass::Barbarian => ClassData {
                priority_abilities: Some([Strength, Constitution]),
                improvement_levels: None,
                improvement_tip:
                    "Prioritize Strength (damage) and Constitution (survivability).",
            },
            CharacterClass::Bard => ClassData {
                priority_abilities: Some([Charisma, Dexterity]),
                improvement_levels: None,
                improvement_tip: "Focus on Charisma (spellcasting) and Dexterity (AC/initiative).",
            },
            CharacterClass::Cleric => ClassData {
                priority_abilities: Some([Wisdom, Constitution]),
                improvement_levels: None,
                improvement_tip:
                    "Boost Wisdom (spellcasting) and Constitution (concentration).",
            },
            CharacterClass::Druid => ClassData {
                priority_abilities: Some([Wisdom, Intelligence]),
                improvement_levels: None,
                improvement_tip: "Improve Wisdom (spells) and Constitution (Wild Shape HP).",
            },
            CharacterClass::Fighter => ClassData {
                priority_abilities: Some([Strength, Dexterity]),
                improvement_levels: Some(&[4, 6, 8, 12, 14, 16, 19]),
                improvement_tip:
                    "Enhance Strength/Dexterity (attacks) and Constitution (survivability).",
            },
            CharacterClass::Monk => ClassData {
                priority_abilities: Some([Dexterity, Wisdom]),
                improvement_levels: None,
                improvement_tip: "Focus on Dexterity (AC/attacks) and Wisdom (AC/saves).",
            },
            CharacterClass::Paladin => ClassData {
                priority_abilities: Some([Charisma, Strength]),
                improvement_levels: None,
                improvement_tip: "Boost Strength (attacks) and Charisma (spells/aura).",
            },
            CharacterClass::Ranger => ClassData {
                priority_abilities: Some([Dexterity, Wisdom]),
                improvement_levels: None,
                improvement_tip: "Prioritize Dexterity (attacks) and Wisdom (spells).",
            },
            CharacterClass::Rogue => ClassData {
                priority_abilities: Some([Dexterity, Intelligence]),
                improvement_levels: Some(&[4, 8, 10, 12, 16, 19]),
                improvement_tip: "Max Dexterity first (attacks/AC), then Constitution.",
            },
            CharacterClass::Sorcerer => ClassData {
                priority_abilities: Some([Charisma, Constitution]),
                improvement_levels: None,
                improvement_tip: "Focus on Charisma (spells) and Constitution (concentration).",
            },
            CharacterClass::Warlock => ClassData {
                priority_abilities: Some([Charisma, Wisdom]),
                improvement_levels: None,
                improvement_tip: "Boost Charisma (spells) and Constitution (survivability).",
            },
            CharacterClass::Wizard => ClassData {
                priority_abilities: Some([Intelligence, Dexterity]),
                improvement_levels: None,
                improvement_tip:
                    "Prioritize Intelligence (spells) and Constitution (concentration).",
            },
            CharacterClass::Artificer => ClassData {
                priority_abilities: Some([Intelligence, Constitution]),
                improvement_levels: None,
                improvement_tip:
                    "Focus on Intelligence (spells) and Constitution (survivability).",
            },
            CharacterClass::BloodHunter => ClassData {
                priority_abilities: Some([Strength, Intelligence]),
                improvement_levels: None,
                improvement_tip:
                    "Balance Strength/Dexterity and Constitution (for blood curses).",
            },
        }
    }

    /// The two abilities this class raises first under point buy.
    pub fn priority_abilities(&self) -> Option<[Ability; 2]> {
        self.data().priority_abilities
    }
}
