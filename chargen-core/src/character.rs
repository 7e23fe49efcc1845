//! The character record produced by a generation request.

use crate::abilities::{Ability, AbilityScores, InputDomainError, ABILITY_CEILING, MANUAL_RANGE};
use crate::identity::{Alignment, Background, CharacterClass, Gender, Pronouns};
use crate::improvement::{compute_cap, EntitlementStatus, ImprovementSchedule};
use crate::lineage::RaceType;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Highest character level.
pub const MAX_LEVEL: u8 = 20;

/// Unique identifier for a generated character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the base scores were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatMethod {
    Rolled,
    Manual,
    Slider,
    PointBuy,
}

impl StatMethod {
    pub fn name(&self) -> &'static str {
        match self {
            StatMethod::Rolled => "Rolled (4d6 drop lowest)",
            StatMethod::Manual => "Manual entry",
            StatMethod::Slider => "Sliders",
            StatMethod::PointBuy => "Point buy",
        }
    }
}

/// Failure to change a record's level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelChangeError {
    #[error(transparent)]
    OutOfRange(#[from] InputDomainError),

    #[error("Level {level} grants {cap} improvement(s) but {spent} are already spent")]
    BelowSpent { level: u8, cap: u8, spent: u8 },
}

/// A stored record that no generation or allocation could have produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error(transparent)]
    InputDomain(#[from] InputDomainError),

    #[error("{spent} improvement(s) spent but level {level} grants only {cap}")]
    SpentExceedsCap { level: u8, cap: u8, spent: u8 },

    #[error("Final {ability} score {value} does not follow from base {base}")]
    FinalScoreMismatch { ability: Ability, value: u8, base: u8 },

    #[error("Final scores gain {found} point(s) over base, expected {expected}")]
    TotalGainMismatch { expected: u16, found: i32 },
}

/// Check a level lies in 1..=20.
pub fn check_level(level: u8) -> Result<u8, InputDomainError> {
    if (1..=MAX_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(InputDomainError::LevelOutOfRange(level))
    }
}

/// A generated character.
///
/// `final_stats` and `improvements_spent` change only through
/// [`crate::improvement::submit_allocation`]; the record is replaced wholesale
/// when a new character is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    pub race: RaceType,
    pub class: CharacterClass,
    pub background: Background,
    pub alignment: Alignment,
    pub gender: Gender,
    pub(crate) level: u8,
    pub stat_method: StatMethod,
    /// Scores before lineage bonuses.
    pub base_stats: AbilityScores,
    /// Scores after lineage bonuses and every applied improvement.
    pub(crate) final_stats: AbilityScores,
    /// Whether lineage bonuses were applied at creation.
    pub lineage_applied: bool,
    pub(crate) improvements_spent: u8,
    pub backstory: String,
}

impl CharacterRecord {
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn final_stats(&self) -> &AbilityScores {
        &self.final_stats
    }

    pub fn improvements_spent(&self) -> u8 {
        self.improvements_spent
    }

    pub fn pronouns(&self) -> Pronouns {
        self.gender.pronouns()
    }

    pub fn schedule(&self) -> ImprovementSchedule {
        ImprovementSchedule::for_class(self.class)
    }

    /// Current cap, spend and state of the improvement tracker.
    pub fn entitlement_status(&self) -> EntitlementStatus {
        EntitlementStatus::new(compute_cap(self.class, self.level), self.improvements_spent)
    }

    /// Move the character to a new level and recompute the cap.
    ///
    /// Spent improvements are permanent, so a level whose cap is below the
    /// spend is rejected.
    pub fn set_level(&mut self, level: u8) -> Result<EntitlementStatus, LevelChangeError> {
        let level = check_level(level)?;
        let cap = compute_cap(self.class, level);
        if cap < self.improvements_spent {
            return Err(LevelChangeError::BelowSpent {
                level,
                cap,
                spent: self.improvements_spent,
            });
        }
        self.level = level;
        let status = self.entitlement_status();
        info!(level, cap = status.cap, "Character level changed");
        Ok(status)
    }

    /// Check a record read from outside against the rules that govern how
    /// records are built.
    ///
    /// Each improvement adds exactly two points and never lifts a score past
    /// [`ABILITY_CEILING`]; lineage adds its fixed total on top of base.
    pub fn check_consistency(&self) -> Result<(), RecordError> {
        let level = check_level(self.level)?;
        let cap = compute_cap(self.class, level);
        if self.improvements_spent > cap {
            return Err(RecordError::SpentExceedsCap {
                level,
                cap,
                spent: self.improvements_spent,
            });
        }
        self.base_stats.check_range(MANUAL_RANGE, "base scores")?;

        let modifier = self.race.modifier();
        let spent = u16::from(self.improvements_spent);
        for (ability, base) in self.base_stats.iter() {
            let value = self.final_stats.get(ability);
            let lineage = if self.lineage_applied {
                modifier.max_bonus(ability)
            } else {
                0
            };
            let after_lineage = u16::from(base) + u16::from(lineage);
            let improved = (after_lineage + 2 * spent).min(u16::from(ABILITY_CEILING));
            let upper = after_lineage.max(improved);
            if value < base || u16::from(value) > upper {
                return Err(RecordError::FinalScoreMismatch {
                    ability,
                    value,
                    base,
                });
            }
        }

        let lineage_total = if self.lineage_applied {
            u16::from(modifier.total_bonus())
        } else {
            0
        };
        let expected = lineage_total + 2 * spent;
        let found: i32 = self
            .final_stats
            .iter()
            .zip(self.base_stats.iter())
            .map(|((_, after), (_, before))| i32::from(after) - i32::from(before))
            .sum();
        if found != i32::from(expected) {
            return Err(RecordError::TotalGainMismatch { expected, found });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::improvement::EntitlementState;
    use crate::testing::sample_record;

    #[test]
    fn test_check_level() {
        assert_eq!(check_level(1), Ok(1));
        assert_eq!(check_level(20), Ok(20));
        assert_eq!(check_level(0), Err(InputDomainError::LevelOutOfRange(0)));
        assert_eq!(check_level(21), Err(InputDomainError::LevelOutOfRange(21)));
    }

    #[test]
    fn test_set_level_recomputes_cap() {
        let mut record = sample_record(CharacterClass::Fighter, 1);
        assert_eq!(record.entitlement_status().state, EntitlementState::Locked);

        let status = record.set_level(12).unwrap();
        assert_eq!(status.cap, 4);
        assert_eq!(status.state, EntitlementState::Available);
        assert_eq!(record.level(), 12);
    }

    #[test]
    fn test_set_level_rejects_below_spent() {
        let mut record = sample_record(CharacterClass::Wizard, 8);
        record.improvements_spent = 2;

        let err = record.set_level(4).unwrap_err();
        assert_eq!(
            err,
            LevelChangeError::BelowSpent {
                level: 4,
                cap: 1,
                spent: 2
            }
        );
        assert_eq!(record.level(), 8);
    }

    #[test]
    fn test_generated_records_are_consistent() {
        assert_eq!(sample_record(CharacterClass::Rogue, 4).check_consistency(), Ok(()));

        let mut record = sample_record(CharacterClass::Fighter, 6);
        record.final_stats.add(Ability::Strength, 2);
        record.final_stats.add(Ability::Wisdom, 1);
        record.final_stats.add(Ability::Charisma, 1);
        record.improvements_spent = 2;
        assert_eq!(record.check_consistency(), Ok(()));
    }

    #[test]
    fn test_consistency_rejects_spent_over_cap() {
        let mut record = sample_record(CharacterClass::Wizard, 4);
        record.improvements_spent = 2;
        record.final_stats.add(Ability::Intelligence, 4);
        assert_eq!(
            record.check_consistency(),
            Err(RecordError::SpentExceedsCap {
                level: 4,
                cap: 1,
                spent: 2
            })
        );
    }

    #[test]
    fn test_consistency_rejects_bad_level_and_base() {
        let mut record = sample_record(CharacterClass::Wizard, 4);
        record.level = 0;
        assert_eq!(
            record.check_consistency(),
            Err(RecordError::InputDomain(InputDomainError::LevelOutOfRange(0)))
        );

        let mut record = sample_record(CharacterClass::Wizard, 4);
        record.base_stats.strength = 0;
        record.final_stats.strength = 0;
        assert!(matches!(
            record.check_consistency(),
            Err(RecordError::InputDomain(InputDomainError::ScoreOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_consistency_rejects_inflated_final_scores() {
        let mut record = sample_record(CharacterClass::Wizard, 4);
        record.final_stats.strength = 130;
        assert_eq!(
            record.check_consistency(),
            Err(RecordError::FinalScoreMismatch {
                ability: Ability::Strength,
                value: 130,
                base: 15
            })
        );

        // Each score is reachable alone, but one improvement added four points.
        let mut record = sample_record(CharacterClass::Wizard, 4);
        record.improvements_spent = 1;
        record.final_stats.add(Ability::Strength, 2);
        record.final_stats.add(Ability::Wisdom, 2);
        assert_eq!(
            record.check_consistency(),
            Err(RecordError::TotalGainMismatch {
                expected: 4,
                found: 6
            })
        );
    }

    #[test]
    fn test_consistency_allows_lineage_past_ceiling() {
        let mut record = sample_record(CharacterClass::Fighter, 1);
        record.race = RaceType::HalfOrc;
        record.base_stats = AbilityScores::uniform(20);
        record.final_stats = RaceType::HalfOrc.apply(&record.base_stats, None);
        assert_eq!(record.final_stats.strength, 22);
        assert_eq!(record.check_consistency(), Ok(()));
    }

    #[test]
    fn test_set_level_rejects_out_of_range() {
        let mut record = sample_record(CharacterClass::Wizard, 8);
        assert!(matches!(
            record.set_level(25),
            Err(LevelChangeError::OutOfRange(InputDomainError::LevelOutOfRange(25)))
        ));
    }
}
