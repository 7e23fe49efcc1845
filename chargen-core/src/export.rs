//! Character sheet export.
//!
//! A plain-text sheet for reading and a versioned JSON dump that round-trips
//! the full record.

use crate::abilities::AbilityScores;
use crate::character::{CharacterRecord, RecordError};
use crate::improvement::EntitlementStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

/// Errors from export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Invalid character record: {0}")]
    Invalid(#[from] RecordError),
}

/// Current export format version.
const EXPORT_VERSION: u32 = 1;

const PHB_NOTE: &str =
    "Note: This character was created using only options from the official Player's Handbook (PHB).";

/// A character as written to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedCharacter {
    /// Format version for compatibility checking.
    pub version: u32,
    pub character: CharacterRecord,
    /// Derived from `character`; included for readers of the raw file.
    pub entitlement: EntitlementStatus,
}

impl ExportedCharacter {
    pub fn new(record: &CharacterRecord) -> Self {
        Self {
            version: EXPORT_VERSION,
            character: record.clone(),
            entitlement: record.entitlement_status(),
        }
    }
}

/// Serialize `record` as pretty JSON.
pub fn to_json(record: &CharacterRecord) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&ExportedCharacter::new(record))?)
}

/// Parse a JSON export back into a record.
///
/// The record must be one that creation and allocation could have produced.
pub fn from_json(content: &str) -> Result<CharacterRecord, ExportError> {
    let exported: ExportedCharacter = serde_json::from_str(content)?;
    if exported.version != EXPORT_VERSION {
        return Err(ExportError::VersionMismatch {
            expected: EXPORT_VERSION,
            found: exported.version,
        });
    }
    exported.character.check_consistency()?;
    Ok(exported.character)
}

/// The plain-text character sheet for a record.
pub struct Sheet<'a>(pub &'a CharacterRecord);

fn write_scores(f: &mut fmt::Formatter<'_>, heading: &str, scores: &AbilityScores) -> fmt::Result {
    writeln!(f, "{heading}")?;
    for (ability, score) in scores.iter() {
        writeln!(f, "    {ability}: {score}")?;
    }
    Ok(())
}

impl fmt::Display for Sheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        writeln!(f, "D&D Character Sheet (PHB Only)")?;
        writeln!(f, "--------------------")?;
        writeln!(f, "Name: {}", record.name)?;
        writeln!(f, "Race: {}", record.race)?;
        writeln!(f, "Class: {}", record.class)?;
        writeln!(f, "Background: {}", record.background)?;
        writeln!(f, "Alignment: {}", record.alignment)?;
        writeln!(f, "Gender: {} ({})", record.gender, record.pronouns())?;
        writeln!(f, "Level: {}", record.level())?;
        writeln!(f, "Ability Score Method: {}", record.stat_method.name())?;
        writeln!(f)?;

        write_scores(
            f,
            "Ability Scores (base – before lineage bonuses):",
            &record.base_stats,
        )?;

        let improved = record.improvements_spent() > 0;
        if record.lineage_applied || improved {
            let heading = match (record.lineage_applied, improved) {
                (true, false) => "Ability Scores (final – after lineage bonuses):",
                (true, true) => "Ability Scores (final – after lineage bonuses and improvements):",
                _ => "Ability Scores (final – after improvements):",
            };
            writeln!(f)?;
            write_scores(f, heading, record.final_stats())?;
        }

        writeln!(f)?;
        writeln!(f, "Ability Score Improvements: {}", record.entitlement_status())?;
        writeln!(f)?;
        writeln!(f, "Backstory:")?;
        writeln!(f, "{}", record.backstory)?;
        writeln!(f)?;
        writeln!(f, "{PHB_NOTE}")
    }
}

/// Render the plain-text character sheet.
pub fn to_text(record: &CharacterRecord) -> String {
    Sheet(record).to_string()
}

/// Suggested file name for the text sheet: spaces become underscores.
pub fn sheet_file_name(record: &CharacterRecord) -> String {
    format!("{}_sheet.txt", record.name.replace(' ', "_"))
}

/// Suggested file name for the JSON dump.
pub fn json_file_name(record: &CharacterRecord) -> String {
    format!("{}.json", record.name.replace(' ', "_"))
}

/// Write the text sheet into `dir` under [`sheet_file_name`].
pub async fn write_text(record: &CharacterRecord, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    let path = dir.as_ref().join(sheet_file_name(record));
    fs::write(&path, to_text(record)).await?;
    info!(path = %path.display(), "Wrote character sheet");
    Ok(path)
}

/// Write the JSON dump to `path`.
pub async fn write_json(record: &CharacterRecord, path: impl AsRef<Path>) -> Result<(), ExportError> {
    fs::write(path.as_ref(), to_json(record)?).await?;
    info!(path = %path.as_ref().display(), "Wrote character JSON");
    Ok(())
}

/// Load a record from a JSON dump.
pub async fn read_json(path: impl AsRef<Path>) -> Result<CharacterRecord, ExportError> {
    let content = fs::read_to_string(path).await?;
    from_json(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{Ability, InputDomainError};
    use crate::identity::CharacterClass;
    use crate::testing::sample_record;

    #[test]
    fn test_text_sheet_sections() {
        let record = sample_record(CharacterClass::Rogue, 4);
        let text = to_text(&record);

        assert!(text.starts_with("D&D Character Sheet (PHB Only)\n"));
        assert!(text.contains("Class: Rogue\n"));
        assert!(text.contains("Level: 4\n"));
        assert!(text.contains("Ability Scores (base – before lineage bonuses):\n    Strength: "));
        assert!(text.contains("Ability Scores (final – after lineage bonuses):"));
        assert!(text.contains("Ability Score Improvements: 0 of 1 improvement(s) used"));
        assert!(text.ends_with(&format!("{PHB_NOTE}\n")));
    }

    #[test]
    fn test_text_sheet_without_lineage_omits_final() {
        let mut record = sample_record(CharacterClass::Rogue, 1);
        record.lineage_applied = false;
        record.final_stats = record.base_stats;
        assert!(!to_text(&record).contains("Ability Scores (final"));
    }

    #[test]
    fn test_file_names() {
        let mut record = sample_record(CharacterClass::Bard, 1);
        record.name = "Belra Moonwhisper".to_string();
        assert_eq!(sheet_file_name(&record), "Belra_Moonwhisper_sheet.txt");
        assert_eq!(json_file_name(&record), "Belra_Moonwhisper.json");
    }

    #[test]
    fn test_json_round_trip() {
        let mut record = sample_record(CharacterClass::Fighter, 6);
        record.final_stats.add(Ability::Strength, 2);
        record.improvements_spent = 1;
        let json = to_json(&record).unwrap();
        assert_eq!(from_json(&json).unwrap(), record);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entitlement"]["cap"], 2);
        assert_eq!(value["entitlement"]["remaining"], 1);
    }

    fn tampered(record: &CharacterRecord, edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut value = serde_json::to_value(ExportedCharacter::new(record)).unwrap();
        edit(&mut value["character"]);
        value.to_string()
    }

    #[test]
    fn test_import_rejects_spent_over_cap() {
        let record = sample_record(CharacterClass::Wizard, 4);
        let json = tampered(&record, |c| c["improvements_spent"] = serde_json::json!(9));
        assert!(matches!(
            from_json(&json),
            Err(ExportError::Invalid(RecordError::SpentExceedsCap {
                cap: 1,
                spent: 9,
                ..
            }))
        ));
    }

    #[test]
    fn test_import_rejects_level_zero() {
        let record = sample_record(CharacterClass::Wizard, 4);
        let json = tampered(&record, |c| c["level"] = serde_json::json!(0));
        assert!(matches!(
            from_json(&json),
            Err(ExportError::Invalid(RecordError::InputDomain(
                InputDomainError::LevelOutOfRange(0)
            )))
        ));
    }

    #[test]
    fn test_import_rejects_out_of_range_scores() {
        let record = sample_record(CharacterClass::Wizard, 4);

        let json = tampered(&record, |c| c["final_stats"]["strength"] = serde_json::json!(130));
        assert!(matches!(
            from_json(&json),
            Err(ExportError::Invalid(RecordError::FinalScoreMismatch {
                ability: Ability::Strength,
                value: 130,
                ..
            }))
        ));

        let json = tampered(&record, |c| c["base_stats"]["wisdom"] = serde_json::json!(25));
        assert!(matches!(
            from_json(&json),
            Err(ExportError::Invalid(RecordError::InputDomain(
                InputDomainError::ScoreOutOfRange { value: 25, .. }
            )))
        ));
    }

    #[test]
    fn test_import_rejects_unparseable_json() {
        assert!(matches!(from_json("{\"version\": 1}"), Err(ExportError::Json(_))));
        assert!(matches!(from_json("not json"), Err(ExportError::Json(_))));
    }

    #[test]
    fn test_json_version_mismatch() {
        let record = sample_record(CharacterClass::Fighter, 6);
        let mut value = serde_json::to_value(ExportedCharacter::new(&record)).unwrap();
        value["version"] = serde_json::json!(99);
        let err = from_json(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::VersionMismatch {
                expected: 1,
                found: 99
            }
        ));
    }
}
