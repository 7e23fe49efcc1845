//! Writing and reading exported character sheets.

use chargen_core::export::{read_json, sheet_file_name, write_json, write_text};
use chargen_core::testing::sample_builder;
use chargen_core::{submit_allocation, Ability, AllocationRequest, CharacterClass};
use tempfile::TempDir;

#[tokio::test]
async fn test_json_file_round_trip_after_improvements() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("character.json");

    let mut record = sample_builder(CharacterClass::Monk, 8)
        .name("Arin Duskbane")
        .build()
        .unwrap()
        .record;
    submit_allocation(
        &mut record,
        &AllocationRequest::split(Ability::Dexterity, Ability::Wisdom),
    )
    .unwrap();

    write_json(&record, &path).await.unwrap();
    let loaded = read_json(&path).await.unwrap();

    assert_eq!(loaded, record);
    assert_eq!(loaded.entitlement_status().remaining, 1);
}

#[tokio::test]
async fn test_text_sheet_written_under_character_name() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let record = sample_builder(CharacterClass::Sorcerer, 1)
        .name("Belra Moonwhisper")
        .build()
        .unwrap()
        .record;

    let path = write_text(&record, temp_dir.path()).await.unwrap();
    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some(sheet_file_name(&record).as_str())
    );

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(content.contains("Name: Belra Moonwhisper"));
    assert!(content.contains("Ability Scores (final – after lineage bonuses):"));
}

#[tokio::test]
async fn test_read_missing_file_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let err = read_json(temp_dir.path().join("missing.json")).await.unwrap_err();
    assert!(matches!(err, chargen_core::ExportError::Io(_)));
}
