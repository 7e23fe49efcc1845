//! Integration tests that call the real Claude API.
//!
//! These tests require ANTHROPIC_API_KEY to be set (via .env file or environment).
//! Run with: `cargo test -p chargen-core --test api_integration -- --ignored`

use chargen_core::narrative::{template_backstory, UNNAMED_CHARACTER};
use chargen_core::testing::sample_builder;
use chargen_core::{CharacterClass, CharacterSession, GeneratorConfig, NameChoice};

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if API key is available
fn has_api_key() -> bool {
    std::env::var("ANTHROPIC_API_KEY").is_ok()
}

#[tokio::test]
#[ignore] // Run with: cargo test -p chargen-core --test api_integration -- --ignored
async fn test_generated_name_and_backstory() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let config = GeneratorConfig::from_env().expect("valid configuration");
    let mut session = CharacterSession::from_config(&config);
    assert!(session.storyteller().is_online());

    let generation = session
        .generate(sample_builder(CharacterClass::Wizard, 1).name_choice(NameChoice::Generated))
        .await
        .expect("generation succeeds");
    let record = generation.record;

    println!("Name: {}", record.name);
    println!("Backstory: {}", record.backstory);

    assert!(!record.name.is_empty());
    assert_ne!(record.name, UNNAMED_CHARACTER);
    assert!(!record.backstory.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_bad_key_degrades_to_local_text() {
    setup();
    if !has_api_key() {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    }

    let config = GeneratorConfig::new().with_api_key("sk-ant-invalid");
    let mut session = CharacterSession::from_config(&config);
    let generation = session
        .generate(sample_builder(CharacterClass::Druid, 1).name("Isen"))
        .await
        .expect("generation never fails on text errors");

    let record = generation.record;
    let sketch = chargen_core::narrative::CharacterSketch {
        name: record.name.clone(),
        race: record.race,
        class: record.class,
        background: record.background,
        alignment: record.alignment,
        gender: record.gender,
    };
    assert_eq!(record.backstory, template_backstory(&sketch));
}
