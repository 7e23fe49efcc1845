//! Testing utilities for character generation.
//!
//! - `MockTextGenerator` returns scripted text without API calls
//! - `FailingTextGenerator` and `SlowTextGenerator` exercise the fallbacks
//! - Fixtures for records and builders

use crate::abilities::AbilityScores;
use crate::character::{CharacterId, CharacterRecord, StatMethod};
use crate::character_builder::{CharacterBuilder, StatInput};
use crate::identity::{Alignment, Background, CharacterClass, Gender};
use crate::lineage::RaceType;
use crate::narrative::{TextGenError, TextGenerator, TextPrompt};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A text generator that returns scripted responses in order.
///
/// Once the script runs out it returns empty text, which callers treat as a
/// failure. Prompts are recorded for inspection.
#[derive(Debug, Clone, Default)]
pub struct MockTextGenerator {
    responses: Arc<Mutex<Vec<String>>>,
    prompts: Arc<Mutex<Vec<TextPrompt>>>,
}

impl MockTextGenerator {
    pub fn new<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        let mut responses: Vec<String> = responses.into_iter().map(Into::into).collect();
        responses.reverse();
        Self {
            responses: Arc::new(Mutex::new(responses)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts received so far. Clones share the log.
    pub fn prompts(&self) -> Vec<TextPrompt> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn complete(&self, prompt: TextPrompt) -> Result<String, TextGenError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt);
        }
        let next = self.responses.lock().ok().and_then(|mut r| r.pop());
        Ok(next.unwrap_or_default())
    }
}

/// A text generator that always errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingTextGenerator;

#[async_trait]
impl TextGenerator for FailingTextGenerator {
    async fn complete(&self, _prompt: TextPrompt) -> Result<String, TextGenError> {
        Err(TextGenError::Api(claude::Error::Api {
            status: 529,
            message: "Overloaded".to_string(),
        }))
    }
}

/// A text generator that sleeps before answering.
#[derive(Debug, Clone, Copy)]
pub struct SlowTextGenerator {
    delay: Duration,
}

impl SlowTextGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl TextGenerator for SlowTextGenerator {
    async fn complete(&self, _prompt: TextPrompt) -> Result<String, TextGenError> {
        tokio::time::sleep(self.delay).await;
        Ok("Too late".to_string())
    }
}

/// A Dwarf with the standard array, lineage applied, nothing spent.
pub fn sample_record(class: CharacterClass, level: u8) -> CharacterRecord {
    let base = AbilityScores::new(15, 14, 13, 12, 10, 8);
    CharacterRecord {
        id: CharacterId::new(),
        name: "Gorin Ironfist".to_string(),
        race: RaceType::Dwarf,
        class,
        background: Background::Soldier,
        alignment: Alignment::LawfulNeutral,
        gender: Gender::Male,
        level,
        stat_method: StatMethod::Manual,
        base_stats: base,
        final_stats: RaceType::Dwarf.apply(&base, None),
        lineage_applied: true,
        improvements_spent: 0,
        backstory: "Gorin Ironfist is a lawful neutral Dwarf who grew up as a soldier.".to_string(),
    }
}

/// A fully specified builder using manual scores.
pub fn sample_builder(class: CharacterClass, level: u8) -> CharacterBuilder {
    CharacterBuilder::new()
        .race(RaceType::Dwarf)
        .class(class)
        .background(Background::Soldier)
        .alignment(Alignment::LawfulNeutral)
        .gender(Gender::Male)
        .level(level)
        .stats(StatInput::Manual(AbilityScores::new(15, 14, 13, 12, 10, 8)))
}
