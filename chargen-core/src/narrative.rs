//! Names and backstories.
//!
//! Flavor text can come from an external text generator, but generation never
//! depends on it: every path has a local fallback and failures are logged and
//! swallowed here.

use crate::identity::{Alignment, Background, CharacterClass, Gender};
use crate::lineage::RaceType;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const FIRST_NAMES: &[&str] = &[
    "Arin", "Belra", "Cedric", "Dora", "Elryn", "Faelar", "Gorin", "Hilda", "Isen", "Jora",
];

pub const LAST_NAMES: &[&str] = &[
    "Stoneheart",
    "Ravenshadow",
    "Ironfist",
    "Moonwhisper",
    "Stormblade",
    "Duskbane",
    "Lightbringer",
];

/// Name used when a custom name is left blank.
pub const UNNAMED_CHARACTER: &str = "Unnamed Character";

pub const DEFAULT_TEXT_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from an external text generator. Never escapes [`Storyteller`].
#[derive(Debug, Error)]
pub enum TextGenError {
    #[error("Text generation unavailable: {0}")]
    Unavailable(String),

    #[error("Claude API error: {0}")]
    Api(#[from] claude::Error),

    #[error("Text generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Text generator returned no text")]
    Empty,
}

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrompt {
    pub prompt: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: TextPrompt) -> Result<String, TextGenError>;
}

/// [`TextGenerator`] backed by the Claude Messages API.
#[derive(Debug, Clone)]
pub struct ClaudeTextGenerator {
    client: claude::Claude,
}

impl ClaudeTextGenerator {
    pub fn new(client: claude::Claude) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TextGenerator for ClaudeTextGenerator {
    async fn complete(&self, prompt: TextPrompt) -> Result<String, TextGenError> {
        let request = claude::Request::prompt(prompt.prompt)
            .with_max_tokens(prompt.max_tokens)
            .with_temperature(prompt.temperature);
        let response = self.client.complete(request).await?;
        Ok(response.text())
    }
}

/// Identity fields that flavor text is written about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSketch {
    pub name: String,
    pub race: RaceType,
    pub class: CharacterClass,
    pub background: Background,
    pub alignment: Alignment,
    pub gender: Gender,
}

// ============================================================================
// Local fallbacks
// ============================================================================

/// A random first and last name from the built-in lists.
pub fn random_name_with_rng<R: Rng>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Arin");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Stoneheart");
    format!("{first} {last}")
}

/// Trim a user-supplied name, substituting [`UNNAMED_CHARACTER`] when blank.
pub fn custom_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNNAMED_CHARACTER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// The built-in backstory template.
pub fn template_backstory(sketch: &CharacterSketch) -> String {
    let pronouns = sketch.gender.pronouns();
    format!(
        "{} is a {} {} {} who grew up as a {}. {} seeks adventure to prove {} worth to the world.",
        sketch.name,
        sketch.alignment.name().to_lowercase(),
        sketch.race,
        sketch.class,
        sketch.background.name().to_lowercase(),
        pronouns.subject,
        pronouns.possessive,
    )
}

// ============================================================================
// Prompts
// ============================================================================

pub fn name_prompt(race: RaceType, class: CharacterClass, gender: Gender) -> TextPrompt {
    TextPrompt {
        prompt: format!(
            "Generate a unique first and last name for a {} {race} {class} in D&D. Use {}. Only return the name.",
            gender.name().to_lowercase(),
            race.name_style(),
        ),
        max_tokens: 20,
        temperature: 1.0,
    }
}

pub fn backstory_prompt(sketch: &CharacterSketch) -> TextPrompt {
    let pronouns = sketch.gender.pronouns();
    TextPrompt {
        prompt: format!(
            "Write a short D&D backstory for this character:\n\
             Name: {}\n\
             Race: {}\n\
             Class: {}\n\
             Background: {}\n\
             Alignment: {}\n\
             Pronouns: {}/{}/{}",
            sketch.name,
            sketch.race,
            sketch.class,
            sketch.background,
            sketch.alignment,
            pronouns.subject.to_lowercase(),
            pronouns.object,
            pronouns.possessive,
        ),
        max_tokens: 300,
        temperature: 0.8,
    }
}

/// Strip whitespace and wrapping quotes from generated text.
fn clean(text: &str) -> String {
    text.trim().trim_matches(|c: char| c == '"' || c == '\'').trim().to_string()
}

// ============================================================================
// Storyteller
// ============================================================================

/// Produces names and backstories, preferring the external generator.
///
/// Both operations always return text. Absence of a generator, errors, empty
/// output and timeouts all fall back to local text.
pub struct Storyteller {
    generator: Option<Box<dyn TextGenerator>>,
    timeout: Duration,
}

impl Default for Storyteller {
    fn default() -> Self {
        Self::offline()
    }
}

impl std::fmt::Debug for Storyteller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storyteller")
            .field("has_generator", &self.generator.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Storyteller {
    /// Local text only.
    pub fn offline() -> Self {
        Self {
            generator: None,
            timeout: DEFAULT_TEXT_TIMEOUT,
        }
    }

    pub fn new(generator: impl TextGenerator + 'static) -> Self {
        Self {
            generator: Some(Box::new(generator)),
            timeout: DEFAULT_TEXT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_online(&self) -> bool {
        self.generator.is_some()
    }

    async fn generate(&self, prompt: TextPrompt) -> Result<String, TextGenError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| TextGenError::Unavailable("no text generator configured".into()))?;

        let text = tokio::time::timeout(self.timeout, generator.complete(prompt))
            .await
            .map_err(|_| TextGenError::Timeout(self.timeout))??;

        let text = clean(&text);
        if text.is_empty() {
            return Err(TextGenError::Empty);
        }
        Ok(text)
    }

    /// A generated name, or `fallback` if generation fails.
    pub async fn name(
        &self,
        race: RaceType,
        class: CharacterClass,
        gender: Gender,
        fallback: String,
    ) -> String {
        match self.generate(name_prompt(race, class, gender)).await {
            Ok(name) => {
                debug!(%name, "Generated character name");
                name
            }
            Err(e) => {
                if self.is_online() {
                    warn!(error = %e, fallback = %fallback, "Name generation failed, using fallback");
                }
                fallback
            }
        }
    }

    /// A generated backstory, or the built-in template if generation fails.
    pub async fn backstory(&self, sketch: &CharacterSketch) -> String {
        match self.generate(backstory_prompt(sketch)).await {
            Ok(text) => text,
            Err(e) => {
                if self.is_online() {
                    warn!(error = %e, "Backstory generation failed, using template");
                }
                template_backstory(sketch)
            }
        }
    }
}
