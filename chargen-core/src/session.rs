//! Character generation session.
//!
//! A session owns at most one character at a time. Generating replaces it;
//! improvements, level changes and exports act on it.

use crate::character::{CharacterRecord, LevelChangeError};
use crate::character_builder::{BuilderError, CharacterBuilder, Generation, NameChoice};
use crate::config::GeneratorConfig;
use crate::export::{self, ExportError};
use crate::improvement::{
    self, AllocationOutcome, AllocationRequest, EntitlementStatus, ImprovementError, ScoreChange,
};
use crate::narrative::Storyteller;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No character has been generated yet")]
    NoCharacter,

    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error(transparent)]
    Improvement(#[from] ImprovementError),

    #[error(transparent)]
    Level(#[from] LevelChangeError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// An interactive character generation session.
#[derive(Debug)]
pub struct CharacterSession {
    storyteller: Storyteller,
    rng: StdRng,
    character: Option<CharacterRecord>,
}

impl CharacterSession {
    pub fn new(storyteller: Storyteller) -> Self {
        Self {
            storyteller,
            rng: StdRng::from_entropy(),
            character: None,
        }
    }

    /// Session whose storyteller is built from `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.storyteller())
    }

    /// Local text only.
    pub fn offline() -> Self {
        Self::new(Storyteller::offline())
    }

    /// Seed the session's random source for reproducible rolls and names.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn storyteller(&self) -> &Storyteller {
        &self.storyteller
    }

    /// Generate a character, replacing any current one.
    ///
    /// Selections are validated before any text is requested, so an invalid
    /// request never reaches the text generator. The previous character is
    /// kept if validation fails.
    pub async fn generate(&mut self, builder: CharacterBuilder) -> Result<Generation, SessionError> {
        let draft = builder.prepare_with_rng(&mut self.rng)?;

        let fallback = draft.local_name(&mut self.rng);
        let name = match &draft.name {
            NameChoice::Generated => {
                self.storyteller
                    .name(draft.race, draft.class, draft.gender, fallback)
                    .await
            }
            NameChoice::Random | NameChoice::Custom(_) => fallback,
        };

        let backstory = match &draft.backstory {
            Some(text) => text.clone(),
            None => self.storyteller.backstory(&draft.sketch(&name)).await,
        };

        let generation = draft.finish(name, backstory);
        self.character = Some(generation.record.clone());
        Ok(generation)
    }

    /// The current character, if any.
    pub fn character(&self) -> Option<&CharacterRecord> {
        self.character.as_ref()
    }

    fn current(&self) -> Result<&CharacterRecord, SessionError> {
        self.character.as_ref().ok_or(SessionError::NoCharacter)
    }

    fn current_mut(&mut self) -> Result<&mut CharacterRecord, SessionError> {
        self.character.as_mut().ok_or(SessionError::NoCharacter)
    }

    /// Entitlement status of the current character.
    pub fn status(&self) -> Result<EntitlementStatus, SessionError> {
        Ok(self.current()?.entitlement_status())
    }

    /// What an allocation would change, without applying it.
    pub fn preview(&self, request: &AllocationRequest) -> Result<Vec<ScoreChange>, SessionError> {
        Ok(improvement::preview(self.current()?, request)?)
    }

    /// Apply an improvement to the current character.
    pub fn submit_allocation(
        &mut self,
        request: &AllocationRequest,
    ) -> Result<AllocationOutcome, SessionError> {
        Ok(improvement::submit_allocation(self.current_mut()?, request)?)
    }

    /// Change the current character's level.
    pub fn set_level(&mut self, level: u8) -> Result<EntitlementStatus, SessionError> {
        Ok(self.current_mut()?.set_level(level)?)
    }

    pub fn sheet_text(&self) -> Result<String, SessionError> {
        Ok(export::to_text(self.current()?))
    }

    pub fn sheet_json(&self) -> Result<String, SessionError> {
        Ok(export::to_json(self.current()?)?)
    }

    /// Write the text sheet into `dir`, returning the file written.
    pub async fn export_text(&self, dir: impl AsRef<Path>) -> Result<PathBuf, SessionError> {
        Ok(export::write_text(self.current()?, dir).await?)
    }

    /// Write the JSON export to `path`, or into it under
    /// [`export::json_file_name`] when `path` is a directory. Returns the file
    /// written.
    pub async fn export_json(&self, path: impl AsRef<Path>) -> Result<PathBuf, SessionError> {
        let record = self.current()?;
        let path = path.as_ref();
        let path = if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
            path.join(export::json_file_name(record))
        } else {
            path.to_path_buf()
        };
        export::write_json(record, &path).await?;
        Ok(path)
    }

    /// Replace the current character with one read from a JSON export.
    pub async fn load_json(&mut self, path: impl AsRef<Path>) -> Result<&CharacterRecord, SessionError> {
        let record = export::read_json(path).await?;
        Ok(self.character.insert(record))
    }
}
