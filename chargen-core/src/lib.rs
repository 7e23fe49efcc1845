//! D&D 5e character generation engine.
//!
//! This crate provides:
//! - Ability score rolling, manual entry and point buy with auto-optimize
//! - Racial (lineage) ability bonuses
//! - Level-based ability score improvement tracking
//! - Optional AI-generated names and backstories with local fallbacks
//! - Text and JSON character sheet export
//!
//! # Quick Start
//!
//! ```ignore
//! use chargen_core::{
//!     Ability, Alignment, AllocationRequest, Background, CharacterBuilder, CharacterClass,
//!     CharacterSession, Gender, GeneratorConfig, RaceType, StatInput,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = CharacterSession::from_config(&GeneratorConfig::from_env()?);
//!
//!     let builder = CharacterBuilder::new()
//!         .race(RaceType::HalfOrc)
//!         .class(CharacterClass::Fighter)
//!         .background(Background::Soldier)
//!         .alignment(Alignment::ChaoticGood)
//!         .gender(Gender::Female)
//!         .level(4)
//!         .stats(StatInput::PointBuyOptimized);
//!
//!     let generation = session.generate(builder).await?;
//!     println!("{}", generation.record.name);
//!
//!     session.submit_allocation(&AllocationRequest::plus_two(Ability::Strength))?;
//!     session.export_text(".").await?;
//!     Ok(())
//! }
//! ```

pub mod abilities;
pub mod character;
pub mod character_builder;
pub mod class_data;
pub mod config;
pub mod dice;
pub mod export;
pub mod identity;
pub mod improvement;
pub mod lineage;
pub mod narrative;
pub mod point_buy;
pub mod session;
pub mod testing;

// Primary public API
pub use abilities::{Ability, AbilityScores, InputDomainError, ABILITY_CEILING};
pub use character::{CharacterId, CharacterRecord, LevelChangeError, RecordError, StatMethod};
pub use character_builder::{BuilderError, CharacterBuilder, Generation, NameChoice, StatInput};
pub use config::{ConfigError, GeneratorConfig};
pub use dice::{roll_ability_score, roll_ability_score_with_rng, AbilityRoll};
pub use export::ExportError;
pub use identity::{Alignment, Background, CharacterClass, Gender, Pronouns};
pub use improvement::{
    compute_cap, entitlement_status, preview, schedule_progress, submit_allocation,
    AllocationOutcome, AllocationRequest, EntitlementState, EntitlementStatus,
    ImprovementAllocation, ImprovementError, ImprovementSchedule, ScheduleStep, ScoreChange,
};
pub use lineage::{LineageModifier, RaceType};
pub use narrative::{ClaudeTextGenerator, Storyteller, TextGenError, TextGenerator, TextPrompt};
pub use point_buy::{Allocation, BudgetWarning, PointBudget};
pub use session::{CharacterSession, SessionError};
pub use testing::{FailingTextGenerator, MockTextGenerator};
