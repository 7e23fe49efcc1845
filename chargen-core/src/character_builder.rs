//! Character builder for generation requests.
//!
//! Collects the player's selections, resolves base scores from the chosen
//! stat input mode, applies lineage bonuses and produces a
//! [`CharacterRecord`]. Building is split in two so the async session can
//! fetch flavor text between validating the selections and finishing the
//! record; [`CharacterBuilder::build`] does both with local text only.

use crate::abilities::{Ability, AbilityScores, InputDomainError, MANUAL_RANGE};
use crate::character::{check_level, CharacterId, CharacterRecord, StatMethod};
use crate::dice::{roll_ability_scores_with_rng, AbilityRoll};
use crate::identity::{Alignment, Background, CharacterClass, Gender};
use crate::lineage::RaceType;
use crate::narrative::{custom_name, random_name_with_rng, template_backstory, CharacterSketch};
use crate::point_buy::{BudgetWarning, PointBudget};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

/// How base ability scores are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatInput {
    /// 4d6 drop lowest, six times.
    #[default]
    Roll,
    /// Typed values, each 1-20.
    Manual(AbilityScores),
    /// Slider values, each 1-20.
    Slider(AbilityScores),
    /// Purchased values, each 8-15.
    PointBuy(AbilityScores),
    /// Point buy filled in by auto-optimize for the selected class.
    PointBuyOptimized,
}

impl StatInput {
    pub fn method(&self) -> StatMethod {
        match self {
            StatInput::Roll => StatMethod::Rolled,
            StatInput::Manual(_) => StatMethod::Manual,
            StatInput::Slider(_) => StatMethod::Slider,
            StatInput::PointBuy(_) | StatInput::PointBuyOptimized => StatMethod::PointBuy,
        }
    }
}

/// Where the character's name comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NameChoice {
    /// Picked from the built-in name lists.
    #[default]
    Random,
    /// Asked of the text generator, with the built-in lists as fallback.
    Generated,
    /// Entered by the player. Blank becomes "Unnamed Character".
    Custom(String),
}

/// Error from character building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("Race selection is required")]
    MissingRace,

    #[error("Class selection is required")]
    MissingClass,

    #[error("Background selection is required")]
    MissingBackground,

    #[error("Alignment selection is required")]
    MissingAlignment,

    #[error("Gender selection is required")]
    MissingGender,

    #[error(transparent)]
    InputDomain(#[from] InputDomainError),
}

/// Base scores plus what was learned producing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseStats {
    pub scores: AbilityScores,
    /// The individual rolls, for [`StatInput::Roll`].
    pub rolls: Option<[AbilityRoll; 6]>,
    pub warnings: Vec<BudgetWarning>,
}

/// Resolve base scores for `input`, rejecting out-of-range values.
pub fn resolve_base_stats<R: Rng>(
    input: &StatInput,
    class: CharacterClass,
    budget: &PointBudget,
    rng: &mut R,
) -> Result<BaseStats, InputDomainError> {
    let (scores, rolls) = match *input {
        StatInput::Roll => {
            let (scores, rolls) = roll_ability_scores_with_rng(rng);
            (scores, Some(rolls))
        }
        StatInput::Manual(scores) => {
            scores.check_range(MANUAL_RANGE, "manual entry")?;
            (scores, None)
        }
        StatInput::Slider(scores) => {
            scores.check_range(MANUAL_RANGE, "sliders")?;
            (scores, None)
        }
        StatInput::PointBuy(scores) => (scores, None),
        StatInput::PointBuyOptimized => (budget.auto_optimize_for_class(class), None),
    };

    let warnings = match input {
        StatInput::PointBuy(_) | StatInput::PointBuyOptimized => {
            let allocation = budget.allocate(&scores)?;
            debug!(spent = allocation.spent, remaining = allocation.remaining, "Priced point buy");
            allocation.warning(budget.total()).into_iter().collect()
        }
        _ => Vec::new(),
    };

    Ok(BaseStats {
        scores,
        rolls,
        warnings,
    })
}

/// Result of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub record: CharacterRecord,
    /// Non-fatal point-buy conditions to show the player.
    pub warnings: Vec<BudgetWarning>,
    pub rolls: Option<[AbilityRoll; 6]>,
}

/// Builder for generation requests.
#[derive(Debug, Clone)]
pub struct CharacterBuilder {
    name: NameChoice,
    race: Option<RaceType>,
    class: Option<CharacterClass>,
    background: Option<Background>,
    alignment: Option<Alignment>,
    gender: Option<Gender>,
    level: u8,
    stats: StatInput,
    /// For Half-Elf: the abilities that get +1.
    flexible_bonus: Option<Vec<Ability>>,
    apply_lineage: bool,
    backstory: Option<String>,
    budget: PointBudget,
}

impl Default for CharacterBuilder {
    fn default() -> Self {
        Self {
            name: NameChoice::default(),
            race: None,
            class: None,
            background: None,
            alignment: None,
            gender: None,
            level: 1,
            stats: StatInput::default(),
            flexible_bonus: None,
            apply_lineage: true,
            backstory: None,
            budget: PointBudget::standard(),
        }
    }
}

impl CharacterBuilder {
    /// Create a new character builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a player-entered name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = NameChoice::Custom(name.into());
        self
    }

    pub fn name_choice(mut self, choice: NameChoice) -> Self {
        self.name = choice;
        self
    }

    pub fn race(mut self, race: RaceType) -> Self {
        self.race = Some(race);
        self
    }

    pub fn class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Character level, 1-20. Checked at build time.
    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn stats(mut self, stats: StatInput) -> Self {
        self.stats = stats;
        self
    }

    /// Choose the abilities for a flexible lineage bonus.
    ///
    /// Ignored by races without one. An invalid choice falls back to the
    /// lineage's default pair.
    pub fn flexible_bonus(mut self, abilities: impl IntoIterator<Item = Ability>) -> Self {
        self.flexible_bonus = Some(abilities.into_iter().collect());
        self
    }

    /// Whether lineage bonuses are applied. Defaults to true.
    pub fn apply_lineage(mut self, apply: bool) -> Self {
        self.apply_lineage = apply;
        self
    }

    /// Use a fixed backstory instead of generating one.
    pub fn backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = Some(backstory.into());
        self
    }

    pub fn budget(mut self, budget: PointBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Validate selections and compute scores, leaving name and backstory
    /// unresolved.
    pub fn prepare_with_rng<R: Rng>(self, rng: &mut R) -> Result<Draft, BuilderError> {
        let race = self.race.ok_or(BuilderError::MissingRace)?;
        let class = self.class.ok_or(BuilderError::MissingClass)?;
        let background = self.background.ok_or(BuilderError::MissingBackground)?;
        let alignment = self.alignment.ok_or(BuilderError::MissingAlignment)?;
        let gender = self.gender.ok_or(BuilderError::MissingGender)?;
        let level = check_level(self.level)?;

        let base = resolve_base_stats(&self.stats, class, &self.budget, rng)?;
        let final_stats = if self.apply_lineage {
            race.apply(&base.scores, self.flexible_bonus.as_deref())
        } else {
            base.scores
        };

        Ok(Draft {
            name: self.name,
            backstory: self.backstory,
            race,
            class,
            background,
            alignment,
            gender,
            level,
            stat_method: self.stats.method(),
            base,
            final_stats,
            lineage_applied: self.apply_lineage,
        })
    }

    /// Build with local names and the template backstory.
    pub fn build_with_rng<R: Rng>(self, rng: &mut R) -> Result<Generation, BuilderError> {
        let draft = self.prepare_with_rng(rng)?;
        let name = draft.local_name(rng);
        let backstory = draft.local_backstory(&name);
        Ok(draft.finish(name, backstory))
    }

    pub fn build(self) -> Result<Generation, BuilderError> {
        self.build_with_rng(&mut rand::thread_rng())
    }
}

/// A validated request still waiting for its name and backstory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub name: NameChoice,
    pub backstory: Option<String>,
    pub race: RaceType,
    pub class: CharacterClass,
    pub background: Background,
    pub alignment: Alignment,
    pub gender: Gender,
    pub level: u8,
    pub stat_method: StatMethod,
    pub base: BaseStats,
    pub final_stats: AbilityScores,
    pub lineage_applied: bool,
}

impl Draft {
    /// The name this draft gets without asking a text generator.
    pub fn local_name<R: Rng>(&self, rng: &mut R) -> String {
        match &self.name {
            NameChoice::Custom(name) => custom_name(name),
            NameChoice::Random | NameChoice::Generated => random_name_with_rng(rng),
        }
    }

    pub fn sketch(&self, name: &str) -> CharacterSketch {
        CharacterSketch {
            name: name.to_string(),
            race: self.race,
            class: self.class,
            background: self.background,
            alignment: self.alignment,
            gender: self.gender,
        }
    }

    /// The fixed backstory if one was given, else the template.
    pub fn local_backstory(&self, name: &str) -> String {
        self.backstory
            .clone()
            .unwrap_or_else(|| template_backstory(&self.sketch(name)))
    }

    /// Assemble the record.
    pub fn finish(self, name: String, backstory: String) -> Generation {
        let record = CharacterRecord {
            id: CharacterId::new(),
            name,
            race: self.race,
            class: self.class,
            background: self.background,
            alignment: self.alignment,
            gender: self.gender,
            level: self.level,
            stat_method: self.stat_method,
            base_stats: self.base.scores,
            final_stats: self.final_stats,
            lineage_applied: self.lineage_applied,
            improvements_spent: 0,
            backstory,
        };
        info!(
            name = %record.name,
            race = %record.race,
            class = %record.class,
            level = record.level,
            "Generated character"
        );
        Generation {
            record,
            warnings: self.base.warnings,
            rolls: self.base.rolls,
        }
    }
}
