//! Command-line arguments.

use anyhow::{bail, Result};
use chargen_core::{
    Ability, AbilityScores, AllocationRequest, Alignment, Background, CharacterBuilder,
    CharacterClass, Gender, GeneratorConfig, NameChoice, RaceType, StatInput,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Generate a D&D 5e character using Player's Handbook options.
#[derive(Debug, Parser)]
#[command(name = "chargen", version, about)]
pub struct Args {
    /// Lineage, e.g. "half-elf"
    #[arg(short, long)]
    pub race: Option<RaceType>,

    /// Class, e.g. "blood hunter"
    #[arg(short, long)]
    pub class: Option<CharacterClass>,

    #[arg(short, long)]
    pub background: Option<Background>,

    /// Alignment, e.g. "chaotic good"
    #[arg(short, long)]
    pub alignment: Option<Alignment>,

    #[arg(short, long)]
    pub gender: Option<Gender>,

    /// Character level, 1-20
    #[arg(short, long)]
    pub level: Option<u8>,

    /// How base ability scores are produced
    #[arg(long, value_enum, default_value_t = StatMode::Roll)]
    pub stats: StatMode,

    /// Six scores in STR,DEX,CON,INT,WIS,CHA order
    #[arg(long, value_parser = parse_scores)]
    pub scores: Option<AbilityScores>,

    /// Abilities for a flexible lineage bonus, e.g. "dex,con"
    #[arg(long, value_delimiter = ',')]
    pub flexible: Vec<Ability>,

    /// Keep final scores equal to the base scores
    #[arg(long)]
    pub no_lineage: bool,

    /// Use this name instead of a generated one
    #[arg(short, long, conflicts_with = "ai_name")]
    pub name: Option<String>,

    /// Ask the text generator for a name
    #[arg(long)]
    pub ai_name: bool,

    /// Use this backstory instead of a generated one
    #[arg(long)]
    pub backstory: Option<String>,

    /// Seed for reproducible rolls and names
    #[arg(long)]
    pub seed: Option<u64>,

    /// Apply an improvement, e.g. "STR+2" or "DEX+1,WIS+1" (repeatable)
    #[arg(long = "improve")]
    pub improvements: Vec<AllocationRequest>,

    /// Start from a JSON export instead of generating
    #[arg(long, conflicts_with_all = ["race", "class", "background", "alignment", "gender"])]
    pub load: Option<PathBuf>,

    /// Write the text sheet into this directory
    #[arg(long, value_name = "DIR")]
    pub export_text: Option<PathBuf>,

    /// Write the JSON export to this file
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<PathBuf>,

    /// Never call the text generator
    #[arg(long)]
    pub offline: bool,

    /// Text generation model override
    #[arg(long)]
    pub model: Option<String>,

    /// Text generation timeout in seconds
    #[arg(long)]
    pub text_timeout: Option<u64>,

    /// Read improvement commands from stdin after generating
    #[arg(short, long)]
    pub interactive: bool,

    /// List races, classes, backgrounds, alignments and genders, then exit
    #[arg(long)]
    pub list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatMode {
    /// 4d6 drop lowest
    Roll,
    /// Typed scores, 1-20
    Manual,
    /// Slider scores, 1-20
    Slider,
    /// 27-point buy, 8-15
    PointBuy,
    /// Point buy filled in for the class
    Optimize,
}

/// Parse "15,14,13,12,10,8" (commas or spaces) into scores.
pub fn parse_scores(s: &str) -> Result<AbilityScores, String> {
    let values = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .map_err(|_| format!("{part:?} is not a score"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let values: [u8; 6] = values
        .try_into()
        .map_err(|v: Vec<u8>| format!("expected 6 scores, got {}", v.len()))?;
    Ok(AbilityScores::from_array(values))
}

impl Args {
    pub fn stat_input(&self) -> Result<StatInput> {
        let scores = || match self.scores {
            Some(scores) => Ok(scores),
            None => bail!("--stats {:?} needs --scores", self.stats),
        };
        Ok(match self.stats {
            StatMode::Roll => StatInput::Roll,
            StatMode::Manual => StatInput::Manual(scores()?),
            StatMode::Slider => StatInput::Slider(scores()?),
            StatMode::PointBuy => StatInput::PointBuy(scores()?),
            StatMode::Optimize => StatInput::PointBuyOptimized,
        })
    }

    pub fn name_choice(&self) -> NameChoice {
        match (&self.name, self.ai_name) {
            (Some(name), _) => NameChoice::Custom(name.clone()),
            (None, true) => NameChoice::Generated,
            (None, false) => NameChoice::Random,
        }
    }

    /// Builder for the selections on the command line. Missing selections
    /// surface when the builder is prepared.
    pub fn builder(&self) -> Result<CharacterBuilder> {
        let mut builder = CharacterBuilder::new()
            .name_choice(self.name_choice())
            .stats(self.stat_input()?)
            .apply_lineage(!self.no_lineage);

        if let Some(race) = self.race {
            builder = builder.race(race);
        }
        if let Some(class) = self.class {
            builder = builder.class(class);
        }
        if let Some(background) = self.background {
            builder = builder.background(background);
        }
        if let Some(alignment) = self.alignment {
            builder = builder.alignment(alignment);
        }
        if let Some(gender) = self.gender {
            builder = builder.gender(gender);
        }
        if let Some(level) = self.level {
            builder = builder.level(level);
        }
        if !self.flexible.is_empty() {
            builder = builder.flexible_bonus(self.flexible.iter().copied());
        }
        if let Some(backstory) = &self.backstory {
            builder = builder.backstory(backstory.clone());
        }
        Ok(builder)
    }

    /// Environment settings with command-line overrides applied.
    pub fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::from_env()?;
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(secs) = self.text_timeout {
            config = config.with_text_timeout(Duration::from_secs(secs));
        }
        if self.offline {
            config = config.offline();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scores() {
        assert_eq!(
            parse_scores("15,14,13,12,10,8").unwrap(),
            AbilityScores::new(15, 14, 13, 12, 10, 8)
        );
        assert_eq!(
            parse_scores("8 8 8 8 8 8").unwrap(),
            AbilityScores::uniform(8)
        );
        assert!(parse_scores("15,14,13").is_err());
        assert!(parse_scores("15,14,13,12,10,x").is_err());
    }

    #[test]
    fn test_parses_selections() {
        let args = Args::try_parse_from([
            "chargen",
            "--race",
            "half-elf",
            "--class",
            "blood hunter",
            "--alignment",
            "chaotic good",
            "--flexible",
            "str,wis",
            "--stats",
            "point-buy",
            "--scores",
            "15,15,15,8,8,8",
            "--improve",
            "DEX+1, CON+1",
            "--improve",
            "str+2",
        ])
        .unwrap();

        assert_eq!(args.race, Some(RaceType::HalfElf));
        assert_eq!(args.class, Some(CharacterClass::BloodHunter));
        assert_eq!(args.alignment, Some(Alignment::ChaoticGood));
        assert_eq!(args.flexible, vec![Ability::Strength, Ability::Wisdom]);
        assert_eq!(
            args.stat_input().unwrap(),
            StatInput::PointBuy(AbilityScores::new(15, 15, 15, 8, 8, 8))
        );
        assert_eq!(
            args.improvements,
            vec![
                AllocationRequest::split(Ability::Dexterity, Ability::Constitution),
                AllocationRequest::plus_two(Ability::Strength),
            ]
        );
    }

    #[test]
    fn test_manual_needs_scores() {
        let args = Args::try_parse_from(["chargen", "--stats", "manual"]).unwrap();
        assert!(args.stat_input().is_err());
    }

    #[test]
    fn test_name_choice() {
        let args = Args::try_parse_from(["chargen", "--ai-name"]).unwrap();
        assert_eq!(args.name_choice(), NameChoice::Generated);

        let args = Args::try_parse_from(["chargen", "--name", "Isen"]).unwrap();
        assert_eq!(args.name_choice(), NameChoice::Custom("Isen".to_string()));

        assert!(Args::try_parse_from(["chargen", "--name", "Isen", "--ai-name"]).is_err());
    }

    #[test]
    fn test_load_conflicts_with_selections() {
        assert!(Args::try_parse_from(["chargen", "--load", "a.json", "--race", "elf"]).is_err());
    }
}
