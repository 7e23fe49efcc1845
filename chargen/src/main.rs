//! D&D character generator.
//!
//! Generates a character from command-line selections, optionally spends
//! ability score improvements, and writes the sheet.
//!
//! ```bash
//! cargo run -p chargen -- --race dwarf --class fighter --background soldier \
//!     --alignment "lawful good" --gender male --level 4 --stats optimize \
//!     --improve STR+2 --export-text .
//! ```
//!
//! Add `--interactive` to keep spending improvements from stdin.

mod cli;
mod interactive;

use anyhow::{Context, Result};
use chargen_core::{
    Alignment, Background, CharacterClass, CharacterSession, Gender, Generation,
    ImprovementSchedule, RaceType,
};
use clap::Parser;
use cli::Args;
use std::io::{self, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.list {
        print_tables();
        return Ok(());
    }

    let config = args.generator_config()?;
    info!(?config, "Starting character generation");

    let mut session = CharacterSession::from_config(&config);
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }

    if let Some(path) = &args.load {
        session
            .load_json(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        if let Some(level) = args.level {
            session.set_level(level)?;
        }
    } else {
        let ignores_flexible = |race: &RaceType| !race.has_flexible_bonus();
        if let Some(race) = args.race.filter(ignores_flexible) {
            if !args.flexible.is_empty() {
                warn!(%race, "--flexible ignored: this lineage has no flexible bonus");
            }
        }
        let generation = session.generate(args.builder()?).await?;
        print_generation(&generation);
    }

    for request in &args.improvements {
        let outcome = session
            .submit_allocation(request)
            .with_context(|| format!("Could not apply {request}"))?;
        for change in &outcome.changes {
            println!("Improved {change}");
        }
    }

    print!("{}", session.sheet_text()?);

    if let Some(dir) = &args.export_text {
        let path = session.export_text(dir).await?;
        println!("Character sheet written to {}", path.display());
    }
    if let Some(path) = &args.export_json {
        let path = session.export_json(path).await?;
        println!("Character written to {}", path.display());
    }

    if args.interactive {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        interactive::run_interactive(&mut session, stdin.lock(), &mut stdout).await?;
        stdout.flush()?;
    }

    Ok(())
}

fn print_generation(generation: &Generation) {
    if let Some(rolls) = &generation.rolls {
        println!("Rolls (4d6, lowest dropped):");
        for ((ability, _), roll) in generation.record.base_stats.iter().zip(rolls) {
            println!("  {:<13} {} = {}", ability.name(), roll.dice_display(), roll.total());
        }
        println!();
    }
    for warning in &generation.warnings {
        println!("Warning: {warning}");
    }
    if !generation.warnings.is_empty() {
        println!();
    }
}

fn print_tables() {
    println!("Races:");
    for race in RaceType::all() {
        let flexible = if race.has_flexible_bonus() {
            " (choose with --flexible)"
        } else {
            ""
        };
        println!("  {:<12} {}{flexible}", race.name(), race.ability_bonuses());
    }

    println!("\nClasses:");
    for class in CharacterClass::all() {
        let levels: Vec<String> = ImprovementSchedule::for_class(*class)
            .levels()
            .iter()
            .map(u8::to_string)
            .collect();
        println!(
            "  {:<12} improvements at {}",
            class.name(),
            levels.join(", ")
        );
        println!("  {:<12} {}", "", class.data().improvement_tip);
    }

    let names = |items: Vec<&str>| items.join(", ");
    println!(
        "\nBackgrounds: {}",
        names(Background::all().iter().map(|b| b.name()).collect())
    );
    println!(
        "Alignments: {}",
        names(Alignment::all().iter().map(|a| a.name()).collect())
    );
    println!(
        "Genders: {}",
        names(Gender::all().iter().map(|g| g.name()).collect())
    );
}
