//! End-to-end character generation through the public API.
//!
//! Run with: `cargo test -p chargen-core --test character_flow`

use chargen_core::testing::{sample_builder, FailingTextGenerator, MockTextGenerator};
use chargen_core::{
    Ability, AbilityScores, Alignment, Background, BudgetWarning, CharacterBuilder,
    CharacterClass, CharacterSession, EntitlementState, Gender, NameChoice, RaceType, StatInput,
    Storyteller,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn half_elf_bard() -> CharacterBuilder {
    CharacterBuilder::new()
        .race(RaceType::HalfElf)
        .class(CharacterClass::Bard)
        .background(Background::Entertainer)
        .alignment(Alignment::ChaoticGood)
        .gender(Gender::NonBinary)
}

// =============================================================================
// Stat input modes
// =============================================================================

#[test]
fn test_rolled_scores_are_in_range() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..20 {
        let generation = half_elf_bard().build_with_rng(&mut rng).unwrap();
        let rolls = generation.rolls.expect("rolled characters keep their dice");
        for (roll, (_, score)) in rolls.iter().zip(generation.record.base_stats.iter()) {
            assert_eq!(roll.total(), score);
            assert!((3..=18).contains(&score));
        }
    }
}

#[test]
fn test_same_seed_same_character() {
    let first = half_elf_bard()
        .build_with_rng(&mut StdRng::seed_from_u64(9))
        .unwrap();
    let second = half_elf_bard()
        .build_with_rng(&mut StdRng::seed_from_u64(9))
        .unwrap();
    assert_eq!(first.record.base_stats, second.record.base_stats);
    assert_eq!(first.record.name, second.record.name);
    assert_ne!(first.record.id, second.record.id);
}

#[test]
fn test_half_elf_without_choice_gets_default_pair() {
    let generation = half_elf_bard()
        .stats(StatInput::Manual(AbilityScores::uniform(10)))
        .build()
        .unwrap();
    // +2 CHA, +1 DEX, +1 CON
    assert_eq!(
        *generation.record.final_stats(),
        AbilityScores::new(10, 11, 11, 10, 10, 12)
    );
}

#[test]
fn test_point_buy_warnings_do_not_abort() {
    let under = half_elf_bard()
        .stats(StatInput::PointBuy(AbilityScores::uniform(8)))
        .build()
        .unwrap();
    assert_eq!(
        under.warnings,
        vec![BudgetWarning::UnspentPoints { remaining: 27 }]
    );

    let exact = half_elf_bard()
        .stats(StatInput::PointBuy(AbilityScores::new(8, 14, 13, 12, 10, 15)))
        .build()
        .unwrap();
    assert!(exact.warnings.is_empty());
}

#[test]
fn test_optimized_point_buy_uses_class_priorities() {
    let generation = half_elf_bard()
        .stats(StatInput::PointBuyOptimized)
        .apply_lineage(false)
        .build()
        .unwrap();
    // Bard: CHA then DEX at 15.
    assert_eq!(
        generation.record.base_stats,
        AbilityScores::new(10, 15, 10, 10, 10, 15)
    );
}

#[test]
fn test_lineage_can_exceed_twenty() {
    let generation = CharacterBuilder::new()
        .race(RaceType::HalfOrc)
        .class(CharacterClass::Barbarian)
        .background(Background::Outlander)
        .alignment(Alignment::ChaoticNeutral)
        .gender(Gender::Female)
        .stats(StatInput::Manual(AbilityScores::new(20, 12, 19, 8, 10, 8)))
        .build()
        .unwrap();
    assert_eq!(generation.record.final_stats().strength, 22);
    assert_eq!(generation.record.final_stats().constitution, 20);
}

// =============================================================================
// Session with a text generator
// =============================================================================

#[tokio::test]
async fn test_session_generated_name_falls_back_on_failure() {
    let mut session = CharacterSession::new(Storyteller::new(FailingTextGenerator)).with_seed(5);
    let generation = session
        .generate(half_elf_bard().name_choice(NameChoice::Generated))
        .await
        .unwrap();

    let record = generation.record;
    let first = record.name.split(' ').next().unwrap();
    assert!(chargen_core::narrative::FIRST_NAMES.contains(&first));
    assert!(record
        .backstory
        .contains("They seeks adventure to prove their worth"));
}

#[tokio::test]
async fn test_session_replaces_character() {
    let mock = MockTextGenerator::new(["First backstory.", "Second backstory."]);
    let mut session = CharacterSession::new(Storyteller::new(mock));

    session
        .generate(sample_builder(CharacterClass::Cleric, 8).name("Dora"))
        .await
        .unwrap();
    session
        .submit_allocation(&"WIS+2".parse().unwrap())
        .unwrap();
    assert_eq!(session.status().unwrap().spent, 1);

    session
        .generate(sample_builder(CharacterClass::Wizard, 1).name("Elryn"))
        .await
        .unwrap();
    let character = session.character().unwrap();
    assert_eq!(character.name, "Elryn");
    assert_eq!(character.backstory, "Second backstory.");
    assert_eq!(character.improvements_spent(), 0);
    assert_eq!(session.status().unwrap().state, EntitlementState::Locked);
}

#[tokio::test]
async fn test_session_preview_then_submit() {
    let mut session = CharacterSession::offline();
    session
        .generate(sample_builder(CharacterClass::Rogue, 10).name("Faelar"))
        .await
        .unwrap();

    let request = "DEX+1 INT+1".parse().unwrap();
    let changes = session.preview(&request).unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(session.status().unwrap().spent, 0);

    let outcome = session.submit_allocation(&request).unwrap();
    assert_eq!(outcome.scores.get(Ability::Dexterity), changes[0].after);
    assert_eq!(outcome.scores.get(Ability::Intelligence), changes[1].after);
    assert_eq!(outcome.remaining, 2);
}
