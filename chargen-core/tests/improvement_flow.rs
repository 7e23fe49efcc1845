//! Ability score improvement scenarios across levels and classes.

use chargen_core::testing::sample_builder;
use chargen_core::{
    compute_cap, schedule_progress, submit_allocation, Ability, AbilityScores, AllocationRequest,
    CharacterClass, CharacterRecord, EntitlementState, ImprovementError, LevelChangeError,
    StatInput, ABILITY_CEILING,
};

fn character(class: CharacterClass, level: u8, scores: AbilityScores) -> CharacterRecord {
    sample_builder(class, level)
        .stats(StatInput::Manual(scores))
        .apply_lineage(false)
        .name("Test Hero")
        .build()
        .unwrap()
        .record
}

#[test]
fn test_fighter_spends_every_grant_to_twenty() {
    let mut record = character(CharacterClass::Fighter, 20, AbilityScores::new(16, 14, 14, 10, 10, 8));
    assert_eq!(record.entitlement_status().cap, 7);

    // STR 16 -> 18 -> 20
    for _ in 0..2 {
        submit_allocation(&mut record, &AllocationRequest::plus_two(Ability::Strength)).unwrap();
    }
    assert_eq!(record.final_stats().strength, 20);

    // A third +2 to STR hits the ceiling before the entitlement check.
    let err = submit_allocation(&mut record, &AllocationRequest::plus_two(Ability::Strength))
        .unwrap_err();
    assert_eq!(
        err,
        ImprovementError::CeilingExceeded {
            ability: Ability::Strength,
            current: 20
        }
    );

    // DEX 14 -> 20, then split the last two.
    for _ in 0..3 {
        submit_allocation(&mut record, &AllocationRequest::plus_two(Ability::Dexterity)).unwrap();
    }
    submit_allocation(
        &mut record,
        &AllocationRequest::split(Ability::Constitution, Ability::Wisdom),
    )
    .unwrap();
    submit_allocation(
        &mut record,
        &AllocationRequest::split(Ability::Constitution, Ability::Charisma),
    )
    .unwrap();

    let status = record.entitlement_status();
    assert_eq!(status.spent, 7);
    assert_eq!(status.state, EntitlementState::Exhausted);
    assert!(record.final_stats().iter().all(|(_, v)| v <= ABILITY_CEILING));

    assert!(matches!(
        submit_allocation(
            &mut record,
            &AllocationRequest::split(Ability::Intelligence, Ability::Wisdom)
        ),
        Err(ImprovementError::NoEntitlementRemaining { cap: 7, spent: 7 })
    ));
}

#[test]
fn test_level_up_unlocks_grants() {
    let mut record = character(CharacterClass::Rogue, 3, AbilityScores::new(8, 15, 14, 13, 12, 10));
    assert_eq!(record.entitlement_status().state, EntitlementState::Locked);

    record.set_level(10).unwrap();
    assert_eq!(record.entitlement_status().remaining, 3);

    submit_allocation(&mut record, &AllocationRequest::plus_two(Ability::Dexterity)).unwrap();
    submit_allocation(&mut record, &AllocationRequest::plus_two(Ability::Dexterity)).unwrap();
    assert_eq!(record.final_stats().dexterity, 19);

    // Two spent; level 4 would only grant one.
    assert_eq!(
        record.set_level(4).unwrap_err(),
        LevelChangeError::BelowSpent {
            level: 4,
            cap: 1,
            spent: 2
        }
    );
    // Level 8 grants exactly two.
    assert_eq!(record.set_level(8).unwrap().state, EntitlementState::Exhausted);
}

#[test]
fn test_progress_matches_cap() {
    for class in CharacterClass::all() {
        for level in 1..=20 {
            let reached = schedule_progress(*class, level)
                .iter()
                .filter(|step| step.reached)
                .count() as u8;
            assert_eq!(reached, compute_cap(*class, level), "{class} {level}");
        }
    }
}

#[test]
fn test_rejections_leave_record_untouched() {
    let mut record = character(CharacterClass::Paladin, 8, AbilityScores::new(15, 10, 13, 8, 10, 19));
    let before = record.clone();

    let attempts = [
        AllocationRequest::plus_two(Ability::Charisma),
        AllocationRequest {
            primary: Ability::Strength,
            amount: 2,
            secondary: Some(Ability::Constitution),
        },
        AllocationRequest::split(Ability::Strength, Ability::Strength),
        AllocationRequest {
            primary: Ability::Strength,
            amount: 1,
            secondary: None,
        },
    ];
    for request in &attempts {
        assert!(submit_allocation(&mut record, request).is_err(), "{request}");
    }
    assert_eq!(record, before);
}
