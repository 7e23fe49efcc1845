//! Ability score improvement entitlements.
//!
//! A class earns one improvement at each level of its schedule. Each
//! improvement is spent as +2 to one ability or +1 to two different
//! abilities, never pushing a score past [`ABILITY_CEILING`]. Spent
//! improvements are permanent.

use crate::abilities::{Ability, AbilityScores, InputDomainError, ABILITY_CEILING};
use crate::character::CharacterRecord;
use crate::identity::CharacterClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Levels granting an improvement for classes without their own schedule.
pub const DEFAULT_IMPROVEMENT_LEVELS: &[u8] = &[4, 8, 12, 16, 19];

/// Errors from validating an improvement allocation.
///
/// Each one rejects the single allocation and leaves the record untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImprovementError {
    #[error("Cannot improve {ability}: would exceed maximum of {max} (currently {current})", max = ABILITY_CEILING)]
    CeilingExceeded { ability: Ability, current: u8 },

    #[error("Invalid improvement: {0}")]
    InvalidShape(&'static str),

    #[error("Cannot apply both improvements to {0}")]
    DuplicateTarget(Ability),

    #[error("No ability score improvements remaining ({spent} of {cap} used)")]
    NoEntitlementRemaining { cap: u8, spent: u8 },
}

// ============================================================================
// Schedule
// ============================================================================

/// The levels at which a class earns improvements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImprovementSchedule {
    levels: &'static [u8],
}

/// One schedule entry and whether the character has reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStep {
    pub level: u8,
    pub reached: bool,
}

impl ImprovementSchedule {
    pub fn for_class(class: CharacterClass) -> Self {
        Self {
            levels: class
                .data()
                .improvement_levels
                .unwrap_or(DEFAULT_IMPROVEMENT_LEVELS),
        }
    }

    pub fn levels(&self) -> &'static [u8] {
        self.levels
    }

    /// Number of schedule entries at or below `level`.
    pub fn cap_at(&self, level: u8) -> u8 {
        self.levels.iter().filter(|&&l| l <= level).count() as u8
    }

    /// Every entry with whether `level` has reached it.
    pub fn progress(&self, level: u8) -> Vec<ScheduleStep> {
        self.levels
            .iter()
            .map(|&l| ScheduleStep {
                level: l,
                reached: l <= level,
            })
            .collect()
    }

    /// The first schedule entry above `level`, if any.
    pub fn next_after(&self, level: u8) -> Option<u8> {
        self.levels.iter().copied().find(|&l| l > level)
    }
}

/// Improvements earned by `class` at `level`.
pub fn compute_cap(class: CharacterClass, level: u8) -> u8 {
    ImprovementSchedule::for_class(class).cap_at(level)
}

/// The class schedule annotated with reached/pending flags.
pub fn schedule_progress(class: CharacterClass, level: u8) -> Vec<ScheduleStep> {
    ImprovementSchedule::for_class(class).progress(level)
}

// ============================================================================
// Entitlement status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntitlementState {
    /// Nothing earned yet.
    Locked,
    /// At least one improvement left to spend.
    Available,
    /// Everything earned has been spent.
    Exhausted,
}

impl EntitlementState {
    pub fn name(&self) -> &'static str {
        match self {
            EntitlementState::Locked => "locked",
            EntitlementState::Available => "available",
            EntitlementState::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for EntitlementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementStatus {
    pub cap: u8,
    pub spent: u8,
    pub remaining: u8,
    pub state: EntitlementState,
}

impl EntitlementStatus {
    pub fn new(cap: u8, spent: u8) -> Self {
        let remaining = cap.saturating_sub(spent);
        let state = if cap == 0 {
            EntitlementState::Locked
        } else if remaining > 0 {
            EntitlementState::Available
        } else {
            EntitlementState::Exhausted
        };
        Self {
            cap,
            spent,
            remaining,
            state,
        }
    }
}

impl fmt::Display for EntitlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} improvement(s) used, {} remaining ({})",
            self.spent, self.cap, self.remaining, self.state
        )
    }
}

/// Entitlement status of `record`.
pub fn entitlement_status(record: &CharacterRecord) -> EntitlementStatus {
    record.entitlement_status()
}

// ============================================================================
// Allocation requests
// ============================================================================

/// A raw allocation as submitted by the caller.
///
/// `secondary`, when present, always receives +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub primary: Ability,
    pub amount: u8,
    pub secondary: Option<Ability>,
}

impl AllocationRequest {
    /// +2 to one ability.
    pub fn plus_two(ability: Ability) -> Self {
        Self {
            primary: ability,
            amount: 2,
            secondary: None,
        }
    }

    /// +1 to each of two abilities.
    pub fn split(first: Ability, second: Ability) -> Self {
        Self {
            primary: first,
            amount: 1,
            secondary: Some(second),
        }
    }
}

impl fmt::Display for AllocationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.primary.abbreviation(), self.amount)?;
        if let Some(second) = self.secondary {
            write!(f, ", {}+1", second.abbreviation())?;
        }
        Ok(())
    }
}

impl FromStr for AllocationRequest {
    type Err = InputDomainError;

    /// Parses `STR+2`, `STR+1 DEX+1` or `str+1,dex+1`. A bare ability name
    /// counts as +1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InputDomainError::UnknownName {
            kind: "improvement",
            value: s.to_string(),
        };

        let mut parts = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(|part| -> Result<(Ability, u8), InputDomainError> {
                match part.split_once('+') {
                    Some((name, amount)) => {
                        let amount = amount.parse::<u8>().map_err(|_| malformed())?;
                        Ok((name.parse::<Ability>()?, amount))
                    }
                    None => Ok((part.parse::<Ability>()?, 1)),
                }
            });

        let (primary, amount) = parts.next().ok_or_else(malformed)??;
        let secondary = match parts.next() {
            Some(part) => {
                let (ability, second_amount) = part?;
                if second_amount != 1 {
                    return Err(malformed());
                }
                Some(ability)
            }
            None => None,
        };
        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self {
            primary,
            amount,
            secondary,
        })
    }
}

/// An allocation that passed shape validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImprovementAllocation {
    /// +2 to one ability.
    Single(Ability),
    /// +1 to each of two different abilities.
    Split(Ability, Ability),
}

impl ImprovementAllocation {
    /// `(ability, bonus)` pairs this allocation applies.
    pub fn increments(&self) -> Vec<(Ability, u8)> {
        match *self {
            ImprovementAllocation::Single(a) => vec![(a, 2)],
            ImprovementAllocation::Split(a, b) => vec![(a, 1), (b, 1)],
        }
    }
}

/// Before and after values for one ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub ability: Ability,
    pub before: u8,
    pub after: u8,
}

impl fmt::Display for ScoreChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.ability, self.before, self.after)
    }
}

/// Result of an accepted allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub allocation: ImprovementAllocation,
    pub changes: Vec<ScoreChange>,
    pub scores: AbilityScores,
    pub remaining: u8,
}

// ============================================================================
// Validation
// ============================================================================

fn check_ceiling(scores: &AbilityScores, ability: Ability, bonus: u8) -> Result<(), ImprovementError> {
    let current = scores.get(ability);
    if current as u16 + bonus as u16 > ABILITY_CEILING as u16 {
        return Err(ImprovementError::CeilingExceeded { ability, current });
    }
    Ok(())
}

/// Validate `request` against current scores and entitlement.
///
/// Checks run in a fixed order and the first failure wins: primary ceiling,
/// shape, secondary ceiling, duplicate target, then remaining entitlement.
pub fn validate(
    scores: &AbilityScores,
    status: &EntitlementStatus,
    request: &AllocationRequest,
) -> Result<ImprovementAllocation, ImprovementError> {
    check_ceiling(scores, request.primary, request.amount)?;

    match (request.amount, request.secondary) {
        (1, Some(_)) | (2, None) => {}
        (2, Some(_)) => {
            return Err(ImprovementError::InvalidShape(
                "a +2 improvement cannot have a second ability",
            ))
        }
        (1, None) => {
            return Err(ImprovementError::InvalidShape(
                "+1 to a single ability needs a second ability",
            ))
        }
        _ => {
            return Err(ImprovementError::InvalidShape(
                "an improvement is +2 to one ability or +1 to two",
            ))
        }
    }

    let allocation = match request.secondary {
        Some(second) => {
            check_ceiling(scores, second, 1)?;
            if second == request.primary {
                return Err(ImprovementError::DuplicateTarget(second));
            }
            ImprovementAllocation::Split(request.primary, second)
        }
        None => ImprovementAllocation::Single(request.primary),
    };

    if status.state != EntitlementState::Available {
        return Err(ImprovementError::NoEntitlementRemaining {
            cap: status.cap,
            spent: status.spent,
        });
    }

    Ok(allocation)
}

fn changes_for(scores: &AbilityScores, allocation: &ImprovementAllocation) -> Vec<ScoreChange> {
    allocation
        .increments()
        .into_iter()
        .map(|(ability, bonus)| {
            let before = scores.get(ability);
            ScoreChange {
                ability,
                before,
                after: before + bonus,
            }
        })
        .collect()
}

/// What `request` would change, without applying it.
pub fn preview(
    record: &CharacterRecord,
    request: &AllocationRequest,
) -> Result<Vec<ScoreChange>, ImprovementError> {
    let allocation = validate(&record.final_stats, &record.entitlement_status(), request)?;
    Ok(changes_for(&record.final_stats, &allocation))
}

/// Validate and apply `request` to `record`.
///
/// On success the final scores and spend counter are updated in place. There
/// is no undo.
pub fn submit_allocation(
    record: &mut CharacterRecord,
    request: &AllocationRequest,
) -> Result<AllocationOutcome, ImprovementError> {
    let status = record.entitlement_status();
    let allocation = match validate(&record.final_stats, &status, request) {
        Ok(allocation) => allocation,
        Err(e) => {
            debug!(%request, error = %e, "Improvement rejected");
            return Err(e);
        }
    };

    let changes = changes_for(&record.final_stats, &allocation);
    for (ability, bonus) in allocation.increments() {
        record.final_stats.add(ability, bonus);
    }
    record.improvements_spent += 1;

    let remaining = record.entitlement_status().remaining;
    info!(
        character = %record.name,
        %request,
        remaining,
        "Applied ability score improvement"
    );

    Ok(AllocationOutcome {
        allocation,
        changes,
        scores: record.final_stats,
        remaining,
    })
}
