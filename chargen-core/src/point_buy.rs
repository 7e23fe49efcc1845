//! Point-buy allocation and validation.
//!
//! Scores start at 8 and each tier up to 15 has a fixed cost against a
//! 27-point pool. Over- and under-spending are reported as warnings so the
//! caller can show them and let the user correct the allocation.

use crate::abilities::{Ability, AbilityScores, InputDomainError};
use crate::identity::CharacterClass;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Standard 5e cost table, ordered by score.
const STANDARD_COSTS: &[(u8, u8)] = &[
    (8, 0),
    (9, 1),
    (10, 2),
    (11, 3),
    (12, 4),
    (13, 5),
    (14, 7),
    (15, 9),
];

/// Total points available for point buy.
pub const POINT_BUY_TOTAL: u8 = 27;

/// Score non-priority abilities are raised to by auto-optimize.
pub const MID_TIER: u8 = 10;

/// A cost table plus the pool it is spent from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointBudget {
    costs: &'static [(u8, u8)],
    total: u8,
}

/// Result of pricing an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub spent: u8,
    /// Negative when over budget.
    pub remaining: i16,
    pub valid: bool,
}

/// Non-fatal point-buy conditions surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BudgetWarning {
    #[error("Point buy exceeds {total} points ({spent} spent, over by {})", .spent - .total)]
    BudgetExceeded { spent: u8, total: u8 },

    #[error("{remaining} point(s) left unspent")]
    UnspentPoints { remaining: u8 },
}

impl Allocation {
    /// The warning to show for this allocation, if any.
    pub fn warning(&self, total: u8) -> Option<BudgetWarning> {
        match self.remaining {
            r if r < 0 => Some(BudgetWarning::BudgetExceeded {
                spent: self.spent,
                total,
            }),
            0 => None,
            r => Some(BudgetWarning::UnspentPoints { remaining: r as u8 }),
        }
    }
}

impl Default for PointBudget {
    fn default() -> Self {
        Self::standard()
    }
}

impl PointBudget {
    /// The PHB table: 8..=15 against 27 points.
    pub const fn standard() -> Self {
        Self {
            costs: STANDARD_COSTS,
            total: POINT_BUY_TOTAL,
        }
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    /// Lowest purchasable score.
    pub fn floor(&self) -> u8 {
        self.costs.first().map(|&(score, _)| score).unwrap_or(0)
    }

    /// Highest purchasable score.
    pub fn top(&self) -> u8 {
        self.costs.last().map(|&(score, _)| score).unwrap_or(0)
    }

    /// Cost of a single score, or `None` outside the table.
    pub fn cost(&self, score: u8) -> Option<u8> {
        self.costs
            .iter()
            .find(|&&(s, _)| s == score)
            .map(|&(_, cost)| cost)
    }

    /// Reject any score outside the priced range.
    pub fn check_domain(&self, scores: &AbilityScores) -> Result<(), InputDomainError> {
        scores.check_range(self.floor()..=self.top(), "point buy")
    }

    /// Price `current` against this budget.
    pub fn allocate(&self, current: &AbilityScores) -> Result<Allocation, InputDomainError> {
        self.check_domain(current)?;

        let spent: u8 = current
            .iter()
            .map(|(_, score)| self.cost(score).unwrap_or(0))
            .sum();
        let remaining = self.total as i16 - spent as i16;

        Ok(Allocation {
            spent,
            remaining,
            valid: remaining >= 0,
        })
    }

    /// Deterministic allocation favouring `priorities`.
    ///
    /// Priority abilities go to the top tier while the pool allows, in the
    /// order given. Every other ability is then raised to [`MID_TIER`] in
    /// canonical order if that single step still fits.
    pub fn auto_optimize(&self, priorities: Option<[Ability; 2]>) -> AbilityScores {
        let floor = self.floor();
        let floor_cost = self.cost(floor).unwrap_or(0);
        let mut scores = AbilityScores::uniform(floor);
        let mut allocated: u8 = floor_cost * 6;

        let priorities: &[Ability] = match &priorities {
            Some(pair) => pair,
            None => &[],
        };
        for &ability in priorities {
            let step = self.cost(self.top()).unwrap_or(0) - floor_cost;
            if allocated + step <= self.total {
                scores.set(ability, self.top());
                allocated += step;
            }
        }

        let mid_cost = self.cost(MID_TIER).unwrap_or(floor_cost);
        for ability in Ability::all() {
            if priorities.contains(&ability) {
                continue;
            }
            let step = mid_cost - floor_cost;
            if allocated + step <= self.total {
                scores.set(ability, MID_TIER);
                allocated += step;
            }
        }

        debug!(?priorities, allocated, "Auto-optimized point buy");
        scores
    }

    /// [`auto_optimize`](Self::auto_optimize) using the class's registered pair.
    pub fn auto_optimize_for_class(&self, class: CharacterClass) -> AbilityScores {
        self.auto_optimize(class.priority_abilities())
    }
}
