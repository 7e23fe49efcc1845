//! Ability score rolling.
//!
//! Scores are rolled 4d6, dropping the lowest die. Every roll has a
//! `*_with_rng` form so callers (and tests) can supply a seeded source.

use crate::abilities::AbilityScores;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of d6 rolled per ability score.
const DICE_PER_SCORE: usize = 4;

/// One 4d6-drop-lowest roll with its dice kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRoll {
    /// The four dice in the order they were rolled.
    pub dice: [u8; DICE_PER_SCORE],
    /// Index into `dice` of the discarded die.
    pub dropped: usize,
}

impl AbilityRoll {
    /// Roll four d6 using the given RNG.
    pub fn roll_with_rng<R: Rng>(rng: &mut R) -> Self {
        let dice: [u8; DICE_PER_SCORE] = std::array::from_fn(|_| rng.gen_range(1..=6));
        Self::from_dice(dice)
    }

    /// Build a roll from known dice. The first lowest die is the one dropped.
    pub fn from_dice(dice: [u8; DICE_PER_SCORE]) -> Self {
        let dropped = dice
            .iter()
            .enumerate()
            .min_by_key(|&(i, &d)| (d, i))
            .map(|(i, _)| i)
            .unwrap_or(0);
        Self { dice, dropped }
    }

    /// Sum of the three kept dice, always in 3..=18.
    pub fn total(&self) -> u8 {
        self.dice
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.dropped)
            .map(|(_, &d)| d)
            .sum()
    }

    /// Dice with the dropped one in parentheses, e.g. `[6, 5, (1), 4]`.
    pub fn dice_display(&self) -> String {
        let shown: Vec<String> = self
            .dice
            .iter()
            .enumerate()
            .map(|(i, d)| {
                if i == self.dropped {
                    format!("({d})")
                } else {
                    d.to_string()
                }
            })
            .collect();
        format!("[{}]", shown.join(", "))
    }
}

impl fmt::Display for AbilityRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.dice_display(), self.total())
    }
}

/// Roll 4d6, drop lowest, for a single ability score.
pub fn roll_ability_score() -> u8 {
    roll_ability_score_with_rng(&mut rand::thread_rng())
}

/// Roll a single ability score with a specific RNG.
pub fn roll_ability_score_with_rng<R: Rng>(rng: &mut R) -> u8 {
    AbilityRoll::roll_with_rng(rng).total()
}

/// Roll one score per ability, in canonical order.
///
/// Unlike a sorted array, each roll lands directly on its ability.
pub fn roll_ability_scores_with_rng<R: Rng>(
    rng: &mut R,
) -> (AbilityScores, [AbilityRoll; 6]) {
    let rolls: [AbilityRoll; 6] = std::array::from_fn(|_| AbilityRoll::roll_with_rng(rng));
    let scores = AbilityScores::from_array(rolls.map(|r| r.total()));
    (scores, rolls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roll_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let score = roll_ability_score_with_rng(&mut rng);
            assert!((3..=18).contains(&score));
        }
    }

    #[test]
    fn test_thread_rng_roll_range() {
        for _ in 0..100 {
            assert!((3..=18).contains(&roll_ability_score()));
        }
    }

    #[test]
    fn test_drop_lowest() {
        let roll = AbilityRoll::from_dice([3, 6, 1, 5]);
        assert_eq!(roll.dropped, 2);
        assert_eq!(roll.total(), 14);
        assert_eq!(roll.dice_display(), "[3, 6, (1), 5]");
        assert_eq!(roll.to_string(), "[3, 6, (1), 5] = 14");
    }

    #[test]
    fn test_drop_only_one_of_tied_lowest() {
        let roll = AbilityRoll::from_dice([2, 2, 2, 2]);
        assert_eq!(roll.dropped, 0);
        assert_eq!(roll.total(), 6);
    }

    #[test]
    fn test_seeded_rolls_are_reproducible() {
        let (a, rolls_a) = roll_ability_scores_with_rng(&mut StdRng::seed_from_u64(42));
        let (b, rolls_b) = roll_ability_scores_with_rng(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(rolls_a, rolls_b);
        for (roll, (_, score)) in rolls_a.iter().zip(a.iter()) {
            assert_eq!(roll.total(), score);
        }
    }
}
