use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Source of every random decision made during resolution.
///
/// Each draw names the decision it feeds (`"Accuracy"`, `"Critical Hit"`, ...)
/// so that a trace of a turn reads as a list of rolls. Implementations only
/// provide `next_below`; the helpers decide when a draw is unnecessary
/// (certain or impossible outcomes never consume one).
pub trait RandomSource {
    /// Uniform draw in `0..bound`. `bound` is at least 1.
    fn next_below(&mut self, bound: u32, reason: &str) -> u32;

    /// Percentile roll in `1..=100`.
    fn roll_percent(&mut self, reason: &str) -> u8 {
        (self.next_below(100, reason) + 1) as u8
    }

    /// Succeeds when a percentile roll is at most `chance`.
    fn check_percent(&mut self, chance: u8, reason: &str) -> bool {
        if chance >= 100 {
            return true;
        }
        if chance == 0 {
            return false;
        }
        self.roll_percent(reason) <= chance
    }

    /// Succeeds with probability `numerator / denominator`.
    fn chance(&mut self, numerator: u32, denominator: u32, reason: &str) -> bool {
        if numerator >= denominator {
            return true;
        }
        if numerator == 0 {
            return false;
        }
        self.next_below(denominator, reason) < numerator
    }

    /// Uniform draw in `min..=max`.
    fn range_inclusive(&mut self, min: u32, max: u32, reason: &str) -> u32 {
        if max <= min {
            return min;
        }
        min + self.next_below(max - min + 1, reason)
    }
}

/// Seeded source owned by a single encounter.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
    draws: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, bound: u32, reason: &str) -> u32 {
        let value = self.rng.random_range(0..bound.max(1));
        self.draws += 1;
        trace!(draw = self.draws, bound, value, reason, "rng draw");
        value
    }
}

/// Scripted source for tests and replays.
///
/// Outcomes are percentiles in `1..=100`; each draw maps its outcome onto the
/// requested bound, so `50` is "a middling roll" whatever the bound is.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<u8>,
    index: usize,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self { outcomes, index: 0 }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        if self.index >= self.outcomes.len() {
            panic!(
                "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = self.outcomes[self.index].clamp(1, 100);

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        self.index += 1;
        outcome
    }

    /// Outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.outcomes.len().saturating_sub(self.index)
    }
}

impl RandomSource for TurnRng {
    fn next_below(&mut self, bound: u32, reason: &str) -> u32 {
        let outcome = self.next_outcome(reason) as u32;
        let value = ((outcome - 1) * bound.max(1)) / 100;
        trace!(outcome, bound, value, reason, "scripted rng draw");
        value
    }
}
