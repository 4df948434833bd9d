use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The single source of randomness owned by a battle.
///
/// Every draw is a unit value in `[0, 1)`; all rolls (accuracy, critical hits,
/// variance, status chances, durations, tie-breaks) are derived from it so a
/// scripted sequence can stand in for the seeded generator in tests.
#[derive(Debug, Clone)]
pub enum BattleRng {
    Seeded(StdRng),
    Scripted { values: Vec<f64>, index: usize },
}

impl BattleRng {
    pub fn from_seed(seed: u64) -> Self {
        BattleRng::Seeded(StdRng::seed_from_u64(seed))
    }

    /// Replays `values` in order. Panics once the script runs out, naming the
    /// roll that asked for more.
    pub fn scripted(values: Vec<f64>) -> Self {
        BattleRng::Scripted { values, index: 0 }
    }

    pub fn next_unit(&mut self, reason: &str) -> f64 {
        let value = match self {
            BattleRng::Seeded(rng) => rng.random::<f64>(),
            BattleRng::Scripted { values, index } => {
                let Some(value) = values.get(*index).copied() else {
                    panic!(
                        "BattleRng script exhausted! Tried to get a value for: '{}'. Need more values.",
                        reason
                    );
                };
                *index += 1;
                value.clamp(0.0, 1.0 - f64::EPSILON)
            }
        };
        trace!("[RNG] {:.4} for: {}", value, reason);
        value
    }

    /// True with probability `p`. Certain and impossible outcomes do not draw.
    pub fn chance(&mut self, p: f64, reason: &str) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.next_unit(reason) < p
    }

    /// Percentage-based chance, as used by move effects.
    pub fn percent(&mut self, percent: u8, reason: &str) -> bool {
        self.chance(percent as f64 / 100.0, reason)
    }

    pub fn coin_flip(&mut self, reason: &str) -> bool {
        self.next_unit(reason) < 0.5
    }

    /// Uniform integer in `lo..=hi`. A single-value range does not draw.
    pub fn range_inclusive(&mut self, lo: u8, hi: u8, reason: &str) -> u8 {
        if lo >= hi {
            return lo;
        }
        let span = (hi - lo) as f64 + 1.0;
        let offset = (self.next_unit(reason) * span).floor() as u8;
        (lo + offset).min(hi)
    }

    /// Uniform float in `[lo, hi)`.
    pub fn variance(&mut self, lo: f64, hi: f64, reason: &str) -> f64 {
        lo + (hi - lo) * self.next_unit(reason)
    }
}
