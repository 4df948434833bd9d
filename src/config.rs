use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Tuning values for a battle. Passed explicitly to `Battle::new`; nothing in
/// the engine reads ambient settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BattleConfig {
    pub max_rounds: u32,
    pub critical_hit_chance: f64,
    pub critical_hit_multiplier: f64,
    pub same_type_bonus: f64,
    pub variance_min: f64,
    pub variance_max: f64,
    pub paralysis_full_chance: f64,
    pub paralysis_speed_divisor: u16,
    /// Burn damage per turn is `max_hp / burn_fraction`.
    pub burn_fraction: u16,
    pub poison_fraction: u16,
    pub sleep_turns_min: u8,
    pub sleep_turns_max: u8,
    pub freeze_turns_min: u8,
    pub freeze_turns_max: u8,
    pub confusion_turns_min: u8,
    pub confusion_turns_max: u8,
    pub confusion_self_hit_chance: f64,
    pub confusion_self_hit_power: u16,
    /// Struggle recoil is `max_hp / struggle_recoil_fraction`.
    pub struggle_recoil_fraction: u16,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            max_rounds: 100,
            critical_hit_chance: 1.0 / 16.0,
            critical_hit_multiplier: 1.5,
            same_type_bonus: 1.5,
            variance_min: 0.85,
            variance_max: 1.0,
            paralysis_full_chance: 0.25,
            paralysis_speed_divisor: 2,
            burn_fraction: 8,
            poison_fraction: 8,
            sleep_turns_min: 1,
            sleep_turns_max: 3,
            freeze_turns_min: 1,
            freeze_turns_max: 3,
            confusion_turns_min: 2,
            confusion_turns_max: 4,
            confusion_self_hit_chance: 0.5,
            confusion_self_hit_power: 40,
            struggle_recoil_fraction: 4,
        }
    }
}

impl BattleConfig {
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Parse a configuration from RON text. Missing fields keep their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig =
            ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(out_of_range("max_rounds", "must be at least 1"));
        }
        for (field, value) in [
            ("critical_hit_chance", self.critical_hit_chance),
            ("paralysis_full_chance", self.paralysis_full_chance),
            ("confusion_self_hit_chance", self.confusion_self_hit_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(out_of_range(field, "must be a probability in 0..=1"));
            }
        }
        if self.critical_hit_multiplier < 1.0 {
            return Err(out_of_range("critical_hit_multiplier", "must be at least 1"));
        }
        if self.same_type_bonus < 1.0 {
            return Err(out_of_range("same_type_bonus", "must be at least 1"));
        }
        if !(self.variance_min > 0.0
            && self.variance_min <= self.variance_max
            && self.variance_max <= 1.0)
        {
            return Err(out_of_range(
                "variance_min",
                "variance bounds must satisfy 0 < min <= max <= 1",
            ));
        }
        for (field, value) in [
            ("paralysis_speed_divisor", self.paralysis_speed_divisor),
            ("burn_fraction", self.burn_fraction),
            ("poison_fraction", self.poison_fraction),
            ("struggle_recoil_fraction", self.struggle_recoil_fraction),
        ] {
            if value == 0 {
                return Err(out_of_range(field, "divisor must be non-zero"));
            }
        }
        for (field, min, max) in [
            ("sleep_turns_min", self.sleep_turns_min, self.sleep_turns_max),
            ("freeze_turns_min", self.freeze_turns_min, self.freeze_turns_max),
            ("confusion_turns_min", self.confusion_turns_min, self.confusion_turns_max),
        ] {
            if min == 0 || min > max {
                return Err(out_of_range(field, "duration range must satisfy 1 <= min <= max"));
            }
        }
        Ok(())
    }
}

fn out_of_range(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        reason: reason.to_string(),
    }
}
