use crate::config::BattleConfig;
use crate::player::{BattlePlayer, MAX_STAT_STAGE};
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::{MoveCategory, StatType};

/// Stage multipliers for the five battle stats, indexed by `stage + 6`.
/// Negative stages: 2 / (2 + |stage|). Positive stages: (2 + stage) / 2.
const STAT_STAGE_MULTIPLIERS: [(u32, u32); 13] = [
    (2, 8),
    (2, 7),
    (2, 6),
    (2, 5),
    (2, 4),
    (2, 3),
    (2, 2),
    (3, 2),
    (4, 2),
    (5, 2),
    (6, 2),
    (7, 2),
    (8, 2),
];

/// Accuracy/evasion multipliers, indexed by `stage + 6`.
/// Negative stages: 3 / (3 + |stage|). Positive stages: (3 + stage) / 3.
const ACCURACY_STAGE_MULTIPLIERS: [(u32, u32); 13] = [
    (3, 9),
    (3, 8),
    (3, 7),
    (3, 6),
    (3, 5),
    (3, 4),
    (3, 3),
    (4, 3),
    (5, 3),
    (6, 3),
    (7, 3),
    (8, 3),
    (9, 3),
];

fn stage_index(stage: i8) -> usize {
    (stage.clamp(-MAX_STAT_STAGE, MAX_STAT_STAGE) + MAX_STAT_STAGE) as usize
}

/// Apply stat stage multipliers. The result is floored and never below 1.
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    let (numerator, denominator) = STAT_STAGE_MULTIPLIERS[stage_index(stage)];
    let scaled = base_stat as u32 * numerator / denominator;
    scaled.clamp(1, u16::MAX as u32) as u16
}

pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let (numerator, denominator) = ACCURACY_STAGE_MULTIPLIERS[stage_index(stage)];
    numerator as f64 / denominator as f64
}

/// The attacking and defending stat keys a move category uses
pub fn offense_defense_stats(category: MoveCategory) -> Option<(StatType, StatType)> {
    match category {
        MoveCategory::Physical => Some((StatType::Attack, StatType::Defense)),
        MoveCategory::Special => Some((StatType::SpecialAttack, StatType::SpecialDefense)),
        MoveCategory::Status => None,
    }
}

/// Attack stat for a move, including stages. A critical hit ignores negative
/// stages.
pub fn effective_attack(
    pokemon: &PokemonInst,
    player: &BattlePlayer,
    category: MoveCategory,
    critical: bool,
) -> u16 {
    let Some((attack_stat, _)) = offense_defense_stats(category) else {
        return 0;
    };
    let mut stage = player.get_stat_stage(attack_stat);
    if critical {
        stage = stage.max(0);
    }
    apply_stat_stage_multiplier(pokemon.stat(attack_stat), stage)
}

/// Defense stat against a move, including stages. A critical hit ignores
/// positive stages.
pub fn effective_defense(
    pokemon: &PokemonInst,
    player: &BattlePlayer,
    category: MoveCategory,
    critical: bool,
) -> u16 {
    let Some((_, defense_stat)) = offense_defense_stats(category) else {
        return 0;
    };
    let mut stage = player.get_stat_stage(defense_stat);
    if critical {
        stage = stage.min(0);
    }
    apply_stat_stage_multiplier(pokemon.stat(defense_stat), stage)
}

/// Calculate effective speed including stat stages and paralysis
pub fn effective_speed(pokemon: &PokemonInst, player: &BattlePlayer, config: &BattleConfig) -> u16 {
    let stage = player.get_stat_stage(StatType::Speed);
    let mut speed = apply_stat_stage_multiplier(pokemon.stat(StatType::Speed), stage);

    if matches!(pokemon.status, Some(StatusCondition::Paralysis)) {
        speed = (speed / config.paralysis_speed_divisor.max(1)).max(1);
    }

    speed
}

/// Probability in `[0, 1]` that a move with `accuracy` percent connects,
/// after the attacker's accuracy and the defender's evasion stages.
/// `None` accuracy never misses.
pub fn hit_probability(
    accuracy: Option<u8>,
    attacker_player: &BattlePlayer,
    defender_player: &BattlePlayer,
) -> f64 {
    let Some(base_accuracy) = accuracy else {
        return 1.0;
    };
    let accuracy_stage = attacker_player.get_stat_stage(StatType::Accuracy);
    let evasion_stage = defender_player.get_stat_stage(StatType::Evasion);
    let adjusted_stage = (accuracy_stage - evasion_stage).clamp(-MAX_STAT_STAGE, MAX_STAT_STAGE);

    (base_accuracy as f64 / 100.0 * accuracy_stage_multiplier(adjusted_stage)).clamp(0.0, 1.0)
}
