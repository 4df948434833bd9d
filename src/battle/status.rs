//! Status condition rules: who can be afflicted, what happens at the end of
//! each turn, what stops a Pokemon from acting, and what cures it.

use crate::battle::commands::{BattleCommand, PlayerTarget};
use crate::battle::rng::BattleRng;
use crate::battle::state::{ActionFailureReason, BattleEvent};
use crate::config::BattleConfig;
use crate::pokemon::{PokemonInst, StatusCondition};
use log::debug;
use schema::{PokemonType, StatusType};

/// How a status can stop its holder from acting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prevention {
    None,
    /// Rolls `paralysis_full_chance` on every action attempt.
    Chance,
    /// Skips actions while the counter is above zero, then cures itself.
    Countdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    pub status: StatusType,
    pub immune_types: &'static [PokemonType],
    /// Deals a fraction of max HP at the end of every turn.
    pub residual_damage: bool,
    pub prevention: Prevention,
    pub cured_on_switch: bool,
}

pub const STATUS_RULES: [StatusRule; 5] = [
    StatusRule {
        status: StatusType::Burn,
        immune_types: &[PokemonType::Fire],
        residual_damage: true,
        prevention: Prevention::None,
        cured_on_switch: false,
    },
    StatusRule {
        status: StatusType::Paralysis,
        immune_types: &[PokemonType::Electric],
        residual_damage: false,
        prevention: Prevention::Chance,
        cured_on_switch: false,
    },
    StatusRule {
        status: StatusType::Poison,
        immune_types: &[PokemonType::Poison, PokemonType::Steel],
        residual_damage: true,
        prevention: Prevention::None,
        cured_on_switch: false,
    },
    StatusRule {
        status: StatusType::Sleep,
        immune_types: &[],
        residual_damage: false,
        prevention: Prevention::Countdown,
        cured_on_switch: false,
    },
    StatusRule {
        status: StatusType::Freeze,
        immune_types: &[PokemonType::Ice],
        residual_damage: false,
        prevention: Prevention::Countdown,
        cured_on_switch: true,
    },
];

pub fn rule_for(status: StatusType) -> &'static StatusRule {
    match status {
        StatusType::Burn => &STATUS_RULES[0],
        StatusType::Paralysis => &STATUS_RULES[1],
        StatusType::Poison => &STATUS_RULES[2],
        StatusType::Sleep => &STATUS_RULES[3],
        StatusType::Freeze => &STATUS_RULES[4],
    }
}

pub fn is_immune(status: StatusType, types: &[PokemonType]) -> bool {
    rule_for(status)
        .immune_types
        .iter()
        .any(|immune| types.contains(immune))
}

/// A status can only land on a healthy, non-fainted, non-immune Pokemon.
pub fn can_inflict(pokemon: &PokemonInst, status: StatusType) -> bool {
    !pokemon.is_fainted() && pokemon.status.is_none() && !is_immune(status, &pokemon.types)
}

/// Build the runtime condition for a freshly inflicted status, rolling any
/// duration it carries.
pub fn roll_condition(status: StatusType, config: &BattleConfig, rng: &mut BattleRng) -> StatusCondition {
    match status {
        StatusType::Burn => StatusCondition::Burn,
        StatusType::Paralysis => StatusCondition::Paralysis,
        StatusType::Poison => StatusCondition::Poison,
        StatusType::Sleep => StatusCondition::Sleep(rng.range_inclusive(
            config.sleep_turns_min,
            config.sleep_turns_max,
            "sleep duration",
        )),
        StatusType::Freeze => StatusCondition::Freeze(rng.range_inclusive(
            config.freeze_turns_min,
            config.freeze_turns_max,
            "freeze duration",
        )),
    }
}

/// Attempt to inflict `status` on the active Pokemon of `player_index`.
/// Eligibility is checked before any roll; an ineligible target consumes no
/// randomness and yields no commands.
pub fn try_inflict(
    player_index: usize,
    pokemon: &PokemonInst,
    status: StatusType,
    chance: u8,
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    if !can_inflict(pokemon, status) {
        return Vec::new();
    }
    if !rng.percent(chance, "status infliction") {
        return Vec::new();
    }

    let condition = roll_condition(status, config, rng);
    debug!("{} (player {}) afflicted with {:?}", pokemon.name, player_index, condition);
    vec![
        BattleCommand::SetPokemonStatus {
            target: PlayerTarget::from_index(player_index),
            status: Some(condition),
        },
        BattleCommand::EmitEvent(BattleEvent::PokemonStatusApplied {
            player_index,
            target: pokemon.name.clone(),
            status: condition,
        }),
    ]
}

/// Roll the held status's action prevention at the start of the holder's own
/// action. Returns the commands to apply and, if the action is lost, why.
pub fn check_action_prevention(
    player_index: usize,
    pokemon: &PokemonInst,
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> (Vec<BattleCommand>, Option<ActionFailureReason>) {
    let target = PlayerTarget::from_index(player_index);
    let Some(status) = pokemon.status else {
        return (Vec::new(), None);
    };
    let Some(rule) = status.status_type().map(rule_for) else {
        return (Vec::new(), None);
    };

    let failed = |reason: ActionFailureReason| {
        BattleCommand::EmitEvent(BattleEvent::ActionFailed {
            player_index,
            reason,
        })
    };

    match (rule.prevention, status) {
        (Prevention::Chance, _) => {
            if rng.chance(config.paralysis_full_chance, "full paralysis") {
                let reason = ActionFailureReason::IsParalyzed;
                (vec![failed(reason.clone())], Some(reason))
            } else {
                (Vec::new(), None)
            }
        }
        (Prevention::Countdown, StatusCondition::Sleep(0) | StatusCondition::Freeze(0)) => {
            // Countdown finished: cured, and the action goes ahead
            let commands = vec![
                BattleCommand::SetPokemonStatus {
                    target,
                    status: None,
                },
                BattleCommand::EmitEvent(BattleEvent::PokemonStatusRemoved {
                    player_index,
                    target: pokemon.name.clone(),
                    status,
                }),
            ];
            (commands, None)
        }
        (Prevention::Countdown, StatusCondition::Sleep(turns)) => {
            let reason = ActionFailureReason::IsAsleep;
            let commands = vec![
                BattleCommand::SetPokemonStatus {
                    target,
                    status: Some(StatusCondition::Sleep(turns - 1)),
                },
                failed(reason.clone()),
            ];
            (commands, Some(reason))
        }
        (Prevention::Countdown, StatusCondition::Freeze(turns)) => {
            let reason = ActionFailureReason::IsFrozen;
            let commands = vec![
                BattleCommand::SetPokemonStatus {
                    target,
                    status: Some(StatusCondition::Freeze(turns - 1)),
                },
                failed(reason.clone()),
            ];
            (commands, Some(reason))
        }
        _ => (Vec::new(), None),
    }
}

/// End-of-turn damage for the held status, if it deals any.
pub fn residual_damage(pokemon: &PokemonInst, config: &BattleConfig) -> Option<u16> {
    if pokemon.is_fainted() {
        return None;
    }
    let status = pokemon.status?.status_type()?;
    if !rule_for(status).residual_damage {
        return None;
    }
    let fraction = match status {
        StatusType::Poison => config.poison_fraction,
        _ => config.burn_fraction,
    };
    Some((pokemon.max_hp() / fraction.max(1)).max(1))
}

/// Clear a status that does not survive switching out. Returns what was cured.
pub fn cure_on_switch_out(pokemon: &mut PokemonInst) -> Option<StatusCondition> {
    let held = pokemon.status?;
    let rule = rule_for(held.status_type()?);
    if rule.cured_on_switch {
        pokemon.status = None;
        Some(held)
    } else {
        None
    }
}

/// Whether a cure restricted to `whitelist` (or any status, when `None`)
/// would remove the held status.
pub fn cure_applies(pokemon: &PokemonInst, whitelist: Option<&[StatusType]>) -> bool {
    let Some(held) = pokemon.status.and_then(|s| s.status_type()) else {
        return false;
    };
    whitelist.map_or(true, |allowed| allowed.contains(&held))
}
