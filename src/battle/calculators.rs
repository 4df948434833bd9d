use crate::battle::commands::{BattleCommand, PlayerTarget};
use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::battle::rng::BattleRng;
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState};
use crate::battle::stats::{effective_attack, effective_defense, hit_probability};
use crate::battle::status;
use crate::config::BattleConfig;
use crate::player::BattlePlayer;
use crate::pokemon::StatusCondition;
use log::debug;
use schema::{EffectTarget, MoveCategory, MoveData, MoveEffect, PokemonType};

/// Result of a single damage roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    /// False when the accuracy roll missed.
    pub hit: bool,
    pub critical: bool,
    pub effectiveness: f64,
}

impl DamageOutcome {
    fn missed(effectiveness: f64) -> Self {
        Self {
            damage: 0,
            hit: false,
            critical: false,
            effectiveness,
        }
    }
}

/// Damage before any random or type modifiers:
/// floor(floor((2 * level / 5 + 2) * power * attack / defense) / 50) + 2
pub fn base_damage(level: u8, power: u16, attack: u16, defense: u16) -> u32 {
    let level_factor = 2 * level as u64 / 5 + 2;
    let scaled = level_factor * power as u64 * attack as u64 / defense.max(1) as u64;
    (scaled / 50 + 2).min(u32::MAX as u64) as u32
}

/// Roll one use of `move_data` by the attacker's active Pokemon against the
/// defender's active Pokemon. Does not touch the battle state.
///
/// Rolls are drawn in a fixed order: accuracy, critical hit, variance. An
/// immune defender short-circuits before any roll.
pub fn compute_damage(
    attacker: &BattlePlayer,
    defender: &BattlePlayer,
    move_data: &MoveData,
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> DamageOutcome {
    let attacking_pokemon = attacker.active_pokemon();
    let defending_pokemon = defender.active_pokemon();

    let effectiveness = if move_data.is_damaging() {
        PokemonType::effectiveness_against(move_data.move_type, &defending_pokemon.types) as f64
    } else {
        1.0
    };
    if effectiveness == 0.0 {
        return DamageOutcome {
            damage: 0,
            hit: true,
            critical: false,
            effectiveness,
        };
    }

    let accuracy = hit_probability(move_data.accuracy, attacker, defender);
    if !rng.chance(accuracy, "accuracy") {
        return DamageOutcome::missed(effectiveness);
    }

    if !move_data.is_damaging() {
        return DamageOutcome {
            damage: 0,
            hit: true,
            critical: false,
            effectiveness,
        };
    }

    let critical = rng.chance(config.critical_hit_chance, "critical hit");

    let attack = effective_attack(attacking_pokemon, attacker, move_data.category, critical);
    let defense = effective_defense(defending_pokemon, defender, move_data.category, critical);
    let base = base_damage(attacking_pokemon.level, move_data.power, attack, defense);

    let mut modifier = effectiveness;
    if move_data.move_type != PokemonType::Typeless
        && attacking_pokemon.types.contains(&move_data.move_type)
    {
        modifier *= config.same_type_bonus;
    }
    if critical {
        modifier *= config.critical_hit_multiplier;
    }
    if move_data.category == MoveCategory::Physical
        && attacking_pokemon.status == Some(StatusCondition::Burn)
    {
        modifier *= 0.5;
    }
    modifier *= rng.variance(config.variance_min, config.variance_max, "damage variance");

    let damage = (base as f64 * modifier).floor().clamp(1.0, u16::MAX as f64) as u16;

    debug!(
        "{} -> {} with {}: base {}, atk {}, def {}, crit {}, x{} => {}",
        attacking_pokemon.name,
        defending_pokemon.name,
        move_data.name,
        base,
        attack,
        defense,
        critical,
        effectiveness,
        damage
    );

    DamageOutcome {
        damage,
        hit: true,
        critical,
        effectiveness,
    }
}

/// Whether a move does anything to the opposing Pokemon. Such moves fail
/// outright when the opponent has already fainted.
pub fn targets_opponent(move_data: &MoveData) -> bool {
    move_data.is_damaging()
        || move_data.effects.iter().any(|effect| match effect {
            MoveEffect::StatChange { target, .. } => *target == EffectTarget::Target,
            MoveEffect::Inflict { .. } | MoveEffect::Confuse { .. } => true,
            MoveEffect::Heal { .. } | MoveEffect::Recoil { .. } => false,
        })
}

/// Calculate the outcome of an attack attempt as a list of commands.
///
/// The caller has already checked that the attacker can act and has paid
/// the move's PP.
pub fn calculate_attack_outcome(
    state: &BattleState,
    attacker_index: usize,
    move_data: &MoveData,
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    let defender_index = 1 - attacker_index;
    let attacker_target = PlayerTarget::from_index(attacker_index);
    let defender_target = attacker_target.opponent();
    let attacker_player = &state.players[attacker_index];
    let defender_player = &state.players[defender_index];
    let attacker = attacker_player.active_pokemon();
    let defender = defender_player.active_pokemon();

    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        player_index: attacker_index,
        pokemon: attacker.name.clone(),
        move_name: move_data.name.clone(),
    })];

    if targets_opponent(move_data) && defender.is_fainted() {
        commands.push(BattleCommand::EmitEvent(BattleEvent::ActionFailed {
            player_index: attacker_index,
            reason: ActionFailureReason::TargetFainted,
        }));
        return commands;
    }

    let outcome = compute_damage(attacker_player, defender_player, move_data, config, rng);

    if !outcome.hit {
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveMissed {
            player_index: attacker_index,
            attacker: attacker.name.clone(),
            move_name: move_data.name.clone(),
        }));
        return commands;
    }

    if move_data.is_damaging() && outcome.effectiveness != 1.0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::AttackTypeEffectiveness {
            multiplier: outcome.effectiveness,
        }));
    }
    if outcome.effectiveness == 0.0 {
        return commands;
    }

    if outcome.critical {
        commands.push(BattleCommand::EmitEvent(BattleEvent::CriticalHit {
            player_index: attacker_index,
            attacker: attacker.name.clone(),
        }));
    }
    if outcome.damage > 0 {
        commands.push(BattleCommand::DealDamage {
            target: defender_target,
            amount: outcome.damage,
        });
    }

    // Secondary effects see the defender as it will be after the hit
    let defender_faints = outcome.damage >= defender.current_hp();

    if move_data.category == MoveCategory::Status {
        let already_confused = defender_player.has_condition(PokemonConditionType::Confused);
        let blocked = move_data.effects.iter().all(|effect| match effect {
            MoveEffect::Inflict { status, .. } => !status::can_inflict(defender, *status),
            MoveEffect::Confuse { .. } => already_confused,
            _ => false,
        });
        if blocked && !move_data.effects.is_empty() {
            let only_confuses = move_data
                .effects
                .iter()
                .all(|effect| matches!(effect, MoveEffect::Confuse { .. }));
            let reason = if only_confuses {
                ActionFailureReason::AlreadyConfused
            } else {
                ActionFailureReason::StatusImmune
            };
            commands.push(BattleCommand::EmitEvent(BattleEvent::ActionFailed {
                player_index: attacker_index,
                reason,
            }));
            return commands;
        }
    }

    for effect in &move_data.effects {
        match effect {
            MoveEffect::StatChange {
                target,
                stat,
                stages,
                chance,
            } => {
                let affected = match target {
                    EffectTarget::User => attacker_target,
                    EffectTarget::Target if defender_faints => continue,
                    EffectTarget::Target => defender_target,
                };
                if rng.percent(*chance, "stat change") {
                    commands.push(BattleCommand::ChangeStatStage {
                        target: affected,
                        stat: *stat,
                        delta: *stages,
                    });
                }
            }
            MoveEffect::Inflict { status, chance } => {
                if defender_faints {
                    continue;
                }
                commands.extend(status::try_inflict(
                    defender_index,
                    defender,
                    *status,
                    *chance,
                    config,
                    rng,
                ));
            }
            MoveEffect::Confuse { chance } => {
                if defender_faints || defender_player.has_condition(PokemonConditionType::Confused) {
                    continue;
                }
                if rng.percent(*chance, "confusion") {
                    let turns_remaining = rng.range_inclusive(
                        config.confusion_turns_min,
                        config.confusion_turns_max,
                        "confusion duration",
                    );
                    let condition = PokemonCondition::Confused { turns_remaining };
                    commands.push(BattleCommand::AddCondition {
                        target: defender_target,
                        condition: condition.clone(),
                    });
                    commands.push(BattleCommand::EmitEvent(BattleEvent::ConditionApplied {
                        player_index: defender_index,
                        target: defender.name.clone(),
                        condition,
                    }));
                }
            }
            MoveEffect::Heal { percent } => {
                let amount = (attacker.max_hp() as u32 * *percent as u32 / 100).max(1) as u16;
                commands.push(BattleCommand::HealPokemon {
                    target: attacker_target,
                    pokemon_index: attacker_player.active_pokemon_index,
                    amount,
                });
            }
            MoveEffect::Recoil { percent } => {
                let dealt = outcome.damage.min(defender.current_hp());
                if dealt > 0 {
                    let amount = (dealt as u32 * *percent as u32 / 100).max(1) as u16;
                    commands.push(BattleCommand::DealDamage {
                        target: attacker_target,
                        amount,
                    });
                }
            }
        }
    }

    commands
}

/// Struggle: a typeless hit that costs the user a fixed share of its max HP.
pub fn calculate_struggle_outcome(
    state: &BattleState,
    attacker_index: usize,
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    let struggle = crate::moves::struggle();
    let mut commands = calculate_attack_outcome(state, attacker_index, &struggle, config, rng);

    let attacker = state.players[attacker_index].active_pokemon();
    let hit_landed = commands
        .iter()
        .any(|command| matches!(command, BattleCommand::DealDamage { .. }));
    if hit_landed {
        let recoil = (attacker.max_hp() / config.struggle_recoil_fraction.max(1)).max(1);
        commands.push(BattleCommand::DealDamage {
            target: PlayerTarget::from_index(attacker_index),
            amount: recoil,
        });
    }
    commands
}

/// Roll the self-inflicted hit of a confused Pokemon against itself.
pub fn calculate_confusion_self_hit(
    state: &BattleState,
    player_index: usize,
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> Vec<BattleCommand> {
    let player = &state.players[player_index];
    let self_hit = crate::moves::confusion_self_hit(config.confusion_self_hit_power);
    let outcome = compute_damage(player, player, &self_hit, config, rng);

    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::ActionFailed {
        player_index,
        reason: ActionFailureReason::HurtItselfInConfusion,
    })];
    if outcome.hit && outcome.damage > 0 {
        commands.push(BattleCommand::DealDamage {
            target: PlayerTarget::from_index(player_index),
            amount: outcome.damage,
        });
    }
    commands
}
