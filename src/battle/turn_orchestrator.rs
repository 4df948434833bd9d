use std::cmp::Ordering;

use crate::battle::calculators::{
    calculate_attack_outcome, calculate_confusion_self_hit, calculate_struggle_outcome,
};
use crate::battle::commands::{execute_command_batch, BattleCommand, PlayerTarget};
use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::battle::rng::BattleRng;
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, EventBus, GameState};
use crate::battle::stats::effective_speed;
use crate::battle::status;
use crate::config::BattleConfig;
use crate::errors::ExecutionError;
use crate::player::PlayerAction;
use log::{debug, info};
use schema::ItemEffect;

/// Resolve one full round: order both actions, execute them, apply
/// end-of-turn effects, then decide what the battle waits for next.
///
/// Both actions must already have passed validation.
pub fn resolve_turn(
    battle_state: &mut BattleState,
    actions: [PlayerAction; 2],
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> Result<EventBus, ExecutionError> {
    let mut bus = EventBus::new();

    initialize_turn(battle_state, &mut bus)?;

    let ordered = determine_action_order(battle_state, &actions, config, rng);
    for (player_index, action) in ordered {
        execute_battle_action(player_index, &action, battle_state, &mut bus, config, rng)?;
    }

    execute_end_turn_phase(battle_state, &mut bus, config, rng)?;
    finalize_turn(battle_state, &mut bus, config)?;

    Ok(bus)
}

fn initialize_turn(battle_state: &mut BattleState, bus: &mut EventBus) -> Result<(), ExecutionError> {
    execute_command_batch(vec![BattleCommand::IncrementRound], battle_state, bus)?;
    bus.push(BattleEvent::TurnStarted {
        round: battle_state.round,
    });
    Ok(())
}

/// Sort key for an action. Fields compare in declaration order, higher first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActionPriority {
    pub action_priority: i8, // Switch: 6, Item: 5, Move: 0
    pub move_priority: i8,   // Only relevant for moves
    pub speed: u16,          // Effective speed
}

pub fn calculate_action_priority(
    player_index: usize,
    action: &PlayerAction,
    battle_state: &BattleState,
    config: &BattleConfig,
) -> ActionPriority {
    let player = &battle_state.players[player_index];
    let active_pokemon = player.active_pokemon();
    let speed = effective_speed(active_pokemon, player, config);

    match action {
        PlayerAction::SwitchPokemon { .. } => ActionPriority {
            action_priority: 6,
            move_priority: 0,
            speed,
        },
        PlayerAction::UseItem { .. } => ActionPriority {
            action_priority: 5,
            move_priority: 0,
            speed,
        },
        PlayerAction::UseMove { move_index } => ActionPriority {
            action_priority: 0,
            move_priority: active_pokemon
                .move_at(*move_index)
                .map_or(0, |instance| instance.data.priority),
            speed,
        },
        PlayerAction::Struggle => ActionPriority {
            action_priority: 0,
            move_priority: 0,
            speed,
        },
    }
}

/// Order the two submitted actions. A full tie on category, move priority
/// and speed is broken by a coin flip from the battle's RNG.
pub fn determine_action_order(
    battle_state: &BattleState,
    actions: &[PlayerAction; 2],
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> Vec<(usize, PlayerAction)> {
    let priorities = [
        calculate_action_priority(0, &actions[0], battle_state, config),
        calculate_action_priority(1, &actions[1], battle_state, config),
    ];

    let player1_first = match priorities[0].cmp(&priorities[1]) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => rng.coin_flip("turn order tie-break"),
    };
    let order = if player1_first { [0, 1] } else { [1, 0] };

    debug!(
        "Turn {} order: player {} ({:?}) then player {} ({:?})",
        battle_state.round,
        order[0] + 1,
        priorities[order[0]],
        order[1] + 1,
        priorities[order[1]]
    );

    order
        .into_iter()
        .map(|player_index| (player_index, actions[player_index].clone()))
        .collect()
}

pub fn execute_battle_action(
    player_index: usize,
    action: &PlayerAction,
    battle_state: &mut BattleState,
    bus: &mut EventBus,
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> Result<(), ExecutionError> {
    debug!("Player {} resolves: {}", player_index + 1, action);

    match action {
        PlayerAction::SwitchPokemon { team_index } => execute_command_batch(
            vec![BattleCommand::SwitchPokemon {
                target: PlayerTarget::from_index(player_index),
                new_pokemon_index: *team_index,
            }],
            battle_state,
            bus,
        ),
        PlayerAction::UseItem { item, target_index } => {
            execute_item(player_index, item, *target_index, battle_state, bus)
        }
        PlayerAction::UseMove { .. } | PlayerAction::Struggle => {
            if battle_state.players[player_index].active_pokemon().is_fainted() {
                bus.push(BattleEvent::ActionFailed {
                    player_index,
                    reason: ActionFailureReason::UserFainted,
                });
                return Ok(());
            }
            if !check_action_preventing_conditions(player_index, battle_state, bus, config, rng)? {
                return Ok(());
            }

            let commands = match action {
                PlayerAction::UseMove { move_index } => {
                    let move_data = battle_state.players[player_index]
                        .active_pokemon()
                        .move_at(*move_index)
                        .ok_or(ExecutionError::InvalidMove(*move_index))?
                        .data
                        .clone();
                    let mut commands = vec![BattleCommand::UseMovePp {
                        target: PlayerTarget::from_index(player_index),
                        move_index: *move_index,
                    }];
                    commands.extend(calculate_attack_outcome(
                        battle_state,
                        player_index,
                        &move_data,
                        config,
                        rng,
                    ));
                    commands
                }
                _ => calculate_struggle_outcome(battle_state, player_index, config, rng),
            };
            execute_command_batch(commands, battle_state, bus)
        }
    }
}

/// Run status prevention and confusion for the acting Pokemon.
/// Returns false when the action is lost.
fn check_action_preventing_conditions(
    player_index: usize,
    battle_state: &mut BattleState,
    bus: &mut EventBus,
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> Result<bool, ExecutionError> {
    let (commands, prevented) = status::check_action_prevention(
        player_index,
        battle_state.players[player_index].active_pokemon(),
        config,
        rng,
    );
    execute_command_batch(commands, battle_state, bus)?;
    if prevented.is_some() {
        return Ok(false);
    }

    let player = &battle_state.players[player_index];
    let Some(PokemonCondition::Confused { turns_remaining }) = player
        .active_pokemon_conditions
        .get(&PokemonConditionType::Confused)
        .cloned()
    else {
        return Ok(true);
    };

    let target = PlayerTarget::from_index(player_index);
    let pokemon_name = player.active_pokemon().name.clone();
    let turns_remaining = turns_remaining.saturating_sub(1);

    if turns_remaining == 0 {
        execute_command_batch(
            vec![
                BattleCommand::RemoveCondition {
                    target,
                    condition_type: PokemonConditionType::Confused,
                },
                BattleCommand::EmitEvent(BattleEvent::ConditionExpired {
                    player_index,
                    target: pokemon_name,
                    condition: PokemonCondition::Confused { turns_remaining: 0 },
                }),
            ],
            battle_state,
            bus,
        )?;
        return Ok(true);
    }

    execute_command_batch(
        vec![BattleCommand::AddCondition {
            target,
            condition: PokemonCondition::Confused { turns_remaining },
        }],
        battle_state,
        bus,
    )?;

    if rng.chance(config.confusion_self_hit_chance, "confusion self-hit") {
        let commands = calculate_confusion_self_hit(battle_state, player_index, config, rng);
        execute_command_batch(commands, battle_state, bus)?;
        return Ok(false);
    }
    Ok(true)
}

fn execute_item(
    player_index: usize,
    item_name: &str,
    target_index: Option<usize>,
    battle_state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    let target = PlayerTarget::from_index(player_index);
    let player = &battle_state.players[player_index];
    let item = player.usable_item(item_name)?.clone();
    let pokemon_index = target_index.unwrap_or(player.active_pokemon_index);
    let pokemon = player
        .team
        .get(pokemon_index)
        .ok_or(ExecutionError::InvalidPokemonIndex(pokemon_index))?;

    let mut commands = vec![
        BattleCommand::ConsumeItem {
            target,
            item: item.name.clone(),
        },
        BattleCommand::EmitEvent(BattleEvent::ItemUsed {
            player_index,
            item: item.name.clone(),
            target: pokemon.name.clone(),
        }),
    ];

    let missing_hp = pokemon.max_hp() - pokemon.current_hp();
    let heal = |amount: u16| BattleCommand::HealPokemon {
        target,
        pokemon_index,
        amount,
    };
    let cure = BattleCommand::CureStatus {
        target,
        pokemon_index,
    };

    let mut effects = Vec::new();
    match &item.effect {
        ItemEffect::RestoreHp(amount) => {
            if missing_hp > 0 {
                effects.push(heal(*amount));
            }
        }
        ItemEffect::CureStatus(whitelist) => {
            if status::cure_applies(pokemon, whitelist.as_deref()) {
                effects.push(cure);
            }
        }
        ItemEffect::FullRestore => {
            if missing_hp > 0 {
                effects.push(heal(missing_hp));
            }
            if status::cure_applies(pokemon, None) {
                effects.push(cure);
            }
        }
    }

    if effects.is_empty() {
        commands.push(BattleCommand::EmitEvent(BattleEvent::ItemHadNoEffect {
            player_index,
            item: item.name.clone(),
        }));
    } else {
        commands.extend(effects);
    }

    execute_command_batch(commands, battle_state, bus)
}

/// End-of-turn status damage for every active, non-fainted Pokemon. When both
/// sides take damage the faster side goes first.
pub fn execute_end_turn_phase(
    battle_state: &mut BattleState,
    bus: &mut EventBus,
    config: &BattleConfig,
    rng: &mut BattleRng,
) -> Result<(), ExecutionError> {
    let pending: Vec<(usize, u16)> = (0..2)
        .filter_map(|player_index| {
            status::residual_damage(battle_state.players[player_index].active_pokemon(), config)
                .map(|amount| (player_index, amount))
        })
        .collect();

    let mut ordered = pending;
    if ordered.len() == 2 {
        let speeds = [0, 1].map(|player_index| {
            let player = &battle_state.players[player_index];
            effective_speed(player.active_pokemon(), player, config)
        });
        let player1_first = match speeds[0].cmp(&speeds[1]) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => rng.coin_flip("end of turn order tie-break"),
        };
        if !player1_first {
            ordered.swap(0, 1);
        }
    }

    let commands = ordered
        .into_iter()
        .map(|(player_index, amount)| BattleCommand::DealResidualDamage {
            target: PlayerTarget::from_index(player_index),
            amount,
        })
        .collect();
    execute_command_batch(commands, battle_state, bus)
}

fn finalize_turn(
    battle_state: &mut BattleState,
    bus: &mut EventBus,
    config: &BattleConfig,
) -> Result<(), ExecutionError> {
    // Win conditions override everything else
    if let Some(concluded) = check_win_conditions(battle_state, bus, config) {
        execute_command_batch(vec![BattleCommand::SetGameState(concluded)], battle_state, bus)?;
        info!(
            "Battle concluded after round {}: {:?}",
            battle_state.round, concluded
        );
    } else {
        let next_state = next_game_state(battle_state);
        execute_command_batch(vec![BattleCommand::SetGameState(next_state)], battle_state, bus)?;
    }

    bus.push(BattleEvent::TurnEnded);
    Ok(())
}

/// Decide whether the battle is over, pushing the announcement events.
fn check_win_conditions(
    battle_state: &BattleState,
    bus: &mut EventBus,
    config: &BattleConfig,
) -> Option<GameState> {
    let player1_defeated = battle_state.players[0].is_defeated();
    let player2_defeated = battle_state.players[1].is_defeated();

    let concluded = match (player1_defeated, player2_defeated) {
        (true, true) => {
            bus.push(BattleEvent::PlayerDefeated { player_index: 0 });
            bus.push(BattleEvent::PlayerDefeated { player_index: 1 });
            GameState::Draw
        }
        (true, false) => {
            bus.push(BattleEvent::PlayerDefeated { player_index: 0 });
            GameState::Player2Win
        }
        (false, true) => {
            bus.push(BattleEvent::PlayerDefeated { player_index: 1 });
            GameState::Player1Win
        }
        (false, false) if battle_state.round >= config.max_rounds => {
            bus.push(BattleEvent::RoundLimitReached {
                round: battle_state.round,
            });
            GameState::Draw
        }
        (false, false) => return None,
    };

    bus.push(BattleEvent::BattleEnded {
        winner: concluded.winner(),
    });
    Some(concluded)
}

/// The state to wait in when the battle goes on: a replacement phase for
/// any side whose active Pokemon fainted, otherwise a normal turn.
pub fn next_game_state(battle_state: &BattleState) -> GameState {
    let player1_needs = battle_state.players[0].needs_replacement();
    let player2_needs = battle_state.players[1].needs_replacement();

    match (player1_needs, player2_needs) {
        (true, true) => GameState::WaitingForBothReplacements,
        (true, false) => GameState::WaitingForPlayer1Replacement,
        (false, true) => GameState::WaitingForPlayer2Replacement,
        (false, false) => GameState::WaitingForActions,
    }
}
