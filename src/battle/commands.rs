use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState};
use crate::battle::status;
use crate::errors::ExecutionError;
use crate::pokemon::{PokemonInst, StatusCondition};
use log::debug;
use schema::StatType;

/// Player target for commands - provides type safety over raw indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerTarget {
    Player1,
    Player2,
}

impl PlayerTarget {
    pub fn to_index(self) -> usize {
        match self {
            PlayerTarget::Player1 => 0,
            PlayerTarget::Player2 => 1,
        }
    }

    pub fn opponent(self) -> PlayerTarget {
        match self {
            PlayerTarget::Player1 => PlayerTarget::Player2,
            PlayerTarget::Player2 => PlayerTarget::Player1,
        }
    }

    /// Index 0 is Player1; any other index is Player2. Player indices are
    /// checked at the API boundary before commands are built.
    pub fn from_index(index: usize) -> PlayerTarget {
        if index == 0 {
            PlayerTarget::Player1
        } else {
            PlayerTarget::Player2
        }
    }
}

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Direct state changes
    SetGameState(GameState),
    IncrementRound,

    // Pokemon modifications. Damage always lands on the active Pokemon;
    // healing and curing may target any team slot (items).
    DealDamage {
        target: PlayerTarget,
        amount: u16,
    },
    DealResidualDamage {
        target: PlayerTarget,
        amount: u16,
    },
    HealPokemon {
        target: PlayerTarget,
        pokemon_index: usize,
        amount: u16,
    },
    SetPokemonStatus {
        target: PlayerTarget,
        status: Option<StatusCondition>,
    },
    CureStatus {
        target: PlayerTarget,
        pokemon_index: usize,
    },
    UseMovePp {
        target: PlayerTarget,
        move_index: usize,
    },

    // Player state changes
    ChangeStatStage {
        target: PlayerTarget,
        stat: StatType,
        delta: i8,
    },
    AddCondition {
        target: PlayerTarget,
        condition: PokemonCondition,
    },
    RemoveCondition {
        target: PlayerTarget,
        condition_type: PokemonConditionType,
    },
    ConsumeItem {
        target: PlayerTarget,
        item: String,
    },
    SwitchPokemon {
        target: PlayerTarget,
        new_pokemon_index: usize,
    },

    // Battle flow
    EmitEvent(BattleEvent),
}

/// Execute a batch of commands in order, stopping at the first failure
pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    for command in commands {
        execute_command(command, state, bus)?;
    }
    Ok(())
}

fn team_member_mut(
    state: &mut BattleState,
    target: PlayerTarget,
    pokemon_index: usize,
) -> Result<&mut PokemonInst, ExecutionError> {
    state.players[target.to_index()]
        .team
        .get_mut(pokemon_index)
        .ok_or(ExecutionError::InvalidPokemonIndex(pokemon_index))
}

/// Apply damage to the active Pokemon, reporting it with the given event
/// builder and announcing a faint if this damage caused one.
fn execute_damage_command<F>(
    target: PlayerTarget,
    amount: u16,
    state: &mut BattleState,
    bus: &mut EventBus,
    make_event: F,
) where
    F: FnOnce(usize, &PokemonInst, u16) -> BattleEvent,
{
    let player_index = target.to_index();
    let pokemon = state.players[player_index].active_pokemon_mut();
    let dealt = amount.min(pokemon.current_hp());
    let did_faint = pokemon.take_damage(amount);

    bus.push(make_event(player_index, &*pokemon, dealt));

    if did_faint {
        debug!("{} (player {}) fainted", pokemon.name, player_index);
        bus.push(BattleEvent::PokemonFainted {
            player_index,
            pokemon: pokemon.name.clone(),
        });
    }
}

pub fn execute_command(
    command: BattleCommand,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> Result<(), ExecutionError> {
    match command {
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
            Ok(())
        }
        BattleCommand::DealDamage { target, amount } => {
            execute_damage_command(target, amount, state, bus, |player_index, pokemon, dealt| {
                BattleEvent::DamageDealt {
                    player_index,
                    target: pokemon.name.clone(),
                    damage: dealt,
                    remaining_hp: pokemon.current_hp(),
                }
            });
            Ok(())
        }
        BattleCommand::DealResidualDamage { target, amount } => {
            let held_status = state.players[target.to_index()].active_pokemon().status;
            execute_damage_command(target, amount, state, bus, |player_index, pokemon, dealt| {
                BattleEvent::PokemonStatusDamage {
                    player_index,
                    target: pokemon.name.clone(),
                    status: held_status.unwrap_or(StatusCondition::Faint),
                    damage: dealt,
                    remaining_hp: pokemon.current_hp(),
                }
            });
            Ok(())
        }
        BattleCommand::HealPokemon {
            target,
            pokemon_index,
            amount,
        } => {
            let pokemon = team_member_mut(state, target, pokemon_index)?;
            let healed = pokemon.heal(amount);
            if healed > 0 {
                bus.push(BattleEvent::PokemonHealed {
                    player_index: target.to_index(),
                    target: pokemon.name.clone(),
                    amount: healed,
                    new_hp: pokemon.current_hp(),
                });
            }
            Ok(())
        }
        BattleCommand::SetPokemonStatus { target, status } => {
            state.players[target.to_index()].active_pokemon_mut().status = status;
            Ok(())
        }
        BattleCommand::CureStatus {
            target,
            pokemon_index,
        } => {
            let pokemon = team_member_mut(state, target, pokemon_index)?;
            if let Some(old_status) = pokemon.status.filter(|s| *s != StatusCondition::Faint) {
                pokemon.status = None;
                bus.push(BattleEvent::PokemonStatusRemoved {
                    player_index: target.to_index(),
                    target: pokemon.name.clone(),
                    status: old_status,
                });
            }
            Ok(())
        }
        BattleCommand::UseMovePp { target, move_index } => {
            let pokemon = state.players[target.to_index()].active_pokemon_mut();
            let move_instance = pokemon
                .move_at_mut(move_index)
                .ok_or(ExecutionError::InvalidMove(move_index))?;
            move_instance.use_move();
            Ok(())
        }
        BattleCommand::ChangeStatStage {
            target,
            stat,
            delta,
        } => {
            let player_index = target.to_index();
            let player = &mut state.players[player_index];
            let old_stage = player.get_stat_stage(stat);
            let new_stage = player.modify_stat_stage(stat, delta);
            let target_name = player.active_pokemon().name.clone();
            if new_stage == old_stage {
                bus.push(BattleEvent::StatChangeBlocked {
                    player_index,
                    target: target_name,
                    stat,
                });
            } else {
                bus.push(BattleEvent::StatStageChanged {
                    player_index,
                    target: target_name,
                    stat,
                    old_stage,
                    new_stage,
                });
            }
            Ok(())
        }
        BattleCommand::AddCondition { target, condition } => {
            state.players[target.to_index()].add_condition(condition);
            Ok(())
        }
        BattleCommand::RemoveCondition {
            target,
            condition_type,
        } => {
            state.players[target.to_index()].remove_condition(condition_type);
            Ok(())
        }
        BattleCommand::ConsumeItem { target, item } => {
            state.players[target.to_index()].consume_item(&item)?;
            Ok(())
        }
        BattleCommand::SwitchPokemon {
            target,
            new_pokemon_index,
        } => {
            let player_index = target.to_index();
            let player = &mut state.players[player_index];
            if new_pokemon_index >= player.team.len() {
                return Err(ExecutionError::InvalidPokemonIndex(new_pokemon_index));
            }

            let outgoing = player.active_pokemon_mut();
            let old_pokemon = outgoing.name.clone();
            if let Some(cured) = status::cure_on_switch_out(outgoing) {
                bus.push(BattleEvent::PokemonStatusRemoved {
                    player_index,
                    target: old_pokemon.clone(),
                    status: cured,
                });
            }

            player.switch_pokemon(new_pokemon_index)?;
            bus.push(BattleEvent::PokemonSwitched {
                player_index,
                old_pokemon,
                new_pokemon: player.active_pokemon().name.clone(),
            });
            Ok(())
        }
        BattleCommand::SetGameState(new_state) => {
            state.game_state = new_state;
            Ok(())
        }
        BattleCommand::IncrementRound => {
            state.round += 1;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_battle, TestPokemonBuilder};
    use pretty_assertions::assert_eq;

    fn create_test_battle_state() -> BattleState {
        create_test_battle(
            TestPokemonBuilder::new("Pikachu", 50)
                .with_stats(100, 80, 60, 80, 60, 100)
                .build(),
            TestPokemonBuilder::new("Charmander", 50)
                .with_stats(100, 80, 60, 80, 60, 100)
                .build(),
        )
    }

    #[test]
    fn test_player_target_conversion() {
        assert_eq!(PlayerTarget::Player1.to_index(), 0);
        assert_eq!(PlayerTarget::Player2.to_index(), 1);
        assert_eq!(PlayerTarget::from_index(1), PlayerTarget::Player2);
        assert_eq!(PlayerTarget::Player1.opponent(), PlayerTarget::Player2);
    }

    #[test]
    fn test_deal_damage_command() {
        let mut state = create_test_battle_state();
        let mut bus = EventBus::new();

        execute_command_batch(
            vec![BattleCommand::DealDamage {
                target: PlayerTarget::Player2,
                amount: 30,
            }],
            &mut state,
            &mut bus,
        )
        .unwrap();

        assert_eq!(state.players[1].active_pokemon().current_hp(), 70);
        assert_eq!(
            bus.events(),
            &[BattleEvent::DamageDealt {
                player_index: 1,
                target: "Charmander".to_string(),
                damage: 30,
                remaining_hp: 70,
            }]
        );
    }

    #[test]
    fn test_lethal_damage_reports_actual_hp_lost_and_faint() {
        let mut state = create_test_battle_state();
        let mut bus = EventBus::new();

        execute_command(
            BattleCommand::DealDamage {
                target: PlayerTarget::Player1,
                amount: 250,
            },
            &mut state,
            &mut bus,
        )
        .unwrap();

        assert!(state.players[0].active_pokemon().is_fainted());
        assert!(matches!(
            bus.events()[0],
            BattleEvent::DamageDealt { damage: 100, remaining_hp: 0, .. }
        ));
        assert!(matches!(
            bus.events()[1],
            BattleEvent::PokemonFainted { player_index: 0, .. }
        ));
    }

    #[test]
    fn test_change_stat_stage_command_reports_blocked_changes() {
        let mut state = create_test_battle_state();
        let mut bus = EventBus::new();
        state.players[0].set_stat_stage(StatType::Attack, 6);

        execute_command_batch(
            vec![
                BattleCommand::ChangeStatStage {
                    target: PlayerTarget::Player1,
                    stat: StatType::Attack,
                    delta: 2,
                },
                BattleCommand::ChangeStatStage {
                    target: PlayerTarget::Player1,
                    stat: StatType::Defense,
                    delta: -1,
                },
            ],
            &mut state,
            &mut bus,
        )
        .unwrap();

        assert_eq!(state.players[0].get_stat_stage(StatType::Attack), 6);
        assert_eq!(state.players[0].get_stat_stage(StatType::Defense), -1);
        assert!(matches!(bus.events()[0], BattleEvent::StatChangeBlocked { .. }));
        assert!(matches!(
            bus.events()[1],
            BattleEvent::StatStageChanged { old_stage: 0, new_stage: -1, .. }
        ));
    }

    #[test]
    fn test_heal_command_targets_team_slot() {
        let mut state = create_test_battle_state();
        let mut bus = EventBus::new();
        state.players[0].active_pokemon_mut().set_hp(40);

        execute_command(
            BattleCommand::HealPokemon {
                target: PlayerTarget::Player1,
                pokemon_index: 0,
                amount: 20,
            },
            &mut state,
            &mut bus,
        )
        .unwrap();
        assert_eq!(state.players[0].active_pokemon().current_hp(), 60);

        let result = execute_command(
            BattleCommand::HealPokemon {
                target: PlayerTarget::Player1,
                pokemon_index: 4,
                amount: 20,
            },
            &mut state,
            &mut bus,
        );
        assert_eq!(result, Err(ExecutionError::InvalidPokemonIndex(4)));
    }

    #[test]
    fn test_set_game_state_and_round_commands() {
        let mut state = create_test_battle_state();
        let mut bus = EventBus::new();

        execute_command_batch(
            vec![
                BattleCommand::IncrementRound,
                BattleCommand::SetGameState(GameState::Draw),
            ],
            &mut state,
            &mut bus,
        )
        .unwrap();

        assert_eq!(state.round, 1);
        assert_eq!(state.game_state, GameState::Draw);
        assert!(bus.is_empty());
    }
}
