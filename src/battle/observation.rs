use std::collections::BTreeMap;

use crate::battle::conditions::PokemonConditionType;
use crate::battle::state::{BattleState, GameState};
use crate::config::BattleConfig;
use crate::player::BattlePlayer;
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::{PokemonType, StatType};
use serde::{Deserialize, Serialize};

/// Read-only view of a battle between turns, for agents, encoders and CLIs.
/// Snapshots are only ever taken between `step` calls, so they never show a
/// partially applied turn.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleSnapshot {
    pub round: u32,
    pub max_rounds: u32,
    pub game_state: GameState,
    pub terminal: bool,
    pub winner: Option<usize>,
    pub players: [PlayerSnapshot; 2],
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub name: String,
    pub active_index: usize,
    pub team: Vec<PokemonSnapshot>,
    pub stat_stages: BTreeMap<StatType, i8>,
    pub confused: bool,
    pub inventory: BTreeMap<String, u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PokemonSnapshot {
    pub species: String,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub current_hp: u16,
    pub max_hp: u16,
    pub status: Option<StatusCondition>,
    pub moves: Vec<MoveSnapshot>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveSnapshot {
    pub name: String,
    pub pp: u8,
    pub max_pp: u8,
}

impl BattleSnapshot {
    pub fn from_battle(state: &BattleState, config: &BattleConfig) -> Self {
        BattleSnapshot {
            round: state.round,
            max_rounds: config.max_rounds,
            game_state: state.game_state,
            terminal: state.game_state.is_terminal(),
            winner: state.game_state.winner(),
            players: [
                PlayerSnapshot::from_player(&state.players[0]),
                PlayerSnapshot::from_player(&state.players[1]),
            ],
        }
    }

    pub fn active_pokemon(&self, player_index: usize) -> Option<&PokemonSnapshot> {
        let player = self.players.get(player_index)?;
        player.team.get(player.active_index)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl PlayerSnapshot {
    fn from_player(player: &BattlePlayer) -> Self {
        PlayerSnapshot {
            name: player.player_name.clone(),
            active_index: player.active_pokemon_index,
            team: player.team.iter().map(PokemonSnapshot::from_pokemon).collect(),
            stat_stages: player
                .stat_stages
                .iter()
                .filter(|(_, stage)| **stage != 0)
                .map(|(stat, stage)| (*stat, *stage))
                .collect(),
            confused: player.has_condition(PokemonConditionType::Confused),
            inventory: player
                .inventory
                .iter()
                .map(|(name, slot)| (name.clone(), slot.quantity))
                .collect(),
        }
    }
}

impl PokemonSnapshot {
    fn from_pokemon(pokemon: &PokemonInst) -> Self {
        PokemonSnapshot {
            species: pokemon.name.clone(),
            level: pokemon.level,
            types: pokemon.types.clone(),
            current_hp: pokemon.current_hp(),
            max_hp: pokemon.max_hp(),
            status: pokemon.status,
            moves: pokemon
                .moves
                .iter()
                .flatten()
                .map(|instance| MoveSnapshot {
                    name: instance.data.name.clone(),
                    pp: instance.pp,
                    max_pp: instance.max_pp(),
                })
                .collect(),
        }
    }
}
