use crate::battle::engine::Battle;
use crate::battle::observation::BattleSnapshot;
use crate::battle::rng::BattleRng;
use crate::battle::runner::Agent;
use crate::battle::state::BattleState;
use crate::config::BattleConfig;
use crate::errors::BattleResult;
use crate::player::{BattlePlayer, PlayerAction};
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::{
    BaseStats, ItemData, ItemEffect, MoveCategory, MoveData, MoveEffect, PokemonType, SpeciesData,
    StatusType,
};

/// A builder for creating test Pokemon instances with common defaults.
///
/// Every test Pokemon is a single-typed Normal species with base 50 in every
/// stat and Tackle as its only move, unless told otherwise.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Pikachu", 25)
///     .with_types(vec![PokemonType::Electric])
///     .with_status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    name: String,
    level: u8,
    types: Vec<PokemonType>,
    moves: Option<Vec<MoveData>>,
    stats: Option<[u16; 6]>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
}

impl TestPokemonBuilder {
    pub fn new(name: &str, level: u8) -> Self {
        Self {
            name: name.to_string(),
            level,
            types: vec![PokemonType::Normal],
            moves: None,
            stats: None,
            status: None,
            current_hp: None,
        }
    }

    pub fn with_types(mut self, types: Vec<PokemonType>) -> Self {
        self.types = types;
        self
    }

    pub fn with_moves(mut self, moves: Vec<MoveData>) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Overrides the calculated stats: max HP, Attack, Defense, Sp. Attack,
    /// Sp. Defense, Speed.
    pub fn with_stats(mut self, hp: u16, atk: u16, def: u16, spa: u16, spd: u16, spe: u16) -> Self {
        self.stats = Some([hp, atk, def, spa, spd, spe]);
        self
    }

    pub fn with_status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP for the test Pokemon. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> PokemonInst {
        let species = SpeciesData {
            name: self.name.clone(),
            types: self.types,
            base_stats: BaseStats {
                hp: 50,
                attack: 50,
                defense: 50,
                sp_attack: 50,
                sp_defense: 50,
                speed: 50,
            },
        };
        let moves = self.moves.unwrap_or_else(|| vec![tackle()]);

        let mut pokemon = match PokemonInst::new(&species, self.level, None, moves) {
            Ok(pokemon) => pokemon,
            Err(err) => panic!("Failed to build test Pokemon {}: {}", self.name, err),
        };

        if let Some(stats) = self.stats {
            pokemon.curr_stats = stats;
        }
        pokemon.set_hp_to_max();
        pokemon.status = self.status;

        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp);
        }

        pokemon
    }
}

/// Creates a test player with a given name and team and an empty bag.
pub fn create_test_player(name: &str, team: Vec<PokemonInst>) -> BattlePlayer {
    assert_ok(BattlePlayer::new(name, team, Vec::new()).map_err(Into::into))
}

/// Creates a standard 1v1 battle state for testing.
pub fn create_test_battle(p1_pokemon: PokemonInst, p2_pokemon: PokemonInst) -> BattleState {
    let player1 = create_test_player("Player 1", vec![p1_pokemon]);
    let player2 = create_test_player("Player 2", vec![p2_pokemon]);

    BattleState::new(player1, player2)
}

/// Creates a battle controller over two prepared players with default tuning.
pub fn create_test_engine(player1: BattlePlayer, player2: BattlePlayer, rng: BattleRng) -> Battle {
    assert_ok(Battle::new(player1, player2, BattleConfig::default(), rng))
}

/// A scripted RNG that returns 0.5 for every draw: accuracy checks below 100%
/// hit, no critical hits, mid variance, no paralysis, no confusion self-hit,
/// and player 2 wins every tie-break.
pub fn predictable_rng() -> BattleRng {
    BattleRng::scripted(vec![0.5; 200])
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}

// === Move catalog used by tests ===

pub fn tackle_like(name: &str, move_type: PokemonType, power: u16) -> MoveData {
    MoveData {
        name: name.to_string(),
        move_type,
        category: MoveCategory::Physical,
        power,
        accuracy: Some(100),
        max_pp: 35,
        priority: 0,
        effects: Vec::new(),
    }
}

pub fn tackle() -> MoveData {
    tackle_like("Tackle", PokemonType::Normal, 40)
}

pub fn quick_attack() -> MoveData {
    MoveData {
        priority: 1,
        max_pp: 30,
        ..tackle_like("Quick Attack", PokemonType::Normal, 40)
    }
}

pub fn status_move(name: &str, move_type: PokemonType, effects: Vec<MoveEffect>) -> MoveData {
    MoveData {
        name: name.to_string(),
        move_type,
        category: MoveCategory::Status,
        power: 0,
        accuracy: Some(100),
        max_pp: 15,
        priority: 0,
        effects,
    }
}

/// Does nothing; lets a side pass its turn.
pub fn splash() -> MoveData {
    status_move("Splash", PokemonType::Normal, Vec::new())
}

pub fn ember() -> MoveData {
    MoveData {
        name: "Ember".to_string(),
        move_type: PokemonType::Fire,
        category: MoveCategory::Special,
        power: 40,
        accuracy: Some(100),
        max_pp: 25,
        priority: 0,
        effects: vec![MoveEffect::Inflict {
            status: StatusType::Burn,
            chance: 10,
        }],
    }
}

pub fn will_o_wisp() -> MoveData {
    status_move(
        "Will-O-Wisp",
        PokemonType::Fire,
        vec![MoveEffect::Inflict {
            status: StatusType::Burn,
            chance: 100,
        }],
    )
}

pub fn confuse_ray() -> MoveData {
    status_move(
        "Confuse Ray",
        PokemonType::Ghost,
        vec![MoveEffect::Confuse { chance: 100 }],
    )
}

// === Items ===

pub fn potion() -> ItemData {
    ItemData {
        name: "Potion".to_string(),
        effect: ItemEffect::RestoreHp(20),
    }
}

pub fn burn_heal() -> ItemData {
    ItemData {
        name: "Burn Heal".to_string(),
        effect: ItemEffect::CureStatus(Some(vec![StatusType::Burn])),
    }
}

pub fn full_restore() -> ItemData {
    ItemData {
        name: "Full Restore".to_string(),
        effect: ItemEffect::FullRestore,
    }
}

// === Agents ===

/// Switches when forced, otherwise uses the first move with PP left, and
/// struggles once everything is spent.
pub struct FirstMoveAgent;

impl Agent for FirstMoveAgent {
    fn get_action(&mut self, snapshot: &BattleSnapshot, player_index: usize) -> PlayerAction {
        let player = &snapshot.players[player_index];
        let active = &player.team[player.active_index];

        if snapshot.game_state.requires_replacement(player_index) || active.current_hp == 0 {
            let team_index = player
                .team
                .iter()
                .enumerate()
                .position(|(i, pokemon)| i != player.active_index && pokemon.current_hp > 0)
                .unwrap_or(0);
            return PlayerAction::SwitchPokemon { team_index };
        }

        match active.moves.iter().position(|m| m.pp > 0) {
            Some(move_index) => PlayerAction::UseMove { move_index },
            None => PlayerAction::Struggle,
        }
    }
}

/// Replays a fixed list of actions, then repeats the last one.
pub struct ScriptedAgent {
    pub actions: Vec<PlayerAction>,
    pub calls: usize,
}

impl ScriptedAgent {
    pub fn new(actions: Vec<PlayerAction>) -> Self {
        Self { actions, calls: 0 }
    }
}

impl Agent for ScriptedAgent {
    fn get_action(&mut self, _snapshot: &BattleSnapshot, _player_index: usize) -> PlayerAction {
        let index = self.calls.min(self.actions.len().saturating_sub(1));
        self.calls += 1;
        self.actions[index].clone()
    }
}
