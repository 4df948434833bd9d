use crate::battle::observation::BattleSnapshot;
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleState, GameState, TurnResult};
use crate::battle::turn_orchestrator::{next_game_state, resolve_turn};
use crate::battle::validation::{legal_actions, validate_player_action};
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleError, BattleResult};
use crate::player::{BattlePlayer, PlayerAction};
use log::{debug, warn};

/// One battle between two trainers. Owns the battle state, its configuration
/// and its random source; nothing is shared between instances.
#[derive(Debug, Clone)]
pub struct Battle {
    state: BattleState,
    initial_players: [BattlePlayer; 2],
    config: BattleConfig,
    rng: BattleRng,
}

impl Battle {
    pub fn new(
        player1: BattlePlayer,
        player2: BattlePlayer,
        config: BattleConfig,
        rng: BattleRng,
    ) -> BattleResult<Self> {
        config.validate()?;
        player1.validate()?;
        player2.validate()?;

        let initial_players = [player1.clone(), player2.clone()];
        let mut state = BattleState::new(player1, player2);
        state.game_state = opening_state(&state);

        Ok(Battle {
            state,
            initial_players,
            config,
            rng,
        })
    }

    /// Convenience constructor with a seeded random source
    pub fn from_seed(
        player1: BattlePlayer,
        player2: BattlePlayer,
        config: BattleConfig,
        seed: u64,
    ) -> BattleResult<Self> {
        Self::new(player1, player2, config, BattleRng::from_seed(seed))
    }

    /// Resolve one round from one action per side.
    ///
    /// Both actions are validated before anything changes. If resolution
    /// fails part-way the state is rolled back, so a half-applied turn is
    /// never observable.
    pub fn step(&mut self, action1: PlayerAction, action2: PlayerAction) -> BattleResult<TurnResult> {
        if self.is_terminal() {
            return Err(BattleError::BattleConcluded);
        }

        for (player_index, action) in [&action1, &action2].into_iter().enumerate() {
            self.validate_action(player_index, action)?;
        }

        let checkpoint = self.state.clone();
        let bus = match resolve_turn(&mut self.state, [action1, action2], &self.config, &mut self.rng) {
            Ok(bus) => bus,
            Err(error) => {
                self.state = checkpoint;
                return Err(error.into());
            }
        };

        debug!(
            "Round {} resolved with {} events, now {:?}",
            self.state.round,
            bus.len(),
            self.state.game_state
        );

        Ok(TurnResult::new(
            self.state.round,
            bus.into_events(),
            self.state.game_state,
        ))
    }

    /// Check an action without applying it.
    pub fn validate_action(&self, player_index: usize, action: &PlayerAction) -> BattleResult<()> {
        validate_player_action(&self.state, player_index, action).map_err(|source| {
            warn!(
                "Rejected action from player {}: {} ({})",
                player_index + 1,
                action,
                source
            );
            BattleError::InvalidAction {
                player_index,
                source,
            }
        })
    }

    /// Every action `player_index` may submit right now
    pub fn legal_actions(&self, player_index: usize) -> BattleResult<Vec<PlayerAction>> {
        if self.is_terminal() {
            return Err(BattleError::BattleConcluded);
        }
        if player_index >= self.state.players.len() {
            return Err(BattleError::InvalidAction {
                player_index,
                source: ActionError::InvalidPlayerIndex(player_index),
            });
        }
        Ok(legal_actions(&self.state, player_index))
    }

    /// Restore both trainers to how they entered the battle. The random
    /// stream is not rewound.
    pub fn reset(&mut self) {
        let [player1, player2] = self.initial_players.clone();
        self.state = BattleState::new(player1, player2);
        self.state.game_state = opening_state(&self.state);
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::from_battle(&self.state, &self.config)
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn game_state(&self) -> GameState {
        self.state.game_state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.game_state.is_terminal()
    }

    pub fn winner(&self) -> Option<usize> {
        self.state.game_state.winner()
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }
}

/// A team may be handed over with its lead already fainted; that side opens
/// with a replacement, or has lost outright if nobody can battle.
fn opening_state(state: &BattleState) -> GameState {
    let defeated = [state.players[0].is_defeated(), state.players[1].is_defeated()];
    match defeated {
        [true, true] => GameState::Draw,
        [true, false] => GameState::Player2Win,
        [false, true] => GameState::Player1Win,
        [false, false] => next_game_state(state),
    }
}
