use crate::battle::engine::Battle;
use crate::battle::observation::BattleSnapshot;
use crate::battle::state::{BattleEvent, GameState};
use crate::errors::BattleResult;
use crate::player::PlayerAction;
use log::{debug, info};

/// How many times an agent is asked again after submitting an invalid action
pub const MAX_ACTION_ATTEMPTS: usize = 3;

/// Anything that can decide on a battle action: scripted, random, search
/// based or a human at a prompt. The engine never calls agents itself.
pub trait Agent {
    fn get_action(&mut self, snapshot: &BattleSnapshot, player_index: usize) -> PlayerAction;
}

/// Summary of a battle driven to completion by `run_battle`
#[derive(Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub winner: Option<usize>,
    pub rounds: u32,
    pub final_state: GameState,
    pub events: Vec<BattleEvent>,
}

/// Ask both agents for actions and step the battle until it concludes.
///
/// An agent that keeps submitting invalid actions gets `MAX_ACTION_ATTEMPTS`
/// tries before its last rejection is returned as the error.
pub fn run_battle(
    battle: &mut Battle,
    player1: &mut dyn Agent,
    player2: &mut dyn Agent,
) -> BattleResult<BattleOutcome> {
    let mut events = Vec::new();

    while !battle.is_terminal() {
        let snapshot = battle.snapshot();
        let action1 = request_action(battle, &snapshot, player1, 0)?;
        let action2 = request_action(battle, &snapshot, player2, 1)?;

        let result = battle.step(action1, action2)?;
        debug!("Round {} finished in {:?}", result.round, result.new_state);
        events.extend(result.events);
    }

    let outcome = BattleOutcome {
        winner: battle.winner(),
        rounds: battle.round(),
        final_state: battle.game_state(),
        events,
    };
    info!(
        "Battle finished after {} rounds: {:?}",
        outcome.rounds, outcome.final_state
    );
    Ok(outcome)
}

fn request_action(
    battle: &Battle,
    snapshot: &BattleSnapshot,
    agent: &mut dyn Agent,
    player_index: usize,
) -> BattleResult<PlayerAction> {
    let mut attempt = 1;
    loop {
        let action = agent.get_action(snapshot, player_index);
        match battle.validate_action(player_index, &action) {
            Ok(()) => return Ok(action),
            Err(error) if attempt >= MAX_ACTION_ATTEMPTS => return Err(error),
            Err(_) => attempt += 1,
        }
    }
}
