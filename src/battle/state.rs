use crate::battle::conditions::PokemonCondition;
use crate::player::BattlePlayer;
use crate::pokemon::StatusCondition;
use schema::StatType;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForActions,
    WaitingForPlayer1Replacement, // Player 1 must send out a new Pokemon after a faint
    WaitingForPlayer2Replacement, // Player 2 must send out a new Pokemon after a faint
    WaitingForBothReplacements,   // Both players must send out new Pokemon after faints
    Player1Win,
    Player2Win,
    Draw,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameState::Player1Win | GameState::Player2Win | GameState::Draw)
    }

    /// The winning player's index, if the battle has a winner
    pub fn winner(self) -> Option<usize> {
        match self {
            GameState::Player1Win => Some(0),
            GameState::Player2Win => Some(1),
            _ => None,
        }
    }

    /// True when `player_index` owes a replacement switch
    pub fn requires_replacement(self, player_index: usize) -> bool {
        match self {
            GameState::WaitingForPlayer1Replacement => player_index == 0,
            GameState::WaitingForPlayer2Replacement => player_index == 1,
            GameState::WaitingForBothReplacements => true,
            _ => false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    IsParalyzed,
    HurtItselfInConfusion,
    UserFainted,   // The acting Pokemon fainted before its turn came
    TargetFainted, // Nothing left to hit
    StatusImmune,  // The target cannot hold the status this move inflicts
    AlreadyConfused,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        round: u32,
    },
    TurnEnded,

    // Pokemon Actions
    PokemonSwitched {
        player_index: usize,
        old_pokemon: String,
        new_pokemon: String,
    },
    MoveUsed {
        player_index: usize,
        pokemon: String,
        move_name: String,
    },
    MoveMissed {
        player_index: usize,
        attacker: String,
        move_name: String,
    },
    CriticalHit {
        player_index: usize,
        attacker: String,
    },
    AttackTypeEffectiveness {
        multiplier: f64,
    },
    ItemUsed {
        player_index: usize,
        item: String,
        target: String,
    },
    ItemHadNoEffect {
        player_index: usize,
        item: String,
    },

    // Damage and Healing
    DamageDealt {
        player_index: usize,
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonHealed {
        player_index: usize,
        target: String,
        amount: u16,
        new_hp: u16,
    },
    PokemonFainted {
        player_index: usize,
        pokemon: String,
    },

    // Pokemon Status Conditions
    PokemonStatusApplied {
        player_index: usize,
        target: String,
        status: StatusCondition,
    },
    PokemonStatusRemoved {
        player_index: usize,
        target: String,
        status: StatusCondition,
    },
    PokemonStatusDamage {
        player_index: usize,
        target: String,
        status: StatusCondition,
        damage: u16,
        remaining_hp: u16,
    },

    // Volatile Conditions
    ConditionApplied {
        player_index: usize,
        target: String,
        condition: PokemonCondition,
    },
    ConditionExpired {
        player_index: usize,
        target: String,
        condition: PokemonCondition,
    },

    // Stat Changes
    StatStageChanged {
        player_index: usize,
        target: String,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },
    StatChangeBlocked {
        player_index: usize,
        target: String,
        stat: StatType,
    },

    // Action Failures
    ActionFailed {
        player_index: usize,
        reason: ActionFailureReason,
    },

    // Battle End
    PlayerDefeated {
        player_index: usize,
    },
    RoundLimitReached {
        round: u32,
    },
    BattleEnded {
        winner: Option<usize>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let player_name = |index: &usize| {
            battle_state
                .players
                .get(*index)
                .map_or("Unknown", |p| p.player_name.as_str())
                .to_string()
        };

        match self {
            BattleEvent::TurnStarted { round } => Some(format!("=== Turn {} ===", round)),
            BattleEvent::TurnEnded => None,

            BattleEvent::PokemonSwitched {
                player_index,
                old_pokemon,
                new_pokemon,
            } => Some(format!(
                "{} recalled {} and sent out {}!",
                player_name(player_index),
                old_pokemon,
                new_pokemon
            )),
            BattleEvent::MoveUsed {
                player_index,
                pokemon,
                move_name,
            } => Some(format!(
                "{}'s {} used {}!",
                player_name(player_index),
                pokemon,
                move_name
            )),
            BattleEvent::MoveMissed { attacker, .. } => {
                Some(format!("{}'s attack missed!", attacker))
            }
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m > 0.0 && m < 1.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It had no effect!".to_string()),
                _ => None,
            },
            BattleEvent::ItemUsed {
                player_index,
                item,
                target,
            } => Some(format!(
                "{} used a {} on {}!",
                player_name(player_index),
                item,
                target
            )),
            BattleEvent::ItemHadNoEffect { .. } => Some("But it had no effect!".to_string()),

            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::PokemonHealed { target, amount, .. } => {
                Some(format!("{} recovered {} HP!", target, amount))
            }
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),

            BattleEvent::PokemonStatusApplied { target, status, .. } => Some(format!(
                "{} {}",
                target,
                Self::format_pokemon_status_applied(status)
            )),
            BattleEvent::PokemonStatusRemoved { target, status, .. } => Some(format!(
                "{} {}",
                target,
                Self::format_pokemon_status_removed(status)
            )),
            BattleEvent::PokemonStatusDamage {
                target,
                status,
                damage,
                ..
            } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                target,
                Self::format_pokemon_status(status),
                damage
            )),

            BattleEvent::ConditionApplied { target, .. } => {
                Some(format!("{} became confused!", target))
            }
            BattleEvent::ConditionExpired { target, .. } => {
                Some(format!("{} snapped out of confusion!", target))
            }

            BattleEvent::StatStageChanged {
                target,
                stat,
                old_stage,
                new_stage,
                ..
            } => {
                if new_stage > old_stage {
                    Some(format!("{}'s {} rose!", target, stat))
                } else {
                    Some(format!("{}'s {} fell!", target, stat))
                }
            }
            BattleEvent::StatChangeBlocked { target, stat, .. } => {
                Some(format!("{}'s {} won't go any further!", target, stat))
            }

            BattleEvent::ActionFailed {
                player_index,
                reason,
            } => {
                let active = battle_state
                    .players
                    .get(*player_index)
                    .map_or("It", |p| p.active_pokemon().name.as_str());
                Some(format!("{} {}", active, Self::format_action_failure_reason(reason)))
            }

            BattleEvent::PlayerDefeated { player_index } => Some(format!(
                "{} is out of usable Pokémon!",
                player_name(player_index)
            )),
            BattleEvent::RoundLimitReached { round } => {
                Some(format!("The battle reached its limit of {} rounds!", round))
            }
            BattleEvent::BattleEnded { winner } => match winner {
                Some(index) => Some(format!("{} has won the battle!", player_name(index))),
                None => Some("The battle ended in a draw!".to_string()),
            },
        }
    }

    fn format_pokemon_status(status: &StatusCondition) -> &'static str {
        match status {
            StatusCondition::Sleep(_) => "sleep",
            StatusCondition::Poison => "poison",
            StatusCondition::Burn => "burn",
            StatusCondition::Freeze(_) => "freeze",
            StatusCondition::Paralysis => "paralysis",
            StatusCondition::Faint => "faint",
        }
    }

    fn format_pokemon_status_applied(status: &StatusCondition) -> String {
        match status {
            StatusCondition::Sleep(_) => "fell asleep!".to_string(),
            StatusCondition::Poison => "was poisoned!".to_string(),
            StatusCondition::Burn => "was burned!".to_string(),
            StatusCondition::Freeze(_) => "was frozen solid!".to_string(),
            StatusCondition::Paralysis => "is paralyzed! It may be unable to move!".to_string(),
            StatusCondition::Faint => "fainted!".to_string(),
        }
    }

    fn format_pokemon_status_removed(status: &StatusCondition) -> String {
        match status {
            StatusCondition::Sleep(_) => "woke up!".to_string(),
            StatusCondition::Freeze(_) => "thawed out!".to_string(),
            _ => format!("was cured of its {}!", Self::format_pokemon_status(status)),
        }
    }

    fn format_action_failure_reason(reason: &ActionFailureReason) -> &'static str {
        match reason {
            ActionFailureReason::IsAsleep => "is fast asleep.",
            ActionFailureReason::IsFrozen => "is frozen solid!",
            ActionFailureReason::IsParalyzed => "is fully paralyzed!",
            ActionFailureReason::HurtItselfInConfusion => "hurt itself in its confusion!",
            ActionFailureReason::UserFainted => "can't move!",
            ActionFailureReason::TargetFainted | ActionFailureReason::StatusImmune => {
                "tried, but it failed!"
            }
            ActionFailureReason::AlreadyConfused => "tried, but the target is already confused!",
        }
    }
}

/// Event bus for collecting battle events during a turn.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Human-readable lines for every event that has text.
    pub fn formatted(&self, battle_state: &BattleState) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| event.format(battle_state))
            .collect()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Result of one `step`: everything that happened and where the battle stands
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub round: u32,
    pub events: Vec<BattleEvent>,
    pub new_state: GameState,
    pub battle_ended: bool,
    pub winner: Option<usize>,
}

impl TurnResult {
    pub fn new(round: u32, events: Vec<BattleEvent>, new_state: GameState) -> Self {
        Self {
            round,
            events,
            new_state,
            battle_ended: new_state.is_terminal(),
            winner: new_state.winner(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub players: [BattlePlayer; 2],
    pub round: u32,
    pub game_state: GameState,
}

impl BattleState {
    pub fn new(player1: BattlePlayer, player2: BattlePlayer) -> Self {
        Self {
            players: [player1, player2],
            round: 0,
            game_state: GameState::WaitingForActions,
        }
    }
}
