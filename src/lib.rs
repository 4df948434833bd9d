//! Pokemon Battle Simulator
//!
//! A deterministic, seedable engine for turn-based two-trainer creature
//! battles. Callers hand in both teams and a random source, submit one action
//! per side each round, and read back the events and the resulting state.
//! Species, move and item catalogs live with the caller; the engine only
//! consumes their records.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod errors;
pub mod moves;
pub mod player;
pub mod pokemon;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, EffectTarget, ItemData, ItemEffect, MoveCategory, MoveData, MoveEffect,
    PokemonType, SpeciesData, StatType, StatusType,
};

// --- From this crate's modules (`src/`) ---

// Battle controller and the agent loop.
pub use battle::engine::Battle;
pub use battle::observation::{BattleSnapshot, PlayerSnapshot, PokemonSnapshot};
pub use battle::rng::BattleRng;
pub use battle::runner::{run_battle, Agent, BattleOutcome};
pub use battle::state::{
    ActionFailureReason, BattleEvent, BattleState, GameState, TurnResult,
};
pub use config::BattleConfig;

// Core runtime types for a battle.
pub use moves::MoveInstance;
pub use player::{BattlePlayer, PlayerAction};
pub use pokemon::{PokemonInst, StatusCondition};

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleError, BattleResult, ConfigError, DataError, DataResult, ExecutionError,
};
