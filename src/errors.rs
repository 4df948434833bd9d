use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleError {
    /// A submitted action failed validation. Recoverable: resubmit a valid action.
    #[error("Invalid action from player {player_index}: {source}")]
    InvalidAction {
        player_index: usize,
        #[source]
        source: ActionError,
    },
    /// `step` was called after a winner or draw was decided.
    #[error("Battle already concluded")]
    BattleConcluded,
    /// Supplied species/move/item/team data breaks the data contract.
    #[error("Data contract violation: {0}")]
    Data(#[from] DataError),
    /// The battle configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A resolved command could not be applied. The turn is rolled back.
    #[error("Command execution failed: {0}")]
    Execution(#[from] ExecutionError),
}

/// Reasons a player action is rejected before resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("move slot {0} is out of range")]
    InvalidMoveIndex(usize),
    #[error("move in slot {0} has no PP remaining")]
    NoPpRemaining(usize),
    #[error("struggle is only allowed once every move is out of PP")]
    StruggleNotAllowed,
    #[error("team slot {0} is out of range")]
    InvalidPokemonIndex(usize),
    #[error("cannot switch to fainted Pokemon in slot {0}")]
    SwitchTargetFainted(usize),
    #[error("Pokemon in slot {0} is already active")]
    SwitchTargetActive(usize),
    #[error("item '{0}' is not in the inventory")]
    UnknownItem(String),
    #[error("no '{0}' left to use")]
    ItemExhausted(String),
    #[error("cannot use an item on fainted Pokemon in slot {0}")]
    ItemTargetFainted(usize),
    #[error("active Pokemon has fainted; a switch is required")]
    ForcedSwitchPending,
    #[error("player index {0} does not exist")]
    InvalidPlayerIndex(usize),
}

/// Fatal problems with catalog data, raised at construction time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("{species}: level {level} is outside 1..=100")]
    InvalidLevel { species: String, level: u8 },
    #[error("{species}: base stats must all be within 1..=255")]
    InvalidBaseStats { species: String },
    #[error("{species}: expected one or two distinct types")]
    InvalidTypes { species: String },
    #[error("{species}: expected between 1 and 4 moves, got {count}")]
    InvalidMoveCount { species: String, count: usize },
    #[error("move {name}: {reason}")]
    MalformedMove { name: String, reason: String },
    #[error("item {name}: {reason}")]
    MalformedItem { name: String, reason: String },
    #[error("trainer {name}: team must hold between 1 and 6 Pokemon, got {count}")]
    InvalidTeamSize { name: String, count: usize },
    #[error("{species}: {reason}")]
    InvalidState { species: String, reason: String },
    #[error("trainer {name}: {reason}")]
    InvalidPlayerState { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Failures while applying a command to the battle state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("team slot {0} does not exist")]
    InvalidPokemonIndex(usize),
    #[error("move slot {0} does not exist")]
    InvalidMove(usize),
    #[error(transparent)]
    Item(#[from] ActionError),
}

/// Type alias for Results using BattleError
pub type BattleResult<T> = Result<T, BattleError>;

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;
