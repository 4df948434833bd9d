use serde::{Deserialize, Serialize};

/// Volatile conditions held by the active Pokemon. They live on the player and
/// are discarded when the Pokemon switches out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum PokemonCondition {
    Confused { turns_remaining: u8 }, // Counts down on each action attempt
}

/// Condition type without data payload, used as the storage key
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PokemonConditionType {
    Confused,
}

impl PokemonCondition {
    pub fn get_type(&self) -> PokemonConditionType {
        match self {
            PokemonCondition::Confused { .. } => PokemonConditionType::Confused,
        }
    }
}
