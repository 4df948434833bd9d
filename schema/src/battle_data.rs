use crate::pokemon_types::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatType {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatType::Attack => "Attack",
            StatType::Defense => "Defense",
            StatType::SpecialAttack => "Special Attack",
            StatType::SpecialDefense => "Special Defense",
            StatType::Speed => "Speed",
            StatType::Accuracy => "accuracy",
            StatType::Evasion => "evasiveness",
        };
        write!(f, "{}", display_name)
    }
}

/// Non-volatile status a move or item can refer to. The runtime condition
/// (with its counters) lives in the engine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusType {
    Burn,
    Paralysis,
    Poison,
    Sleep,
    Freeze,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectTarget {
    User,
    Target,
}

/// Secondary effect attached to a move. `chance` is a percentage (0-100).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum MoveEffect {
    StatChange {
        target: EffectTarget,
        stat: StatType,
        stages: i8,
        chance: u8,
    },
    Inflict {
        status: StatusType,
        chance: u8,
    },
    Confuse {
        chance: u8,
    },
    /// Restores a percentage of the user's max HP.
    Heal {
        percent: u8,
    },
    /// User loses a percentage of the damage it just dealt.
    Recoil {
        percent: u8,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveData {
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u16,
    /// Hit chance in percent. `None` never misses.
    pub accuracy: Option<u8>,
    pub max_pp: u8,
    pub priority: i8,
    pub effects: Vec<MoveEffect>,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        !matches!(self.category, MoveCategory::Status) && self.power > 0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ItemEffect {
    RestoreHp(u16),
    /// Cures the listed statuses, or any status when `None`.
    CureStatus(Option<Vec<StatusType>>),
    FullRestore,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemData {
    pub name: String,
    pub effect: ItemEffect,
}
