use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::errors::{ActionError, DataError, DataResult};
use crate::pokemon::PokemonInst;
use schema::{ItemData, ItemEffect, StatType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub const MAX_TEAM_SIZE: usize = 6;
pub const MAX_STAT_STAGE: i8 = 6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    // The index refers to the move's position (0-3) in the active Pokémon's move list.
    UseMove { move_index: usize },

    // Only legal once every move of the active Pokémon is out of PP.
    Struggle,

    // `target_index` is a team position; `None` targets the active Pokémon.
    UseItem {
        item: String,
        target_index: Option<usize>,
    },

    // The index refers to the Pokémon's position (0-5) in the player's team.
    SwitchPokemon { team_index: usize },
}

impl PlayerAction {
    pub fn is_switch(&self) -> bool {
        matches!(self, PlayerAction::SwitchPokemon { .. })
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::UseMove { move_index } => write!(f, "use move {}", move_index),
            PlayerAction::Struggle => write!(f, "struggle"),
            PlayerAction::UseItem { item, target_index } => match target_index {
                Some(index) => write!(f, "use {} on slot {}", item, index),
                None => write!(f, "use {}", item),
            },
            PlayerAction::SwitchPokemon { team_index } => write!(f, "switch to slot {}", team_index),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InventorySlot {
    pub item: ItemData,
    pub quantity: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattlePlayer {
    pub player_name: String,

    // The player's full team of 1 to 6 Pokémon instances, in order.
    pub team: Vec<PokemonInst>,

    // The index of the Pokémon in `team` that is currently active.
    pub active_pokemon_index: usize,

    // Keyed by item name so iteration order is stable for legal action listing.
    pub inventory: BTreeMap<String, InventorySlot>,

    // Volatile conditions on the active Pokémon, one per condition type.
    pub active_pokemon_conditions: HashMap<PokemonConditionType, PokemonCondition>,

    // HashMap for stat stage modifications, value is stage (-6 to +6)
    pub stat_stages: HashMap<StatType, i8>,
}

impl BattlePlayer {
    /// Create a new BattlePlayer. The first team member starts active.
    pub fn new(
        player_name: impl Into<String>,
        team: Vec<PokemonInst>,
        items: Vec<(ItemData, u32)>,
    ) -> DataResult<Self> {
        let player_name = player_name.into();
        if team.is_empty() || team.len() > MAX_TEAM_SIZE {
            return Err(DataError::InvalidTeamSize {
                name: player_name,
                count: team.len(),
            });
        }

        let mut inventory = BTreeMap::new();
        for (item, quantity) in items {
            validate_item_data(&item)?;
            inventory
                .entry(item.name.clone())
                .and_modify(|slot: &mut InventorySlot| slot.quantity += quantity)
                .or_insert(InventorySlot { item, quantity });
        }

        Ok(BattlePlayer {
            player_name,
            team,
            active_pokemon_index: 0,
            inventory,
            active_pokemon_conditions: HashMap::new(),
            stat_stages: HashMap::new(),
        })
    }

    /// Check a player that may not have come through `new`, such as one
    /// deserialized from a saved team or edited through its public fields.
    pub fn validate(&self) -> DataResult<()> {
        if self.team.is_empty() || self.team.len() > MAX_TEAM_SIZE {
            return Err(DataError::InvalidTeamSize {
                name: self.player_name.clone(),
                count: self.team.len(),
            });
        }
        let invalid = |reason: &str| DataError::InvalidPlayerState {
            name: self.player_name.clone(),
            reason: reason.to_string(),
        };
        if self.active_pokemon_index >= self.team.len() {
            return Err(invalid("active Pokemon index is outside the team"));
        }
        for pokemon in &self.team {
            pokemon.validate()?;
        }
        for (name, slot) in &self.inventory {
            validate_item_data(&slot.item)?;
            if *name != slot.item.name {
                return Err(invalid("inventory key does not match its item"));
            }
        }
        if self
            .stat_stages
            .values()
            .any(|stage| !(-MAX_STAT_STAGE..=MAX_STAT_STAGE).contains(stage))
        {
            return Err(invalid("stat stages must stay within -6..=6"));
        }
        Ok(())
    }

    /// Get the currently active Pokemon
    pub fn active_pokemon(&self) -> &PokemonInst {
        &self.team[self.active_pokemon_index]
    }

    /// Get the currently active Pokemon mutably
    pub fn active_pokemon_mut(&mut self) -> &mut PokemonInst {
        &mut self.team[self.active_pokemon_index]
    }

    /// True once every team member has fainted
    pub fn is_defeated(&self) -> bool {
        self.team.iter().all(|p| p.is_fainted())
    }

    /// True when a benched, non-fainted Pokemon could be switched in
    pub fn has_usable_replacement(&self) -> bool {
        self.team
            .iter()
            .enumerate()
            .any(|(i, p)| i != self.active_pokemon_index && !p.is_fainted())
    }

    /// The active Pokemon fainted and the side must send in a teammate
    pub fn needs_replacement(&self) -> bool {
        self.active_pokemon().is_fainted() && self.has_usable_replacement()
    }

    /// Make `new_index` active. Stat stages and volatile conditions belong to
    /// the outgoing Pokemon and are discarded.
    pub fn switch_pokemon(&mut self, new_index: usize) -> Result<(), ActionError> {
        if new_index >= self.team.len() {
            return Err(ActionError::InvalidPokemonIndex(new_index));
        }
        self.clear_active_state();
        self.active_pokemon_index = new_index;
        Ok(())
    }

    pub fn clear_active_state(&mut self) {
        self.active_pokemon_conditions.clear();
        self.stat_stages.clear();
    }

    // === Volatile Conditions ===

    pub fn has_condition(&self, condition_type: PokemonConditionType) -> bool {
        self.active_pokemon_conditions.contains_key(&condition_type)
    }

    pub fn add_condition(&mut self, condition: PokemonCondition) {
        self.active_pokemon_conditions
            .insert(condition.get_type(), condition);
    }

    pub fn remove_condition(
        &mut self,
        condition_type: PokemonConditionType,
    ) -> Option<PokemonCondition> {
        self.active_pokemon_conditions.remove(&condition_type)
    }

    // === Stat Stage Management ===

    /// Get the current stage for a stat type (0 if not set)
    pub fn get_stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Set the stage for a stat type (clamped to -6 to +6)
    pub fn set_stat_stage(&mut self, stat: StatType, stage: i8) {
        let clamped_stage = stage.clamp(-MAX_STAT_STAGE, MAX_STAT_STAGE);
        if clamped_stage == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, clamped_stage);
        }
    }

    /// Modify the stage for a stat type by a delta. Returns the stage after
    /// clamping, which equals the old stage when already at the bound.
    pub fn modify_stat_stage(&mut self, stat: StatType, delta: i8) -> i8 {
        let current = self.get_stat_stage(stat);
        self.set_stat_stage(stat, current.saturating_add(delta));
        self.get_stat_stage(stat)
    }

    // === Inventory ===

    pub fn item_quantity(&self, name: &str) -> u32 {
        self.inventory.get(name).map_or(0, |slot| slot.quantity)
    }

    /// Look up an item that can be used right now
    pub fn usable_item(&self, name: &str) -> Result<&ItemData, ActionError> {
        let slot = self
            .inventory
            .get(name)
            .ok_or_else(|| ActionError::UnknownItem(name.to_string()))?;
        if slot.quantity == 0 {
            return Err(ActionError::ItemExhausted(name.to_string()));
        }
        Ok(&slot.item)
    }

    /// Remove one unit of an item from the inventory and return its data.
    pub fn consume_item(&mut self, name: &str) -> Result<ItemData, ActionError> {
        let slot = self
            .inventory
            .get_mut(name)
            .ok_or_else(|| ActionError::UnknownItem(name.to_string()))?;
        if slot.quantity == 0 {
            return Err(ActionError::ItemExhausted(name.to_string()));
        }
        slot.quantity -= 1;
        Ok(slot.item.clone())
    }
}

fn validate_item_data(item: &ItemData) -> DataResult<()> {
    let malformed = |reason: &str| DataError::MalformedItem {
        name: item.name.clone(),
        reason: reason.to_string(),
    };
    if item.name.trim().is_empty() {
        return Err(malformed("name must not be empty"));
    }
    match &item.effect {
        ItemEffect::RestoreHp(0) => Err(malformed("restores no HP")),
        ItemEffect::CureStatus(Some(statuses)) if statuses.is_empty() => {
            Err(malformed("cure list is empty"))
        }
        _ => Ok(()),
    }
}
