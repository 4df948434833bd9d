use crate::errors::{DataError, DataResult};
use crate::moves::{validate_move_data, MoveInstance};
use schema::{BaseStats, MoveData, PokemonType, SpeciesData, StatType, StatusType};
use serde::{Deserialize, Serialize};

pub const MAX_MOVES: usize = 4;
pub const DEFAULT_IV: u8 = 10;

/// Runtime status of a Pokemon. `None` on the instance means healthy.
/// Sleep and Freeze carry the number of actions still to be skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Burn,
    Paralysis,
    Poison,
    Sleep(u8),
    Freeze(u8),
    Faint,
}

impl StatusCondition {
    /// The catalog-level status this condition corresponds to. Faint has none.
    pub fn status_type(&self) -> Option<StatusType> {
        match self {
            StatusCondition::Burn => Some(StatusType::Burn),
            StatusCondition::Paralysis => Some(StatusType::Paralysis),
            StatusCondition::Poison => Some(StatusType::Poison),
            StatusCondition::Sleep(_) => Some(StatusType::Sleep),
            StatusCondition::Freeze(_) => Some(StatusType::Freeze),
            StatusCondition::Faint => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub name: String,                     // Species name, stable identity
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub ivs: [u8; 6],                     // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub evs: [u8; 6],                     // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub curr_stats: [u16; 6],             // Max HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub moves: [Option<MoveInstance>; MAX_MOVES],
    pub status: Option<StatusCondition>,
    curr_hp: u16,
}

impl PokemonInst {
    /// Create a new Pokemon instance from species data. Fails on any data the
    /// battle formulas cannot handle.
    pub fn new(
        species_data: &SpeciesData,
        level: u8,
        ivs: Option<[u8; 6]>,
        moves: Vec<MoveData>,
    ) -> DataResult<Self> {
        validate_species(species_data, level, moves.len())?;

        let ivs = ivs.unwrap_or([DEFAULT_IV; 6]);
        let evs = [0; 6];
        let curr_stats = Self::calculate_stats(&species_data.base_stats, level, &ivs, &evs);

        let mut move_array = [const { None }; MAX_MOVES];
        for (i, move_data) in moves.into_iter().enumerate() {
            move_array[i] = Some(MoveInstance::new(move_data)?);
        }

        Ok(PokemonInst {
            name: species_data.name.clone(),
            level,
            types: species_data.types.clone(),
            base_stats: species_data.base_stats,
            ivs,
            evs,
            curr_hp: curr_stats[0],
            curr_stats,
            moves: move_array,
            status: None,
        })
    }

    /// Calculate current stats based on base stats, level, IVs, and EVs
    fn calculate_stats(base_stats: &BaseStats, level: u8, ivs: &[u8; 6], evs: &[u8; 6]) -> [u16; 6] {
        let base = base_stats.as_array();
        let level = level as u32;
        let mut stats = [0u16; 6];

        for i in 0..6 {
            let base_calculation = 2 * base[i] as u32 + ivs[i] as u32 + evs[i] as u32 / 4;
            let scaled = base_calculation * level / 100;
            let stat = if i == 0 {
                // HP = floor((2 * Base + IV + EV / 4) * Level / 100) + Level + 10
                scaled + level + 10
            } else {
                // Other Stat = floor((2 * Base + IV + EV / 4) * Level / 100) + 5
                scaled + 5
            };
            stats[i] = stat.min(u16::MAX as u32) as u16;
        }

        stats
    }

    pub fn max_hp(&self) -> u16 {
        self.curr_stats[0]
    }

    pub fn current_hp(&self) -> u16 {
        self.curr_hp
    }

    /// Unmodified stat for one of the five battle stats. Accuracy and evasion
    /// have no base value and report 0.
    pub fn stat(&self, stat: StatType) -> u16 {
        match stat {
            StatType::Attack => self.curr_stats[1],
            StatType::Defense => self.curr_stats[2],
            StatType::SpecialAttack => self.curr_stats[3],
            StatType::SpecialDefense => self.curr_stats[4],
            StatType::Speed => self.curr_stats[5],
            StatType::Accuracy | StatType::Evasion => 0,
        }
    }

    /// Set HP directly, clamped to max. Setting 0 faints the Pokemon.
    pub fn set_hp(&mut self, hp: u16) {
        self.curr_hp = hp.min(self.max_hp());
        if self.curr_hp == 0 {
            self.status = Some(StatusCondition::Faint);
        }
    }

    pub fn set_hp_to_max(&mut self) {
        self.curr_hp = self.max_hp();
    }

    pub fn is_fainted(&self) -> bool {
        self.curr_hp == 0 || matches!(self.status, Some(StatusCondition::Faint))
    }

    /// Deal damage. Returns true if this damage caused the Pokemon to faint.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        if self.is_fainted() {
            return false;
        }
        self.curr_hp = self.curr_hp.saturating_sub(amount);
        if self.curr_hp == 0 {
            // Faint supersedes every other status
            self.status = Some(StatusCondition::Faint);
            return true;
        }
        false
    }

    /// Restore HP. Fainted Pokemon cannot be healed. Returns the amount restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.is_fainted() {
            return 0;
        }
        let old_hp = self.curr_hp;
        self.curr_hp = self.curr_hp.saturating_add(amount).min(self.max_hp());
        self.curr_hp - old_hp
    }

    pub fn move_at(&self, move_index: usize) -> Option<&MoveInstance> {
        self.moves.get(move_index).and_then(|slot| slot.as_ref())
    }

    pub fn move_at_mut(&mut self, move_index: usize) -> Option<&mut MoveInstance> {
        self.moves.get_mut(move_index).and_then(|slot| slot.as_mut())
    }

    /// True when at least one known move still has PP
    pub fn has_usable_move(&self) -> bool {
        self.moves.iter().flatten().any(|m| m.pp > 0)
    }

    /// Re-check an instance that did not necessarily come through `new`,
    /// such as one deserialized from a saved team.
    pub fn validate(&self) -> DataResult<()> {
        let move_count = self.moves.iter().flatten().count();
        validate_species_fields(&self.name, &self.types, &self.base_stats, self.level, move_count)?;

        let invalid = |reason: &str| DataError::InvalidState {
            species: self.name.clone(),
            reason: reason.to_string(),
        };
        for instance in self.moves.iter().flatten() {
            validate_move_data(&instance.data)?;
            if instance.pp > instance.max_pp() {
                return Err(invalid("remaining PP exceeds max PP"));
            }
        }
        if self.curr_stats.contains(&0) {
            return Err(invalid("calculated stats must be non-zero"));
        }
        if self.curr_hp > self.max_hp() {
            return Err(invalid("current HP exceeds max HP"));
        }
        if (self.curr_hp == 0) != matches!(self.status, Some(StatusCondition::Faint)) {
            return Err(invalid("only a Pokemon at 0 HP can be fainted"));
        }
        Ok(())
    }
}

fn validate_species(species: &SpeciesData, level: u8, move_count: usize) -> DataResult<()> {
    validate_species_fields(
        &species.name,
        &species.types,
        &species.base_stats,
        level,
        move_count,
    )
}

fn validate_species_fields(
    name: &str,
    types: &[PokemonType],
    base_stats: &BaseStats,
    level: u8,
    move_count: usize,
) -> DataResult<()> {
    if !(1..=100).contains(&level) {
        return Err(DataError::InvalidLevel {
            species: name.to_string(),
            level,
        });
    }
    if base_stats.as_array().contains(&0) {
        return Err(DataError::InvalidBaseStats {
            species: name.to_string(),
        });
    }
    let distinct_types = match types {
        [_] => true,
        [first, second] => first != second,
        _ => false,
    };
    if !distinct_types {
        return Err(DataError::InvalidTypes {
            species: name.to_string(),
        });
    }
    if !(1..=MAX_MOVES).contains(&move_count) {
        return Err(DataError::InvalidMoveCount {
            species: name.to_string(),
            count: move_count,
        });
    }
    Ok(())
}
