use crate::errors::{DataError, DataResult};
use schema::{MoveCategory, MoveData, MoveEffect, PokemonType};
use serde::{Deserialize, Serialize};

pub const STRUGGLE_NAME: &str = "Struggle";
pub const SELF_HIT_NAME: &str = "Self Hit";

/// A move known by a Pokemon, with its remaining uses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub data: MoveData,
    pub pp: u8,
}

impl MoveInstance {
    /// Create a new move instance with max PP
    pub fn new(data: MoveData) -> DataResult<Self> {
        validate_move_data(&data)?;
        Ok(MoveInstance {
            pp: data.max_pp,
            data,
        })
    }

    pub fn max_pp(&self) -> u8 {
        self.data.max_pp
    }

    /// Use the move (decrease PP)
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    pub fn restore_pp(&mut self) {
        self.pp = self.data.max_pp;
    }
}

/// Reject move data the damage and probability formulas cannot handle.
pub fn validate_move_data(data: &MoveData) -> DataResult<()> {
    let malformed = |reason: &str| DataError::MalformedMove {
        name: data.name.clone(),
        reason: reason.to_string(),
    };

    if data.name.trim().is_empty() {
        return Err(malformed("name must not be empty"));
    }
    if data.max_pp == 0 {
        return Err(malformed("max PP must be at least 1"));
    }
    if matches!(data.accuracy, Some(accuracy) if accuracy > 100) {
        return Err(malformed("accuracy must be within 0..=100"));
    }
    match data.category {
        MoveCategory::Status if data.power != 0 => {
            return Err(malformed("status moves must have zero power"));
        }
        MoveCategory::Physical | MoveCategory::Special if data.power == 0 => {
            return Err(malformed("damaging moves must have positive power"));
        }
        _ => {}
    }
    for effect in &data.effects {
        let chance = match effect {
            MoveEffect::StatChange { chance, stages, .. } => {
                if *stages == 0 {
                    return Err(malformed("stat change of zero stages"));
                }
                *chance
            }
            MoveEffect::Inflict { chance, .. } | MoveEffect::Confuse { chance } => *chance,
            MoveEffect::Heal { percent } | MoveEffect::Recoil { percent } => *percent,
        };
        if chance > 100 {
            return Err(malformed("effect percentages must be within 0..=100"));
        }
    }
    Ok(())
}

/// The fallback attack used once every move is out of PP.
pub fn struggle() -> MoveData {
    MoveData {
        name: STRUGGLE_NAME.to_string(),
        move_type: PokemonType::Typeless,
        category: MoveCategory::Physical,
        power: 50,
        accuracy: None,
        max_pp: 1,
        priority: 0,
        effects: Vec::new(),
    }
}

/// The typeless attack a confused Pokemon uses on itself.
pub fn confusion_self_hit(power: u16) -> MoveData {
    MoveData {
        name: SELF_HIT_NAME.to_string(),
        move_type: PokemonType::Typeless,
        category: MoveCategory::Physical,
        power,
        accuracy: None,
        max_pp: 1,
        priority: 0,
        effects: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tackle() -> MoveData {
        MoveData {
            name: "Tackle".to_string(),
            move_type: PokemonType::Normal,
            category: MoveCategory::Physical,
            power: 40,
            accuracy: Some(100),
            max_pp: 2,
            priority: 0,
            effects: Vec::new(),
        }
    }

    #[test]
    fn test_pp_is_consumed_until_empty() {
        let mut instance = MoveInstance::new(tackle()).unwrap();
        assert!(instance.use_move());
        assert!(instance.use_move());
        assert!(!instance.use_move());
        assert_eq!(instance.pp, 0);
        instance.restore_pp();
        assert_eq!(instance.pp, 2);
    }

    #[test]
    fn test_malformed_moves_are_rejected() {
        let mut no_power = tackle();
        no_power.power = 0;
        assert!(MoveInstance::new(no_power).is_err());

        let mut bad_accuracy = tackle();
        bad_accuracy.accuracy = Some(120);
        assert!(MoveInstance::new(bad_accuracy).is_err());

        let mut powered_status = tackle();
        powered_status.category = MoveCategory::Status;
        assert!(MoveInstance::new(powered_status).is_err());

        let mut no_pp = tackle();
        no_pp.max_pp = 0;
        assert!(matches!(
            MoveInstance::new(no_pp),
            Err(DataError::MalformedMove { .. })
        ));
    }

    #[test]
    fn test_builtin_moves_are_well_formed() {
        assert!(validate_move_data(&struggle()).is_ok());
        assert!(validate_move_data(&confusion_self_hit(40)).is_ok());
    }
}
