use crate::battle::state::BattleState;
use crate::errors::ActionError;
use crate::player::{BattlePlayer, PlayerAction};

/// A side must switch before anything else: either the game is waiting on
/// its replacement or its active Pokemon has fainted.
pub fn must_switch(state: &BattleState, player_index: usize) -> bool {
    state.game_state.requires_replacement(player_index)
        || state.players[player_index].active_pokemon().is_fainted()
}

/// Validates a player action against the current battle state.
/// Side-effect free; the first rule broken is reported.
pub fn validate_player_action(
    state: &BattleState,
    player_index: usize,
    action: &PlayerAction,
) -> Result<(), ActionError> {
    if player_index >= state.players.len() {
        return Err(ActionError::InvalidPlayerIndex(player_index));
    }

    let player = &state.players[player_index];

    if must_switch(state, player_index) && !action.is_switch() {
        return Err(ActionError::ForcedSwitchPending);
    }

    match action {
        PlayerAction::UseMove { move_index } => {
            let move_instance = player
                .active_pokemon()
                .move_at(*move_index)
                .ok_or(ActionError::InvalidMoveIndex(*move_index))?;
            if move_instance.pp == 0 {
                return Err(ActionError::NoPpRemaining(*move_index));
            }
        }
        PlayerAction::Struggle => {
            if player.active_pokemon().has_usable_move() {
                return Err(ActionError::StruggleNotAllowed);
            }
        }
        PlayerAction::SwitchPokemon { team_index } => {
            validate_switch_target(player, *team_index)?;
        }
        PlayerAction::UseItem { item, target_index } => {
            player.usable_item(item)?;
            let target = target_index.unwrap_or(player.active_pokemon_index);
            let pokemon = player
                .team
                .get(target)
                .ok_or(ActionError::InvalidPokemonIndex(target))?;
            if pokemon.is_fainted() {
                return Err(ActionError::ItemTargetFainted(target));
            }
        }
    }

    Ok(())
}

fn validate_switch_target(player: &BattlePlayer, team_index: usize) -> Result<(), ActionError> {
    let pokemon = player
        .team
        .get(team_index)
        .ok_or(ActionError::InvalidPokemonIndex(team_index))?;
    if team_index == player.active_pokemon_index {
        return Err(ActionError::SwitchTargetActive(team_index));
    }
    if pokemon.is_fainted() {
        return Err(ActionError::SwitchTargetFainted(team_index));
    }
    Ok(())
}

/// Every action that would pass `validate_player_action` right now.
pub fn legal_actions(state: &BattleState, player_index: usize) -> Vec<PlayerAction> {
    let Some(player) = state.players.get(player_index) else {
        return Vec::new();
    };
    let mut actions = Vec::new();

    let switches = player
        .team
        .iter()
        .enumerate()
        .filter(|(i, pokemon)| *i != player.active_pokemon_index && !pokemon.is_fainted())
        .map(|(i, _)| PlayerAction::SwitchPokemon { team_index: i });

    // During a replacement phase, switching is the only valid action type.
    if must_switch(state, player_index) {
        actions.extend(switches);
        return actions;
    }

    let active = player.active_pokemon();
    let usable_moves: Vec<PlayerAction> = active
        .moves
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| match slot {
            Some(instance) if instance.pp > 0 => Some(PlayerAction::UseMove { move_index: i }),
            _ => None,
        })
        .collect();
    if usable_moves.is_empty() {
        actions.push(PlayerAction::Struggle);
    } else {
        actions.extend(usable_moves);
    }

    actions.extend(switches);

    for (name, slot) in &player.inventory {
        if slot.quantity == 0 {
            continue;
        }
        for (i, pokemon) in player.team.iter().enumerate() {
            if !pokemon.is_fainted() {
                actions.push(PlayerAction::UseItem {
                    item: name.clone(),
                    target_index: Some(i),
                });
            }
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::GameState;
    use crate::battle::tests::common::{create_test_battle, potion, TestPokemonBuilder};
    use crate::player::InventorySlot;
    use crate::pokemon::StatusCondition;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn two_member_state() -> BattleState {
        let mut state = create_test_battle(
            TestPokemonBuilder::new("Pikachu", 50).build(),
            TestPokemonBuilder::new("Eevee", 50).build(),
        );
        state.players[0]
            .team
            .push(TestPokemonBuilder::new("Bulbasaur", 50).build());
        state.players[0].inventory.insert(
            "Potion".to_string(),
            InventorySlot {
                item: potion(),
                quantity: 1,
            },
        );
        state
    }

    #[rstest]
    #[case(PlayerAction::UseMove { move_index: 0 }, Ok(()))]
    #[case(PlayerAction::UseMove { move_index: 3 }, Err(ActionError::InvalidMoveIndex(3)))]
    #[case(PlayerAction::UseMove { move_index: 9 }, Err(ActionError::InvalidMoveIndex(9)))]
    #[case(PlayerAction::Struggle, Err(ActionError::StruggleNotAllowed))]
    #[case(PlayerAction::SwitchPokemon { team_index: 1 }, Ok(()))]
    #[case(PlayerAction::SwitchPokemon { team_index: 0 }, Err(ActionError::SwitchTargetActive(0)))]
    #[case(PlayerAction::SwitchPokemon { team_index: 5 }, Err(ActionError::InvalidPokemonIndex(5)))]
    #[case(PlayerAction::UseItem { item: "Potion".to_string(), target_index: None }, Ok(()))]
    #[case(PlayerAction::UseItem { item: "Potion".to_string(), target_index: Some(4) }, Err(ActionError::InvalidPokemonIndex(4)))]
    #[case(PlayerAction::UseItem { item: "Elixir".to_string(), target_index: None }, Err(ActionError::UnknownItem("Elixir".to_string())))]
    fn test_validate_player_action(
        #[case] action: PlayerAction,
        #[case] expected: Result<(), ActionError>,
    ) {
        let state = two_member_state();
        assert_eq!(validate_player_action(&state, 0, &action), expected);
    }

    #[test]
    fn test_invalid_player_index() {
        let state = two_member_state();
        assert_eq!(
            validate_player_action(&state, 2, &PlayerAction::Struggle),
            Err(ActionError::InvalidPlayerIndex(2))
        );
    }

    #[test]
    fn test_zero_pp_move_rejected_and_struggle_allowed() {
        let mut state = two_member_state();
        for slot in state.players[0].active_pokemon_mut().moves.iter_mut().flatten() {
            slot.pp = 0;
        }
        assert_eq!(
            validate_player_action(&state, 0, &PlayerAction::UseMove { move_index: 0 }),
            Err(ActionError::NoPpRemaining(0))
        );
        assert_eq!(validate_player_action(&state, 0, &PlayerAction::Struggle), Ok(()));
        assert_eq!(legal_actions(&state, 0)[0], PlayerAction::Struggle);
    }

    #[test]
    fn test_exhausted_item_rejected() {
        let mut state = two_member_state();
        state.players[0].consume_item("Potion").unwrap();
        assert_eq!(
            validate_player_action(
                &state,
                0,
                &PlayerAction::UseItem {
                    item: "Potion".to_string(),
                    target_index: None
                }
            ),
            Err(ActionError::ItemExhausted("Potion".to_string()))
        );
    }

    #[test]
    fn test_fainted_switch_and_item_targets_rejected() {
        let mut state = two_member_state();
        state.players[0].team[1].set_hp(0);

        assert_eq!(
            validate_player_action(&state, 0, &PlayerAction::SwitchPokemon { team_index: 1 }),
            Err(ActionError::SwitchTargetFainted(1))
        );
        assert_eq!(
            validate_player_action(
                &state,
                0,
                &PlayerAction::UseItem {
                    item: "Potion".to_string(),
                    target_index: Some(1)
                }
            ),
            Err(ActionError::ItemTargetFainted(1))
        );
    }

    #[test]
    fn test_forced_switch_rejects_everything_else() {
        let mut state = two_member_state();
        state.players[0].active_pokemon_mut().set_hp(0);
        state.game_state = GameState::WaitingForPlayer1Replacement;

        assert_eq!(
            validate_player_action(&state, 0, &PlayerAction::UseMove { move_index: 0 }),
            Err(ActionError::ForcedSwitchPending)
        );
        assert_eq!(
            validate_player_action(&state, 0, &PlayerAction::SwitchPokemon { team_index: 1 }),
            Ok(())
        );
        assert_eq!(
            legal_actions(&state, 0),
            vec![PlayerAction::SwitchPokemon { team_index: 1 }]
        );

        // The other side still acts normally
        assert_eq!(
            validate_player_action(&state, 1, &PlayerAction::UseMove { move_index: 0 }),
            Ok(())
        );
    }

    #[test]
    fn test_legal_actions_all_validate() {
        let mut state = two_member_state();
        state.players[0].active_pokemon_mut().status = Some(StatusCondition::Poison);

        let actions = legal_actions(&state, 0);
        assert_eq!(
            actions,
            vec![
                PlayerAction::UseMove { move_index: 0 },
                PlayerAction::SwitchPokemon { team_index: 1 },
                PlayerAction::UseItem {
                    item: "Potion".to_string(),
                    target_index: Some(0)
                },
                PlayerAction::UseItem {
                    item: "Potion".to_string(),
                    target_index: Some(1)
                },
            ]
        );
        for action in &actions {
            assert_eq!(validate_player_action(&state, 0, action), Ok(()));
        }
    }
}
