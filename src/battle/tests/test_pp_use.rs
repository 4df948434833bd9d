#[cfg(test)]
mod tests {
    use crate::battle::engine::Battle;
    use crate::battle::rng::BattleRng;
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        assert_ok, create_test_engine, create_test_player, splash, TestPokemonBuilder,
    };
    use crate::errors::{ActionError, BattleError};
    use crate::moves::STRUGGLE_NAME;
    use crate::player::PlayerAction;
    use pretty_assertions::assert_eq;

    /// Fast tackler against a slow, bulky Splash user
    fn battle(rng: BattleRng, tackle_pp: u8) -> Battle {
        let mut attacker = TestPokemonBuilder::new("Attacker", 50)
            .with_stats(100, 60, 60, 60, 60, 90)
            .build();
        if let Some(instance) = attacker.move_at_mut(0) {
            instance.pp = tackle_pp;
        }
        let target = TestPokemonBuilder::new("Target", 50)
            .with_stats(200, 60, 60, 60, 60, 30)
            .with_moves(vec![splash()])
            .build();
        create_test_engine(
            create_test_player("Player 1", vec![attacker]),
            create_test_player("Player 2", vec![target]),
            rng,
        )
    }

    fn pp_of(battle: &Battle, player_index: usize) -> Option<u8> {
        battle.state().players[player_index]
            .active_pokemon()
            .move_at(0)
            .map(|instance| instance.pp)
    }

    #[test]
    fn test_using_a_move_spends_one_pp() {
        let mut battle = battle(BattleRng::scripted(vec![0.5, 0.5]), 35);

        assert_ok(battle.step(
            PlayerAction::UseMove { move_index: 0 },
            PlayerAction::UseMove { move_index: 0 },
        ));

        assert_eq!(pp_of(&battle, 0), Some(34));
        assert_eq!(pp_of(&battle, 1), Some(14));
    }

    #[test]
    fn test_move_without_pp_is_rejected() {
        let mut battle = battle(BattleRng::scripted(Vec::new()), 0);
        let before = battle.snapshot();

        assert_eq!(
            battle.step(
                PlayerAction::UseMove { move_index: 0 },
                PlayerAction::UseMove { move_index: 0 },
            ),
            Err(BattleError::InvalidAction {
                player_index: 0,
                source: ActionError::NoPpRemaining(0),
            })
        );
        // Rejection leaves no trace
        assert_eq!(battle.snapshot(), before);
        assert_eq!(assert_ok(battle.legal_actions(0)), vec![PlayerAction::Struggle]);
    }

    #[test]
    fn test_struggle_hits_and_recoils() {
        let mut battle = battle(BattleRng::scripted(vec![0.5, 0.5]), 0);

        let result = assert_ok(battle.step(
            PlayerAction::Struggle,
            PlayerAction::UseMove { move_index: 0 },
        ));

        assert!(result.events.contains(&BattleEvent::MoveUsed {
            player_index: 0,
            pokemon: "Attacker".to_string(),
            move_name: STRUGGLE_NAME.to_string(),
        }));
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, BattleEvent::DamageDealt { player_index: 1, .. })));
        // A quarter of 100 max HP
        assert!(result.events.contains(&BattleEvent::DamageDealt {
            player_index: 0,
            target: "Attacker".to_string(),
            damage: 25,
            remaining_hp: 75,
        }));
    }

    #[test]
    fn test_struggle_needs_every_move_exhausted() {
        let mut battle = battle(BattleRng::scripted(Vec::new()), 1);

        assert_eq!(
            battle.step(PlayerAction::Struggle, PlayerAction::UseMove { move_index: 0 }),
            Err(BattleError::InvalidAction {
                player_index: 0,
                source: ActionError::StruggleNotAllowed,
            })
        );
    }
}
