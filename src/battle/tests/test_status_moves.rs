#[cfg(test)]
mod tests {
    use crate::battle::engine::Battle;
    use crate::battle::rng::BattleRng;
    use crate::battle::state::{ActionFailureReason, BattleEvent};
    use crate::battle::tests::common::{
        assert_ok, create_test_engine, create_test_player, ember, splash, status_move, tackle,
        will_o_wisp, TestPokemonBuilder,
    };
    use crate::player::PlayerAction;
    use crate::pokemon::StatusCondition;
    use pretty_assertions::assert_eq;
    use schema::{EffectTarget, MoveData, MoveEffect, PokemonType, StatType};

    /// A fast user of `user_move` against a slow Splash user of the given types
    fn battle(user_move: MoveData, target_types: Vec<PokemonType>, rng: BattleRng) -> Battle {
        let user = TestPokemonBuilder::new("User", 50)
            .with_stats(100, 60, 60, 60, 60, 90)
            .with_moves(vec![user_move])
            .build();
        let target = TestPokemonBuilder::new("Target", 50)
            .with_types(target_types)
            .with_stats(80, 60, 60, 60, 60, 30)
            .with_moves(vec![splash()])
            .build();
        create_test_engine(
            create_test_player("Player 1", vec![user]),
            create_test_player("Player 2", vec![target]),
            rng,
        )
    }

    fn both_use_first_move(battle: &mut Battle) -> Vec<BattleEvent> {
        assert_ok(battle.step(
            PlayerAction::UseMove { move_index: 0 },
            PlayerAction::UseMove { move_index: 0 },
        ))
        .events
    }

    #[test]
    fn test_status_move_inflicts_burn_that_ticks_same_turn() {
        let mut battle = battle(will_o_wisp(), vec![PokemonType::Normal], BattleRng::scripted(Vec::new()));

        let events = both_use_first_move(&mut battle);

        assert!(events.contains(&BattleEvent::PokemonStatusApplied {
            player_index: 1,
            target: "Target".to_string(),
            status: StatusCondition::Burn,
        }));
        let target = battle.state().players[1].active_pokemon();
        assert_eq!(target.status, Some(StatusCondition::Burn));
        assert_eq!(target.current_hp(), 70);
    }

    #[test]
    fn test_status_move_fails_on_immune_type() {
        let mut battle = battle(will_o_wisp(), vec![PokemonType::Fire], BattleRng::scripted(Vec::new()));

        let events = both_use_first_move(&mut battle);

        assert!(events.contains(&BattleEvent::ActionFailed {
            player_index: 0,
            reason: ActionFailureReason::StatusImmune,
        }));
        assert_eq!(battle.state().players[1].active_pokemon().status, None);
    }

    #[test]
    fn test_type_immunity_deals_no_damage() {
        let mut battle = battle(tackle(), vec![PokemonType::Ghost], BattleRng::scripted(Vec::new()));

        let events = both_use_first_move(&mut battle);

        assert!(events.contains(&BattleEvent::AttackTypeEffectiveness { multiplier: 0.0 }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, BattleEvent::DamageDealt { .. })));
        assert_eq!(battle.state().players[1].active_pokemon().current_hp(), 80);
    }

    #[test]
    fn test_secondary_burn_chance() {
        // critical hit roll, variance, then the 10% burn roll
        let mut burned = battle(ember(), vec![PokemonType::Normal], BattleRng::scripted(vec![0.5, 0.5, 0.05]));
        both_use_first_move(&mut burned);
        assert_eq!(
            burned.state().players[1].active_pokemon().status,
            Some(StatusCondition::Burn)
        );

        let mut spared = battle(ember(), vec![PokemonType::Normal], BattleRng::scripted(vec![0.5, 0.5, 0.5]));
        both_use_first_move(&mut spared);
        assert_eq!(spared.state().players[1].active_pokemon().status, None);
    }

    #[test]
    fn test_stat_boosts_stop_at_plus_six() {
        let swords_dance = status_move(
            "Swords Dance",
            PokemonType::Normal,
            vec![MoveEffect::StatChange {
                target: EffectTarget::User,
                stat: StatType::Attack,
                stages: 2,
                chance: 100,
            }],
        );
        let mut battle = battle(swords_dance, vec![PokemonType::Normal], BattleRng::scripted(Vec::new()));

        for _ in 0..3 {
            both_use_first_move(&mut battle);
        }
        assert_eq!(battle.state().players[0].get_stat_stage(StatType::Attack), 6);

        let events = both_use_first_move(&mut battle);
        assert!(events.contains(&BattleEvent::StatChangeBlocked {
            player_index: 0,
            target: "User".to_string(),
            stat: StatType::Attack,
        }));
        assert_eq!(battle.state().players[0].get_stat_stage(StatType::Attack), 6);
        assert_eq!(
            battle.snapshot().players[0].stat_stages.get(&StatType::Attack),
            Some(&6)
        );
    }
}
