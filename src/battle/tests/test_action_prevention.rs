#[cfg(test)]
mod tests {
    use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
    use crate::battle::state::{ActionFailureReason, BattleEvent};
    use crate::battle::tests::common::{create_test_battle, run_turn, use_move, TestPokemonBuilder};
    use crate::pokemon::StatusCondition;
    use crate::rng::TurnRng;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::SpeciesId;

    fn first_failure(events: &[BattleEvent], player: usize) -> Option<ActionFailureReason> {
        events.iter().find_map(|event| match event {
            BattleEvent::ActionFailed { player_index, reason } if *player_index == player => Some(*reason),
            _ => None,
        })
    }

    fn moved(events: &[BattleEvent], player: usize) -> bool {
        events
            .iter()
            .any(|event| matches!(event, BattleEvent::MoveUsed { player_index, .. } if *player_index == player))
    }

    #[rstest]
    #[case("sleep stops the move without a roll", Some(StatusCondition::Sleep { turns_remaining: 2 }), vec![], vec![], Some(ActionFailureReason::IsAsleep))]
    #[case("frozen and the thaw roll fails", Some(StatusCondition::Freeze), vec![], vec![50], Some(ActionFailureReason::IsFrozen))]
    #[case("frozen and the thaw roll succeeds", Some(StatusCondition::Freeze), vec![], vec![10, 50, 50], None)]
    #[case("full paralysis on a low roll", Some(StatusCondition::Paralysis), vec![], vec![10], Some(ActionFailureReason::IsParalyzed))]
    #[case("paralysis lets the move through on a high roll", Some(StatusCondition::Paralysis), vec![], vec![50, 50, 50], None)]
    #[case("flinch stops the move without a roll", None, vec![PokemonCondition::Flinched], vec![], Some(ActionFailureReason::IsFlinching))]
    #[case("confusion self-hit on a low roll", None, vec![PokemonCondition::Confused { turns_remaining: 3 }], vec![10], Some(ActionFailureReason::IsConfused))]
    #[case("confusion passes on a high roll", None, vec![PokemonCondition::Confused { turns_remaining: 3 }], vec![50, 50, 50], None)]
    #[case("flinch is checked before sleep", Some(StatusCondition::Sleep { turns_remaining: 2 }), vec![PokemonCondition::Flinched], vec![], Some(ActionFailureReason::IsFlinching))]
    #[case("flinch is checked before confusion", None, vec![PokemonCondition::Flinched, PokemonCondition::Confused { turns_remaining: 2 }], vec![], Some(ActionFailureReason::IsFlinching))]
    fn test_action_gate_outcomes(
        #[case] desc: &str,
        #[case] status: Option<StatusCondition>,
        #[case] conditions: Vec<PokemonCondition>,
        #[case] rolls: Vec<u8>,
        #[case] expected_failure: Option<ActionFailureReason>,
    ) {
        // Arrange
        let mut attacker = TestPokemonBuilder::new("Persian").speed(140);
        if let Some(status) = status {
            attacker = attacker.status(status);
        }
        let defender = TestPokemonBuilder::new("Snorlax").speed(30).moves(&["splash"]).build();
        let mut battle_state = create_test_battle(attacker.build(), defender);
        for condition in conditions {
            battle_state.players[0].add_condition(condition);
        }
        let expected_draws = rolls.len();
        let mut rng = TurnRng::new_for_test(rolls);

        // Act
        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        // Assert
        bus.print_debug_with_message(&format!("[{}]", desc));
        assert_eq!(first_failure(bus.events(), 0), expected_failure, "{}", desc);
        assert_eq!(moved(bus.events(), 0), expected_failure.is_none(), "{}", desc);
        assert_eq!(rng.remaining(), 0, "{}: expected exactly {} draws", desc, expected_draws);
    }

    #[test]
    fn test_thaw_clears_freeze_before_moving() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Persian").speed(140).status(StatusCondition::Freeze).build(),
            TestPokemonBuilder::new("Snorlax").speed(30).moves(&["splash"]).build(),
        );
        let mut rng = TurnRng::new_for_test(vec![20, 50, 50]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        let thawed = bus
            .events()
            .iter()
            .position(|event| matches!(event, BattleEvent::StatusRemoved { player_index: 0, status: StatusCondition::Freeze, .. }))
            .expect("thaw event");
        let used = bus
            .events()
            .iter()
            .position(|event| matches!(event, BattleEvent::MoveUsed { player_index: 0, .. }))
            .expect("move used");
        assert!(thawed < used);
        assert_eq!(battle_state.players[0].team[0].status, None);
    }

    #[test]
    fn test_confusion_self_hit_damages_the_user() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Persian").speed(140).build(),
            TestPokemonBuilder::new("Snorlax").speed(30).moves(&["splash"]).build(),
        );
        battle_state.players[0].add_condition(PokemonCondition::Confused { turns_remaining: 3 });
        let mut rng = TurnRng::new_for_test(vec![1]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        // Typeless 40 power against its own 100 Def at level 50, no variance.
        assert!(bus.events().contains(&BattleEvent::ConfusionSelfHit {
            player_index: 0,
            pokemon: SpeciesId::from("persian"),
            damage: 19,
            remaining_hp: 131,
        }));
        assert_eq!(battle_state.players[0].team[0].current_hp(), 131);
        assert_eq!(battle_state.players[1].team[0].current_hp(), 150);
        // Still confused, one turn closer to snapping out.
        assert_eq!(
            battle_state.players[0].get_condition(PokemonConditionType::Confused),
            Some(&PokemonCondition::Confused { turns_remaining: 2 })
        );
    }

    #[test]
    fn test_failed_action_spends_no_pp() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Persian")
                .speed(140)
                .status(StatusCondition::Sleep { turns_remaining: 3 })
                .build(),
            TestPokemonBuilder::new("Snorlax").speed(30).moves(&["splash"]).build(),
        );
        let mut rng = TurnRng::new_for_test(vec![]);

        run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        let slot = &battle_state.players[0].team[0].moves[0];
        assert_eq!(slot.pp, slot.max_pp);
    }
}
