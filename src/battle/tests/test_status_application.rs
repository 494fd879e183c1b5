#[cfg(test)]
mod tests {
    use crate::battle::state::{BattleEvent, BlockReason};
    use crate::battle::tests::common::{create_test_battle, run_turn, use_move, TestPokemonBuilder};
    use crate::pokemon::StatusCondition;
    use crate::rng::TurnRng;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{PokemonType, StatusType};

    // Rolls cover the attacker's draws and, where the defender ends up frozen
    // or paralyzed, its own gate check afterwards.
    #[rstest]
    // --- BURN (secondary, 10%) ---
    #[case("Ember burns on a low roll", "ember", vec![PokemonType::Normal], None, None, vec![50, 50, 5], Some(StatusType::Burn), None)]
    #[case("Ember does not burn on a high roll", "ember", vec![PokemonType::Normal], None, None, vec![50, 50, 15], None, None)]
    #[case("Ember never burns a Fire type and rolls nothing for it", "ember", vec![PokemonType::Fire], None, None, vec![50, 50], None, None)]
    #[case("Ember does not replace an existing poison", "ember", vec![PokemonType::Normal], None, Some(StatusCondition::Poison), vec![50, 50], None, None)]
    // --- POISON (secondary, 30%) ---
    #[case("Poison Sting poisons on a low roll", "poison-sting", vec![PokemonType::Normal], None, None, vec![50, 50, 25], Some(StatusType::Poison), None)]
    #[case("Poison Sting does not poison on a high roll", "poison-sting", vec![PokemonType::Normal], None, None, vec![50, 50, 35], None, None)]
    #[case("Poison Sting never poisons a Poison type", "poison-sting", vec![PokemonType::Poison], None, None, vec![50, 50], None, None)]
    // --- FREEZE (secondary, 10%) ---
    #[case("Ice Beam freezes on a low roll", "ice-beam", vec![PokemonType::Normal], None, None, vec![50, 50, 8, 50], Some(StatusType::Freeze), None)]
    #[case("Ice Beam never freezes an Ice type", "ice-beam", vec![PokemonType::Ice], None, None, vec![50, 50], None, None)]
    // --- PARALYSIS (primary) ---
    #[case("Thunder Wave paralyzes when it hits", "thunder-wave", vec![PokemonType::Normal], None, None, vec![50, 50], Some(StatusType::Paralysis), None)]
    #[case("Thunder Wave misses on a high accuracy roll", "thunder-wave", vec![PokemonType::Normal], None, None, vec![95], None, None)]
    #[case("Thunder Wave reports Electric immunity", "thunder-wave", vec![PokemonType::Electric], None, None, vec![50], None, Some(BlockReason::TypeImmunity))]
    #[case("Thunder Wave reports Limber", "thunder-wave", vec![PokemonType::Normal], Some("limber"), None, vec![50], None, Some(BlockReason::AbilityImmunity))]
    #[case("Thunder Wave reports an existing burn", "thunder-wave", vec![PokemonType::Normal], None, Some(StatusCondition::Burn), vec![50], None, Some(BlockReason::AlreadyHasStatus))]
    #[case("Thunder Wave reports an existing paralysis", "thunder-wave", vec![PokemonType::Normal], None, Some(StatusCondition::Paralysis), vec![50, 50], None, Some(BlockReason::SameStatus))]
    // --- SLEEP (primary) ---
    #[case("Sleep Powder puts the target to sleep", "sleep-powder", vec![PokemonType::Normal], None, None, vec![50, 50], Some(StatusType::Sleep), None)]
    #[case("Sleep Powder reports Insomnia", "sleep-powder", vec![PokemonType::Normal], Some("insomnia"), None, vec![50], None, Some(BlockReason::AbilityImmunity))]
    // --- BAD POISON (primary) ---
    #[case("Toxic badly poisons", "toxic", vec![PokemonType::Normal], None, None, vec![50], Some(StatusType::BadlyPoisoned), None)]
    #[case("Toxic reports Steel immunity", "toxic", vec![PokemonType::Steel], None, None, vec![50], None, Some(BlockReason::TypeImmunity))]
    fn test_status_application_outcomes(
        #[case] desc: &str,
        #[case] attacker_move: &str,
        #[case] defender_types: Vec<PokemonType>,
        #[case] defender_ability: Option<&str>,
        #[case] initial_defender_status: Option<StatusCondition>,
        #[case] rolls: Vec<u8>,
        #[case] expected_status: Option<StatusType>,
        #[case] expected_block: Option<BlockReason>,
    ) {
        // Arrange
        let attacker = TestPokemonBuilder::new("Alakazam")
            .types(vec![PokemonType::Psychic])
            .speed(140)
            .moves(&[attacker_move])
            .build();

        let mut defender_builder = TestPokemonBuilder::new("Target")
            .types(defender_types)
            .speed(30)
            .moves(&["splash"]);
        if let Some(ability) = defender_ability {
            defender_builder = defender_builder.ability(ability);
        }
        if let Some(status) = initial_defender_status {
            defender_builder = defender_builder.status(status);
        }

        let mut battle_state = create_test_battle(attacker, defender_builder.build());
        let expected_draws = rolls.len();
        let mut rng = TurnRng::new_for_test(rolls);

        // Act
        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        // Assert
        bus.print_debug_with_message(&format!("[{}]", desc));

        let final_status = battle_state.players[1].team[0].status;
        let applied_event_found = bus
            .events()
            .iter()
            .any(|event| matches!(event, BattleEvent::StatusApplied { player_index: 1, .. }));
        let block_reason = bus.events().iter().find_map(|event| match event {
            BattleEvent::StatusBlocked { player_index: 1, reason, .. } => Some(*reason),
            _ => None,
        });

        match expected_status {
            Some(status) => {
                assert_eq!(final_status.map(|s| s.status_type()), Some(status), "{}", desc);
                assert!(applied_event_found, "{}: StatusApplied should be emitted", desc);
            }
            None => {
                assert_eq!(final_status, initial_defender_status, "{}: status should not change", desc);
                assert!(!applied_event_found, "{}: no StatusApplied expected", desc);
            }
        }
        assert_eq!(block_reason, expected_block, "{}", desc);
        assert_eq!(rng.remaining(), 0, "{}: expected exactly {} draws", desc, expected_draws);
    }

    #[test]
    fn test_sleep_duration_is_drawn_on_application() {
        let mut battle_state = create_test_battle(
            TestPokemonBuilder::new("Bulbasaur").speed(140).moves(&["sleep-powder"]).build(),
            TestPokemonBuilder::new("Snorlax").speed(30).moves(&["splash"]).build(),
        );
        // Accuracy, then the 1..=3 duration draw at its top.
        let mut rng = TurnRng::new_for_test(vec![50, 100]);

        run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        // Put to sleep this turn, so no countdown yet.
        assert_eq!(
            battle_state.players[1].team[0].status,
            Some(StatusCondition::Sleep { turns_remaining: 3 })
        );
    }
}
