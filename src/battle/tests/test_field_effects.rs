#[cfg(test)]
mod tests {
    use crate::battle::field::{TerrainState, WeatherState};
    use crate::battle::state::{BattleEvent, BattleState, BlockReason, DamageSource, FieldChange};
    use crate::battle::tests::common::{
        create_team_battle, create_test_battle, run_turn, switch_to, use_move, TestPokemonBuilder,
    };
    use crate::pokemon::StatusCondition;
    use crate::rng::TurnRng;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{Hazard, MoveId, PokemonType, SpeciesId, TeamCondition, Terrain, Weather};

    fn battle(attacker_move: &str, defender: TestPokemonBuilder) -> BattleState {
        create_test_battle(
            TestPokemonBuilder::new("Alakazam")
                .types(vec![PokemonType::Psychic])
                .speed(140)
                .moves(&[attacker_move])
                .build(),
            defender.speed(30).moves(&["splash"]).build(),
        )
    }

    fn damage_to_defender(events: &[BattleEvent]) -> Option<u16> {
        events.iter().find_map(|event| match event {
            BattleEvent::MoveHit { defender_index: 1, damage, .. } => Some(*damage),
            _ => None,
        })
    }

    fn field_changes(events: &[BattleEvent]) -> Vec<FieldChange> {
        events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::FieldChanged { change } => Some(*change),
                _ => None,
            })
            .collect()
    }

    // --- Weather ---

    #[rstest]
    #[case("clear skies", None, 17)]
    #[case("rain boosts water", Some(Weather::Rain), 25)]
    #[case("sun weakens water", Some(Weather::Sun), 8)]
    fn test_weather_scales_water_damage(#[case] desc: &str, #[case] weather: Option<Weather>, #[case] expected: u16) {
        let mut battle_state = battle("water-gun", TestPokemonBuilder::new("Snorlax"));
        battle_state.field.weather = weather.map(|weather| WeatherState {
            weather,
            turns_remaining: 3,
        });
        let mut rng = TurnRng::new_for_test(vec![50, 50]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        assert_eq!(damage_to_defender(bus.events()), Some(expected), "{}", desc);
    }

    #[test]
    fn test_rain_dance_starts_and_counts_down() {
        let mut battle_state = battle("rain-dance", TestPokemonBuilder::new("Snorlax"));
        let mut rng = TurnRng::new_for_test(vec![]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        assert_eq!(
            field_changes(bus.events()),
            vec![FieldChange::WeatherStarted {
                weather: Weather::Rain,
                turns: 5,
            }]
        );
        // The turn it was set in counts.
        assert_eq!(
            battle_state.field.weather,
            Some(WeatherState {
                weather: Weather::Rain,
                turns_remaining: 4,
            })
        );

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);
        assert!(bus.events().contains(&BattleEvent::MoveFailed {
            player_index: 0,
            move_used: MoveId::from("rain-dance"),
            reason: BlockReason::AlreadyActive,
        }));
        assert_eq!(battle_state.field.weather.map(|state| state.turns_remaining), Some(3));
    }

    #[test]
    fn test_sandstorm_spares_rock_types() {
        let mut battle_state = battle(
            "splash",
            TestPokemonBuilder::new("Onix").types(vec![PokemonType::Rock, PokemonType::Ground]),
        );
        battle_state.players[0].team[0].types = vec![PokemonType::Normal];
        battle_state.field.weather = Some(WeatherState {
            weather: Weather::Sandstorm,
            turns_remaining: 3,
        });
        let mut rng = TurnRng::new_for_test(vec![]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        let weather_damage: Vec<(usize, u16)> = bus
            .events()
            .iter()
            .filter_map(|event| match event {
                BattleEvent::PokemonDamaged {
                    player_index,
                    damage,
                    source: DamageSource::Weather(Weather::Sandstorm),
                    ..
                } => Some((*player_index, *damage)),
                _ => None,
            })
            .collect();
        assert_eq!(weather_damage, vec![(0, 9)]);
    }

    #[test]
    fn test_weather_expires() {
        let mut battle_state = battle("splash", TestPokemonBuilder::new("Snorlax"));
        battle_state.field.weather = Some(WeatherState {
            weather: Weather::Hail,
            turns_remaining: 1,
        });
        let mut rng = TurnRng::new_for_test(vec![]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        assert!(field_changes(bus.events()).contains(&FieldChange::WeatherEnded { weather: Weather::Hail }));
        assert_eq!(battle_state.field.weather, None);
        // Hail still chipped both sides on its last turn.
        assert_eq!(battle_state.players[0].team[0].current_hp(), 141);
        assert_eq!(battle_state.players[1].team[0].current_hp(), 141);
    }

    // --- Terrain ---

    #[test]
    fn test_grassy_terrain_heals_grounded_pokemon_only() {
        let mut battle_state = battle(
            "splash",
            TestPokemonBuilder::new("Pidgey")
                .types(vec![PokemonType::Normal, PokemonType::Flying])
                .hp(100),
        );
        battle_state.players[0].team[0].set_hp(100).expect("valid hp");
        battle_state.field.terrain = Some(TerrainState {
            terrain: Terrain::Grassy,
            turns_remaining: 3,
        });
        let mut rng = TurnRng::new_for_test(vec![]);

        run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        assert_eq!(battle_state.players[0].team[0].current_hp(), 109);
        assert_eq!(battle_state.players[1].team[0].current_hp(), 100);
    }

    #[test]
    fn test_electric_terrain_boosts_grounded_attackers() {
        let mut battle_state = battle("thunder-shock", TestPokemonBuilder::new("Snorlax"));
        battle_state.field.terrain = Some(TerrainState {
            terrain: Terrain::Electric,
            turns_remaining: 3,
        });
        // Crit, variance, then the paralysis chance misses.
        let mut rng = TurnRng::new_for_test(vec![50, 50, 50]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        // 17 -> 22 with the 1.3 boost.
        assert_eq!(damage_to_defender(bus.events()), Some(22));
    }

    // --- Hazards ---

    fn hazard_battle(hazard: Hazard, layers: u8, incoming: TestPokemonBuilder) -> BattleState {
        let mut battle_state = create_team_battle(
            vec![TestPokemonBuilder::new("Alakazam").speed(140).moves(&["splash"]).build()],
            vec![
                TestPokemonBuilder::new("Snorlax").speed(30).moves(&["splash"]).build(),
                incoming.speed(30).moves(&["splash"]).build(),
            ],
        );
        battle_state.field.sides[1].hazards.insert(hazard, layers);
        battle_state
    }

    fn hazard_damage(events: &[BattleEvent]) -> Option<u16> {
        events.iter().find_map(|event| match event {
            BattleEvent::PokemonDamaged {
                player_index: 1,
                damage,
                source: DamageSource::Hazard(_),
                ..
            } => Some(*damage),
            _ => None,
        })
    }

    #[rstest]
    #[case("one layer of spikes", Hazard::Spikes, 1, vec![PokemonType::Normal], Some(18))]
    #[case("two layers of spikes", Hazard::Spikes, 2, vec![PokemonType::Normal], Some(25))]
    #[case("three layers of spikes", Hazard::Spikes, 3, vec![PokemonType::Normal], Some(37))]
    #[case("spikes miss flying types", Hazard::Spikes, 3, vec![PokemonType::Normal, PokemonType::Flying], None)]
    #[case("stealth rock on a neutral type", Hazard::StealthRock, 1, vec![PokemonType::Normal], Some(18))]
    #[case("stealth rock on a weak flying type", Hazard::StealthRock, 1, vec![PokemonType::Normal, PokemonType::Flying], Some(37))]
    #[case("stealth rock on a resistant type", Hazard::StealthRock, 1, vec![PokemonType::Fighting], Some(9))]
    fn test_entry_hazard_damage(
        #[case] desc: &str,
        #[case] hazard: Hazard,
        #[case] layers: u8,
        #[case] incoming_types: Vec<PokemonType>,
        #[case] expected: Option<u16>,
    ) {
        let mut battle_state =
            hazard_battle(hazard, layers, TestPokemonBuilder::new("Incoming").types(incoming_types));
        let mut rng = TurnRng::new_for_test(vec![]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, switch_to(1))], &mut rng);
        bus.print_debug_with_message(&format!("[{}]", desc));

        assert_eq!(hazard_damage(bus.events()), expected, "{}", desc);
    }

    #[rstest]
    #[case("one layer poisons", 1, StatusCondition::Poison)]
    #[case("two layers badly poison", 2, StatusCondition::BadlyPoisoned { counter: 1 })]
    fn test_toxic_spikes_poison_on_entry(#[case] desc: &str, #[case] layers: u8, #[case] expected: StatusCondition) {
        let mut battle_state = hazard_battle(Hazard::ToxicSpikes, layers, TestPokemonBuilder::new("Incoming"));
        let mut rng = TurnRng::new_for_test(vec![]);

        run_turn(&mut battle_state, &[(0, use_move(0)), (1, switch_to(1))], &mut rng);

        // Bad poison has already ticked once by the end of the turn.
        assert_eq!(battle_state.players[1].team[1].status, Some(expected), "{}", desc);
    }

    #[test]
    fn test_poison_type_absorbs_toxic_spikes() {
        let mut battle_state = hazard_battle(
            Hazard::ToxicSpikes,
            2,
            TestPokemonBuilder::new("Gengar").types(vec![PokemonType::Ghost, PokemonType::Poison]),
        );
        let mut rng = TurnRng::new_for_test(vec![]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, switch_to(1))], &mut rng);

        assert!(field_changes(bus.events()).contains(&FieldChange::HazardAbsorbed {
            side: 1,
            hazard: Hazard::ToxicSpikes,
        }));
        assert_eq!(battle_state.field.sides[1].hazard_layers(Hazard::ToxicSpikes), 0);
        assert_eq!(battle_state.players[1].team[1].status, None);
    }

    #[test]
    fn test_sticky_web_lowers_speed_on_entry() {
        let mut battle_state = hazard_battle(Hazard::StickyWeb, 1, TestPokemonBuilder::new("Incoming"));
        let mut rng = TurnRng::new_for_test(vec![]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, switch_to(1))], &mut rng);

        assert!(bus.events().contains(&BattleEvent::StatStageChanged {
            player_index: 1,
            pokemon: SpeciesId::from("incoming"),
            stat: schema::StatType::Spe,
            delta: -1,
            new_stage: -1,
            clamped: false,
        }));
    }

    #[test]
    fn test_hazards_stop_once_the_newcomer_faints() {
        let mut battle_state = hazard_battle(Hazard::Spikes, 3, TestPokemonBuilder::new("Incoming").hp(10));
        battle_state.field.sides[1].hazards.insert(Hazard::ToxicSpikes, 1);
        battle_state.field.sides[1].hazards.insert(Hazard::StickyWeb, 1);
        let mut rng = TurnRng::new_for_test(vec![]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, switch_to(1))], &mut rng);
        bus.print_debug_with_message("[hazard faint]");

        let events = bus.events();
        let fainted_at = events
            .iter()
            .position(|event| matches!(event, BattleEvent::PokemonFainted { player_index: 1, .. }))
            .expect("spikes knock the newcomer out");
        assert_eq!(hazard_damage(events), Some(37));
        assert!(!events[fainted_at..].iter().any(|event| matches!(
            event,
            BattleEvent::StatusApplied { .. } | BattleEvent::StatStageChanged { .. }
        )));

        let player = &battle_state.players[1];
        assert_eq!(player.team[1].current_hp(), 0);
        assert_eq!(player.team[1].status, None);
        assert_eq!(player.get_stat_stage(schema::StatType::Spe), 0);
    }

    #[test]
    fn test_spikes_stack_to_their_layer_limit() {
        let mut battle_state = battle("spikes", TestPokemonBuilder::new("Snorlax"));
        let mut rng = TurnRng::new_for_test(vec![]);

        for expected_layers in 1..=3 {
            let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);
            assert_eq!(
                field_changes(bus.events()),
                vec![FieldChange::HazardSet {
                    side: 1,
                    hazard: Hazard::Spikes,
                    layers: expected_layers,
                }]
            );
        }

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);
        assert!(bus.events().contains(&BattleEvent::MoveFailed {
            player_index: 0,
            move_used: MoveId::from("spikes"),
            reason: BlockReason::MaxLayers,
        }));
        assert_eq!(battle_state.field.sides[1].hazard_layers(Hazard::Spikes), 3);
    }

    // --- Screens ---

    #[rstest]
    #[case("reflect halves a normal hit", vec![50, 50], 8)]
    #[case("a critical hit ignores reflect", vec![1, 50], 25)]
    fn test_reflect(#[case] desc: &str, #[case] rolls: Vec<u8>, #[case] expected: u16) {
        let mut battle_state = battle("tackle", TestPokemonBuilder::new("Snorlax"));
        battle_state.field.sides[1].team_conditions.insert(TeamCondition::Reflect, 3);
        let mut rng = TurnRng::new_for_test(rolls);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        assert_eq!(damage_to_defender(bus.events()), Some(expected), "{}", desc);
    }

    #[test]
    fn test_light_screen_leaves_physical_moves_alone() {
        let mut battle_state = battle("tackle", TestPokemonBuilder::new("Snorlax"));
        battle_state.field.sides[1].team_conditions.insert(TeamCondition::LightScreen, 3);
        let mut rng = TurnRng::new_for_test(vec![50, 50]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);

        assert_eq!(damage_to_defender(bus.events()), Some(17));
    }

    #[test]
    fn test_screen_is_set_on_the_users_side_and_expires() {
        let mut battle_state = battle("reflect", TestPokemonBuilder::new("Snorlax"));
        let mut rng = TurnRng::new_for_test(vec![]);

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);
        assert_eq!(
            field_changes(bus.events()),
            vec![FieldChange::TeamConditionStarted {
                side: 0,
                condition: TeamCondition::Reflect,
                turns: 5,
            }]
        );

        battle_state.players[0].team[0].moves[0].move_id = MoveId::from("splash");
        for _ in 0..3 {
            run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);
        }
        assert!(battle_state.field.side_has_team_condition(0, TeamCondition::Reflect));

        let bus = run_turn(&mut battle_state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);
        assert!(field_changes(bus.events()).contains(&FieldChange::TeamConditionEnded {
            side: 0,
            condition: TeamCondition::Reflect,
        }));
        assert!(!battle_state.field.side_has_team_condition(0, TeamCondition::Reflect));
    }
}
