#[cfg(test)]
mod tests {
    use crate::battle::engine::{resolve_turn, submit_replacements};
    use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, GameState};
    use crate::battle::tests::common::{create_team_battle, run_turn, use_move, TestPokemonBuilder};
    use crate::player::PlayerAction;
    use crate::rng::{RandomSource, SeededRandom};
    use crate::rule_data::RuleData;
    use pretty_assertions::assert_eq;
    use schema::{PokemonType, StatType};

    fn mixed_battle() -> BattleState {
        create_team_battle(
            vec![
                TestPokemonBuilder::new("Charmander")
                    .types(vec![PokemonType::Fire])
                    .speed(90)
                    .moves(&["ember", "swords-dance", "confuse-ray", "headbutt"])
                    .build(),
                TestPokemonBuilder::new("Squirtle")
                    .types(vec![PokemonType::Water])
                    .speed(60)
                    .moves(&["water-gun", "rain-dance", "bite", "growl"])
                    .build(),
            ],
            vec![
                TestPokemonBuilder::new("Bulbasaur")
                    .types(vec![PokemonType::Grass, PokemonType::Poison])
                    .speed(70)
                    .moves(&["vine-whip", "leech-seed", "toxic", "sleep-powder"])
                    .build(),
                TestPokemonBuilder::new("Pikachu")
                    .types(vec![PokemonType::Electric])
                    .speed(120)
                    .moves(&["thunder-shock", "thunder-wave", "quick-attack", "fury-attack"])
                    .build(),
            ],
        )
    }

    /// Picks a move with PP left for every active participant.
    fn choose_actions(state: &BattleState, chooser: &mut SeededRandom) -> Vec<(usize, PlayerAction)> {
        state
            .players
            .iter()
            .enumerate()
            .filter_map(|(player_index, player)| {
                let pokemon = player.live_active_pokemon()?;
                let usable: Vec<usize> = pokemon
                    .moves
                    .iter()
                    .enumerate()
                    .filter(|(_, slot)| slot.pp > 0)
                    .map(|(index, _)| index)
                    .collect();
                if usable.is_empty() {
                    return None;
                }
                let pick = chooser.next_below(usable.len() as u32, "choose move") as usize;
                Some((player_index, use_move(usable[pick])))
            })
            .collect()
    }

    fn first_replacements(state: &BattleState) -> Vec<(usize, usize)> {
        state
            .players_needing_replacement()
            .into_iter()
            .filter_map(|player_index| {
                let replacement = state.players[player_index].available_replacements().first().copied()?;
                Some((player_index, replacement))
            })
            .collect()
    }

    /// Plays up to `turns` turns and returns every event of the battle plus
    /// the serialized state after each step.
    fn play(seed: u64, turns: usize) -> (Vec<BattleEvent>, Vec<String>) {
        let rules = RuleData::standard();
        let mut state = mixed_battle();
        let mut rng = SeededRandom::new(seed);
        let mut chooser = SeededRandom::new(seed ^ 0x5eed);
        let mut events = Vec::new();
        let mut snapshots = Vec::new();

        for _ in 0..turns {
            let bus = match state.game_state {
                GameState::WaitingForActions => {
                    let actions = choose_actions(&state, &mut chooser);
                    resolve_turn(&mut state, &rules, &actions, &mut rng).expect("chosen actions are legal")
                }
                GameState::WaitingForReplacements => {
                    let replacements = first_replacements(&state);
                    submit_replacements(&mut state, &rules, &replacements, &mut rng)
                        .expect("chosen replacements are legal")
                }
                _ => break,
            };
            events.extend(bus.into_events());
            snapshots.push(state.to_json().expect("state serializes"));
        }
        (events, snapshots)
    }

    fn assert_state_within_bounds(state: &BattleState) {
        for player in &state.players {
            for pokemon in &player.team {
                assert!(pokemon.current_hp() <= pokemon.max_hp(), "{} over max HP", pokemon.species);
                if pokemon.is_fainted() {
                    assert_eq!(pokemon.status, None, "{} fainted with a status", pokemon.species);
                }
            }
            for stat in [StatType::Atk, StatType::Def, StatType::SpAtk, StatType::SpDef, StatType::Spe, StatType::Acc, StatType::Eva] {
                let stage = player.get_stat_stage(stat);
                assert!((-6..=6).contains(&stage), "{:?} stage {} out of range", stat, stage);
            }
        }
    }

    #[test]
    fn test_same_seed_same_battle() {
        let (first_events, first_states) = play(42, 20);
        let (second_events, second_states) = play(42, 20);

        assert!(!first_events.is_empty());
        assert_eq!(
            serde_json::to_string(&first_events).expect("events serialize"),
            serde_json::to_string(&second_events).expect("events serialize")
        );
        assert_eq!(first_states, second_states);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let (first_events, _) = play(1, 20);
        let (second_events, _) = play(2, 20);

        assert_ne!(first_events, second_events);
    }

    #[test]
    fn test_state_stays_within_bounds_across_many_battles() {
        let rules = RuleData::standard();
        for seed in 0..50 {
            let mut state = mixed_battle();
            let mut rng = SeededRandom::new(seed);
            let mut chooser = SeededRandom::new(seed + 1000);

            for _ in 0..30 {
                match state.game_state {
                    GameState::WaitingForActions => {
                        let actions = choose_actions(&state, &mut chooser);
                        resolve_turn(&mut state, &rules, &actions, &mut rng).expect("chosen actions are legal");
                    }
                    GameState::WaitingForReplacements => {
                        let replacements = first_replacements(&state);
                        submit_replacements(&mut state, &rules, &replacements, &mut rng)
                            .expect("chosen replacements are legal");
                    }
                    _ => break,
                }
                assert_state_within_bounds(&state);
            }
        }
    }

    #[test]
    fn test_flinch_rate_matches_its_chance() {
        const TRIALS: u64 = 10_000;
        let mut flinches = 0;

        for seed in 0..TRIALS {
            let mut state = create_team_battle(
                vec![TestPokemonBuilder::new("Persian").speed(140).moves(&["headbutt"]).build()],
                vec![TestPokemonBuilder::new("Snorlax").speed(30).moves(&["splash"]).build()],
            );
            let mut rng = SeededRandom::new(seed);
            let bus = run_turn(&mut state, &[(0, use_move(0)), (1, use_move(0))], &mut rng);
            if bus.events().contains(&BattleEvent::ActionFailed {
                player_index: 1,
                reason: ActionFailureReason::IsFlinching,
            }) {
                flinches += 1;
            }
        }

        let rate = flinches as f64 / TRIALS as f64;
        assert!((0.27..0.33).contains(&rate), "flinch rate {}", rate);
    }
}
