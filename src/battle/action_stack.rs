use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::battle::state::BattleState;
use crate::battle::stats::effective_speed;
use crate::errors::{ActionError, BattleResult};
use crate::player::PlayerAction;
use crate::rng::RandomSource;
use crate::rule_data::RuleData;
use schema::MoveId;
use tracing::trace;

/// Internal action types for the action stack
/// These represent atomic actions that can be executed during battle resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleAction {
    /// Player switches to a different Pokemon
    Switch { player_index: usize, team_index: usize },

    UseMove {
        player_index: usize,
        /// Slot the move occupies, for PP accounting.
        move_index: usize,
        move_used: MoveId,
        /// `None` lets the resolver pick the first live opponent.
        target_index: Option<usize>,
        /// Second turn of a charge move: no PP, no new choice.
        forced: bool,
    },

    /// The turn lost after a recharge move.
    Recharge { player_index: usize },
}

impl BattleAction {
    pub fn player_index(&self) -> usize {
        match self {
            BattleAction::Switch { player_index, .. }
            | BattleAction::UseMove { player_index, .. }
            | BattleAction::Recharge { player_index } => *player_index,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionStack {
    actions: VecDeque<BattleAction>,
}

// Sort key for one action; larger goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ActionPriority {
    action_priority: i8, // Switch: 6, Move: 0
    move_priority: i8,
    speed: u16,
}

impl ActionStack {
    pub fn new() -> Self {
        Self {
            actions: VecDeque::new(),
        }
    }

    /// Builds the ordered stack for a turn from validated player choices.
    /// Forced actions (charged moves, recharge turns) replace whatever the
    /// player picked. Speeds are read once, here.
    pub fn build_initial(
        battle_state: &BattleState,
        rules: &RuleData,
        actions: &[(usize, PlayerAction)],
        rng: &mut dyn RandomSource,
    ) -> BattleResult<Self> {
        let mut prioritized = Vec::with_capacity(actions.len());
        for (player_index, player_action) in actions {
            let battle_action = Self::convert_player_action(*player_index, player_action, battle_state)?;
            let priority = Self::calculate_action_priority(&battle_action, battle_state, rules)?;
            prioritized.push((battle_action, priority));
        }

        let ordered = Self::determine_action_order(prioritized, rng);

        let mut stack = Self::new();
        for action in ordered {
            stack.push_back(action);
        }
        Ok(stack)
    }

    pub fn push_back(&mut self, action: BattleAction) {
        self.actions.push_back(action);
    }

    pub fn pop_front(&mut self) -> Option<BattleAction> {
        self.actions.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleAction> {
        self.actions.iter()
    }

    // --- Private Helper Functions ---

    /// Sort by switch-first, then move priority, then speed; runs of exactly
    /// equal keys are shuffled with the random source. No draw is made when
    /// nothing ties.
    fn determine_action_order(
        mut prioritized: Vec<(BattleAction, ActionPriority)>,
        rng: &mut dyn RandomSource,
    ) -> Vec<BattleAction> {
        // Stable sort keeps submission order inside a tie before the shuffle.
        prioritized.sort_by(|a, b| b.1.cmp(&a.1));

        let mut start = 0;
        while start < prioritized.len() {
            let mut end = start + 1;
            while end < prioritized.len() && prioritized[end].1.cmp(&prioritized[start].1) == Ordering::Equal {
                end += 1;
            }
            if end - start > 1 {
                trace!(tied = end - start, "breaking speed tie");
                Self::shuffle(&mut prioritized[start..end], rng);
            }
            start = end;
        }

        prioritized.into_iter().map(|(action, _)| action).collect()
    }

    fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
        for i in (1..items.len()).rev() {
            let j = rng.next_below(i as u32 + 1, "Speed Tie") as usize;
            items.swap(i, j);
        }
    }

    fn calculate_action_priority(
        action: &BattleAction,
        battle_state: &BattleState,
        rules: &RuleData,
    ) -> BattleResult<ActionPriority> {
        let player_index = action.player_index();
        let player = &battle_state.players[player_index];
        let speed = player
            .active_pokemon()
            .map(|pokemon| effective_speed(pokemon, player, &battle_state.field, rules))
            .unwrap_or(0);

        Ok(match action {
            BattleAction::Switch { .. } => ActionPriority {
                action_priority: 6,
                move_priority: 0,
                speed,
            },
            BattleAction::UseMove { move_used, .. } => ActionPriority {
                action_priority: 0,
                move_priority: rules.move_data(move_used)?.priority,
                speed,
            },
            BattleAction::Recharge { .. } => ActionPriority {
                action_priority: 0,
                move_priority: 0,
                speed,
            },
        })
    }

    fn convert_player_action(
        player_index: usize,
        player_action: &PlayerAction,
        battle_state: &BattleState,
    ) -> BattleResult<BattleAction> {
        let player = &battle_state.players[player_index];

        if player.must_recharge() {
            return Ok(BattleAction::Recharge { player_index });
        }

        let pokemon = player
            .active_pokemon()
            .ok_or(ActionError::NoActivePokemon(player_index))?;

        if let Some((move_used, target_index)) = player.forced_move() {
            return Ok(BattleAction::UseMove {
                player_index,
                move_index: pokemon.move_slot(move_used).unwrap_or(0),
                move_used: move_used.clone(),
                target_index: Some(target_index),
                forced: true,
            });
        }

        match player_action {
            PlayerAction::SwitchPokemon { team_index } => Ok(BattleAction::Switch {
                player_index,
                team_index: *team_index,
            }),
            PlayerAction::UseMove { move_index, target } => {
                let slot = pokemon
                    .moves
                    .get(*move_index)
                    .ok_or(ActionError::InvalidMoveIndex(*move_index))?;
                Ok(BattleAction::UseMove {
                    player_index,
                    move_index: *move_index,
                    move_used: slot.move_id.clone(),
                    target_index: *target,
                    forced: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::BattlePlayer;
    use crate::pokemon::{MoveInstance, PokemonInst};
    use crate::rng::TurnRng;
    use schema::PokemonType;

    fn pokemon(name: &str, speed: u16) -> PokemonInst {
        PokemonInst::new_for_test(
            name,
            50,
            vec![PokemonType::Normal],
            [100, 100, 100, 100, 100, speed],
            vec![
                MoveInstance::new(MoveId::from("tackle"), 35),
                MoveInstance::new(MoveId::from("quick-attack"), 30),
            ],
        )
    }

    fn battle(speeds: [u16; 2]) -> BattleState {
        BattleState::new(
            "order".into(),
            vec![
                BattlePlayer::new("a".into(), "A".into(), 0, vec![pokemon("Alpha", speeds[0]), pokemon("Gamma", 10)]),
                BattlePlayer::new("b".into(), "B".into(), 1, vec![pokemon("Beta", speeds[1])]),
            ],
        )
        .expect("valid battle")
    }

    fn order(stack: &ActionStack) -> Vec<usize> {
        stack.iter().map(|action| action.player_index()).collect()
    }

    fn tackle() -> PlayerAction {
        PlayerAction::UseMove { move_index: 0, target: None }
    }

    #[test]
    fn test_faster_moves_first_without_draws() {
        let rules = RuleData::standard();
        let state = battle([80, 100]);
        let mut rng = TurnRng::new_for_test(vec![]);

        let stack = ActionStack::build_initial(&state, &rules, &[(0, tackle()), (1, tackle())], &mut rng)
            .expect("builds");

        assert_eq!(order(&stack), vec![1, 0]);
    }

    #[test]
    fn test_priority_beats_speed() {
        let rules = RuleData::standard();
        let state = battle([80, 100]);
        let mut rng = TurnRng::new_for_test(vec![]);
        let quick_attack = PlayerAction::UseMove { move_index: 1, target: None };

        let stack = ActionStack::build_initial(&state, &rules, &[(0, quick_attack), (1, tackle())], &mut rng)
            .expect("builds");

        assert_eq!(order(&stack), vec![0, 1]);
    }

    #[test]
    fn test_switch_beats_priority() {
        let rules = RuleData::standard();
        let state = battle([100, 80]);
        let mut rng = TurnRng::new_for_test(vec![]);
        let quick_attack = PlayerAction::UseMove { move_index: 1, target: None };

        let stack = ActionStack::build_initial(
            &state,
            &rules,
            &[(0, quick_attack), (1, PlayerAction::SwitchPokemon { team_index: 0 })],
            &mut rng,
        )
        .expect("builds");

        assert_eq!(order(&stack), vec![1, 0]);
    }

    #[test]
    fn test_speed_tie_uses_one_draw() {
        let rules = RuleData::standard();
        let state = battle([100, 100]);

        // next_below(2): outcome 1 -> 0 (swap), outcome 100 -> 1 (keep)
        let mut rng = TurnRng::new_for_test(vec![1]);
        let stack = ActionStack::build_initial(&state, &rules, &[(0, tackle()), (1, tackle())], &mut rng)
            .expect("builds");
        assert_eq!(order(&stack), vec![1, 0]);
        assert_eq!(rng.remaining(), 0);

        let mut rng = TurnRng::new_for_test(vec![100]);
        let stack = ActionStack::build_initial(&state, &rules, &[(0, tackle()), (1, tackle())], &mut rng)
            .expect("builds");
        assert_eq!(order(&stack), vec![0, 1]);
    }

    #[test]
    fn test_recharge_overrides_choice() {
        let rules = RuleData::standard();
        let mut state = battle([100, 80]);
        state.players[0].add_condition(crate::battle::conditions::PokemonCondition::MustRecharge { armed: true });
        let mut rng = TurnRng::new_for_test(vec![]);

        let stack = ActionStack::build_initial(&state, &rules, &[(0, tackle()), (1, tackle())], &mut rng)
            .expect("builds");

        assert_eq!(stack.iter().next(), Some(&BattleAction::Recharge { player_index: 0 }));
    }
}
