//! Persistent status and volatile condition state machines: whether a
//! condition can be applied, what it does before an action, and how it ticks
//! at the end of the turn.

use crate::battle::calculators::DamageCalculator;
use crate::battle::commands::{BattleCommand, PlayerTarget};
use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, BlockReason};
use crate::pokemon::{PokemonInst, StatusCondition};
use crate::rng::RandomSource;
use crate::rule_data::RuleData;
use schema::{AbilityEffect, PokemonType, StatusType, VolatileType};

const THAW_CHANCE: u8 = 20;
const FULL_PARALYSIS_CHANCE: u8 = 25;

/// Why `status` cannot land on `pokemon`, if anything stops it.
pub fn status_block_reason(pokemon: &PokemonInst, status: StatusType, rules: &RuleData) -> Option<BlockReason> {
    if let Some(current) = pokemon.status {
        return Some(if current.status_type() == status {
            BlockReason::SameStatus
        } else {
            BlockReason::AlreadyHasStatus
        });
    }

    let immune_by_type = match status {
        StatusType::Burn => pokemon.has_type(PokemonType::Fire),
        StatusType::Freeze => pokemon.has_type(PokemonType::Ice),
        StatusType::Paralysis => pokemon.has_type(PokemonType::Electric),
        StatusType::Poison | StatusType::BadlyPoisoned => {
            pokemon.has_type(PokemonType::Poison) || pokemon.has_type(PokemonType::Steel)
        }
        StatusType::Sleep => false,
    };
    if immune_by_type {
        return Some(BlockReason::TypeImmunity);
    }

    let immune_by_ability = rules
        .ability_effects(pokemon.ability.as_ref())
        .iter()
        .any(|effect| match effect {
            AbilityEffect::StatusImmunity(StatusType::Poison) => {
                matches!(status, StatusType::Poison | StatusType::BadlyPoisoned)
            }
            AbilityEffect::StatusImmunity(immune) => *immune == status,
            _ => false,
        });
    if immune_by_ability {
        return Some(BlockReason::AbilityImmunity);
    }

    None
}

/// Build the concrete condition, drawing its duration where it has one.
pub fn roll_status_condition(status: StatusType, rng: &mut dyn RandomSource) -> StatusCondition {
    match status {
        StatusType::Sleep => StatusCondition::Sleep {
            turns_remaining: rng.range_inclusive(1, 3, "Sleep Duration") as u8,
        },
        StatusType::Poison => StatusCondition::Poison,
        StatusType::BadlyPoisoned => StatusCondition::BadlyPoisoned { counter: 0 },
        StatusType::Burn => StatusCondition::Burn,
        StatusType::Freeze => StatusCondition::Freeze,
        StatusType::Paralysis => StatusCondition::Paralysis,
    }
}

/// Commands that apply `status` to a participant's active Pokemon, or a
/// blocked event explaining why nothing happened.
pub fn status_application_commands(
    state: &BattleState,
    rules: &RuleData,
    target_index: usize,
    status: StatusType,
    rng: &mut dyn RandomSource,
) -> Vec<BattleCommand> {
    let Some(pokemon) = state.players[target_index].live_active_pokemon() else {
        return Vec::new();
    };

    if let Some(reason) = status_block_reason(pokemon, status, rules) {
        return vec![BattleCommand::EmitEvent(BattleEvent::StatusBlocked {
            player_index: target_index,
            pokemon: pokemon.species.clone(),
            status,
            reason,
        })];
    }

    let condition = roll_status_condition(status, rng);
    vec![
        BattleCommand::SetPokemonStatus {
            target: PlayerTarget::from_index(target_index),
            status: Some(condition),
        },
        BattleCommand::EmitEvent(BattleEvent::StatusApplied {
            player_index: target_index,
            pokemon: pokemon.species.clone(),
            status: condition,
        }),
    ]
}

/// Why a volatile cannot land, if anything stops it.
pub fn volatile_block_reason(state: &BattleState, target_index: usize, volatile: VolatileType) -> Option<BlockReason> {
    let player = &state.players[target_index];
    let pokemon = player.live_active_pokemon()?;
    let condition_type = volatile_condition_type(volatile);

    if volatile == VolatileType::LeechSeed && pokemon.has_type(PokemonType::Grass) {
        return Some(BlockReason::TypeImmunity);
    }
    if player.has_condition(condition_type) {
        return Some(BlockReason::AlreadyAffected);
    }
    None
}

pub fn volatile_condition_type(volatile: VolatileType) -> PokemonConditionType {
    match volatile {
        VolatileType::Confusion => PokemonConditionType::Confused,
        VolatileType::Flinch => PokemonConditionType::Flinched,
        VolatileType::LeechSeed => PokemonConditionType::Seeded,
        VolatileType::Trap => PokemonConditionType::Trapped,
        VolatileType::Protect => PokemonConditionType::Protected,
        VolatileType::FocusEnergy => PokemonConditionType::FocusEnergy,
    }
}

/// Commands that attach a volatile to `target_index`. `source_index` is the
/// participant that caused it (the planter, for Leech Seed).
pub fn volatile_application_commands(
    state: &BattleState,
    target_index: usize,
    source_index: usize,
    volatile: VolatileType,
    rng: &mut dyn RandomSource,
) -> Vec<BattleCommand> {
    let Some(pokemon) = state.players[target_index].live_active_pokemon() else {
        return Vec::new();
    };
    let condition_type = volatile_condition_type(volatile);

    if let Some(reason) = volatile_block_reason(state, target_index, volatile) {
        return vec![BattleCommand::EmitEvent(BattleEvent::ConditionBlocked {
            player_index: target_index,
            pokemon: pokemon.species.clone(),
            condition: condition_type,
            reason,
        })];
    }

    let condition = match volatile {
        VolatileType::Confusion => PokemonCondition::Confused {
            turns_remaining: rng.range_inclusive(1, 4, "Confusion Duration") as u8,
        },
        VolatileType::Flinch => PokemonCondition::Flinched,
        VolatileType::LeechSeed => PokemonCondition::Seeded {
            planter_index: source_index,
            planter_team_index: state.players[source_index].active_pokemon_index,
        },
        VolatileType::Trap => PokemonCondition::Trapped {
            turns_remaining: rng.range_inclusive(2, 5, "Trap Duration") as u8,
        },
        VolatileType::Protect => PokemonCondition::Protected,
        VolatileType::FocusEnergy => PokemonCondition::FocusEnergy,
    };

    vec![
        BattleCommand::AddCondition {
            target: PlayerTarget::from_index(target_index),
            condition,
        },
        BattleCommand::EmitEvent(BattleEvent::ConditionApplied {
            player_index: target_index,
            pokemon: pokemon.species.clone(),
            condition: condition_type,
        }),
    ]
}

/// Result of the pre-action checks for one participant.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionGate {
    pub commands: Vec<BattleCommand>,
    pub can_act: bool,
}

impl ActionGate {
    fn proceed(commands: Vec<BattleCommand>) -> Self {
        Self { commands, can_act: true }
    }

    fn fail(player_index: usize, reason: ActionFailureReason, mut commands: Vec<BattleCommand>) -> Self {
        commands.insert(
            0,
            BattleCommand::EmitEvent(BattleEvent::ActionFailed { player_index, reason }),
        );
        Self {
            commands,
            can_act: false,
        }
    }
}

/// Checks run, in order, before a participant's move: faint, recharge,
/// flinch, sleep, freeze (which may thaw), paralysis, confusion.
pub fn action_gate(
    state: &BattleState,
    player_index: usize,
    calculator: &DamageCalculator,
    rng: &mut dyn RandomSource,
) -> ActionGate {
    let player = &state.players[player_index];
    let target = PlayerTarget::from_index(player_index);
    let Some(pokemon) = player.live_active_pokemon() else {
        return ActionGate::fail(player_index, ActionFailureReason::PokemonFainted, Vec::new());
    };

    if player.must_recharge() {
        return ActionGate::fail(
            player_index,
            ActionFailureReason::MustRecharge,
            vec![BattleCommand::RemoveCondition {
                target,
                condition_type: PokemonConditionType::MustRecharge,
            }],
        );
    }

    if player.has_condition(PokemonConditionType::Flinched) {
        return ActionGate::fail(player_index, ActionFailureReason::IsFlinching, Vec::new());
    }

    let mut commands = Vec::new();
    match pokemon.status {
        Some(StatusCondition::Sleep { .. }) => {
            return ActionGate::fail(player_index, ActionFailureReason::IsAsleep, Vec::new());
        }
        Some(StatusCondition::Freeze) => {
            if rng.check_percent(THAW_CHANCE, "Thaw") {
                commands.push(BattleCommand::SetPokemonStatus { target, status: None });
                commands.push(BattleCommand::EmitEvent(BattleEvent::StatusRemoved {
                    player_index,
                    pokemon: pokemon.species.clone(),
                    status: StatusCondition::Freeze,
                }));
            } else {
                return ActionGate::fail(player_index, ActionFailureReason::IsFrozen, Vec::new());
            }
        }
        Some(StatusCondition::Paralysis) => {
            if rng.check_percent(FULL_PARALYSIS_CHANCE, "Full Paralysis") {
                return ActionGate::fail(player_index, ActionFailureReason::IsParalyzed, Vec::new());
            }
        }
        _ => {}
    }

    if player.has_condition(PokemonConditionType::Confused) && rng.chance(1, 3, "Confusion Self-Hit") {
        let damage = calculator.confusion_damage(pokemon, player);
        commands.push(BattleCommand::EmitEvent(BattleEvent::ConfusionSelfHit {
            player_index,
            pokemon: pokemon.species.clone(),
            damage,
            remaining_hp: pokemon.current_hp().saturating_sub(damage),
        }));
        commands.push(BattleCommand::DealDamage { target, amount: damage });
        return ActionGate::fail(player_index, ActionFailureReason::IsConfused, commands);
    }

    ActionGate::proceed(commands)
}

fn fraction_of_max(pokemon: &PokemonInst, denominator: u32) -> u16 {
    ((pokemon.max_hp() as u32 / denominator).max(1)).min(u16::MAX as u32) as u16
}

/// Burn and poison damage for one participant.
pub fn status_damage_commands(state: &BattleState, player_index: usize) -> Vec<BattleCommand> {
    let Some(pokemon) = state.players[player_index].live_active_pokemon() else {
        return Vec::new();
    };
    let target = PlayerTarget::from_index(player_index);
    let mut commands = Vec::new();

    let (damage, status) = match pokemon.status {
        Some(StatusCondition::Burn) => (fraction_of_max(pokemon, 16), StatusCondition::Burn),
        Some(StatusCondition::Poison) => (fraction_of_max(pokemon, 8), StatusCondition::Poison),
        Some(StatusCondition::BadlyPoisoned { counter }) => {
            let counter = counter.saturating_add(1).min(15);
            let damage = ((pokemon.max_hp() as u32 * counter as u32 / 16).max(1)) as u16;
            let advanced = StatusCondition::BadlyPoisoned { counter };
            commands.push(BattleCommand::SetPokemonStatus {
                target,
                status: Some(advanced),
            });
            (damage, advanced)
        }
        _ => return commands,
    };

    commands.push(BattleCommand::EmitEvent(BattleEvent::StatusDamage {
        player_index,
        pokemon: pokemon.species.clone(),
        status,
        damage,
        remaining_hp: pokemon.current_hp().saturating_sub(damage),
    }));
    commands.push(BattleCommand::DealDamage { target, amount: damage });
    commands
}

/// Leech Seed: 1/8 of the seeded Pokemon's max HP moves to the Pokemon that
/// planted it. Nothing happens once the planter has fainted or left the field.
pub fn leech_seed_commands(state: &BattleState, player_index: usize) -> Vec<BattleCommand> {
    let player = &state.players[player_index];
    let Some(pokemon) = player.live_active_pokemon() else {
        return Vec::new();
    };
    let Some(PokemonCondition::Seeded {
        planter_index,
        planter_team_index,
    }) = player.get_condition(PokemonConditionType::Seeded)
    else {
        return Vec::new();
    };
    let Some(planter) = state
        .players
        .get(*planter_index)
        .filter(|planter| planter.active_pokemon_index == *planter_team_index)
        .and_then(|planter| planter.live_active_pokemon())
    else {
        return Vec::new();
    };

    let damage = fraction_of_max(pokemon, 8).min(pokemon.current_hp());
    let healed = damage.min(planter.max_hp() - planter.current_hp());
    let mut commands = vec![
        BattleCommand::EmitEvent(BattleEvent::ConditionDamage {
            player_index,
            pokemon: pokemon.species.clone(),
            condition: PokemonConditionType::Seeded,
            damage,
            remaining_hp: pokemon.current_hp() - damage,
        }),
        BattleCommand::DealDamage {
            target: PlayerTarget::from_index(player_index),
            amount: damage,
        },
    ];
    if healed > 0 {
        commands.push(BattleCommand::HealPokemon {
            target: PlayerTarget::from_index(*planter_index),
            amount: healed,
        });
        commands.push(BattleCommand::EmitEvent(BattleEvent::PokemonHealed {
            player_index: *planter_index,
            pokemon: planter.species.clone(),
            amount: healed,
            new_hp: planter.current_hp() + healed,
        }));
    }
    commands
}

/// Trap damage (1/8) and its countdown.
pub fn trap_commands(state: &BattleState, player_index: usize) -> Vec<BattleCommand> {
    let player = &state.players[player_index];
    let Some(pokemon) = player.live_active_pokemon() else {
        return Vec::new();
    };
    let Some(PokemonCondition::Trapped { turns_remaining }) = player.get_condition(PokemonConditionType::Trapped) else {
        return Vec::new();
    };
    let target = PlayerTarget::from_index(player_index);
    let damage = fraction_of_max(pokemon, 8);

    let mut commands = vec![
        BattleCommand::EmitEvent(BattleEvent::ConditionDamage {
            player_index,
            pokemon: pokemon.species.clone(),
            condition: PokemonConditionType::Trapped,
            damage,
            remaining_hp: pokemon.current_hp().saturating_sub(damage),
        }),
        BattleCommand::DealDamage { target, amount: damage },
    ];
    commands.extend(countdown_commands(
        player_index,
        pokemon,
        PokemonConditionType::Trapped,
        *turns_remaining,
        |turns_remaining| PokemonCondition::Trapped { turns_remaining },
    ));
    commands
}

fn countdown_commands(
    player_index: usize,
    pokemon: &PokemonInst,
    condition_type: PokemonConditionType,
    turns_remaining: u8,
    rebuild: impl Fn(u8) -> PokemonCondition,
) -> Vec<BattleCommand> {
    let target = PlayerTarget::from_index(player_index);
    let turns_remaining = turns_remaining.saturating_sub(1);
    if turns_remaining == 0 {
        vec![
            BattleCommand::RemoveCondition { target, condition_type },
            BattleCommand::EmitEvent(BattleEvent::ConditionExpired {
                player_index,
                pokemon: pokemon.species.clone(),
                condition: condition_type,
            }),
        ]
    } else {
        vec![BattleCommand::AddCondition {
            target,
            condition: rebuild(turns_remaining),
        }]
    }
}

/// Sleep and confusion counters, plus single-turn volatiles. Counters only
/// run for conditions that were already present when the turn began.
pub fn duration_commands(
    state: &BattleState,
    player_index: usize,
    asleep_at_turn_start: bool,
    confused_at_turn_start: bool,
) -> Vec<BattleCommand> {
    let player = &state.players[player_index];
    let Some(pokemon) = player.live_active_pokemon() else {
        return Vec::new();
    };
    let target = PlayerTarget::from_index(player_index);
    let mut commands = Vec::new();

    if asleep_at_turn_start {
        if let Some(StatusCondition::Sleep { turns_remaining }) = pokemon.status {
            let turns_remaining = turns_remaining.saturating_sub(1);
            if turns_remaining == 0 {
                commands.push(BattleCommand::SetPokemonStatus { target, status: None });
                commands.push(BattleCommand::EmitEvent(BattleEvent::StatusRemoved {
                    player_index,
                    pokemon: pokemon.species.clone(),
                    status: StatusCondition::Sleep { turns_remaining },
                }));
            } else {
                commands.push(BattleCommand::SetPokemonStatus {
                    target,
                    status: Some(StatusCondition::Sleep { turns_remaining }),
                });
            }
        }
    }

    if confused_at_turn_start {
        if let Some(PokemonCondition::Confused { turns_remaining }) = player.get_condition(PokemonConditionType::Confused) {
            commands.extend(countdown_commands(
                player_index,
                pokemon,
                PokemonConditionType::Confused,
                *turns_remaining,
                |turns_remaining| PokemonCondition::Confused { turns_remaining },
            ));
        }
    }

    for condition_type in [PokemonConditionType::Flinched, PokemonConditionType::Protected] {
        if player.has_condition(condition_type) {
            commands.push(BattleCommand::RemoveCondition { target, condition_type });
            commands.push(BattleCommand::EmitEvent(BattleEvent::ConditionExpired {
                player_index,
                pokemon: pokemon.species.clone(),
                condition: condition_type,
            }));
        }
    }

    commands
}

/// Charge moves become ready; a fresh recharge arms, and one left over from
/// an earlier turn is dropped.
pub fn multi_turn_commands(state: &BattleState, player_index: usize) -> Vec<BattleCommand> {
    let player = &state.players[player_index];
    if player.live_active_pokemon().is_none() {
        return Vec::new();
    }
    let target = PlayerTarget::from_index(player_index);
    let mut commands = Vec::new();

    if let Some(PokemonCondition::Charging {
        move_used,
        target_index,
        ready: false,
    }) = player.get_condition(PokemonConditionType::Charging)
    {
        commands.push(BattleCommand::AddCondition {
            target,
            condition: PokemonCondition::Charging {
                move_used: move_used.clone(),
                target_index: *target_index,
                ready: true,
            },
        });
    }

    match player.get_condition(PokemonConditionType::MustRecharge) {
        Some(PokemonCondition::MustRecharge { armed: false }) => commands.push(BattleCommand::AddCondition {
            target,
            condition: PokemonCondition::MustRecharge { armed: true },
        }),
        Some(PokemonCondition::MustRecharge { armed: true }) => commands.push(BattleCommand::RemoveCondition {
            target,
            condition_type: PokemonConditionType::MustRecharge,
        }),
        _ => {}
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::commands::execute_command_batch;
    use crate::battle::state::EventBus;
    use crate::player::BattlePlayer;
    use crate::rng::TurnRng;
    use pretty_assertions::assert_eq;

    fn battle(types: Vec<PokemonType>) -> BattleState {
        let first = PokemonInst::new_for_test("Alpha", 50, types, [160, 100, 100, 100, 100, 100], vec![]);
        let second = PokemonInst::new_for_test("Beta", 50, vec![PokemonType::Normal], [160, 100, 100, 100, 100, 100], vec![]);
        BattleState::new(
            "status".into(),
            vec![
                BattlePlayer::new("a".into(), "A".into(), 0, vec![first]),
                BattlePlayer::new("b".into(), "B".into(), 1, vec![second]),
            ],
        )
        .expect("valid battle")
    }

    fn run(state: &mut BattleState, commands: Vec<BattleCommand>) -> EventBus {
        let mut bus = EventBus::new();
        execute_command_batch(commands, state, &mut bus).expect("executes");
        bus
    }

    #[test]
    fn test_type_and_duplicate_blocks() {
        let rules = RuleData::standard();
        let mut state = battle(vec![PokemonType::Fire]);
        let pokemon = state.players[0].team[0].clone();
        assert_eq!(status_block_reason(&pokemon, StatusType::Burn, &rules), Some(BlockReason::TypeImmunity));
        assert_eq!(status_block_reason(&pokemon, StatusType::Paralysis, &rules), None);

        state.players[0].team[0].status = Some(StatusCondition::Paralysis);
        let pokemon = state.players[0].team[0].clone();
        assert_eq!(status_block_reason(&pokemon, StatusType::Paralysis, &rules), Some(BlockReason::SameStatus));
        assert_eq!(status_block_reason(&pokemon, StatusType::Sleep, &rules), Some(BlockReason::AlreadyHasStatus));
    }

    #[test]
    fn test_sleep_duration_drawn_on_application() {
        let rules = RuleData::standard();
        let mut state = battle(vec![PokemonType::Normal]);
        let mut rng = TurnRng::new_for_test(vec![50]);

        let commands = status_application_commands(&state, &rules, 1, StatusType::Sleep, &mut rng);
        run(&mut state, commands);

        assert_eq!(state.players[1].team[0].status, Some(StatusCondition::Sleep { turns_remaining: 2 }));
    }

    #[test]
    fn test_badly_poisoned_escalates() {
        let mut state = battle(vec![PokemonType::Normal]);
        state.players[0].team[0].status = Some(StatusCondition::BadlyPoisoned { counter: 0 });

        let commands = status_damage_commands(&state, 0);
        run(&mut state, commands);
        assert_eq!(state.players[0].team[0].current_hp(), 150);

        let commands = status_damage_commands(&state, 0);
        run(&mut state, commands);
        assert_eq!(state.players[0].team[0].current_hp(), 130);
        assert_eq!(state.players[0].team[0].status, Some(StatusCondition::BadlyPoisoned { counter: 2 }));
    }

    #[test]
    fn test_gate_order_recharge_before_sleep() {
        let mut state = battle(vec![PokemonType::Normal]);
        state.players[0].team[0].status = Some(StatusCondition::Sleep { turns_remaining: 2 });
        state.players[0].add_condition(PokemonCondition::MustRecharge { armed: true });
        let mut rng = TurnRng::new_for_test(vec![]);

        let gate = action_gate(&state, 0, &DamageCalculator::standard(), &mut rng);

        assert!(!gate.can_act);
        assert_eq!(
            gate.commands[0],
            BattleCommand::EmitEvent(BattleEvent::ActionFailed {
                player_index: 0,
                reason: ActionFailureReason::MustRecharge,
            })
        );
    }

    #[test]
    fn test_freeze_thaw_lets_pokemon_act() {
        let mut state = battle(vec![PokemonType::Normal]);
        state.players[0].team[0].status = Some(StatusCondition::Freeze);
        let mut rng = TurnRng::new_for_test(vec![10]);

        let gate = action_gate(&state, 0, &DamageCalculator::standard(), &mut rng);
        assert!(gate.can_act);
        let bus = run(&mut state, gate.commands);

        assert_eq!(state.players[0].team[0].status, None);
        assert!(matches!(bus.events()[0], BattleEvent::StatusRemoved { .. }));
    }

    #[test]
    fn test_confusion_self_hit() {
        let mut state = battle(vec![PokemonType::Normal]);
        state.players[0].add_condition(PokemonCondition::Confused { turns_remaining: 3 });
        let mut rng = TurnRng::new_for_test(vec![1]);

        let gate = action_gate(&state, 0, &DamageCalculator::standard(), &mut rng);
        assert!(!gate.can_act);
        run(&mut state, gate.commands);

        assert_eq!(state.players[0].team[0].current_hp(), 160 - 19);
    }

    #[test]
    fn test_sleep_counter_only_runs_when_asleep_at_turn_start() {
        let mut state = battle(vec![PokemonType::Normal]);
        state.players[0].team[0].status = Some(StatusCondition::Sleep { turns_remaining: 1 });

        let commands = duration_commands(&state, 0, false, false);
        assert!(commands.is_empty());

        let commands = duration_commands(&state, 0, true, false);
        let bus = run(&mut state, commands);
        assert_eq!(state.players[0].team[0].status, None);
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_leech_seed_heals_planter() {
        let mut state = battle(vec![PokemonType::Normal]);
        state.players[0].add_condition(PokemonCondition::Seeded {
            planter_index: 1,
            planter_team_index: 0,
        });
        state.players[1].team[0].take_damage(50);

        let commands = leech_seed_commands(&state, 0);
        run(&mut state, commands);

        assert_eq!(state.players[0].team[0].current_hp(), 140);
        assert_eq!(state.players[1].team[0].current_hp(), 130);
    }

    #[test]
    fn test_leech_seed_blocked_on_grass() {
        let state = battle(vec![PokemonType::Grass]);
        assert_eq!(
            volatile_block_reason(&state, 0, VolatileType::LeechSeed),
            Some(BlockReason::TypeImmunity)
        );
    }

    #[test]
    fn test_recharge_arms_then_clears() {
        let mut state = battle(vec![PokemonType::Normal]);
        state.players[0].add_condition(PokemonCondition::MustRecharge { armed: false });

        let commands = multi_turn_commands(&state, 0);
        run(&mut state, commands);
        assert!(state.players[0].must_recharge());

        let commands = multi_turn_commands(&state, 0);
        run(&mut state, commands);
        assert!(!state.players[0].has_condition(PokemonConditionType::MustRecharge));
    }
}
