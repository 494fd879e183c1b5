use crate::battle::abilities::apply_entry_ability;
use crate::battle::action_stack::BattleAction;
use crate::battle::calculators::{DamageCalculator, DamageContext};
use crate::battle::commands::{execute_command_batch, BattleCommand, PlayerTarget};
use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::battle::field::apply_entry_hazards;
use crate::battle::move_effects::{BattleMoveDataExt, BattleMoveEffectExt, EffectContext, EffectResult};
use crate::battle::state::{ActionFailureReason, BattleEvent, BattleState, BlockReason, Effectiveness, EventBus};
use crate::battle::stats::{hit_chance, ohko_hit_chance};
use crate::battle::status::action_gate;
use crate::errors::{BattleResult, BattleStateError};
use crate::rng::RandomSource;
use crate::rule_data::RuleData;
use ordered_float::OrderedFloat;
use crate::pokemon::PokemonInst;
use schema::{AbilityEffect, HitCount, ItemEffect, MoveData, MoveId, MoveTarget, StatType};
use tracing::{debug, warn};

/// Read-only collaborators shared by every action in a turn.
#[derive(Debug, Clone, Copy)]
pub struct BattleContext<'a> {
    pub rules: &'a RuleData,
    pub calculator: &'a DamageCalculator,
}

impl<'a> BattleContext<'a> {
    pub fn new(rules: &'a RuleData, calculator: &'a DamageCalculator) -> Self {
        Self { rules, calculator }
    }
}

/// Runs one action to completion against the live state and returns the
/// events it produced, in order. Every mutation is applied as soon as its
/// commands are generated, so later steps always see current HP.
pub fn resolve_action(
    state: &mut BattleState,
    ctx: &BattleContext<'_>,
    action: &BattleAction,
    rng: &mut dyn RandomSource,
) -> BattleResult<Vec<BattleEvent>> {
    let mut bus = EventBus::new();
    match action {
        BattleAction::Switch {
            player_index,
            team_index,
        } => {
            debug!(player = player_index, team_index, "resolving switch");
            switch_in(state, ctx.rules, *player_index, *team_index, false, rng, &mut bus)?;
        }
        BattleAction::UseMove {
            player_index,
            move_index,
            move_used,
            target_index,
            forced,
        } => {
            debug!(player = player_index, %move_used, forced, "resolving move");
            let attempt = MoveAttempt {
                attacker_index: *player_index,
                move_index: *move_index,
                move_used: move_used.clone(),
                target_index: *target_index,
                forced: *forced,
            };
            resolve_move(state, ctx, &attempt, rng, &mut bus)?;
        }
        BattleAction::Recharge { player_index } => {
            debug!(player = player_index, "recharging");
            let gate = action_gate(state, *player_index, ctx.calculator, rng);
            execute_command_batch(gate.commands, state, &mut bus)?;
        }
    }
    Ok(bus.into_events())
}

/// Sends in a new Pokemon and applies the hazards on its side. Used both for
/// chosen switches and for replacements between turns.
pub fn switch_in(
    state: &mut BattleState,
    rules: &RuleData,
    player_index: usize,
    team_index: usize,
    carry_stages: bool,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> BattleResult<()> {
    if player_index >= state.players.len() {
        return Err(BattleStateError::InvalidPlayerIndex(player_index).into());
    }
    execute_command_batch(
        vec![BattleCommand::SwitchPokemon {
            target: PlayerTarget::from_index(player_index),
            new_pokemon_index: team_index,
            carry_stages,
        }],
        state,
        bus,
    )?;
    apply_entry_hazards(state, rules, player_index, rng, bus)?;
    apply_entry_ability(state, rules, player_index, bus)
}

struct MoveAttempt {
    attacker_index: usize,
    move_index: usize,
    move_used: MoveId,
    target_index: Option<usize>,
    forced: bool,
}

fn resolve_move(
    state: &mut BattleState,
    ctx: &BattleContext<'_>,
    attempt: &MoveAttempt,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let attacker_index = attempt.attacker_index;
    let attacker_target = PlayerTarget::from_index(attacker_index);
    let move_data = ctx.rules.move_data(&attempt.move_used)?;

    // 1. Gate
    let gate = action_gate(state, attacker_index, ctx.calculator, rng);
    let can_act = gate.can_act;
    execute_command_batch(gate.commands, state, bus)?;
    if !can_act {
        debug!(player = attacker_index, "action prevented");
        if attempt.forced {
            // The stored charge is spent even when the second turn never happens.
            execute_command_batch(
                vec![BattleCommand::RemoveCondition {
                    target: attacker_target,
                    condition_type: PokemonConditionType::Charging,
                }],
                state,
                bus,
            )?;
        }
        return Ok(());
    }

    // 2. Commit
    let Some(attacker) = state.players[attacker_index].live_active_pokemon() else {
        return Ok(());
    };
    let mut commit = Vec::new();
    if !attempt.forced {
        commit.push(BattleCommand::UsePp {
            target: attacker_target,
            move_index: attempt.move_index,
        });
        commit.push(BattleCommand::SetLastMove {
            target: attacker_target,
            move_used: attempt.move_used.clone(),
        });
        commit.extend(choice_lock_command(state, ctx.rules, attacker_index, &attempt.move_used));
    }
    commit.push(BattleCommand::EmitEvent(BattleEvent::MoveUsed {
        player_index: attacker_index,
        pokemon: attacker.species.clone(),
        move_used: attempt.move_used.clone(),
    }));
    execute_command_batch(commit, state, bus)?;

    // 3. Charge turn
    let provisional_target = attempt
        .target_index
        .or_else(|| state.default_target(attacker_index))
        .or_else(|| state.opposing_player(attacker_index))
        .unwrap_or(attacker_index);
    let charge_context = EffectContext::new(attacker_index, provisional_target, attempt.move_used.clone());
    match move_data.apply_charge_effects(&charge_context, state, attempt.forced) {
        EffectResult::Continue(commands) => execute_command_batch(commands, state, bus)?,
        EffectResult::Skip(commands) => {
            execute_command_batch(commands, state, bus)?;
            return Ok(());
        }
    }

    // 4. Target
    let Some(defender_index) = resolve_target(state, attacker_index, attempt.target_index, move_data) else {
        execute_command_batch(
            vec![BattleCommand::EmitEvent(BattleEvent::ActionFailed {
                player_index: attacker_index,
                reason: ActionFailureReason::NoTarget,
            })],
            state,
            bus,
        )?;
        return finish_move(state, move_data, attacker_index, attacker_index, &attempt.move_used, bus);
    };
    let context = EffectContext::new(attacker_index, defender_index, attempt.move_used.clone());

    if let Some(blocked) = immunity_commands(state, ctx.rules, move_data, &context) {
        execute_command_batch(blocked, state, bus)?;
        return finish_move(state, move_data, attacker_index, defender_index, &attempt.move_used, bus);
    }

    // 5. Accuracy
    let chance = accuracy_chance(state, move_data, &context);
    let hit = chance.map_or(true, |chance| rng.check_percent(chance, "Accuracy"));
    if !hit {
        let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::MoveMissed {
            attacker_index,
            defender_index,
            move_used: attempt.move_used.clone(),
        })];
        commands.extend(move_data.apply_miss_based_effects(&context, state));
        execute_command_batch(commands, state, bus)?;
        if move_data.flags.effect_on_miss {
            apply_secondary_effects(state, ctx.rules, move_data, &context, rng, bus)?;
        }
        return finish_move(state, move_data, attacker_index, defender_index, &attempt.move_used, bus);
    }

    // 6-7. Hits
    let damage_dealt = if move_data.is_damaging() {
        resolve_hits(state, ctx, move_data, &context, chance, rng, bus)?
    } else {
        0
    };

    // 8. Damage-keyed effects apply to the attacker even after a knockout
    let damage_commands = move_data.apply_damage_based_effects(&context, state, damage_dealt);
    execute_command_batch(damage_commands, state, bus)?;

    // 9. Secondary effects
    apply_secondary_effects(state, ctx.rules, move_data, &context, rng, bus)?;

    // 10. Move-specific state
    let post_commands = move_data.apply_post_move_effects(&context, state, true);
    execute_command_batch(post_commands, state, bus)?;

    finish_move(state, move_data, attacker_index, defender_index, &attempt.move_used, bus)
}

fn finish_move(
    state: &mut BattleState,
    move_data: &MoveData,
    attacker_index: usize,
    defender_index: usize,
    move_used: &MoveId,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let context = EffectContext::new(attacker_index, defender_index, move_used.clone());
    let commands = move_data.apply_final_effects(&context, state);
    execute_command_batch(commands, state, bus)
}

/// Picks the defender. Self and field moves never fail here; opponent moves
/// fall back to the first live opponent when the chosen one has fainted.
fn resolve_target(
    state: &BattleState,
    attacker_index: usize,
    chosen: Option<usize>,
    move_data: &MoveData,
) -> Option<usize> {
    match move_data.target {
        MoveTarget::User => Some(attacker_index),
        MoveTarget::Field => Some(state.opposing_player(attacker_index).unwrap_or(attacker_index)),
        MoveTarget::Opponent => {
            let live_choice = chosen.filter(|&index| {
                index < state.players.len() && state.players[index].live_active_pokemon().is_some()
            });
            if live_choice.is_some() {
                return live_choice;
            }
            let fallback = state.default_target(attacker_index);
            if let (Some(original), Some(new_target)) = (chosen, fallback) {
                warn!(attacker = attacker_index, original, new_target, "target fainted, retargeting");
            }
            fallback
        }
    }
}

/// Protect, type immunity and OHKO immunity. Returns the events to emit when
/// the move stops here.
fn immunity_commands(
    state: &BattleState,
    rules: &RuleData,
    move_data: &MoveData,
    context: &EffectContext,
) -> Option<Vec<BattleCommand>> {
    if move_data.target != MoveTarget::Opponent {
        return None;
    }
    let defender_player = &state.players[context.defender_index];
    let defender = defender_player.live_active_pokemon()?;

    if state.are_opponents(context.attacker_index, context.defender_index)
        && defender_player.has_condition(PokemonConditionType::Protected)
    {
        return Some(vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            player_index: context.attacker_index,
            move_used: context.move_used.clone(),
            reason: BlockReason::Protected,
        })]);
    }

    let no_effect = || {
        vec![BattleCommand::EmitEvent(BattleEvent::NoEffect {
            attacker_index: context.attacker_index,
            defender_index: context.defender_index,
            move_used: context.move_used.clone(),
        })]
    };

    if move_data.is_damaging() {
        let chart = rules
            .type_chart
            .effectiveness_against(move_data.move_type, &defender.types);
        let ability_immune = rules
            .ability_effects(defender.ability.as_ref())
            .iter()
            .any(|effect| matches!(effect, AbilityEffect::TypeImmunity(immune) if *immune == move_data.move_type));
        if chart == 0.0 || ability_immune {
            return Some(no_effect());
        }
    }

    if move_data.is_ohko()
        && rules
            .ability_effects(defender.ability.as_ref())
            .iter()
            .any(|effect| matches!(effect, AbilityEffect::OhkoImmunity))
    {
        return Some(no_effect());
    }

    None
}

/// Hit chance in percent, or `None` for moves that cannot miss.
fn accuracy_chance(state: &BattleState, move_data: &MoveData, context: &EffectContext) -> Option<u8> {
    if move_data.target != MoveTarget::Opponent {
        return None;
    }
    let attacker_player = &state.players[context.attacker_index];
    let defender_player = &state.players[context.defender_index];
    let attacker = attacker_player.active_pokemon()?;
    let defender = defender_player.active_pokemon()?;

    if move_data.is_ohko() {
        return Some(ohko_hit_chance(attacker.level, defender.level));
    }
    move_data.accuracy.map(|base| {
        hit_chance(
            base,
            attacker_player.get_stat_stage(StatType::Acc),
            defender_player.get_stat_stage(StatType::Eva),
        )
    })
}

fn roll_hit_count(hits: &HitCount, rng: &mut dyn RandomSource) -> u8 {
    match hits {
        HitCount::Single => 1,
        HitCount::Fixed(count) => (*count).max(1),
        // 35/35/15/15 for the classic two-to-five spread
        HitCount::Range { min: 2, max: 5 } => match rng.roll_percent("Multi-Hit Count") {
            1..=35 => 2,
            36..=70 => 3,
            71..=85 => 4,
            _ => 5,
        },
        HitCount::Range { min, max } => {
            rng.range_inclusive(*min as u32, (*max).max(*min) as u32, "Multi-Hit Count").max(1) as u8
        }
    }
}

/// Runs the hit loop and returns the HP actually removed from the defender.
fn resolve_hits(
    state: &mut BattleState,
    ctx: &BattleContext<'_>,
    move_data: &MoveData,
    context: &EffectContext,
    chance: Option<u8>,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> BattleResult<u16> {
    let planned = roll_hit_count(&move_data.hits, rng);
    let mut landed = 0u8;
    let mut total_damage = 0u16;

    for hit_number in 1..=planned {
        let attacker_alive = state.players[context.attacker_index].live_active_pokemon().is_some();
        let defender_alive = state.players[context.defender_index].live_active_pokemon().is_some();
        if !attacker_alive || !defender_alive {
            break;
        }
        if hit_number > 1 && move_data.flags.per_hit_accuracy {
            if let Some(chance) = chance {
                if !rng.check_percent(chance, "Accuracy") {
                    debug!(hit_number, "later hit missed");
                    break;
                }
            }
        }

        let (commands, dealt) = hit_commands(state, ctx, move_data, context, hit_number, rng);
        execute_command_batch(commands, state, bus)?;
        landed += 1;
        total_damage = total_damage.saturating_add(dealt);
    }

    if landed > 1 {
        execute_command_batch(
            vec![BattleCommand::EmitEvent(BattleEvent::MultiHitCompleted {
                attacker_index: context.attacker_index,
                hits: landed,
            })],
            state,
            bus,
        )?;
    }
    Ok(total_damage)
}

fn hit_commands(
    state: &BattleState,
    ctx: &BattleContext<'_>,
    move_data: &MoveData,
    context: &EffectContext,
    hit_number: u8,
    rng: &mut dyn RandomSource,
) -> (Vec<BattleCommand>, u16) {
    let attacker_player = &state.players[context.attacker_index];
    let defender_player = &state.players[context.defender_index];
    let (Some(attacker), Some(defender)) = (attacker_player.active_pokemon(), defender_player.active_pokemon())
    else {
        return (Vec::new(), 0);
    };
    let defender_target = PlayerTarget::from_index(context.defender_index);

    if move_data.is_ohko() {
        let damage = defender.current_hp();
        return (
            vec![
                BattleCommand::EmitEvent(BattleEvent::OneHitKnockOut {
                    attacker_index: context.attacker_index,
                    defender_index: context.defender_index,
                    move_used: context.move_used.clone(),
                }),
                BattleCommand::DealDamage {
                    target: defender_target,
                    amount: damage,
                },
            ],
            damage,
        );
    }

    let (raw_damage, multiplier, effectiveness, critical) = match &move_data.fixed_damage {
        Some(fixed) => (
            ctx.calculator.fixed_damage(fixed, attacker, defender),
            1.0,
            Effectiveness::Normal,
            false,
        ),
        None => {
            let damage_context = DamageContext {
                attacker,
                attacker_player,
                defender,
                defender_player,
                move_data,
                field: &state.field,
                rules: ctx.rules,
            };
            let outcome = ctx.calculator.compute(&damage_context, rng);
            (outcome.damage, outcome.multiplier, outcome.effectiveness, outcome.critical)
        }
    };

    let mut damage = raw_damage.min(defender.current_hp());
    let survived_with = if damage == defender.current_hp() {
        lethal_hit_survival(ctx.rules, defender, rng)
    } else {
        None
    };
    if survived_with.is_some() {
        damage = defender.current_hp() - 1;
    }

    let mut commands = vec![
        BattleCommand::EmitEvent(BattleEvent::MoveHit {
            attacker_index: context.attacker_index,
            defender_index: context.defender_index,
            move_used: context.move_used.clone(),
            damage,
            remaining_hp: defender.current_hp() - damage,
            multiplier: OrderedFloat(multiplier),
            effectiveness,
            critical,
            hit_number,
        }),
        BattleCommand::DealDamage {
            target: defender_target,
            amount: damage,
        },
    ];
    if let Some(consumed) = survived_with {
        if let Some(item) = defender.held_item.clone() {
            commands.push(BattleCommand::EmitEvent(BattleEvent::ItemActivated {
                player_index: context.defender_index,
                pokemon: defender.species.clone(),
                item,
                consumed,
            }));
        }
        if consumed {
            commands.push(BattleCommand::ConsumeItem { target: defender_target });
        }
    }
    (commands, damage)
}

/// Rolls the defender's held survival item against a hit that would knock it
/// out. Returns whether the item is used up when it triggers.
fn lethal_hit_survival(rules: &RuleData, defender: &PokemonInst, rng: &mut dyn RandomSource) -> Option<bool> {
    if defender.current_hp() <= 1 {
        return None;
    }
    let (chance, single_use) = rules
        .item_effects(defender.held_item.as_ref())
        .iter()
        .find_map(|effect| match effect {
            ItemEffect::SurviveLethalHit {
                requires_full_hp,
                chance,
                single_use,
            } if !requires_full_hp || defender.current_hp() == defender.max_hp() => Some((*chance, *single_use)),
            _ => None,
        })?;
    rng.check_percent(chance, "Survive Lethal Hit").then_some(single_use)
}

/// Locks the attacker into its move when its held item demands it.
fn choice_lock_command(
    state: &BattleState,
    rules: &RuleData,
    attacker_index: usize,
    move_used: &MoveId,
) -> Option<BattleCommand> {
    let player = &state.players[attacker_index];
    let pokemon = player.active_pokemon()?;
    if player.has_condition(PokemonConditionType::ChoiceLocked) {
        return None;
    }
    rules
        .item_effects(pokemon.held_item.as_ref())
        .iter()
        .any(|effect| matches!(effect, ItemEffect::ChoiceLock))
        .then(|| BattleCommand::AddCondition {
            target: PlayerTarget::from_index(attacker_index),
            condition: PokemonCondition::ChoiceLocked {
                move_used: move_used.clone(),
            },
        })
}

/// Each effect is generated against the state left by the previous one.
/// Anything aimed at a defender that has fainted is dropped.
fn apply_secondary_effects(
    state: &mut BattleState,
    rules: &RuleData,
    move_data: &MoveData,
    context: &EffectContext,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> BattleResult<()> {
    for effect in &move_data.effects {
        if effect.targets_defender() && state.players[context.defender_index].live_active_pokemon().is_none() {
            continue;
        }
        let commands = effect.apply(context, state, rules, rng);
        execute_command_batch(commands, state, bus)?;
    }
    Ok(())
}
