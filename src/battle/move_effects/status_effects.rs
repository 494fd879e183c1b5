use super::EffectContext;
use crate::battle::commands::BattleCommand;
use crate::battle::state::BattleState;
use crate::battle::status::{
    status_application_commands, status_block_reason, volatile_application_commands, volatile_block_reason,
};
use crate::rng::RandomSource;
use crate::rule_data::RuleData;
use schema::{StatusType, Target, VolatileType};

/// A secondary chance below 100 is a side effect of an attack: if it could not
/// land anyway nothing is rolled and nothing is reported. A guaranteed effect
/// is the point of the move, so a block is reported.
fn is_secondary(chance: u8) -> bool {
    chance < 100
}

pub(super) fn apply_inflict_status_effect(
    status: StatusType,
    chance: u8,
    context: &EffectContext,
    state: &BattleState,
    rules: &RuleData,
    rng: &mut dyn RandomSource,
) -> Vec<BattleCommand> {
    let target_index = context.defender_index;
    let Some(target_pokemon) = state.players[target_index].live_active_pokemon() else {
        return Vec::new();
    };

    if is_secondary(chance) {
        if status_block_reason(target_pokemon, status, rules).is_some() {
            return Vec::new();
        }
        let reason = format!("Apply {} Check", status);
        if !rng.check_percent(chance, &reason) {
            return Vec::new();
        }
    }

    status_application_commands(state, rules, target_index, status, rng)
}

pub(super) fn apply_volatile_effect(
    volatile: VolatileType,
    target: &Target,
    chance: u8,
    context: &EffectContext,
    state: &BattleState,
    rng: &mut dyn RandomSource,
) -> Vec<BattleCommand> {
    let target_index = context.target_index(target);
    if state.players[target_index].live_active_pokemon().is_none() {
        return Vec::new();
    }

    if is_secondary(chance) {
        if volatile_block_reason(state, target_index, volatile).is_some() {
            return Vec::new();
        }
        let reason = format!("Apply {:?} Check", volatile);
        if !rng.check_percent(chance, &reason) {
            return Vec::new();
        }
    }

    volatile_application_commands(state, target_index, context.attacker_index, volatile, rng)
}
