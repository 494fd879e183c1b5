use super::{EffectContext, EffectResult};
use crate::battle::commands::{BattleCommand, PlayerTarget};
use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::battle::state::{BattleEvent, BattleState, BlockReason, DamageSource};
use crate::player::PendingSwitch;

/// First turn of a charge move records the charge and ends the action; the
/// forced second turn clears it and lets the move run.
pub(super) fn apply_charge_turn_special(context: &EffectContext, state: &BattleState, forced: bool) -> EffectResult {
    let attacker_player = &state.players[context.attacker_index];
    let attacker_target = PlayerTarget::from_index(context.attacker_index);

    if forced {
        let commands = vec![BattleCommand::RemoveCondition {
            target: attacker_target,
            condition_type: PokemonConditionType::Charging,
        }];
        return EffectResult::Continue(commands);
    }

    let Some(attacker_pokemon) = attacker_player.live_active_pokemon() else {
        return EffectResult::Continue(Vec::new());
    };

    let commands = vec![
        BattleCommand::AddCondition {
            target: attacker_target,
            condition: PokemonCondition::Charging {
                move_used: context.move_used.clone(),
                target_index: context.defender_index,
                ready: false,
            },
        },
        BattleCommand::EmitEvent(BattleEvent::ChargingStarted {
            player_index: context.attacker_index,
            pokemon: attacker_pokemon.species.clone(),
            move_used: context.move_used.clone(),
        }),
    ];
    EffectResult::Skip(commands)
}

pub(super) fn apply_recharge_special(context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let attacker_player = &state.players[context.attacker_index];
    let Some(attacker_pokemon) = attacker_player.live_active_pokemon() else {
        return Vec::new();
    };
    vec![
        BattleCommand::AddCondition {
            target: PlayerTarget::from_index(context.attacker_index),
            condition: PokemonCondition::MustRecharge { armed: false },
        },
        BattleCommand::EmitEvent(BattleEvent::ConditionApplied {
            player_index: context.attacker_index,
            pokemon: attacker_pokemon.species.clone(),
            condition: PokemonConditionType::MustRecharge,
        }),
    ]
}

/// U-turn style switching. Nothing happens while the user's side has no one to bring in.
pub(super) fn apply_self_switch_special(
    context: &EffectContext,
    state: &BattleState,
    baton_pass: bool,
) -> Vec<BattleCommand> {
    let attacker_player = &state.players[context.attacker_index];
    if attacker_player.live_active_pokemon().is_none() {
        return Vec::new();
    }
    if attacker_player.available_replacements().is_empty() {
        // Baton Pass with no one to pass to is a plain failure; U-turn just deals its damage.
        if baton_pass {
            return vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed {
                player_index: context.attacker_index,
                move_used: context.move_used.clone(),
                reason: BlockReason::NoReplacement,
            })];
        }
        return Vec::new();
    }

    let reason = if baton_pass {
        PendingSwitch::BatonPass
    } else {
        PendingSwitch::SelfSwitch
    };
    vec![
        BattleCommand::SetPendingSwitch {
            target: PlayerTarget::from_index(context.attacker_index),
            reason: Some(reason),
        },
        BattleCommand::EmitEvent(BattleEvent::SwitchRequired {
            player_index: context.attacker_index,
            reason,
        }),
    ]
}

/// The user faints whether or not the move connected.
pub(super) fn apply_self_destruct_special(context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let attacker_player = &state.players[context.attacker_index];
    let Some(attacker_pokemon) = attacker_player.live_active_pokemon() else {
        return Vec::new();
    };
    vec![
        BattleCommand::EmitEvent(BattleEvent::PokemonDamaged {
            player_index: context.attacker_index,
            pokemon: attacker_pokemon.species.clone(),
            damage: attacker_pokemon.current_hp(),
            remaining_hp: 0,
            source: DamageSource::SelfDestruct,
        }),
        BattleCommand::FaintPokemon {
            target: PlayerTarget::from_index(context.attacker_index),
        },
    ]
}
