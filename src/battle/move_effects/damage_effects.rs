use super::EffectContext;
use crate::battle::commands::{BattleCommand, PlayerTarget};
use crate::battle::state::{BattleEvent, BattleState, BlockReason, DamageSource};
use schema::Weather;

// These functions are `pub(super)` to be visible only to the parent `mod.rs`.

fn percent_of(amount: u16, percentage: u8) -> u16 {
    ((amount as u32 * percentage as u32 / 100).max(1)).min(u16::MAX as u32) as u16
}

fn heal_user(amount: u16, context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let mut commands = Vec::new();
    let attacker_player = &state.players[context.attacker_index];
    let Some(attacker_pokemon) = attacker_player.live_active_pokemon() else {
        return commands;
    };

    let missing = attacker_pokemon.max_hp() - attacker_pokemon.current_hp();
    if missing == 0 {
        commands.push(BattleCommand::EmitEvent(BattleEvent::MoveFailed {
            player_index: context.attacker_index,
            move_used: context.move_used.clone(),
            reason: BlockReason::FullHp,
        }));
        return commands;
    }

    let healed = amount.min(missing);
    commands.push(BattleCommand::HealPokemon {
        target: PlayerTarget::from_index(context.attacker_index),
        amount: healed,
    });
    commands.push(BattleCommand::EmitEvent(BattleEvent::PokemonHealed {
        player_index: context.attacker_index,
        pokemon: attacker_pokemon.species.clone(),
        amount: healed,
        new_hp: attacker_pokemon.current_hp() + healed,
    }));
    commands
}

fn damage_user(amount: u16, source: DamageSource, context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let attacker_player = &state.players[context.attacker_index];
    let Some(attacker_pokemon) = attacker_player.live_active_pokemon() else {
        return Vec::new();
    };

    vec![
        BattleCommand::EmitEvent(BattleEvent::PokemonDamaged {
            player_index: context.attacker_index,
            pokemon: attacker_pokemon.species.clone(),
            damage: amount,
            remaining_hp: attacker_pokemon.current_hp().saturating_sub(amount),
            source,
        }),
        BattleCommand::DealDamage {
            target: PlayerTarget::from_index(context.attacker_index),
            amount,
        },
    ]
}

/// Apply heal effect (targets user).
pub(super) fn apply_heal_effect(percentage: u8, context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let Some(attacker_pokemon) = state.players[context.attacker_index].live_active_pokemon() else {
        return Vec::new();
    };
    heal_user(percent_of(attacker_pokemon.max_hp(), percentage), context, state)
}

/// Synthesis-style healing: more in sun, less in any other weather.
pub(super) fn apply_weather_heal_effect(context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let Some(attacker_pokemon) = state.players[context.attacker_index].live_active_pokemon() else {
        return Vec::new();
    };
    let max_hp = attacker_pokemon.max_hp() as u32;
    let amount = match state.field.active_weather() {
        None => max_hp / 2,
        Some(Weather::Sun) => max_hp * 2 / 3,
        Some(_) => max_hp / 4,
    };
    heal_user(amount.max(1) as u16, context, state)
}

/// Apply recoil effect (attacker takes damage based on damage dealt).
pub(super) fn apply_recoil_effect(
    percentage: u8,
    context: &EffectContext,
    state: &BattleState,
    damage_dealt: u16,
) -> Vec<BattleCommand> {
    damage_user(percent_of(damage_dealt, percentage), DamageSource::Recoil, context, state)
}

/// Recoil based on the attacker's own max HP.
pub(super) fn apply_max_hp_recoil_effect(
    percentage: u8,
    context: &EffectContext,
    state: &BattleState,
) -> Vec<BattleCommand> {
    let Some(attacker_pokemon) = state.players[context.attacker_index].live_active_pokemon() else {
        return Vec::new();
    };
    damage_user(
        percent_of(attacker_pokemon.max_hp(), percentage),
        DamageSource::Recoil,
        context,
        state,
    )
}

/// Apply drain effect (attacker heals based on damage dealt, at least 1).
pub(super) fn apply_drain_effect(
    percentage: u8,
    context: &EffectContext,
    state: &BattleState,
    damage_dealt: u16,
) -> Vec<BattleCommand> {
    let attacker_player = &state.players[context.attacker_index];
    match attacker_player.live_active_pokemon() {
        // A full-HP drainer simply gains nothing.
        Some(pokemon) if pokemon.current_hp() < pokemon.max_hp() => {
            heal_user(percent_of(damage_dealt, percentage), context, state)
        }
        _ => Vec::new(),
    }
}

/// Crash damage when a move misses, based on the attacker's max HP.
pub(super) fn apply_crash_effect(percentage: u8, context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let Some(attacker_pokemon) = state.players[context.attacker_index].live_active_pokemon() else {
        return Vec::new();
    };
    damage_user(
        percent_of(attacker_pokemon.max_hp(), percentage),
        DamageSource::Crash,
        context,
        state,
    )
}
