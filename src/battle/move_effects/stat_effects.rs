use super::EffectContext;
use crate::battle::commands::{BattleCommand, PlayerTarget};
use crate::battle::state::{BattleEvent, BattleState, BlockReason};
use crate::player::{MAX_STAT_STAGE, MIN_STAT_STAGE};
use crate::rng::RandomSource;
use schema::{StatType, Target, TeamCondition};

// These functions are `pub(super)` to be visible only to the parent `mod.rs`.

/// Apply stat change effect after its chance roll.
pub(super) fn apply_stat_change_effect(
    target: &Target,
    stat: StatType,
    stages: i8,
    chance: u8,
    context: &EffectContext,
    state: &BattleState,
    rng: &mut dyn RandomSource,
) -> Vec<BattleCommand> {
    let target_index = context.target_index(target);
    if state.players[target_index].live_active_pokemon().is_none() {
        return Vec::new();
    }

    let rng_reason = format!("Apply {} {:+} Effect", stat, stages);
    if !rng.check_percent(chance, &rng_reason) {
        return Vec::new();
    }
    stat_stage_commands(state, context.attacker_index, target_index, stat, stages)
}

/// Moves `target_index`'s stage by `stages`. Drops caused by an opponent are
/// stopped by Mist, and a change that would leave the stage where it is emits
/// a blocked event instead.
pub(crate) fn stat_stage_commands(
    state: &BattleState,
    source_index: usize,
    target_index: usize,
    stat: StatType,
    stages: i8,
) -> Vec<BattleCommand> {
    let target_player = &state.players[target_index];
    let Some(target_pokemon) = target_player.live_active_pokemon() else {
        return Vec::new();
    };

    let is_enemy_effect = target_index != source_index;
    let has_mist = state
        .field
        .side_has_team_condition(target_player.side, TeamCondition::Mist);
    if is_enemy_effect && stages < 0 && has_mist {
        return vec![BattleCommand::EmitEvent(BattleEvent::StatChangeBlocked {
            player_index: target_index,
            pokemon: target_pokemon.species.clone(),
            stat,
            reason: BlockReason::Mist,
        })];
    }

    let old_stage = target_player.get_stat_stage(stat);
    let new_stage = (old_stage + stages).clamp(MIN_STAT_STAGE, MAX_STAT_STAGE);

    if old_stage == new_stage {
        let reason = if stages > 0 {
            BlockReason::StatAtMaximum
        } else {
            BlockReason::StatAtMinimum
        };
        return vec![BattleCommand::EmitEvent(BattleEvent::StatChangeBlocked {
            player_index: target_index,
            pokemon: target_pokemon.species.clone(),
            stat,
            reason,
        })];
    }

    let delta = new_stage - old_stage;
    vec![
        BattleCommand::ChangeStatStage {
            target: PlayerTarget::from_index(target_index),
            stat,
            delta,
        },
        BattleCommand::EmitEvent(BattleEvent::StatStageChanged {
            player_index: target_index,
            pokemon: target_pokemon.species.clone(),
            stat,
            delta,
            new_stage,
            clamped: delta != stages,
        }),
    ]
}

/// Apply haze effect (clears all stat stages for every active Pokemon).
pub(super) fn apply_haze_effect(state: &BattleState) -> Vec<BattleCommand> {
    let mut commands = Vec::new();

    for (player_index, player) in state.players.iter().enumerate() {
        if let Some(pokemon) = player.live_active_pokemon() {
            if !player.stat_stages.is_empty() {
                commands.push(BattleCommand::ResetStatStages {
                    target: PlayerTarget::from_index(player_index),
                });
                commands.push(BattleCommand::EmitEvent(BattleEvent::StatStagesReset {
                    player_index,
                    pokemon: pokemon.species.clone(),
                }));
            }
        }
    }
    commands
}
