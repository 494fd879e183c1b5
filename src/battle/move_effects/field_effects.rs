use super::EffectContext;
use crate::battle::commands::BattleCommand;
use crate::battle::field::{TerrainState, WeatherState};
use crate::battle::state::{BattleEvent, BattleState, BlockReason, FieldChange};
use schema::{Hazard, TeamCondition, Terrain, Weather};

fn failed(context: &EffectContext, reason: BlockReason) -> Vec<BattleCommand> {
    vec![BattleCommand::EmitEvent(BattleEvent::MoveFailed {
        player_index: context.attacker_index,
        move_used: context.move_used.clone(),
        reason,
    })]
}

pub(super) fn apply_weather_effect(
    weather: Weather,
    turns: u8,
    context: &EffectContext,
    state: &BattleState,
) -> Vec<BattleCommand> {
    if state.field.active_weather() == Some(weather) {
        return failed(context, BlockReason::AlreadyActive);
    }
    vec![
        BattleCommand::SetWeather(Some(WeatherState {
            weather,
            turns_remaining: turns,
        })),
        BattleCommand::EmitEvent(BattleEvent::FieldChanged {
            change: FieldChange::WeatherStarted { weather, turns },
        }),
    ]
}

pub(super) fn apply_terrain_effect(
    terrain: Terrain,
    turns: u8,
    context: &EffectContext,
    state: &BattleState,
) -> Vec<BattleCommand> {
    if state.field.active_terrain() == Some(terrain) {
        return failed(context, BlockReason::AlreadyActive);
    }
    vec![
        BattleCommand::SetTerrain(Some(TerrainState {
            terrain,
            turns_remaining: turns,
        })),
        BattleCommand::EmitEvent(BattleEvent::FieldChanged {
            change: FieldChange::TerrainStarted { terrain, turns },
        }),
    ]
}

/// Hazards are laid on the defender's side and stay until absorbed.
pub(super) fn apply_hazard_effect(hazard: Hazard, context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
    let side = state.players[context.defender_index].side;
    let layers = state
        .field
        .side(side)
        .map(|side_state| side_state.hazard_layers(hazard))
        .unwrap_or(0);
    if layers >= hazard.max_layers() {
        return failed(context, BlockReason::MaxLayers);
    }
    vec![
        BattleCommand::AddHazard { side, hazard },
        BattleCommand::EmitEvent(BattleEvent::FieldChanged {
            change: FieldChange::HazardSet {
                side,
                hazard,
                layers: layers + 1,
            },
        }),
    ]
}

/// Screens protect the user's own side.
pub(super) fn apply_screen_effect(
    condition: TeamCondition,
    turns: u8,
    context: &EffectContext,
    state: &BattleState,
) -> Vec<BattleCommand> {
    let side = state.players[context.attacker_index].side;
    if state.field.side_has_team_condition(side, condition) {
        return failed(context, BlockReason::AlreadyActive);
    }
    vec![
        BattleCommand::SetTeamCondition { side, condition, turns },
        BattleCommand::EmitEvent(BattleEvent::FieldChanged {
            change: FieldChange::TeamConditionStarted { side, condition, turns },
        }),
    ]
}
