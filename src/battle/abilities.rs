//! Abilities that trigger when their holder takes the field.

use crate::battle::commands::{execute_command_batch, BattleCommand};
use crate::battle::field::{TerrainState, WeatherState};
use crate::battle::move_effects::stat_stage_commands;
use crate::battle::state::{BattleEvent, BattleState, EventBus, FieldChange};
use crate::errors::BattleResult;
use crate::rule_data::RuleData;
use schema::AbilityEffect;
use tracing::debug;

/// Weather and terrain summoned on entry last this many turns.
pub const ENTRY_FIELD_TURNS: u8 = 5;

/// Commands for the entry ability of `player_index`'s active Pokemon, or
/// nothing when it has fainted or its ability has no entry effect.
pub fn entry_ability_commands(state: &BattleState, rules: &RuleData, player_index: usize) -> Vec<BattleCommand> {
    let Some(pokemon) = state.players[player_index].live_active_pokemon() else {
        return Vec::new();
    };
    let Some(ability) = pokemon.ability.as_ref() else {
        return Vec::new();
    };

    let mut effects = Vec::new();
    for effect in rules.ability_effects(Some(ability)) {
        match *effect {
            AbilityEffect::EntryWeather(weather) if state.field.active_weather() != Some(weather) => {
                effects.push(BattleCommand::SetWeather(Some(WeatherState {
                    weather,
                    turns_remaining: ENTRY_FIELD_TURNS,
                })));
                effects.push(BattleCommand::EmitEvent(BattleEvent::FieldChanged {
                    change: FieldChange::WeatherStarted {
                        weather,
                        turns: ENTRY_FIELD_TURNS,
                    },
                }));
            }
            AbilityEffect::EntryTerrain(terrain) if state.field.active_terrain() != Some(terrain) => {
                effects.push(BattleCommand::SetTerrain(Some(TerrainState {
                    terrain,
                    turns_remaining: ENTRY_FIELD_TURNS,
                })));
                effects.push(BattleCommand::EmitEvent(BattleEvent::FieldChanged {
                    change: FieldChange::TerrainStarted {
                        terrain,
                        turns: ENTRY_FIELD_TURNS,
                    },
                }));
            }
            AbilityEffect::EntryStatDrop { stat, stages } => {
                for target_index in 0..state.players.len() {
                    if state.are_opponents(player_index, target_index) {
                        effects.extend(stat_stage_commands(state, player_index, target_index, stat, -stages.abs()));
                    }
                }
            }
            _ => {}
        }
    }

    if effects.is_empty() {
        return effects;
    }
    let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::AbilityActivated {
        player_index,
        pokemon: pokemon.species.clone(),
        ability: ability.clone(),
    })];
    commands.extend(effects);
    commands
}

/// Runs the entry ability of `player_index`'s active Pokemon.
pub fn apply_entry_ability(
    state: &mut BattleState,
    rules: &RuleData,
    player_index: usize,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let commands = entry_ability_commands(state, rules, player_index);
    if !commands.is_empty() {
        debug!(player = player_index, "entry ability triggered");
    }
    execute_command_batch(commands, state, bus)
}
