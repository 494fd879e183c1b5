use crate::battle::commands::{execute_command_batch, BattleCommand, PlayerTarget};
use crate::battle::state::{BattleEvent, BattleState, DamageSource, EventBus, FieldChange};
use crate::battle::stats::is_grounded;
use crate::battle::status::{status_application_commands, status_block_reason};
use crate::player::MIN_STAT_STAGE;
use crate::errors::BattleResult;
use crate::pokemon::PokemonInst;
use crate::rng::RandomSource;
use crate::rule_data::RuleData;
use schema::{Hazard, ItemEffect, PokemonType, StatType, StatusType, TeamCondition, Terrain, Weather};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherState {
    pub weather: Weather,
    pub turns_remaining: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainState {
    pub terrain: Terrain,
    pub turns_remaining: u8,
}

/// Everything laid on one side of the field.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SideState {
    /// Layer count per hazard.
    pub hazards: BTreeMap<Hazard, u8>,
    /// Turns remaining per screen.
    pub team_conditions: BTreeMap<TeamCondition, u8>,
}

impl SideState {
    pub fn hazard_layers(&self, hazard: Hazard) -> u8 {
        self.hazards.get(&hazard).copied().unwrap_or(0)
    }

    pub fn has_team_condition(&self, condition: TeamCondition) -> bool {
        self.team_conditions.contains_key(&condition)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub weather: Option<WeatherState>,
    pub terrain: Option<TerrainState>,
    pub sides: Vec<SideState>,
}

impl FieldState {
    pub fn new(side_count: usize) -> Self {
        Self {
            weather: None,
            terrain: None,
            sides: vec![SideState::default(); side_count],
        }
    }

    pub fn active_weather(&self) -> Option<Weather> {
        self.weather.map(|state| state.weather)
    }

    pub fn active_terrain(&self) -> Option<Terrain> {
        self.terrain.map(|state| state.terrain)
    }

    pub fn side(&self, side: usize) -> Option<&SideState> {
        self.sides.get(side)
    }

    pub fn side_has_team_condition(&self, side: usize, condition: TeamCondition) -> bool {
        self.side(side)
            .is_some_and(|state| state.has_team_condition(condition))
    }
}

/// Sandstorm and hail chip at 1/16; each spares its own types.
pub fn weather_damage_commands(state: &BattleState, player_index: usize) -> Vec<BattleCommand> {
    let Some(weather) = state.field.active_weather() else {
        return Vec::new();
    };
    let Some(pokemon) = state.players[player_index].live_active_pokemon() else {
        return Vec::new();
    };
    let immune = match weather {
        Weather::Sandstorm => [PokemonType::Rock, PokemonType::Ground, PokemonType::Steel]
            .into_iter()
            .any(|immune_type| pokemon.has_type(immune_type)),
        Weather::Hail => pokemon.has_type(PokemonType::Ice),
        Weather::Rain | Weather::Sun => true,
    };
    if immune {
        return Vec::new();
    }

    let damage = fraction_of_max(pokemon.max_hp(), 16);
    vec![
        BattleCommand::EmitEvent(BattleEvent::PokemonDamaged {
            player_index,
            pokemon: pokemon.species.clone(),
            damage,
            remaining_hp: pokemon.current_hp().saturating_sub(damage),
            source: DamageSource::Weather(weather),
        }),
        BattleCommand::DealDamage {
            target: PlayerTarget::from_index(player_index),
            amount: damage,
        },
    ]
}

/// Grassy terrain restores 1/16 to grounded Pokemon.
pub fn terrain_heal_commands(state: &BattleState, rules: &RuleData, player_index: usize) -> Vec<BattleCommand> {
    if state.field.active_terrain() != Some(Terrain::Grassy) {
        return Vec::new();
    }
    let Some(pokemon) = state.players[player_index].live_active_pokemon() else {
        return Vec::new();
    };
    if !is_grounded(pokemon, rules) {
        return Vec::new();
    }
    heal_commands(player_index, pokemon, fraction_of_max(pokemon.max_hp(), 16))
}

/// Held items that restore HP every turn.
pub fn item_heal_commands(state: &BattleState, rules: &RuleData, player_index: usize) -> Vec<BattleCommand> {
    let Some(pokemon) = state.players[player_index].live_active_pokemon() else {
        return Vec::new();
    };
    rules
        .item_effects(pokemon.held_item.as_ref())
        .iter()
        .find_map(|effect| match effect {
            ItemEffect::EndOfTurnHeal(divisor) => Some(*divisor),
            _ => None,
        })
        .map(|divisor| heal_commands(player_index, pokemon, fraction_of_max(pokemon.max_hp(), divisor.max(1) as u32)))
        .unwrap_or_default()
}

fn heal_commands(player_index: usize, pokemon: &PokemonInst, amount: u16) -> Vec<BattleCommand> {
    let healed = amount.min(pokemon.max_hp() - pokemon.current_hp());
    if healed == 0 {
        return Vec::new();
    }
    vec![
        BattleCommand::HealPokemon {
            target: PlayerTarget::from_index(player_index),
            amount: healed,
        },
        BattleCommand::EmitEvent(BattleEvent::PokemonHealed {
            player_index,
            pokemon: pokemon.species.clone(),
            amount: healed,
            new_hp: pokemon.current_hp() + healed,
        }),
    ]
}

fn fraction_of_max(max_hp: u16, denominator: u32) -> u16 {
    (max_hp as u32 / denominator).max(1) as u16
}

/// Count down weather, terrain and every side's screens, emitting an event
/// for each one that runs out.
pub fn field_timer_commands(state: &BattleState) -> Vec<BattleCommand> {
    let mut commands = Vec::new();

    if let Some(WeatherState { weather, turns_remaining }) = state.field.weather {
        let turns_remaining = turns_remaining.saturating_sub(1);
        if turns_remaining == 0 {
            commands.push(BattleCommand::SetWeather(None));
            commands.push(BattleCommand::EmitEvent(BattleEvent::FieldChanged {
                change: FieldChange::WeatherEnded { weather },
            }));
        } else {
            commands.push(BattleCommand::SetWeather(Some(WeatherState { weather, turns_remaining })));
        }
    }

    if let Some(TerrainState { terrain, turns_remaining }) = state.field.terrain {
        let turns_remaining = turns_remaining.saturating_sub(1);
        if turns_remaining == 0 {
            commands.push(BattleCommand::SetTerrain(None));
            commands.push(BattleCommand::EmitEvent(BattleEvent::FieldChanged {
                change: FieldChange::TerrainEnded { terrain },
            }));
        } else {
            commands.push(BattleCommand::SetTerrain(Some(TerrainState { terrain, turns_remaining })));
        }
    }

    for (side, side_state) in state.field.sides.iter().enumerate() {
        for (&condition, &turns) in &side_state.team_conditions {
            let turns = turns.saturating_sub(1);
            if turns == 0 {
                commands.push(BattleCommand::RemoveTeamCondition { side, condition });
                commands.push(BattleCommand::EmitEvent(BattleEvent::FieldChanged {
                    change: FieldChange::TeamConditionEnded { side, condition },
                }));
            } else {
                commands.push(BattleCommand::SetTeamCondition { side, condition, turns });
            }
        }
    }

    commands
}

/// Applies the hazards on the side a Pokemon has just been sent out to, one
/// at a time against the live state. Only grounded Pokemon are affected, and
/// nothing further happens once a hazard knocks the newcomer out.
pub fn apply_entry_hazards(
    state: &mut BattleState,
    rules: &RuleData,
    player_index: usize,
    rng: &mut dyn RandomSource,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let side = state.players[player_index].side;
    let hazards: Vec<(Hazard, u8)> = match state.field.side(side) {
        Some(side_state) => side_state.hazards.iter().map(|(&hazard, &layers)| (hazard, layers)).collect(),
        None => return Ok(()),
    };

    for (hazard, layers) in hazards {
        if state.players[player_index].live_active_pokemon().is_none() {
            break;
        }
        let commands = hazard_commands(state, rules, player_index, hazard, layers, rng);
        execute_command_batch(commands, state, bus)?;
    }
    Ok(())
}

fn hazard_commands(
    state: &BattleState,
    rules: &RuleData,
    player_index: usize,
    hazard: Hazard,
    layers: u8,
    rng: &mut dyn RandomSource,
) -> Vec<BattleCommand> {
    let player = &state.players[player_index];
    let Some(pokemon) = player.live_active_pokemon() else {
        return Vec::new();
    };
    let side = player.side;
    let target = PlayerTarget::from_index(player_index);
    let grounded = is_grounded(pokemon, rules);

    let damage = match hazard {
        Hazard::StealthRock => {
            let multiplier = rules.type_chart.effectiveness_against(PokemonType::Rock, &pokemon.types);
            ((pokemon.max_hp() as f64 * multiplier / 8.0).floor() as u16).max(1)
        }
        Hazard::Spikes if grounded => {
            let denominator = match layers {
                1 => 8,
                2 => 6,
                _ => 4,
            };
            fraction_of_max(pokemon.max_hp(), denominator)
        }
        Hazard::ToxicSpikes if grounded => {
            if pokemon.has_type(PokemonType::Poison) {
                return vec![
                    BattleCommand::ClearHazard { side, hazard },
                    BattleCommand::EmitEvent(BattleEvent::FieldChanged {
                        change: FieldChange::HazardAbsorbed { side, hazard },
                    }),
                ];
            }
            let status = if layers >= 2 {
                StatusType::BadlyPoisoned
            } else {
                StatusType::Poison
            };
            if status_block_reason(pokemon, status, rules).is_some() {
                return Vec::new();
            }
            return status_application_commands(state, rules, player_index, status, rng);
        }
        Hazard::StickyWeb if grounded => {
            let old_stage = player.get_stat_stage(StatType::Spe);
            if old_stage <= MIN_STAT_STAGE {
                return Vec::new();
            }
            return vec![
                BattleCommand::ChangeStatStage {
                    target,
                    stat: StatType::Spe,
                    delta: -1,
                },
                BattleCommand::EmitEvent(BattleEvent::StatStageChanged {
                    player_index,
                    pokemon: pokemon.species.clone(),
                    stat: StatType::Spe,
                    delta: -1,
                    new_stage: old_stage - 1,
                    clamped: false,
                }),
            ];
        }
        _ => return Vec::new(),
    };

    vec![
        BattleCommand::EmitEvent(BattleEvent::PokemonDamaged {
            player_index,
            pokemon: pokemon.species.clone(),
            damage,
            remaining_hp: pokemon.current_hp().saturating_sub(damage),
            source: DamageSource::Hazard(hazard),
        }),
        BattleCommand::DealDamage { target, amount: damage },
    ]
}
