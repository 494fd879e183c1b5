use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::battle::field::{TerrainState, WeatherState};
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState};
use crate::errors::{BattleResult, BattleStateError};
use crate::player::{BattlePlayer, PendingSwitch, MAX_STAT_STAGE, MIN_STAT_STAGE};
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::{Hazard, MoveId, StatType, TeamCondition};
use tracing::error;

/// Player target for commands - provides type safety over raw indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerTarget(pub usize);

impl PlayerTarget {
    pub fn to_index(self) -> usize {
        self.0
    }

    pub fn from_index(index: usize) -> PlayerTarget {
        PlayerTarget(index)
    }
}

/// Atomic commands representing final state changes.
///
/// Every mutation of a `BattleState` during resolution goes through one of
/// these; calculators and effect handlers only ever return them.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Direct state changes
    SetGameState(GameState),
    IncrementTurnNumber,

    // Pokemon modifications
    DealDamage {
        target: PlayerTarget,
        amount: u16,
    },
    HealPokemon {
        target: PlayerTarget,
        amount: u16,
    },
    SetPokemonStatus {
        target: PlayerTarget,
        status: Option<StatusCondition>,
    },
    FaintPokemon {
        target: PlayerTarget,
    },
    UsePp {
        target: PlayerTarget,
        move_index: usize,
    },
    ConsumeItem {
        target: PlayerTarget,
    },

    // Player state changes
    ChangeStatStage {
        target: PlayerTarget,
        stat: StatType,
        delta: i8,
    },
    ResetStatStages {
        target: PlayerTarget,
    },
    AddCondition {
        target: PlayerTarget,
        condition: PokemonCondition,
    },
    RemoveCondition {
        target: PlayerTarget,
        condition_type: PokemonConditionType,
    },
    SetLastMove {
        target: PlayerTarget,
        move_used: MoveId,
    },
    SetPendingSwitch {
        target: PlayerTarget,
        reason: Option<PendingSwitch>,
    },
    SwitchPokemon {
        target: PlayerTarget,
        new_pokemon_index: usize,
        carry_stages: bool,
    },

    // Field
    SetWeather(Option<WeatherState>),
    SetTerrain(Option<TerrainState>),
    AddHazard {
        side: usize,
        hazard: Hazard,
    },
    ClearHazard {
        side: usize,
        hazard: Hazard,
    },
    SetTeamCondition {
        side: usize,
        condition: TeamCondition,
        turns: u8,
    },
    RemoveTeamCondition {
        side: usize,
        condition: TeamCondition,
    },

    EmitEvent(BattleEvent),
}

/// Execute a batch of commands in order, checking state invariants after each one.
pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> BattleResult<()> {
    for command in commands {
        execute_command(command, state, bus)?;
        if let Some(detail) = find_invariant_violation(state) {
            error!(%detail, "battle state invariant violated");
            debug_assert!(false, "battle state invariant violated: {}", detail);
            bus.push(BattleEvent::InvariantViolated { detail });
        }
    }
    Ok(())
}

/// HP within bounds and stages within range for every participant.
pub fn find_invariant_violation(state: &BattleState) -> Option<String> {
    for (player_index, player) in state.players.iter().enumerate() {
        for pokemon in &player.team {
            if pokemon.current_hp() > pokemon.max_hp() {
                return Some(format!(
                    "player {} {} has {} HP above max {}",
                    player_index,
                    pokemon.name,
                    pokemon.current_hp(),
                    pokemon.max_hp()
                ));
            }
        }
        for (stat, stage) in &player.stat_stages {
            if !(MIN_STAT_STAGE..=MAX_STAT_STAGE).contains(stage) {
                return Some(format!(
                    "player {} {} stage {} out of range",
                    player_index, stat, stage
                ));
            }
        }
    }
    None
}

fn player_mut(state: &mut BattleState, target: PlayerTarget) -> BattleResult<&mut BattlePlayer> {
    let player_index = target.to_index();
    state
        .players
        .get_mut(player_index)
        .ok_or_else(|| BattleStateError::InvalidPlayerIndex(player_index).into())
}

/// Helper function to execute commands that operate on the active Pokemon
fn execute_pokemon_command<F>(target: PlayerTarget, state: &mut BattleState, operation: F) -> BattleResult<()>
where
    F: FnOnce(&mut PokemonInst),
{
    let player = player_mut(state, target)?;
    let pokemon = player
        .active_pokemon_mut()
        .ok_or(BattleStateError::NoActivePokemon(target.to_index()))?;
    operation(pokemon);
    Ok(())
}

fn execute_deal_damage_command(
    target: PlayerTarget,
    amount: u16,
    state: &mut BattleState,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let player_index = target.to_index();
    let mut fainted_species = None;
    execute_pokemon_command(target, state, |pokemon| {
        if pokemon.take_damage(amount) {
            fainted_species = Some(pokemon.species.clone());
        }
    })?;
    if let Some(pokemon) = fainted_species {
        bus.push(BattleEvent::PokemonFainted { player_index, pokemon });
    }
    Ok(())
}

fn side_mut(state: &mut BattleState, side: usize) -> BattleResult<&mut crate::battle::field::SideState> {
    state
        .field
        .sides
        .get_mut(side)
        .ok_or_else(|| BattleStateError::InconsistentState(format!("no side {}", side)).into())
}

fn execute_command(command: BattleCommand, state: &mut BattleState, bus: &mut EventBus) -> BattleResult<()> {
    match command {
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
            Ok(())
        }
        BattleCommand::SetGameState(new_state) => {
            state.game_state = new_state;
            Ok(())
        }
        BattleCommand::IncrementTurnNumber => {
            state.turn_number += 1;
            Ok(())
        }
        BattleCommand::DealDamage { target, amount } => execute_deal_damage_command(target, amount, state, bus),
        BattleCommand::FaintPokemon { target } => {
            let current_hp = state
                .active_pokemon(target.to_index())
                .map(|pokemon| pokemon.current_hp())
                .unwrap_or(0);
            execute_deal_damage_command(target, current_hp, state, bus)
        }
        BattleCommand::HealPokemon { target, amount } => execute_pokemon_command(target, state, |pokemon| {
            pokemon.heal(amount);
        }),
        BattleCommand::SetPokemonStatus { target, status } => {
            execute_pokemon_command(target, state, |pokemon| {
                // A fainted Pokemon carries no status.
                if !pokemon.is_fainted() || status.is_none() {
                    pokemon.status = status;
                }
            })
        }
        BattleCommand::ConsumeItem { target } => execute_pokemon_command(target, state, |pokemon| {
            pokemon.held_item = None;
        }),
        BattleCommand::UsePp { target, move_index } => {
            let player = player_mut(state, target)?;
            let pokemon = player
                .active_pokemon_mut()
                .ok_or(BattleStateError::NoActivePokemon(target.to_index()))?;
            let slot = pokemon.moves.get_mut(move_index).ok_or_else(|| {
                BattleStateError::InconsistentState(format!("no move in slot {}", move_index))
            })?;
            slot.use_move();
            Ok(())
        }
        BattleCommand::ChangeStatStage { target, stat, delta } => {
            player_mut(state, target)?.modify_stat_stage(stat, delta);
            Ok(())
        }
        BattleCommand::ResetStatStages { target } => {
            player_mut(state, target)?.clear_stat_stages();
            Ok(())
        }
        BattleCommand::AddCondition { target, condition } => {
            player_mut(state, target)?.add_condition(condition);
            Ok(())
        }
        BattleCommand::RemoveCondition { target, condition_type } => {
            player_mut(state, target)?.remove_condition(condition_type);
            Ok(())
        }
        BattleCommand::SetLastMove { target, move_used } => {
            player_mut(state, target)?.last_move = Some(move_used);
            Ok(())
        }
        BattleCommand::SetPendingSwitch { target, reason } => {
            player_mut(state, target)?.pending_switch = reason;
            Ok(())
        }
        BattleCommand::SwitchPokemon {
            target,
            new_pokemon_index,
            carry_stages,
        } => {
            let player_index = target.to_index();
            let player = player_mut(state, target)?;
            if new_pokemon_index >= player.team.len() || player.team[new_pokemon_index].is_fainted() {
                return Err(BattleStateError::InconsistentState(format!(
                    "player {} cannot switch to slot {}",
                    player_index, new_pokemon_index
                ))
                .into());
            }
            let old_pokemon = player.team[player.active_pokemon_index].species.clone();
            // Bad poison restarts its counter once the Pokemon leaves the field.
            if let Some(outgoing) = player.active_pokemon_mut() {
                if let Some(StatusCondition::BadlyPoisoned { .. }) = outgoing.status {
                    outgoing.status = Some(StatusCondition::BadlyPoisoned { counter: 0 });
                }
            }
            player.switch_pokemon(new_pokemon_index, carry_stages);
            let new_pokemon = player.team[new_pokemon_index].species.clone();
            bus.push(BattleEvent::PokemonSwitched {
                player_index,
                old_pokemon,
                new_pokemon,
            });
            Ok(())
        }
        BattleCommand::SetWeather(weather) => {
            state.field.weather = weather;
            Ok(())
        }
        BattleCommand::SetTerrain(terrain) => {
            state.field.terrain = terrain;
            Ok(())
        }
        BattleCommand::AddHazard { side, hazard } => {
            let side_state = side_mut(state, side)?;
            let layers = side_state.hazards.entry(hazard).or_insert(0);
            *layers = (*layers + 1).min(hazard.max_layers());
            Ok(())
        }
        BattleCommand::ClearHazard { side, hazard } => {
            side_mut(state, side)?.hazards.remove(&hazard);
            Ok(())
        }
        BattleCommand::SetTeamCondition { side, condition, turns } => {
            side_mut(state, side)?.team_conditions.insert(condition, turns);
            Ok(())
        }
        BattleCommand::RemoveTeamCondition { side, condition } => {
            side_mut(state, side)?.team_conditions.remove(&condition);
            Ok(())
        }
    }
}
