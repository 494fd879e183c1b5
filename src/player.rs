use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::pokemon::PokemonInst;
use schema::{MoveId, StatType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_STAT_STAGE: i8 = -6;
pub const MAX_STAT_STAGE: i8 = 6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    // The index refers to the move's position in the active Pokémon's move list.
    // `target` is a player index; `None` picks the first live opponent.
    UseMove {
        move_index: usize,
        target: Option<usize>,
    },

    // The index refers to the Pokémon's position in the player's team.
    SwitchPokemon { team_index: usize },
}

/// Why a participant owes a switch outside the normal action flow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingSwitch {
    Fainted,
    SelfSwitch,
    /// Like a self switch, but stat stages carry over to the replacement.
    BatonPass,
}

impl PendingSwitch {
    pub fn carries_stages(self) -> bool {
        matches!(self, PendingSwitch::BatonPass)
    }
}

/// One combat participant: a team, its active slot, and the volatile state
/// attached to that slot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattlePlayer {
    pub player_id: String,
    pub player_name: String,
    /// Participants sharing a side are allies.
    pub side: usize,

    pub team: Vec<PokemonInst>,
    pub active_pokemon_index: usize,

    pub active_pokemon_conditions: BTreeMap<PokemonConditionType, PokemonCondition>,

    // Stage per stat (-6 to +6); missing entries are 0
    pub stat_stages: BTreeMap<StatType, i8>,

    pub last_move: Option<MoveId>,
    pub pending_switch: Option<PendingSwitch>,
}

impl BattlePlayer {
    pub fn new(player_id: String, player_name: String, side: usize, team: Vec<PokemonInst>) -> Self {
        // Lead with the first Pokemon that can battle.
        let active_pokemon_index = team
            .iter()
            .position(|pokemon| !pokemon.is_fainted())
            .unwrap_or(0);

        BattlePlayer {
            player_id,
            player_name,
            side,
            team,
            active_pokemon_index,
            active_pokemon_conditions: BTreeMap::new(),
            stat_stages: BTreeMap::new(),
            last_move: None,
            pending_switch: None,
        }
    }

    pub fn active_pokemon(&self) -> Option<&PokemonInst> {
        self.team.get(self.active_pokemon_index)
    }

    pub fn active_pokemon_mut(&mut self) -> Option<&mut PokemonInst> {
        self.team.get_mut(self.active_pokemon_index)
    }

    /// The active Pokemon, only if it can still battle.
    pub fn live_active_pokemon(&self) -> Option<&PokemonInst> {
        self.active_pokemon().filter(|pokemon| !pokemon.is_fainted())
    }

    pub fn has_usable_pokemon(&self) -> bool {
        self.team.iter().any(|pokemon| !pokemon.is_fainted())
    }

    /// Team indices that could be switched in right now.
    pub fn available_replacements(&self) -> Vec<usize> {
        self.team
            .iter()
            .enumerate()
            .filter(|(index, pokemon)| *index != self.active_pokemon_index && !pokemon.is_fainted())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn has_condition(&self, condition_type: PokemonConditionType) -> bool {
        self.active_pokemon_conditions.contains_key(&condition_type)
    }

    pub fn get_condition(&self, condition_type: PokemonConditionType) -> Option<&PokemonCondition> {
        self.active_pokemon_conditions.get(&condition_type)
    }

    /// Insert or replace the condition of the same kind.
    pub fn add_condition(&mut self, condition: PokemonCondition) {
        self.active_pokemon_conditions
            .insert(condition.get_type(), condition);
    }

    pub fn remove_condition(&mut self, condition_type: PokemonConditionType) -> Option<PokemonCondition> {
        self.active_pokemon_conditions.remove(&condition_type)
    }

    pub fn clear_conditions(&mut self) {
        self.active_pokemon_conditions.clear();
    }

    /// Whether the active slot is locked into a forced action next turn.
    pub fn forced_move(&self) -> Option<(&MoveId, usize)> {
        match self.get_condition(PokemonConditionType::Charging) {
            Some(PokemonCondition::Charging {
                move_used,
                target_index,
                ready: true,
            }) => Some((move_used, *target_index)),
            _ => None,
        }
    }

    pub fn must_recharge(&self) -> bool {
        matches!(
            self.get_condition(PokemonConditionType::MustRecharge),
            Some(PokemonCondition::MustRecharge { armed: true })
        )
    }

    pub fn get_stat_stage(&self, stat: StatType) -> i8 {
        self.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Set a stage, clamped to the legal range. Returns the stage actually stored.
    pub fn set_stat_stage(&mut self, stat: StatType, stage: i8) -> i8 {
        let clamped = stage.clamp(MIN_STAT_STAGE, MAX_STAT_STAGE);
        if clamped == 0 {
            self.stat_stages.remove(&stat);
        } else {
            self.stat_stages.insert(stat, clamped);
        }
        clamped
    }

    pub fn modify_stat_stage(&mut self, stat: StatType, delta: i8) -> i8 {
        let current = self.get_stat_stage(stat);
        self.set_stat_stage(stat, current.saturating_add(delta))
    }

    pub fn clear_stat_stages(&mut self) {
        self.stat_stages.clear();
    }

    /// Bring a new Pokemon in. Volatiles always reset; stages reset unless carried.
    pub fn switch_pokemon(&mut self, new_index: usize, carry_stages: bool) {
        self.active_pokemon_index = new_index;
        self.clear_conditions();
        if !carry_stages {
            self.clear_stat_stages();
        }
        self.last_move = None;
        self.pending_switch = None;
    }
}
