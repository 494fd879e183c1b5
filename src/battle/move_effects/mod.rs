// --- 1. DECLARE HELPER MODULES ---
mod damage_effects;
mod field_effects;
mod special_effects;
mod stat_effects;
mod status_effects;

// --- 2. IMPORTS ---
use crate::battle::commands::BattleCommand;
use crate::battle::state::BattleState;
use crate::rng::RandomSource;
use crate::rule_data::RuleData;
use schema::{MoveData, MoveEffect, MoveId, Target};
// Bring the standalone helper functions from our private modules into scope.
use self::{damage_effects::*, field_effects::*, special_effects::*, stat_effects::*, status_effects::*};
pub(crate) use self::stat_effects::stat_stage_commands;

// --- 3. BATTLE-SPECIFIC DATA STRUCTURES ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectContext {
    pub attacker_index: usize,
    pub defender_index: usize,
    pub move_used: MoveId,
}

impl EffectContext {
    pub fn new(attacker_index: usize, defender_index: usize, move_used: MoveId) -> Self {
        Self {
            attacker_index,
            defender_index,
            move_used,
        }
    }

    pub fn target_index(&self, target: &Target) -> usize {
        match target {
            Target::User => self.attacker_index,
            Target::Target => self.defender_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectResult {
    Continue(Vec<BattleCommand>),
    /// Apply these commands and end the action here.
    Skip(Vec<BattleCommand>),
}

// --- 4. THE PUBLIC EXTENSION TRAITS ---

/// Secondary effects, applied once per action after the last hit.
pub trait BattleMoveEffectExt {
    fn apply(
        &self,
        context: &EffectContext,
        state: &BattleState,
        rules: &RuleData,
        rng: &mut dyn RandomSource,
    ) -> Vec<BattleCommand>;
}

/// Effects keyed off the whole move rather than one descriptor.
pub trait BattleMoveDataExt {
    /// Charge moves stop on their first turn.
    fn apply_charge_effects(&self, context: &EffectContext, state: &BattleState, forced: bool) -> EffectResult;
    fn apply_damage_based_effects(
        &self,
        context: &EffectContext,
        state: &BattleState,
        damage_dealt: u16,
    ) -> Vec<BattleCommand>;
    fn apply_miss_based_effects(&self, context: &EffectContext, state: &BattleState) -> Vec<BattleCommand>;
    /// Recharge and self-switching, once the move has finished.
    fn apply_post_move_effects(&self, context: &EffectContext, state: &BattleState, landed: bool) -> Vec<BattleCommand>;
    /// Runs last, however the action ended.
    fn apply_final_effects(&self, context: &EffectContext, state: &BattleState) -> Vec<BattleCommand>;
}

// --- 5. THE LEAN IMPLEMENTATIONS ---

impl BattleMoveEffectExt for MoveEffect {
    fn apply(
        &self,
        context: &EffectContext,
        state: &BattleState,
        rules: &RuleData,
        rng: &mut dyn RandomSource,
    ) -> Vec<BattleCommand> {
        match self {
            Self::StatChange {
                target,
                stat,
                stages,
                chance,
            } => apply_stat_change_effect(target, *stat, *stages, *chance, context, state, rng),
            Self::Haze => apply_haze_effect(state),
            Self::InflictStatus { status, chance } => {
                apply_inflict_status_effect(*status, *chance, context, state, rules, rng)
            }
            Self::ApplyVolatile {
                volatile,
                target,
                chance,
            } => apply_volatile_effect(*volatile, target, *chance, context, state, rng),
            Self::Heal(percentage) => apply_heal_effect(*percentage, context, state),
            Self::WeatherHeal => apply_weather_heal_effect(context, state),
            Self::SetWeather { weather, turns } => apply_weather_effect(*weather, *turns, context, state),
            Self::SetTerrain { terrain, turns } => apply_terrain_effect(*terrain, *turns, context, state),
            Self::SetHazard(hazard) => apply_hazard_effect(*hazard, context, state),
            Self::SetScreen { screen, turns } => apply_screen_effect(*screen, *turns, context, state),
            // Handled by the resolver or by the move-level hooks below.
            Self::Drain(_)
            | Self::Recoil(_)
            | Self::RecoilMaxHp(_)
            | Self::CrashOnMiss(_)
            | Self::Ohko
            | Self::SelfSwitch
            | Self::BatonPass
            | Self::ChargeTurn
            | Self::Recharge
            | Self::SelfDestruct => Vec::new(),
        }
    }
}

impl BattleMoveDataExt for MoveData {
    fn apply_charge_effects(&self, context: &EffectContext, state: &BattleState, forced: bool) -> EffectResult {
        if !self.has_effect(|effect| matches!(effect, MoveEffect::ChargeTurn)) {
            return EffectResult::Continue(Vec::new());
        }
        apply_charge_turn_special(context, state, forced)
    }

    fn apply_damage_based_effects(
        &self,
        context: &EffectContext,
        state: &BattleState,
        damage_dealt: u16,
    ) -> Vec<BattleCommand> {
        let mut all_commands = Vec::new();
        if damage_dealt == 0 {
            return all_commands;
        }
        for effect in &self.effects {
            match effect {
                MoveEffect::Recoil(percentage) => {
                    all_commands.extend(apply_recoil_effect(*percentage, context, state, damage_dealt));
                }
                MoveEffect::RecoilMaxHp(percentage) => {
                    all_commands.extend(apply_max_hp_recoil_effect(*percentage, context, state));
                }
                MoveEffect::Drain(percentage) => {
                    all_commands.extend(apply_drain_effect(*percentage, context, state, damage_dealt));
                }
                _ => {}
            }
        }
        all_commands
    }

    fn apply_miss_based_effects(&self, context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
        let mut all_commands = Vec::new();
        for effect in &self.effects {
            if let MoveEffect::CrashOnMiss(percentage) = effect {
                all_commands.extend(apply_crash_effect(*percentage, context, state));
            }
        }
        all_commands
    }

    fn apply_post_move_effects(&self, context: &EffectContext, state: &BattleState, landed: bool) -> Vec<BattleCommand> {
        let mut all_commands = Vec::new();
        for effect in &self.effects {
            match effect {
                MoveEffect::Recharge if landed => {
                    all_commands.extend(apply_recharge_special(context, state));
                }
                MoveEffect::SelfSwitch if landed => {
                    all_commands.extend(apply_self_switch_special(context, state, false));
                }
                MoveEffect::BatonPass if landed => {
                    all_commands.extend(apply_self_switch_special(context, state, true));
                }
                _ => {}
            }
        }
        all_commands
    }

    fn apply_final_effects(&self, context: &EffectContext, state: &BattleState) -> Vec<BattleCommand> {
        if self.has_effect(|effect| matches!(effect, MoveEffect::SelfDestruct)) {
            apply_self_destruct_special(context, state)
        } else {
            Vec::new()
        }
    }
}
