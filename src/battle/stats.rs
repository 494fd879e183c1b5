use crate::battle::field::FieldState;
use crate::player::{BattlePlayer, MAX_STAT_STAGE, MIN_STAT_STAGE};
use crate::pokemon::{PokemonInst, StatusCondition};
use crate::rule_data::RuleData;
use schema::{AbilityEffect, ItemEffect, MoveCategory, PokemonType, StatType};

/// Critical hit odds per tier, as (numerator, denominator).
const CRITICAL_HIT_ODDS: [(u32, u32); 4] = [(1, 24), (1, 8), (1, 2), (1, 1)];

/// Calculate effective attack stat including stat stages and burn.
/// A critical hit ignores the attacker's negative stages.
pub fn effective_attack(pokemon: &PokemonInst, player: &BattlePlayer, category: MoveCategory, critical: bool) -> u16 {
    let attack_stat = match category {
        MoveCategory::Physical => StatType::Atk,
        MoveCategory::Special => StatType::SpAtk,
        MoveCategory::Status => return 0,
    };

    let mut stage = player.get_stat_stage(attack_stat);
    if critical {
        stage = stage.max(0);
    }
    let mut attack = apply_stat_stage_multiplier(pokemon.stat(attack_stat), stage);

    if category == MoveCategory::Physical && matches!(pokemon.status, Some(StatusCondition::Burn)) {
        attack /= 2;
    }

    attack.max(1)
}

/// Calculate effective defense stat including stat stages.
/// A critical hit ignores the defender's positive stages.
pub fn effective_defense(pokemon: &PokemonInst, player: &BattlePlayer, category: MoveCategory, critical: bool) -> u16 {
    let defense_stat = match category {
        MoveCategory::Physical => StatType::Def,
        MoveCategory::Special => StatType::SpDef,
        MoveCategory::Status => return 1,
    };

    let mut stage = player.get_stat_stage(defense_stat);
    if critical {
        stage = stage.min(0);
    }

    apply_stat_stage_multiplier(pokemon.stat(defense_stat), stage).max(1)
}

/// Calculate effective speed including stat stages, paralysis, weather abilities and items
pub fn effective_speed(pokemon: &PokemonInst, player: &BattlePlayer, field: &FieldState, rules: &RuleData) -> u16 {
    let stage = player.get_stat_stage(StatType::Spe);
    let mut speed = apply_stat_stage_multiplier(pokemon.stat(StatType::Spe), stage) as u32;

    if matches!(pokemon.status, Some(StatusCondition::Paralysis)) {
        speed /= 2;
    }

    let weather = field.active_weather();
    for effect in rules.ability_effects(pokemon.ability.as_ref()) {
        if let AbilityEffect::WeatherSpeed(boosting) = effect {
            if weather == Some(*boosting) {
                speed *= 2;
            }
        }
    }

    for effect in rules.item_effects(pokemon.held_item.as_ref()) {
        if let ItemEffect::SpeedBoost(percent) = effect {
            speed = speed * (100 + *percent as u32) / 100;
        }
    }

    speed.min(u16::MAX as u32) as u16
}

/// Final hit chance in percent for a move with the given base accuracy.
/// The attacker's accuracy stage and the defender's evasion stage combine
/// before the ratio table is applied.
pub fn hit_chance(base_accuracy: u8, accuracy_stage: i8, evasion_stage: i8) -> u8 {
    let adjusted_stage = (accuracy_stage - evasion_stage).clamp(MIN_STAT_STAGE, MAX_STAT_STAGE);
    let modified = (base_accuracy as f64 * accuracy_stage_multiplier(adjusted_stage)).round();
    modified.clamp(1.0, 100.0) as u8
}

/// OHKO moves ignore stages: zero below the defender's level, otherwise level gap + 30.
pub fn ohko_hit_chance(attacker_level: u8, defender_level: u8) -> u8 {
    if attacker_level < defender_level {
        return 0;
    }
    ((attacker_level - defender_level) as u32 + 30).min(100) as u8
}

/// Odds for a crit tier; tiers past the table are capped at the last entry.
pub fn critical_hit_odds(tier: u8) -> (u32, u32) {
    let index = (tier as usize).min(CRITICAL_HIT_ODDS.len() - 1);
    CRITICAL_HIT_ODDS[index]
}

/// Grounded Pokemon are hit by ground-level hazards and terrain.
pub fn is_grounded(pokemon: &PokemonInst, rules: &RuleData) -> bool {
    if pokemon.has_type(PokemonType::Flying) {
        return false;
    }
    !rules
        .ability_effects(pokemon.ability.as_ref())
        .iter()
        .any(|effect| matches!(effect, AbilityEffect::TypeImmunity(PokemonType::Ground)))
}

/// Apply accuracy/evasion stage multipliers
/// Uses different multipliers than regular stats
/// Negative stages: 3 / (3 + |stage|)
/// Positive stages: (3 + stage) / 3
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let clamped_stage = stage.clamp(MIN_STAT_STAGE, MAX_STAT_STAGE);
    if clamped_stage < 0 {
        3.0 / (3.0 + (-clamped_stage) as f64)
    } else {
        (3.0 + clamped_stage as f64) / 3.0
    }
}

/// Apply stat stage multipliers according to Pokemon formula
/// Stages range from -6 to +6
/// Negative stages: (2 / (2 + |stage|))
/// Positive stages: ((2 + stage) / 2)
pub fn apply_stat_stage_multiplier(base_stat: u16, stage: i8) -> u16 {
    let clamped_stage = stage.clamp(MIN_STAT_STAGE, MAX_STAT_STAGE);

    if clamped_stage == 0 {
        return base_stat;
    }

    let multiplier = if clamped_stage < 0 {
        2.0 / (2.0 + (-clamped_stage) as f64)
    } else {
        (2.0 + clamped_stage as f64) / 2.0
    };

    ((base_stat as f64) * multiplier).round() as u16
}
