use crate::battle::conditions::PokemonConditionType;
use crate::battle::field::FieldState;
use crate::battle::state::Effectiveness;
use crate::battle::stats::{critical_hit_odds, effective_attack, effective_defense, is_grounded};
use crate::player::BattlePlayer;
use crate::pokemon::PokemonInst;
use crate::rng::RandomSource;
use crate::rule_data::RuleData;
use schema::{
    AbilityEffect, FixedDamage, ItemEffect, MoveCategory, MoveData, PokemonType, TeamCondition,
    Terrain, Weather,
};
use std::fmt::Debug;

const CONFUSION_POWER: u32 = 40;
const FOCUS_ENERGY_TIER_BOOST: u8 = 2;

/// Everything a damage computation may read. Borrowed from the battle state
/// for the duration of one hit.
#[derive(Debug, Clone, Copy)]
pub struct DamageContext<'a> {
    pub attacker: &'a PokemonInst,
    pub attacker_player: &'a BattlePlayer,
    pub defender: &'a PokemonInst,
    pub defender_player: &'a BattlePlayer,
    pub move_data: &'a MoveData,
    pub field: &'a FieldState,
    pub rules: &'a RuleData,
}

impl DamageContext<'_> {
    pub fn type_multiplier(&self) -> f64 {
        self.rules
            .type_chart
            .effectiveness_against(self.move_data.move_type, &self.defender.types)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub damage: u16,
    pub multiplier: f64,
    pub effectiveness: Effectiveness,
    pub critical: bool,
}

impl DamageOutcome {
    fn immune() -> Self {
        Self {
            damage: 0,
            multiplier: 0.0,
            effectiveness: Effectiveness::NoEffect,
            critical: false,
        }
    }
}

/// A multiplicative hook applied after the random variance.
/// Returns 1.0 when it does not apply.
pub trait DamageModifier: Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn multiplier(&self, context: &DamageContext<'_>, critical: bool) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherModifier;

impl DamageModifier for WeatherModifier {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn multiplier(&self, context: &DamageContext<'_>, _critical: bool) -> f64 {
        match (context.field.active_weather(), context.move_data.move_type) {
            (Some(Weather::Rain), PokemonType::Water) | (Some(Weather::Sun), PokemonType::Fire) => 1.5,
            (Some(Weather::Rain), PokemonType::Fire) | (Some(Weather::Sun), PokemonType::Water) => 0.5,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainModifier;

impl DamageModifier for TerrainModifier {
    fn name(&self) -> &'static str {
        "terrain"
    }

    fn multiplier(&self, context: &DamageContext<'_>, _critical: bool) -> f64 {
        let Some(terrain) = context.field.active_terrain() else {
            return 1.0;
        };
        let move_type = context.move_data.move_type;
        match terrain {
            Terrain::Misty => {
                if move_type == PokemonType::Dragon && is_grounded(context.defender, context.rules) {
                    0.5
                } else {
                    1.0
                }
            }
            _ => {
                let boosted = match terrain {
                    Terrain::Electric => PokemonType::Electric,
                    Terrain::Grassy => PokemonType::Grass,
                    Terrain::Psychic => PokemonType::Psychic,
                    Terrain::Misty => return 1.0,
                };
                if move_type == boosted && is_grounded(context.attacker, context.rules) {
                    1.3
                } else {
                    1.0
                }
            }
        }
    }
}

/// Reflect and Light Screen; critical hits go straight through.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenModifier;

impl DamageModifier for ScreenModifier {
    fn name(&self) -> &'static str {
        "screens"
    }

    fn multiplier(&self, context: &DamageContext<'_>, critical: bool) -> f64 {
        if critical {
            return 1.0;
        }
        let screen = match context.move_data.category {
            MoveCategory::Physical => TeamCondition::Reflect,
            MoveCategory::Special => TeamCondition::LightScreen,
            MoveCategory::Status => return 1.0,
        };
        if context
            .field
            .side_has_team_condition(context.defender_player.side, screen)
        {
            0.5
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AbilityModifier;

impl DamageModifier for AbilityModifier {
    fn name(&self) -> &'static str {
        "ability"
    }

    fn multiplier(&self, context: &DamageContext<'_>, _critical: bool) -> f64 {
        let attacker = context.attacker;
        let in_pinch = attacker.current_hp() as u32 * 3 <= attacker.max_hp() as u32;
        context
            .rules
            .ability_effects(attacker.ability.as_ref())
            .iter()
            .map(|effect| match effect {
                AbilityEffect::PinchBoost(move_type)
                    if in_pinch && *move_type == context.move_data.move_type =>
                {
                    1.5
                }
                _ => 1.0,
            })
            .product()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ItemModifier;

impl DamageModifier for ItemModifier {
    fn name(&self) -> &'static str {
        "item"
    }

    fn multiplier(&self, context: &DamageContext<'_>, _critical: bool) -> f64 {
        context
            .rules
            .item_effects(context.attacker.held_item.as_ref())
            .iter()
            .map(|effect| match effect {
                ItemEffect::TypeBoost { move_type, percent } if *move_type == context.move_data.move_type => {
                    1.0 + *percent as f64 / 100.0
                }
                ItemEffect::DamageBoost(percent) => 1.0 + *percent as f64 / 100.0,
                _ => 1.0,
            })
            .product()
    }
}

/// The damage formula plus an ordered list of modifier hooks.
#[derive(Debug)]
pub struct DamageCalculator {
    modifiers: Vec<Box<dyn DamageModifier>>,
}

impl Default for DamageCalculator {
    fn default() -> Self {
        Self::standard()
    }
}

impl DamageCalculator {
    /// Formula only, no hooks.
    pub fn bare() -> Self {
        Self { modifiers: Vec::new() }
    }

    pub fn standard() -> Self {
        Self::bare()
            .with_modifier(WeatherModifier)
            .with_modifier(TerrainModifier)
            .with_modifier(ScreenModifier)
            .with_modifier(AbilityModifier)
            .with_modifier(ItemModifier)
    }

    pub fn with_modifier(mut self, modifier: impl DamageModifier + 'static) -> Self {
        self.modifiers.push(Box::new(modifier));
        self
    }

    pub fn modifier_names(&self) -> Vec<&'static str> {
        self.modifiers.iter().map(|modifier| modifier.name()).collect()
    }

    /// Roll for a critical hit at the move's tier, raised while the attacker
    /// is focused. Draws nothing for immune defenders or guaranteed tiers.
    pub fn roll_critical(&self, context: &DamageContext<'_>, rng: &mut dyn RandomSource) -> bool {
        let immune = context
            .rules
            .ability_effects(context.defender.ability.as_ref())
            .iter()
            .any(|effect| matches!(effect, AbilityEffect::CriticalImmunity));
        if immune {
            return false;
        }
        let mut tier = context.move_data.crit_tier;
        if context.attacker_player.has_condition(PokemonConditionType::FocusEnergy) {
            tier = tier.saturating_add(FOCUS_ENERGY_TIER_BOOST);
        }
        let (numerator, denominator) = critical_hit_odds(tier);
        rng.chance(numerator, denominator, "Critical Hit")
    }

    /// One hit of a formula-damage move. Type immunity returns exactly 0 with
    /// no draws; anything else deals at least 1.
    pub fn compute(&self, context: &DamageContext<'_>, rng: &mut dyn RandomSource) -> DamageOutcome {
        let multiplier = context.type_multiplier();
        if multiplier == 0.0 {
            return DamageOutcome::immune();
        }

        let critical = self.roll_critical(context, rng);
        let move_data = context.move_data;
        let level = context.attacker.level as u32;
        let power = move_data.power.unwrap_or(0) as u32;
        let attack = effective_attack(context.attacker, context.attacker_player, move_data.category, critical) as u32;
        let defense = effective_defense(context.defender, context.defender_player, move_data.category, critical) as u32;

        let mut damage = (2 * level / 5 + 2) * power * attack / defense / 50 + 2;

        if move_data.move_type != PokemonType::Typeless && context.attacker.has_type(move_data.move_type) {
            damage = damage * 3 / 2;
        }

        damage = (damage as f64 * multiplier).floor() as u32;

        if critical {
            damage = damage * 3 / 2;
        }

        let variance = rng.range_inclusive(85, 100, "Damage Variance");
        damage = damage * variance / 100;

        for modifier in &self.modifiers {
            let factor = modifier.multiplier(context, critical);
            if factor != 1.0 {
                damage = (damage as f64 * factor).floor() as u32;
            }
        }

        DamageOutcome {
            damage: damage.clamp(1, u16::MAX as u32) as u16,
            multiplier,
            effectiveness: Effectiveness::from_multiplier(multiplier),
            critical,
        }
    }

    /// Typeless 40-power physical hit against itself: no crit, no STAB, no variance.
    pub fn confusion_damage(&self, pokemon: &PokemonInst, player: &BattlePlayer) -> u16 {
        let level = pokemon.level as u32;
        let attack = effective_attack(pokemon, player, MoveCategory::Physical, false) as u32;
        let defense = effective_defense(pokemon, player, MoveCategory::Physical, false) as u32;
        let damage = (2 * level / 5 + 2) * CONFUSION_POWER * attack / defense / 50 + 2;
        damage.clamp(1, u16::MAX as u32) as u16
    }

    /// Damage for moves that bypass the formula. Never zero.
    pub fn fixed_damage(&self, fixed: &FixedDamage, attacker: &PokemonInst, defender: &PokemonInst) -> u16 {
        let damage = match fixed {
            FixedDamage::Flat(amount) => *amount as u32,
            FixedDamage::UserLevel => attacker.level as u32,
            FixedDamage::PercentOfTargetCurrentHp(percent) => {
                defender.current_hp() as u32 * *percent as u32 / 100
            }
            FixedDamage::PercentOfTargetMaxHp(percent) => defender.max_hp() as u32 * *percent as u32 / 100,
        };
        damage.clamp(1, u16::MAX as u32) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::field::WeatherState;
    use crate::rng::TurnRng;
    use schema::MoveId;

    struct Fixture {
        rules: RuleData,
        attacker: PokemonInst,
        attacker_player: BattlePlayer,
        defender: PokemonInst,
        defender_player: BattlePlayer,
        field: FieldState,
    }

    impl Fixture {
        fn new(attacker_types: Vec<PokemonType>, defender_types: Vec<PokemonType>) -> Self {
            let attacker = PokemonInst::new_for_test("Attacker", 50, attacker_types, [150, 100, 100, 100, 100, 100], vec![]);
            let defender = PokemonInst::new_for_test("Defender", 50, defender_types, [150, 100, 100, 100, 100, 100], vec![]);
            Self {
                rules: RuleData::standard(),
                attacker_player: BattlePlayer::new("a".into(), "A".into(), 0, vec![attacker.clone()]),
                defender_player: BattlePlayer::new("d".into(), "D".into(), 1, vec![defender.clone()]),
                attacker,
                defender,
                field: FieldState::new(2),
            }
        }

        fn context<'a>(&'a self, move_data: &'a MoveData) -> DamageContext<'a> {
            DamageContext {
                attacker: &self.attacker,
                attacker_player: &self.attacker_player,
                defender: &self.defender,
                defender_player: &self.defender_player,
                move_data,
                field: &self.field,
                rules: &self.rules,
            }
        }

        fn move_data(&self, id: &str) -> MoveData {
            self.rules.move_data(&MoveId::from(id)).expect("standard move").clone()
        }
    }

    #[test]
    fn test_standard_hook_order() {
        assert_eq!(
            DamageCalculator::standard().modifier_names(),
            vec!["weather", "terrain", "screens", "ability", "item"]
        );
        assert!(DamageCalculator::bare().modifier_names().is_empty());
    }

    #[test]
    fn test_base_formula_with_fixed_variance() {
        let fixture = Fixture::new(vec![PokemonType::Fire], vec![PokemonType::Fire]);
        let tackle = fixture.move_data("tackle");
        // Crit roll 50 on 1/24 fails; variance roll 50 gives 92.
        let mut rng = TurnRng::new_for_test(vec![50, 50]);

        let outcome = DamageCalculator::standard().compute(&fixture.context(&tackle), &mut rng);

        // (22 * 40 * 100 / 100) / 50 + 2 = 19; 19 * 92 / 100 = 17
        assert_eq!(outcome.damage, 17);
        assert!(!outcome.critical);
        assert_eq!(outcome.effectiveness, Effectiveness::Normal);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_immunity_is_zero_without_draws() {
        let fixture = Fixture::new(vec![PokemonType::Normal], vec![PokemonType::Ghost]);
        let tackle = fixture.move_data("tackle");
        let mut rng = TurnRng::new_for_test(vec![]);

        let outcome = DamageCalculator::standard().compute(&fixture.context(&tackle), &mut rng);

        assert_eq!(outcome, DamageOutcome::immune());
    }

    #[test]
    fn test_stab_and_super_effective() {
        let fixture = Fixture::new(vec![PokemonType::Water], vec![PokemonType::Fire]);
        let water_gun = fixture.move_data("water-gun");
        let mut rng = TurnRng::new_for_test(vec![50, 100]);

        let outcome = DamageCalculator::bare().compute(&fixture.context(&water_gun), &mut rng);

        // 19 base, STAB 28, x2 = 56, variance 100
        assert_eq!(outcome.damage, 56);
        assert_eq!(outcome.effectiveness, Effectiveness::SuperEffective);
    }

    #[test]
    fn test_guaranteed_critical_draws_only_variance() {
        let fixture = Fixture::new(vec![PokemonType::Ice], vec![PokemonType::Normal]);
        let frost_breath = fixture.move_data("frost-breath");
        let mut rng = TurnRng::new_for_test(vec![100]);

        let outcome = DamageCalculator::bare().compute(&fixture.context(&frost_breath), &mut rng);

        assert!(outcome.critical);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_focus_energy_raises_the_critical_tier() {
        let mut fixture = Fixture::new(vec![PokemonType::Normal], vec![PokemonType::Normal]);
        let slash = fixture.move_data("slash");

        // Tier 1 draws for the crit and then for variance.
        let mut rng = TurnRng::new_for_test(vec![100, 100]);
        let outcome = DamageCalculator::bare().compute(&fixture.context(&slash), &mut rng);
        assert!(!outcome.critical);
        assert_eq!(rng.remaining(), 0);

        // Tier 3 is certain, so only variance is drawn.
        fixture
            .attacker_player
            .add_condition(crate::battle::conditions::PokemonCondition::FocusEnergy);
        let mut rng = TurnRng::new_for_test(vec![100]);
        let outcome = DamageCalculator::bare().compute(&fixture.context(&slash), &mut rng);
        assert!(outcome.critical);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_minimum_damage_is_one() {
        let mut fixture = Fixture::new(vec![PokemonType::Normal], vec![PokemonType::Rock, PokemonType::Steel]);
        fixture.attacker.curr_stats[3] = 5;
        fixture.defender.curr_stats[4] = 500;
        let swift = fixture.move_data("swift");
        let mut rng = TurnRng::new_for_test(vec![50, 1]);

        let outcome = DamageCalculator::bare().compute(&fixture.context(&swift), &mut rng);

        assert_eq!(outcome.damage, 1);
        assert_eq!(outcome.effectiveness, Effectiveness::NotVeryEffective);
    }

    #[test]
    fn test_weather_and_screen_hooks() {
        let mut fixture = Fixture::new(vec![PokemonType::Normal], vec![PokemonType::Normal]);
        fixture.field.weather = Some(WeatherState {
            weather: Weather::Rain,
            turns_remaining: 3,
        });
        fixture.field.sides[1].team_conditions.insert(TeamCondition::LightScreen, 3);
        let water_gun = fixture.move_data("water-gun");
        let calculator = DamageCalculator::standard();

        let context = fixture.context(&water_gun);
        assert_eq!(WeatherModifier.multiplier(&context, false), 1.5);
        assert_eq!(ScreenModifier.multiplier(&context, false), 0.5);
        assert_eq!(ScreenModifier.multiplier(&context, true), 1.0);

        let mut rng = TurnRng::new_for_test(vec![50, 100]);
        // 19 -> 28 (rain) -> 14 (screen)
        assert_eq!(calculator.compute(&context, &mut rng).damage, 14);
    }

    #[test]
    fn test_item_and_pinch_hooks() {
        let mut fixture = Fixture::new(vec![PokemonType::Fire], vec![PokemonType::Normal]);
        fixture.attacker = fixture
            .attacker
            .clone()
            .with_ability(&fixture.rules, "blaze".into())
            .expect("ability")
            .with_item(&fixture.rules, "charcoal".into())
            .expect("item");
        let ember = fixture.move_data("ember");

        assert!((ItemModifier.multiplier(&fixture.context(&ember), false) - 1.2).abs() < 1e-9);
        assert_eq!(AbilityModifier.multiplier(&fixture.context(&ember), false), 1.0);

        fixture.attacker.take_damage(100);
        assert_eq!(AbilityModifier.multiplier(&fixture.context(&ember), false), 1.5);
    }

    #[test]
    fn test_fixed_damage_kinds() {
        let fixture = Fixture::new(vec![PokemonType::Normal], vec![PokemonType::Normal]);
        let calculator = DamageCalculator::standard();
        let (attacker, defender) = (&fixture.attacker, &fixture.defender);

        assert_eq!(calculator.fixed_damage(&FixedDamage::Flat(40), attacker, defender), 40);
        assert_eq!(calculator.fixed_damage(&FixedDamage::UserLevel, attacker, defender), 50);
        assert_eq!(calculator.fixed_damage(&FixedDamage::PercentOfTargetCurrentHp(50), attacker, defender), 75);
        assert_eq!(calculator.fixed_damage(&FixedDamage::PercentOfTargetMaxHp(1), attacker, defender), 1);
    }

    #[test]
    fn test_confusion_damage() {
        let fixture = Fixture::new(vec![PokemonType::Normal], vec![PokemonType::Normal]);
        // (22 * 40 * 100 / 100) / 50 + 2
        assert_eq!(
            DamageCalculator::standard().confusion_damage(&fixture.attacker, &fixture.attacker_player),
            19
        );
    }
}
