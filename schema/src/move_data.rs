use crate::{Hazard, MoveId, PokemonType, TeamCondition, Terrain, Weather};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveCategory::Physical => write!(f, "Physical"),
            MoveCategory::Special => write!(f, "Special"),
            MoveCategory::Status => write!(f, "Status"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
pub enum StatType {
    Atk,
    Def,
    SpAtk,
    SpDef,
    Spe,
    Acc,
    Eva,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Atk => write!(f, "Attack"),
            StatType::Def => write!(f, "Defense"),
            StatType::SpAtk => write!(f, "Special Attack"),
            StatType::SpDef => write!(f, "Special Defense"),
            StatType::Spe => write!(f, "Speed"),
            StatType::Acc => write!(f, "Accuracy"),
            StatType::Eva => write!(f, "Evasion"),
        }
    }
}

/// Which side of a move an effect lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    User,
    Target,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::User => write!(f, "User"),
            Target::Target => write!(f, "Target"),
        }
    }
}

/// Who a move is aimed at when it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveTarget {
    #[default]
    Opponent,
    User,
    /// Weather, terrain, hazards and screens: never misses and is not blocked by Protect.
    Field,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusType {
    Sleep,
    Poison,
    BadlyPoisoned,
    Burn,
    Freeze,
    Paralysis,
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusType::Sleep => write!(f, "sleep"),
            StatusType::Poison => write!(f, "poison"),
            StatusType::BadlyPoisoned => write!(f, "bad poison"),
            StatusType::Burn => write!(f, "burn"),
            StatusType::Freeze => write!(f, "freeze"),
            StatusType::Paralysis => write!(f, "paralysis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolatileType {
    Confusion,
    Flinch,
    LeechSeed,
    Trap,
    Protect,
    /// Raises the user's critical-hit tier until it leaves the field.
    FocusEnergy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitCount {
    #[default]
    Single,
    Fixed(u8),
    /// Inclusive range; `Range { min: 2, max: 5 }` uses the weighted 35/35/15/15 table.
    Range { min: u8, max: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedDamage {
    Flat(u16),
    UserLevel,
    PercentOfTargetCurrentHp(u8),
    PercentOfTargetMaxHp(u8),
}

/// The closed set of move effects. Percentages are whole numbers out of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    StatChange {
        target: Target,
        stat: StatType,
        stages: i8,
        chance: u8,
    },
    InflictStatus {
        status: StatusType,
        chance: u8,
    },
    ApplyVolatile {
        volatile: VolatileType,
        target: Target,
        chance: u8,
    },
    Drain(u8),
    Recoil(u8),
    RecoilMaxHp(u8),
    CrashOnMiss(u8),
    Heal(u8),
    WeatherHeal,
    SetWeather {
        weather: Weather,
        turns: u8,
    },
    SetTerrain {
        terrain: Terrain,
        turns: u8,
    },
    SetHazard(Hazard),
    SetScreen {
        screen: TeamCondition,
        turns: u8,
    },
    Haze,
    Ohko,
    SelfSwitch,
    BatonPass,
    ChargeTurn,
    Recharge,
    SelfDestruct,
}

impl MoveEffect {
    /// Whether the effect lands on the defender rather than the user or the field.
    pub fn targets_defender(&self) -> bool {
        match self {
            MoveEffect::StatChange { target, .. } | MoveEffect::ApplyVolatile { target, .. } => {
                *target == Target::Target
            }
            MoveEffect::InflictStatus { .. } => true,
            _ => false,
        }
    }

    /// Secondary chance in percent, if the effect rolls one.
    pub fn chance(&self) -> Option<u8> {
        match self {
            MoveEffect::StatChange { chance, .. }
            | MoveEffect::InflictStatus { chance, .. }
            | MoveEffect::ApplyVolatile { chance, .. } => Some(*chance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveFlags {
    /// Each hit after the first re-rolls accuracy; a miss ends the sequence.
    #[serde(default)]
    pub per_hit_accuracy: bool,
    /// Secondary effects still apply when the move misses.
    #[serde(default)]
    pub effect_on_miss: bool,
}

fn default_pp() -> u8 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: MoveId,
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: Option<u16>,
    /// `None` never misses.
    #[serde(default)]
    pub accuracy: Option<u8>,
    #[serde(default = "default_pp")]
    pub pp: u8,
    #[serde(default)]
    pub priority: i8,
    #[serde(default)]
    pub crit_tier: u8,
    #[serde(default)]
    pub target: MoveTarget,
    #[serde(default)]
    pub hits: HitCount,
    #[serde(default)]
    pub fixed_damage: Option<FixedDamage>,
    #[serde(default)]
    pub effects: Vec<MoveEffect>,
    #[serde(default)]
    pub flags: MoveFlags,
}

impl MoveData {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        move_type: PokemonType,
        category: MoveCategory,
    ) -> Self {
        Self {
            id: MoveId::new(id),
            name: name.into(),
            move_type,
            category,
            power: None,
            accuracy: None,
            pp: default_pp(),
            priority: 0,
            crit_tier: 0,
            target: MoveTarget::Opponent,
            hits: HitCount::Single,
            fixed_damage: None,
            effects: Vec::new(),
            flags: MoveFlags::default(),
        }
    }

    pub fn power(mut self, power: u16) -> Self {
        self.power = Some(power);
        self
    }

    pub fn accuracy(mut self, accuracy: u8) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn pp(mut self, pp: u8) -> Self {
        self.pp = pp;
        self
    }

    pub fn priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    pub fn crit_tier(mut self, tier: u8) -> Self {
        self.crit_tier = tier;
        self
    }

    pub fn target(mut self, target: MoveTarget) -> Self {
        self.target = target;
        self
    }

    pub fn hits(mut self, hits: HitCount) -> Self {
        self.hits = hits;
        self
    }

    pub fn fixed_damage(mut self, fixed: FixedDamage) -> Self {
        self.fixed_damage = Some(fixed);
        self
    }

    pub fn effect(mut self, effect: MoveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn per_hit_accuracy(mut self) -> Self {
        self.flags.per_hit_accuracy = true;
        self
    }

    pub fn effect_on_miss(mut self) -> Self {
        self.flags.effect_on_miss = true;
        self
    }

    pub fn has_effect(&self, predicate: impl Fn(&MoveEffect) -> bool) -> bool {
        self.effects.iter().any(predicate)
    }

    pub fn is_ohko(&self) -> bool {
        self.has_effect(|effect| matches!(effect, MoveEffect::Ohko))
    }

    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status
    }
}
