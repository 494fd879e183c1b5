use crate::{AbilityId, ItemId, NatureId, PokemonType, StatType, StatusType, Terrain, Weather};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Moves of this type have no effect on the holder.
    TypeImmunity(PokemonType),
    StatusImmunity(StatusType),
    /// Moves of this type deal 1.5x while the holder is at or below 1/3 HP.
    PinchBoost(PokemonType),
    /// Speed doubles while this weather is active.
    WeatherSpeed(Weather),
    CriticalImmunity,
    OhkoImmunity,
    /// Starts this weather for five turns when the holder enters the field.
    EntryWeather(Weather),
    EntryTerrain(Terrain),
    /// Changes every opposing active Pokemon's stage on entry.
    EntryStatDrop { stat: StatType, stages: i8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityData {
    pub id: AbilityId,
    pub name: String,
    #[serde(default)]
    pub effects: Vec<AbilityEffect>,
}

impl AbilityData {
    pub fn new(id: impl Into<String>, name: impl Into<String>, effects: Vec<AbilityEffect>) -> Self {
        Self {
            id: AbilityId::new(id),
            name: name.into(),
            effects,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Moves of this type deal `percent` more damage.
    TypeBoost { move_type: PokemonType, percent: u8 },
    /// All damaging moves deal `percent` more damage.
    DamageBoost(u8),
    SpeedBoost(u8),
    /// Restores 1/`divisor` of max HP at end of turn.
    EndOfTurnHeal(u8),
    /// The holder may only use the first move it picks until it leaves the field.
    ChoiceLock,
    /// A hit that would knock the holder out leaves it at 1 HP instead.
    SurviveLethalHit {
        requires_full_hp: bool,
        chance: u8,
        single_use: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub effects: Vec<ItemEffect>,
}

impl ItemData {
    pub fn new(id: impl Into<String>, name: impl Into<String>, effects: Vec<ItemEffect>) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            effects,
        }
    }
}

/// A nature raises one stat by 10% and lowers another by 10%. Neutral natures
/// leave both empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatureData {
    pub id: NatureId,
    pub name: String,
    #[serde(default)]
    pub increased: Option<StatType>,
    #[serde(default)]
    pub decreased: Option<StatType>,
}

impl NatureData {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        increased: Option<StatType>,
        decreased: Option<StatType>,
    ) -> Self {
        Self {
            id: NatureId::new(id),
            name: name.into(),
            increased,
            decreased,
        }
    }

    /// Multiplier in tenths applied to `stat`: 11, 9 or 10.
    pub fn modifier_tenths(&self, stat: StatType) -> u32 {
        if self.increased == self.decreased {
            10
        } else if self.increased == Some(stat) {
            11
        } else if self.decreased == Some(stat) {
            9
        } else {
            10
        }
    }
}
