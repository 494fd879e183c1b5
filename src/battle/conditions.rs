use schema::MoveId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Volatile conditions on a participant's active slot. All of them are
/// cleared when the Pokemon leaves the field; none of them interact with the
/// persistent status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum PokemonCondition {
    Flinched,
    Confused {
        turns_remaining: u8,
    },
    /// Drains HP to the Pokemon that planted it while that Pokemon is still
    /// active in the planter's slot.
    Seeded {
        planter_index: usize,
        planter_team_index: usize,
    },
    Trapped {
        turns_remaining: u8,
    },
    Protected,
    /// First turn of a charge move; `ready` flips at end of turn and the
    /// move is forced on the next one.
    Charging {
        move_used: MoveId,
        target_index: usize,
        ready: bool,
    },
    /// Set when a recharge move hits; `armed` flips at the end of that turn,
    /// and the following turn is lost.
    MustRecharge {
        armed: bool,
    },
    /// Critical-hit tier raised by two.
    FocusEnergy,
    /// Held-item lock onto the first move used after entering.
    ChoiceLocked {
        move_used: MoveId,
    },
}

impl PokemonCondition {
    pub fn get_type(&self) -> PokemonConditionType {
        match self {
            PokemonCondition::Flinched => PokemonConditionType::Flinched,
            PokemonCondition::Confused { .. } => PokemonConditionType::Confused,
            PokemonCondition::Seeded { .. } => PokemonConditionType::Seeded,
            PokemonCondition::Trapped { .. } => PokemonConditionType::Trapped,
            PokemonCondition::Protected => PokemonConditionType::Protected,
            PokemonCondition::Charging { .. } => PokemonConditionType::Charging,
            PokemonCondition::MustRecharge { .. } => PokemonConditionType::MustRecharge,
            PokemonCondition::FocusEnergy => PokemonConditionType::FocusEnergy,
            PokemonCondition::ChoiceLocked { .. } => PokemonConditionType::ChoiceLocked,
        }
    }
}

/// Condition type without data payload; the key of the condition map.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PokemonConditionType {
    Flinched,
    Confused,
    Seeded,
    Trapped,
    Protected,
    Charging,
    MustRecharge,
    FocusEnergy,
    ChoiceLocked,
}

impl fmt::Display for PokemonConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PokemonConditionType::Flinched => "flinch",
            PokemonConditionType::Confused => "confusion",
            PokemonConditionType::Seeded => "Leech Seed",
            PokemonConditionType::Trapped => "trap",
            PokemonConditionType::Protected => "protection",
            PokemonConditionType::Charging => "charge",
            PokemonConditionType::MustRecharge => "recharge",
            PokemonConditionType::FocusEnergy => "focus",
            PokemonConditionType::ChoiceLocked => "choice lock",
        };
        write!(f, "{}", name)
    }
}
