use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TeamCondition {
    Reflect,
    LightScreen,
    Mist,
}

impl fmt::Display for TeamCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            TeamCondition::Reflect => "Reflect",
            TeamCondition::LightScreen => "Light Screen",
            TeamCondition::Mist => "Mist",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weather {
    Rain,
    Sun,
    Sandstorm,
    Hail,
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Weather::Rain => "rain",
            Weather::Sun => "harsh sunlight",
            Weather::Sandstorm => "sandstorm",
            Weather::Hail => "hail",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} Terrain", self)
    }
}

/// Entry hazards laid on one side of the field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hazard {
    Spikes,
    ToxicSpikes,
    StealthRock,
    StickyWeb,
}

impl Hazard {
    pub fn max_layers(self) -> u8 {
        match self {
            Hazard::Spikes => 3,
            Hazard::ToxicSpikes => 2,
            Hazard::StealthRock | Hazard::StickyWeb => 1,
        }
    }
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            Hazard::Spikes => "Spikes",
            Hazard::ToxicSpikes => "Toxic Spikes",
            Hazard::StealthRock => "Stealth Rock",
            Hazard::StickyWeb => "Sticky Web",
        };
        write!(f, "{}", display_name)
    }
}
