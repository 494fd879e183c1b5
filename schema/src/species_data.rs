use crate::{AbilityId, MoveId, PokemonType, SpeciesId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn new(hp: u8, attack: u8, defense: u8, sp_attack: u8, sp_defense: u8, speed: u8) -> Self {
        Self {
            hp,
            attack,
            defense,
            sp_attack,
            sp_defense,
            speed,
        }
    }

    /// Stats in the fixed order HP, Atk, Def, SpAtk, SpDef, Spe.
    pub fn as_array(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    #[serde(default)]
    pub abilities: Vec<AbilityId>,
    /// Moves this species may legally know.
    #[serde(default)]
    pub learnset: Vec<MoveId>,
}

impl SpeciesData {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        types: Vec<PokemonType>,
        base_stats: BaseStats,
    ) -> Self {
        Self {
            id: SpeciesId::new(id),
            name: name.into(),
            types,
            base_stats,
            abilities: Vec::new(),
            learnset: Vec::new(),
        }
    }

    pub fn abilities(mut self, abilities: &[&str]) -> Self {
        self.abilities = abilities.iter().map(|&id| AbilityId::from(id)).collect();
        self
    }

    pub fn learnset(mut self, moves: &[&str]) -> Self {
        self.learnset = moves.iter().map(|&id| MoveId::from(id)).collect();
        self
    }
}
