use crate::errors::{RuleDataError, RuleDataResult};
use crate::rule_data::RuleData;
use schema::{
    AbilityId, BaseStats, ItemId, MoveId, NatureData, NatureId, PokemonType, SpeciesId,
    StatType, StatusType,
};
use serde::{Deserialize, Serialize};

/// Persistent status. Survives switching; at most one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCondition {
    Sleep { turns_remaining: u8 },
    Poison,
    BadlyPoisoned { counter: u8 },
    Burn,
    Freeze,
    Paralysis,
}

impl StatusCondition {
    pub fn status_type(&self) -> StatusType {
        match self {
            StatusCondition::Sleep { .. } => StatusType::Sleep,
            StatusCondition::Poison => StatusType::Poison,
            StatusCondition::BadlyPoisoned { .. } => StatusType::BadlyPoisoned,
            StatusCondition::Burn => StatusType::Burn,
            StatusCondition::Freeze => StatusType::Freeze,
            StatusCondition::Paralysis => StatusType::Paralysis,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub move_id: MoveId,
    pub pp: u8,
    pub max_pp: u8,
}

impl MoveInstance {
    pub fn new(move_id: MoveId, max_pp: u8) -> Self {
        Self {
            move_id,
            pp: max_pp,
            max_pp,
        }
    }

    /// Use the move (decrease PP)
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub name: String,
    pub species: SpeciesId,
    pub level: u8,
    pub types: Vec<PokemonType>,
    pub ability: Option<AbilityId>,
    pub held_item: Option<ItemId>,
    pub nature: Option<NatureId>,
    pub ivs: [u8; 6],                    // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub evs: [u8; 6],                    // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub curr_stats: [u16; 6],            // curr_stats[0] is max HP
    current_hp: u16,
    pub moves: Vec<MoveInstance>,
    pub status: Option<StatusCondition>,
}

pub const MAX_MOVES: usize = 4;
const DEFAULT_IV: u8 = 31;

impl PokemonInst {
    /// Build a creature from rule data with max IVs, no EVs, a neutral nature
    /// and the species' first ability. Every move must exist in the tables.
    pub fn new(
        rules: &RuleData,
        species_id: &SpeciesId,
        level: u8,
        moves: &[MoveId],
    ) -> RuleDataResult<Self> {
        let species = rules.species_data(species_id)?;
        if level == 0 || level > 100 {
            return Err(RuleDataError::MalformedData(format!(
                "level {} is outside 1..=100",
                level
            )));
        }
        if moves.is_empty() || moves.len() > MAX_MOVES {
            return Err(RuleDataError::MalformedData(format!(
                "{} needs between 1 and {} moves",
                species.name, MAX_MOVES
            )));
        }

        let move_instances = moves
            .iter()
            .map(|move_id| {
                let move_data = rules.move_data(move_id)?;
                Ok(MoveInstance::new(move_id.clone(), move_data.pp))
            })
            .collect::<RuleDataResult<Vec<_>>>()?;

        let ivs = [DEFAULT_IV; 6];
        let evs = [0; 6];
        let curr_stats = calculate_stats(&species.base_stats, level, &ivs, &evs, None);

        Ok(Self {
            name: species.name.clone(),
            species: species.id.clone(),
            level,
            types: species.types.clone(),
            ability: species.abilities.first().cloned(),
            held_item: None,
            nature: None,
            ivs,
            evs,
            curr_stats,
            current_hp: curr_stats[0],
            moves: move_instances,
            status: None,
        })
    }

    /// Bare creature with an explicit stat line, for scenarios that need exact numbers.
    pub fn new_for_test(
        name: &str,
        level: u8,
        types: Vec<PokemonType>,
        stats: [u16; 6],
        moves: Vec<MoveInstance>,
    ) -> Self {
        Self {
            name: name.to_string(),
            species: SpeciesId::new(name.to_lowercase()),
            level,
            types,
            ability: None,
            held_item: None,
            nature: None,
            ivs: [0; 6],
            evs: [0; 6],
            curr_stats: stats,
            current_hp: stats[0],
            moves,
            status: None,
        }
    }

    pub fn with_ability(mut self, rules: &RuleData, ability: AbilityId) -> RuleDataResult<Self> {
        rules.ability(&ability)?;
        self.ability = Some(ability);
        Ok(self)
    }

    pub fn with_item(mut self, rules: &RuleData, item: ItemId) -> RuleDataResult<Self> {
        rules.item(&item)?;
        self.held_item = Some(item);
        Ok(self)
    }

    /// Apply IVs, EVs and nature, then recompute the stat line at full HP.
    pub fn with_training(
        mut self,
        rules: &RuleData,
        ivs: [u8; 6],
        evs: [u8; 6],
        nature: Option<NatureId>,
    ) -> RuleDataResult<Self> {
        let species = rules.species_data(&self.species)?;
        let nature_data = nature.as_ref().map(|id| rules.nature(id)).transpose()?;
        self.ivs = ivs.map(|iv| iv.min(31));
        self.evs = evs;
        self.curr_stats =
            calculate_stats(&species.base_stats, self.level, &self.ivs, &self.evs, nature_data);
        self.current_hp = self.curr_stats[0];
        self.nature = nature;
        Ok(self)
    }

    pub fn max_hp(&self) -> u16 {
        self.curr_stats[0]
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    /// Remove up to `amount` HP. Returns true if this damage made the Pokemon faint.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        let was_fainted = self.is_fainted();
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.current_hp == 0 {
            self.status = None;
        }
        !was_fainted && self.is_fainted()
    }

    /// Restore up to `amount` HP, never past max. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        if self.is_fainted() {
            return 0;
        }
        let restored = amount.min(self.max_hp() - self.current_hp);
        self.current_hp += restored;
        restored
    }

    /// Setup-time HP override. Values above max are rejected rather than clamped.
    pub fn set_hp(&mut self, hp: u16) -> RuleDataResult<()> {
        if hp > self.max_hp() {
            return Err(RuleDataError::MalformedData(format!(
                "{} cannot have {} HP (max {})",
                self.name,
                hp,
                self.max_hp()
            )));
        }
        self.current_hp = hp;
        Ok(())
    }

    /// Battle stat for a stage-able stat; accuracy and evasion have no base value.
    pub fn stat(&self, stat: StatType) -> u16 {
        match stat {
            StatType::Atk => self.curr_stats[1],
            StatType::Def => self.curr_stats[2],
            StatType::SpAtk => self.curr_stats[3],
            StatType::SpDef => self.curr_stats[4],
            StatType::Spe => self.curr_stats[5],
            StatType::Acc | StatType::Eva => 100,
        }
    }

    pub fn move_slot(&self, move_id: &MoveId) -> Option<usize> {
        self.moves.iter().position(|slot| &slot.move_id == move_id)
    }
}

const STAT_ORDER: [StatType; 5] = [
    StatType::Atk,
    StatType::Def,
    StatType::SpAtk,
    StatType::SpDef,
    StatType::Spe,
];

/// Standard stat formula:
/// HP = (2×Base + IV + EV/4) × Level / 100 + Level + 10
/// Other = ((2×Base + IV + EV/4) × Level / 100 + 5) × nature
pub fn calculate_stats(
    base_stats: &BaseStats,
    level: u8,
    ivs: &[u8; 6],
    evs: &[u8; 6],
    nature: Option<&NatureData>,
) -> [u16; 6] {
    let base = base_stats.as_array();
    let level = level as u32;
    let mut stats = [0u16; 6];

    for i in 0..6 {
        let base_calculation = 2 * base[i] as u32 + ivs[i] as u32 + evs[i] as u32 / 4;
        let stat = if i == 0 {
            base_calculation * level / 100 + level + 10
        } else {
            let raw = base_calculation * level / 100 + 5;
            match nature {
                Some(nature) => raw * nature.modifier_tenths(STAT_ORDER[i - 1]) / 10,
                None => raw,
            }
        };
        stats[i] = stat.min(u16::MAX as u32) as u16;
    }

    stats
}
