//! Immutable rule tables: species, moves, abilities, items, natures and the
//! type chart. Loaded once, validated, then passed by reference into every
//! resolution call.

mod standard;

use crate::errors::{RuleDataError, RuleDataResult};
use schema::{
    AbilityData, AbilityEffect, AbilityId, HitCount, ItemData, ItemEffect, ItemId, MoveData,
    MoveEffect, MoveId, NatureData, NatureId, SpeciesData, SpeciesId, TypeChart,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

pub use standard::standard_rules;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleData {
    #[serde(default)]
    pub species: HashMap<SpeciesId, SpeciesData>,
    #[serde(default)]
    pub moves: HashMap<MoveId, MoveData>,
    #[serde(default)]
    pub abilities: HashMap<AbilityId, AbilityData>,
    #[serde(default)]
    pub items: HashMap<ItemId, ItemData>,
    #[serde(default)]
    pub natures: HashMap<NatureId, NatureData>,
    #[serde(default = "TypeChart::standard")]
    pub type_chart: TypeChart,
}

impl Default for RuleData {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleData {
    /// Empty tables with the standard type chart.
    pub fn new() -> Self {
        Self {
            species: HashMap::new(),
            moves: HashMap::new(),
            abilities: HashMap::new(),
            items: HashMap::new(),
            natures: HashMap::new(),
            type_chart: TypeChart::standard(),
        }
    }

    /// The built-in rule set.
    pub fn standard() -> Self {
        standard_rules()
    }

    pub fn with_species(mut self, species: SpeciesData) -> Self {
        self.species.insert(species.id.clone(), species);
        self
    }

    pub fn with_move(mut self, move_data: MoveData) -> Self {
        self.moves.insert(move_data.id.clone(), move_data);
        self
    }

    pub fn with_ability(mut self, ability: AbilityData) -> Self {
        self.abilities.insert(ability.id.clone(), ability);
        self
    }

    pub fn with_item(mut self, item: ItemData) -> Self {
        self.items.insert(item.id.clone(), item);
        self
    }

    pub fn with_nature(mut self, nature: NatureData) -> Self {
        self.natures.insert(nature.id.clone(), nature);
        self
    }

    pub fn with_type_chart(mut self, type_chart: TypeChart) -> Self {
        self.type_chart = type_chart;
        self
    }

    /// Parse and validate a RON document.
    pub fn from_ron_str(source: &str) -> RuleDataResult<Self> {
        let rules: RuleData =
            ron::from_str(source).map_err(|err| RuleDataError::Parse(err.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(source: &str) -> RuleDataResult<Self> {
        let rules: RuleData =
            serde_json::from_str(source).map_err(|err| RuleDataError::Parse(err.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load from a `.ron` or `.json` file, or from a directory whose `.ron`
    /// and `.json` files are merged in file-name order.
    pub fn load_from_path(path: &Path) -> RuleDataResult<Self> {
        let rules = if path.is_dir() {
            Self::load_dir(path)?
        } else {
            Self::parse_file(path)?
        };
        rules.validate()?;
        debug!(
            path = %path.display(),
            species = rules.species.len(),
            moves = rules.moves.len(),
            "loaded rule data"
        );
        Ok(rules)
    }

    fn load_dir(path: &Path) -> RuleDataResult<Self> {
        let io_error = |err: std::io::Error| RuleDataError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(path).map_err(io_error)? {
            let entry_path = entry.map_err(io_error)?.path();
            if matches!(
                entry_path.extension().and_then(|ext| ext.to_str()),
                Some("ron") | Some("json")
            ) {
                files.push(entry_path);
            }
        }
        files.sort();

        let mut merged = Self::new();
        for file in files {
            merged.merge(Self::parse_file(&file)?);
        }
        Ok(merged)
    }

    fn parse_file(path: &Path) -> RuleDataResult<Self> {
        let content = fs::read_to_string(path).map_err(|err| RuleDataError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let parse_error = |reason: String| RuleDataError::Parse(format!("{}: {}", path.display(), reason));

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => ron::from_str(&content).map_err(|err| parse_error(err.to_string())),
            Some("json") => {
                serde_json::from_str(&content).map_err(|err| parse_error(err.to_string()))
            }
            _ => Err(parse_error("expected a .ron or .json file".to_string())),
        }
    }

    /// Later tables win on conflicting keys; the type chart is replaced wholesale.
    pub fn merge(&mut self, other: RuleData) {
        self.species.extend(other.species);
        self.moves.extend(other.moves);
        self.abilities.extend(other.abilities);
        self.items.extend(other.items);
        self.natures.extend(other.natures);
        self.type_chart = other.type_chart;
    }

    pub fn move_data(&self, id: &MoveId) -> RuleDataResult<&MoveData> {
        self.moves
            .get(id)
            .ok_or_else(|| RuleDataError::MoveNotFound(id.clone()))
    }

    pub fn species_data(&self, id: &SpeciesId) -> RuleDataResult<&SpeciesData> {
        self.species
            .get(id)
            .ok_or_else(|| RuleDataError::SpeciesNotFound(id.clone()))
    }

    pub fn ability(&self, id: &AbilityId) -> RuleDataResult<&AbilityData> {
        self.abilities
            .get(id)
            .ok_or_else(|| RuleDataError::AbilityNotFound(id.clone()))
    }

    pub fn item(&self, id: &ItemId) -> RuleDataResult<&ItemData> {
        self.items
            .get(id)
            .ok_or_else(|| RuleDataError::ItemNotFound(id.clone()))
    }

    pub fn nature(&self, id: &NatureId) -> RuleDataResult<&NatureData> {
        self.natures
            .get(id)
            .ok_or_else(|| RuleDataError::NatureNotFound(id.clone()))
    }

    /// Effects of an optional ability. Unknown ids yield nothing; references
    /// are checked when the creature is built.
    pub fn ability_effects(&self, id: Option<&AbilityId>) -> &[AbilityEffect] {
        id.and_then(|id| self.abilities.get(id))
            .map(|ability| ability.effects.as_slice())
            .unwrap_or(&[])
    }

    pub fn item_effects(&self, id: Option<&ItemId>) -> &[ItemEffect] {
        id.and_then(|id| self.items.get(id))
            .map(|item| item.effects.as_slice())
            .unwrap_or(&[])
    }

    /// Check every cross-reference and numeric range in the tables.
    pub fn validate(&self) -> RuleDataResult<()> {
        for (key, species) in &self.species {
            if &species.id != key {
                return Err(RuleDataError::MalformedData(format!(
                    "species keyed as '{}' declares id '{}'",
                    key, species.id
                )));
            }
            if species.types.is_empty() || species.types.len() > 2 {
                return Err(RuleDataError::MalformedData(format!(
                    "species '{}' must have one or two types",
                    key
                )));
            }
            for move_id in &species.learnset {
                self.move_data(move_id)?;
            }
            for ability_id in &species.abilities {
                self.ability(ability_id)?;
            }
        }

        for (key, move_data) in &self.moves {
            if &move_data.id != key {
                return Err(RuleDataError::MalformedData(format!(
                    "move keyed as '{}' declares id '{}'",
                    key, move_data.id
                )));
            }
            validate_move(move_data)?;
        }

        for ability in self.abilities.values() {
            for effect in &ability.effects {
                if let AbilityEffect::EntryStatDrop { stages, .. } = effect {
                    if *stages == 0 || stages.abs() > 6 {
                        return Err(RuleDataError::MalformedData(format!(
                            "ability '{}': entry stat change must be in -6..=6 and non-zero",
                            ability.id
                        )));
                    }
                }
            }
        }

        for item in self.items.values() {
            for effect in &item.effects {
                let malformed = match effect {
                    ItemEffect::SurviveLethalHit { chance, .. } => *chance == 0 || *chance > 100,
                    ItemEffect::EndOfTurnHeal(divisor) => *divisor == 0,
                    _ => false,
                };
                if malformed {
                    return Err(RuleDataError::MalformedData(format!(
                        "item '{}': effect {:?} out of range",
                        item.id, effect
                    )));
                }
            }
        }

        for (key, nature) in &self.natures {
            if &nature.id != key {
                return Err(RuleDataError::MalformedData(format!(
                    "nature keyed as '{}' declares id '{}'",
                    key, nature.id
                )));
            }
        }

        for (attacking, defending, multiplier) in self.type_chart.entries() {
            if !multiplier.is_finite() || multiplier < 0.0 {
                return Err(RuleDataError::MalformedData(format!(
                    "type chart entry {} vs {} is {}",
                    attacking, defending, multiplier
                )));
            }
        }

        Ok(())
    }
}

fn validate_move(move_data: &MoveData) -> RuleDataResult<()> {
    let malformed = |reason: &str| {
        Err(RuleDataError::MalformedData(format!(
            "move '{}': {}",
            move_data.id, reason
        )))
    };

    if let Some(accuracy) = move_data.accuracy {
        if accuracy == 0 || accuracy > 100 {
            return malformed("accuracy must be in 1..=100");
        }
    }
    if move_data.crit_tier > 3 {
        return malformed("critical-hit tier must be in 0..=3");
    }
    if move_data.is_damaging() && move_data.power.is_none() && move_data.fixed_damage.is_none() && !move_data.is_ohko() {
        return malformed("damaging move needs power, fixed damage or OHKO");
    }
    match move_data.hits {
        HitCount::Fixed(0) => return malformed("hit count must be at least 1"),
        HitCount::Range { min, max } if min == 0 || min > max => {
            return malformed("hit range must satisfy 1 <= min <= max")
        }
        _ => {}
    }
    for effect in &move_data.effects {
        if effect.chance().is_some_and(|chance| chance > 100) {
            return malformed("effect chance above 100");
        }
        match effect {
            MoveEffect::StatChange { stages, .. } if *stages == 0 || stages.abs() > 6 => {
                return malformed("stat change stages must be in -6..=6 and non-zero")
            }
            MoveEffect::Drain(pct)
            | MoveEffect::Recoil(pct)
            | MoveEffect::RecoilMaxHp(pct)
            | MoveEffect::CrashOnMiss(pct)
            | MoveEffect::Heal(pct)
                if *pct == 0 || *pct > 100 =>
            {
                return malformed("percentage must be in 1..=100")
            }
            _ => {}
        }
    }
    Ok(())
}
