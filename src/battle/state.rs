use crate::battle::conditions::PokemonConditionType;
use crate::battle::field::FieldState;
use crate::errors::{BattleResult, BattleStateError};
use crate::player::{BattlePlayer, PendingSwitch};
use crate::pokemon::{PokemonInst, StatusCondition};
use ordered_float::OrderedFloat;
use schema::{AbilityId, Hazard, ItemId, MoveId, SpeciesId, StatType, StatusType, TeamCondition, Terrain, Weather};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    WaitingForActions,
    TurnInProgress,
    /// One or more participants owe a switch (after a faint or a self-switch move).
    WaitingForReplacements,
    SideWon(usize),
    Draw,
}

/// Type-effectiveness tag attached to every damaging hit.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effectiveness {
    NoEffect,
    NotVeryEffective,
    Normal,
    SuperEffective,
}

impl Effectiveness {
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier == 0.0 {
            Effectiveness::NoEffect
        } else if multiplier < 1.0 {
            Effectiveness::NotVeryEffective
        } else if multiplier > 1.0 {
            Effectiveness::SuperEffective
        } else {
            Effectiveness::Normal
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    IsParalyzed,
    IsFlinching,
    /// Hurt itself in confusion.
    IsConfused,
    MustRecharge,
    PokemonFainted,
    NoTarget,
}

/// Why an effect was a no-op. Blocked effects are events, never errors.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    TypeImmunity,
    AbilityImmunity,
    AlreadyHasStatus,
    SameStatus,
    AlreadyAffected,
    StatAtMaximum,
    StatAtMinimum,
    Mist,
    Protected,
    FullHp,
    AlreadyActive,
    MaxLayers,
    LevelTooLow,
    NoReplacement,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Recoil,
    Crash,
    SelfDestruct,
    Weather(Weather),
    Hazard(Hazard),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    WeatherStarted { weather: Weather, turns: u8 },
    WeatherEnded { weather: Weather },
    TerrainStarted { terrain: Terrain, turns: u8 },
    TerrainEnded { terrain: Terrain },
    HazardSet { side: usize, hazard: Hazard, layers: u8 },
    HazardAbsorbed { side: usize, hazard: Hazard },
    TeamConditionStarted { side: usize, condition: TeamCondition, turns: u8 },
    TeamConditionEnded { side: usize, condition: TeamCondition },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded {
        turn_number: u32,
    },

    // Switching
    PokemonSwitched {
        player_index: usize,
        old_pokemon: SpeciesId,
        new_pokemon: SpeciesId,
    },
    SwitchRequired {
        player_index: usize,
        reason: PendingSwitch,
    },

    // Moves
    MoveUsed {
        player_index: usize,
        pokemon: SpeciesId,
        move_used: MoveId,
    },
    ActionFailed {
        player_index: usize,
        reason: ActionFailureReason,
    },
    ChargingStarted {
        player_index: usize,
        pokemon: SpeciesId,
        move_used: MoveId,
    },
    MoveMissed {
        attacker_index: usize,
        defender_index: usize,
        move_used: MoveId,
    },
    MoveFailed {
        player_index: usize,
        move_used: MoveId,
        reason: BlockReason,
    },
    NoEffect {
        attacker_index: usize,
        defender_index: usize,
        move_used: MoveId,
    },
    MoveHit {
        attacker_index: usize,
        defender_index: usize,
        move_used: MoveId,
        damage: u16,
        remaining_hp: u16,
        multiplier: OrderedFloat<f64>,
        effectiveness: Effectiveness,
        critical: bool,
        hit_number: u8,
    },
    OneHitKnockOut {
        attacker_index: usize,
        defender_index: usize,
        move_used: MoveId,
    },
    MultiHitCompleted {
        attacker_index: usize,
        hits: u8,
    },

    // Persistent status
    StatusApplied {
        player_index: usize,
        pokemon: SpeciesId,
        status: StatusCondition,
    },
    StatusBlocked {
        player_index: usize,
        pokemon: SpeciesId,
        status: StatusType,
        reason: BlockReason,
    },
    StatusRemoved {
        player_index: usize,
        pokemon: SpeciesId,
        status: StatusCondition,
    },
    StatusDamage {
        player_index: usize,
        pokemon: SpeciesId,
        status: StatusCondition,
        damage: u16,
        remaining_hp: u16,
    },

    // Volatile conditions
    ConditionApplied {
        player_index: usize,
        pokemon: SpeciesId,
        condition: PokemonConditionType,
    },
    ConditionBlocked {
        player_index: usize,
        pokemon: SpeciesId,
        condition: PokemonConditionType,
        reason: BlockReason,
    },
    ConditionExpired {
        player_index: usize,
        pokemon: SpeciesId,
        condition: PokemonConditionType,
    },
    ConditionDamage {
        player_index: usize,
        pokemon: SpeciesId,
        condition: PokemonConditionType,
        damage: u16,
        remaining_hp: u16,
    },
    ConfusionSelfHit {
        player_index: usize,
        pokemon: SpeciesId,
        damage: u16,
        remaining_hp: u16,
    },

    // Stat stages
    StatStageChanged {
        player_index: usize,
        pokemon: SpeciesId,
        stat: StatType,
        delta: i8,
        new_stage: i8,
        clamped: bool,
    },
    StatChangeBlocked {
        player_index: usize,
        pokemon: SpeciesId,
        stat: StatType,
        reason: BlockReason,
    },
    StatStagesReset {
        player_index: usize,
        pokemon: SpeciesId,
    },

    // HP
    PokemonDamaged {
        player_index: usize,
        pokemon: SpeciesId,
        damage: u16,
        remaining_hp: u16,
        source: DamageSource,
    },
    PokemonHealed {
        player_index: usize,
        pokemon: SpeciesId,
        amount: u16,
        new_hp: u16,
    },
    PokemonFainted {
        player_index: usize,
        pokemon: SpeciesId,
    },

    // Abilities and held items
    AbilityActivated {
        player_index: usize,
        pokemon: SpeciesId,
        ability: AbilityId,
    },
    /// A held item kept the Pokemon in the fight; `consumed` items are gone afterwards.
    ItemActivated {
        player_index: usize,
        pokemon: SpeciesId,
        item: ItemId,
        consumed: bool,
    },

    // Field
    FieldChanged {
        change: FieldChange,
    },

    // Diagnostics
    InvariantViolated {
        detail: String,
    },

    // Battle End
    SideDefeated {
        side: usize,
    },
    BattleEnded {
        winning_side: Option<usize>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let name = |player_index: usize, species: &SpeciesId| {
            Self::format_pokemon_name(battle_state, player_index, species)
        };
        let active_name = |player_index: usize| {
            battle_state
                .players
                .get(player_index)
                .and_then(|player| player.active_pokemon())
                .map(|pokemon| pokemon.name.clone())
                .unwrap_or_else(|| "???".to_string())
        };
        let player_name = |player_index: usize| {
            battle_state
                .players
                .get(player_index)
                .map(|player| player.player_name.clone())
                .unwrap_or_else(|| format!("Player {}", player_index + 1))
        };

        match self {
            BattleEvent::TurnStarted { turn_number } => Some(format!("=== Turn {} ===", turn_number)),
            BattleEvent::TurnEnded { .. } => None,

            BattleEvent::PokemonSwitched {
                player_index,
                old_pokemon,
                new_pokemon,
            } => Some(format!(
                "{} recalled {} and sent out {}!",
                player_name(*player_index),
                name(*player_index, old_pokemon),
                name(*player_index, new_pokemon)
            )),
            BattleEvent::SwitchRequired { .. } => None,

            BattleEvent::MoveUsed {
                player_index,
                pokemon,
                move_used,
            } => Some(format!(
                "{}'s {} used {}!",
                player_name(*player_index),
                name(*player_index, pokemon),
                Self::format_move_name(move_used)
            )),
            BattleEvent::ActionFailed {
                player_index,
                reason,
            } => Some(Self::format_action_failure_reason(&active_name(*player_index), reason)),
            BattleEvent::ChargingStarted { player_index, pokemon, .. } => {
                Some(format!("{} is gathering power!", name(*player_index, pokemon)))
            }
            BattleEvent::MoveMissed { attacker_index, .. } => {
                Some(format!("{}'s attack missed!", active_name(*attacker_index)))
            }
            BattleEvent::MoveFailed { reason, .. } => Some(match reason {
                BlockReason::Protected => "It protected itself!".to_string(),
                BlockReason::FullHp => "But its HP is already full!".to_string(),
                BlockReason::NoReplacement => "But there is no one to switch to!".to_string(),
                _ => "But it failed!".to_string(),
            }),
            BattleEvent::NoEffect { defender_index, .. } => Some(format!(
                "It doesn't affect {}...",
                active_name(*defender_index)
            )),
            BattleEvent::MoveHit {
                effectiveness,
                critical,
                ..
            } => {
                let mut parts = Vec::new();
                if *critical {
                    parts.push("A critical hit!");
                }
                match effectiveness {
                    Effectiveness::SuperEffective => parts.push("It's super effective!"),
                    Effectiveness::NotVeryEffective => parts.push("It's not very effective..."),
                    _ => {}
                }
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                }
            }
            BattleEvent::OneHitKnockOut { .. } => Some("It's a one-hit KO!".to_string()),
            BattleEvent::MultiHitCompleted { hits, .. } => Some(format!("Hit {} time(s)!", hits)),

            BattleEvent::StatusApplied {
                player_index,
                pokemon,
                status,
            } => Some(format!(
                "{} {}",
                name(*player_index, pokemon),
                Self::format_status_applied(status)
            )),
            BattleEvent::StatusBlocked {
                player_index,
                pokemon,
                ..
            } => Some(format!("It doesn't affect {}...", name(*player_index, pokemon))),
            BattleEvent::StatusRemoved {
                player_index,
                pokemon,
                status,
            } => Some(format!(
                "{} {}",
                name(*player_index, pokemon),
                Self::format_status_removed(status)
            )),
            BattleEvent::StatusDamage {
                player_index,
                pokemon,
                status,
                damage,
                ..
            } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                name(*player_index, pokemon),
                status.status_type(),
                damage
            )),

            BattleEvent::ConditionApplied {
                player_index,
                pokemon,
                condition,
            } => Self::format_condition_applied(&name(*player_index, pokemon), condition),
            BattleEvent::ConditionBlocked {
                player_index,
                pokemon,
                ..
            } => Some(format!("It doesn't affect {}...", name(*player_index, pokemon))),
            BattleEvent::ConditionExpired {
                player_index,
                pokemon,
                condition,
            } => match condition {
                PokemonConditionType::Flinched
                | PokemonConditionType::Protected
                | PokemonConditionType::Charging
                | PokemonConditionType::MustRecharge => None,
                PokemonConditionType::Confused => Some(format!(
                    "{} snapped out of its confusion!",
                    name(*player_index, pokemon)
                )),
                _ => Some(format!(
                    "{}'s {} wore off.",
                    name(*player_index, pokemon),
                    condition
                )),
            },
            BattleEvent::ConditionDamage {
                player_index,
                pokemon,
                condition,
                damage,
                ..
            } => Some(format!(
                "{} is hurt by {}! ({} damage)",
                name(*player_index, pokemon),
                condition,
                damage
            )),
            BattleEvent::ConfusionSelfHit {
                player_index,
                pokemon,
                damage,
                ..
            } => Some(format!(
                "{} hurt itself in its confusion! ({} damage)",
                name(*player_index, pokemon),
                damage
            )),

            BattleEvent::StatStageChanged {
                player_index,
                pokemon,
                stat,
                delta,
                ..
            } => {
                let degree = match delta.abs() {
                    1 => "",
                    2 => " sharply",
                    _ => " drastically",
                };
                let direction = if *delta > 0 { "rose" } else { "fell" };
                Some(format!(
                    "{}'s {}{} {}!",
                    name(*player_index, pokemon),
                    stat,
                    degree,
                    direction
                ))
            }
            BattleEvent::StatChangeBlocked {
                player_index,
                pokemon,
                stat,
                reason,
            } => Some(match reason {
                BlockReason::Mist => format!("{} is protected by the mist!", name(*player_index, pokemon)),
                BlockReason::StatAtMinimum => format!(
                    "{}'s {} won't go any lower!",
                    name(*player_index, pokemon),
                    stat
                ),
                _ => format!(
                    "{}'s {} won't go any higher!",
                    name(*player_index, pokemon),
                    stat
                ),
            }),
            BattleEvent::StatStagesReset { .. } => Some("All stat changes were eliminated!".to_string()),

            BattleEvent::PokemonDamaged {
                player_index,
                pokemon,
                damage,
                source,
                ..
            } => {
                let pokemon_name = name(*player_index, pokemon);
                Some(match source {
                    DamageSource::Recoil => format!("{} is damaged by recoil! ({} damage)", pokemon_name, damage),
                    DamageSource::Crash => format!("{} kept going and crashed! ({} damage)", pokemon_name, damage),
                    DamageSource::SelfDestruct => format!("{} exploded!", pokemon_name),
                    DamageSource::Weather(weather) => {
                        format!("{} is buffeted by the {}! ({} damage)", pokemon_name, weather, damage)
                    }
                    DamageSource::Hazard(hazard) => {
                        format!("{} is hurt by {}! ({} damage)", pokemon_name, hazard, damage)
                    }
                })
            }
            BattleEvent::PokemonHealed {
                player_index,
                pokemon,
                amount,
                ..
            } => Some(format!("{} recovered {} HP!", name(*player_index, pokemon), amount)),
            BattleEvent::PokemonFainted {
                player_index,
                pokemon,
            } => Some(format!("{} fainted!", name(*player_index, pokemon))),

            BattleEvent::AbilityActivated {
                player_index,
                pokemon,
                ability,
            } => Some(format!("[{}'s {}]", name(*player_index, pokemon), ability)),
            BattleEvent::ItemActivated {
                player_index,
                pokemon,
                item,
                ..
            } => Some(format!("{} hung on using its {}!", name(*player_index, pokemon), item)),

            BattleEvent::FieldChanged { change } => Some(Self::format_field_change(change)),

            BattleEvent::InvariantViolated { .. } => None,

            BattleEvent::SideDefeated { side } => Some(format!("Side {} is out of usable Pokémon!", side + 1)),
            BattleEvent::BattleEnded { winning_side } => match winning_side {
                Some(side) => {
                    let names: Vec<String> = battle_state
                        .players
                        .iter()
                        .filter(|player| player.side == *side)
                        .map(|player| player.player_name.clone())
                        .collect();
                    Some(format!("{} won the battle!", names.join(" & ")))
                }
                None => Some("The battle ended in a draw!".to_string()),
            },
        }
    }

    // --- Private Helper Functions ---

    fn format_pokemon_name(battle_state: &BattleState, player_index: usize, species: &SpeciesId) -> String {
        battle_state
            .players
            .get(player_index)
            .and_then(|player| player.team.iter().find(|pokemon| &pokemon.species == species))
            .map(|pokemon| pokemon.name.clone())
            .unwrap_or_else(|| species.to_string())
    }

    /// "thunder-wave" → "Thunder Wave"
    fn format_move_name(move_used: &MoveId) -> String {
        move_used
            .as_str()
            .split('-')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    fn format_status_applied(status: &StatusCondition) -> &'static str {
        match status {
            StatusCondition::Sleep { .. } => "fell asleep!",
            StatusCondition::Poison => "was poisoned!",
            StatusCondition::BadlyPoisoned { .. } => "was badly poisoned!",
            StatusCondition::Burn => "was burned!",
            StatusCondition::Freeze => "was frozen solid!",
            StatusCondition::Paralysis => "is paralyzed! It may be unable to move!",
        }
    }

    fn format_status_removed(status: &StatusCondition) -> &'static str {
        match status {
            StatusCondition::Sleep { .. } => "woke up!",
            StatusCondition::Freeze => "thawed out!",
            StatusCondition::Poison | StatusCondition::BadlyPoisoned { .. } => "was cured of its poisoning!",
            StatusCondition::Burn => "was cured of its burn!",
            StatusCondition::Paralysis => "was cured of paralysis!",
        }
    }

    /// Flinch and recharge only matter once they stop an action.
    fn format_condition_applied(pokemon_name: &str, condition: &PokemonConditionType) -> Option<String> {
        match condition {
            PokemonConditionType::Flinched
            | PokemonConditionType::MustRecharge
            | PokemonConditionType::ChoiceLocked => None,
            PokemonConditionType::Confused => Some(format!("{} became confused!", pokemon_name)),
            PokemonConditionType::Seeded => Some(format!("{} was seeded!", pokemon_name)),
            PokemonConditionType::Trapped => Some(format!("{} was trapped!", pokemon_name)),
            PokemonConditionType::Protected => Some(format!("{} protected itself!", pokemon_name)),
            PokemonConditionType::Charging => Some(format!("{} is charging up!", pokemon_name)),
            PokemonConditionType::FocusEnergy => Some(format!("{} is getting pumped!", pokemon_name)),
        }
    }

    fn format_action_failure_reason(pokemon_name: &str, reason: &ActionFailureReason) -> String {
        match reason {
            ActionFailureReason::IsAsleep => format!("{} is fast asleep.", pokemon_name),
            ActionFailureReason::IsFrozen => format!("{} is frozen solid!", pokemon_name),
            ActionFailureReason::IsParalyzed => format!("{} is paralyzed! It can't move!", pokemon_name),
            ActionFailureReason::IsFlinching => format!("{} flinched and couldn't move!", pokemon_name),
            ActionFailureReason::IsConfused => format!("{} is confused!", pokemon_name),
            ActionFailureReason::MustRecharge => format!("{} must recharge!", pokemon_name),
            ActionFailureReason::PokemonFainted => format!("{} can't battle!", pokemon_name),
            ActionFailureReason::NoTarget => "But there was no target...".to_string(),
        }
    }

    fn format_field_change(change: &FieldChange) -> String {
        match change {
            FieldChange::WeatherStarted { weather, .. } => match weather {
                Weather::Rain => "It started to rain!".to_string(),
                Weather::Sun => "The sunlight turned harsh!".to_string(),
                Weather::Sandstorm => "A sandstorm kicked up!".to_string(),
                Weather::Hail => "It started to hail!".to_string(),
            },
            FieldChange::WeatherEnded { weather } => format!("The {} subsided.", weather),
            FieldChange::TerrainStarted { terrain, .. } => format!("{} covered the battlefield!", terrain),
            FieldChange::TerrainEnded { terrain } => format!("The {} faded.", terrain),
            FieldChange::HazardSet { side, hazard, .. } => {
                format!("{} surrounds side {}!", hazard, side + 1)
            }
            FieldChange::HazardAbsorbed { side, hazard } => {
                format!("The {} disappeared from side {}!", hazard, side + 1)
            }
            FieldChange::TeamConditionStarted { side, condition, .. } => {
                format!("{} protects side {}!", condition, side + 1)
            }
            FieldChange::TeamConditionEnded { side, condition } => {
                format!("Side {}'s {} wore off.", side + 1, condition)
            }
        }
    }
}

/// Event bus for collecting and managing battle events.
///
/// ```rust,ignore
/// event_bus.print_debug();                                    // Just print events
/// event_bus.print_debug_with_message("Turn 1 events:");      // With header message
/// event_bus.print_formatted(&battle_state);                  // Human-readable format
/// println!("{}", event_bus);                                  // Display trait
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = BattleEvent>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Print all events in debug format with indentation.
    pub fn print_debug(&self) {
        for event in &self.events {
            println!("  {:?}", event);
        }
    }

    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        self.print_debug();
    }

    /// Print all events using their formatted text, falling back to debug
    /// format for silent events.
    pub fn print_formatted(&self, battle_state: &BattleState) {
        for event in &self.events {
            match event.format(battle_state) {
                Some(formatted) => println!("  {}", formatted),
                None => println!("  {:?} (silent)", event),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub battle_id: String,
    pub players: Vec<BattlePlayer>,
    pub field: FieldState,
    pub turn_number: u32,
    pub game_state: GameState,
}

impl BattleState {
    /// Sides are numbered densely from 0; at least two must be present.
    pub fn new(battle_id: String, players: Vec<BattlePlayer>) -> BattleResult<Self> {
        let side_count = players.iter().map(|player| player.side + 1).max().unwrap_or(0);
        if side_count < 2 {
            return Err(BattleStateError::InconsistentState(
                "a battle needs at least two sides".to_string(),
            )
            .into());
        }
        for side in 0..side_count {
            if !players.iter().any(|player| player.side == side) {
                return Err(BattleStateError::InconsistentState(format!(
                    "side {} has no participants",
                    side
                ))
                .into());
            }
        }
        for (index, player) in players.iter().enumerate() {
            if player.team.is_empty() || player.active_pokemon_index >= player.team.len() {
                return Err(BattleStateError::NoActivePokemon(index).into());
            }
        }

        Ok(Self {
            battle_id,
            players,
            field: FieldState::new(side_count),
            turn_number: 1,
            game_state: GameState::WaitingForActions,
        })
    }

    pub fn side_count(&self) -> usize {
        self.field.sides.len()
    }

    pub fn player(&self, player_index: usize) -> BattleResult<&BattlePlayer> {
        self.players
            .get(player_index)
            .ok_or_else(|| BattleStateError::InvalidPlayerIndex(player_index).into())
    }

    pub fn active_pokemon(&self, player_index: usize) -> Option<&PokemonInst> {
        self.players
            .get(player_index)
            .and_then(|player| player.active_pokemon())
    }

    pub fn are_opponents(&self, first: usize, second: usize) -> bool {
        self.players[first].side != self.players[second].side
    }

    /// First opponent, scanning forward from the attacker, whose active Pokemon can battle.
    pub fn default_target(&self, attacker_index: usize) -> Option<usize> {
        let count = self.players.len();
        (1..count)
            .map(|offset| (attacker_index + offset) % count)
            .find(|&index| {
                self.are_opponents(attacker_index, index)
                    && self.players[index].live_active_pokemon().is_some()
            })
    }

    /// Any opponent, live or not; field moves need a side to land on.
    pub fn opposing_player(&self, attacker_index: usize) -> Option<usize> {
        self.default_target(attacker_index).or_else(|| {
            let count = self.players.len();
            (1..count)
                .map(|offset| (attacker_index + offset) % count)
                .find(|&index| self.are_opponents(attacker_index, index))
        })
    }

    pub fn side_has_usable(&self, side: usize) -> bool {
        self.players
            .iter()
            .any(|player| player.side == side && player.has_usable_pokemon())
    }

    pub fn living_sides(&self) -> Vec<usize> {
        (0..self.side_count())
            .filter(|&side| self.side_has_usable(side))
            .collect()
    }

    pub fn is_over(&self) -> bool {
        matches!(self.game_state, GameState::SideWon(_) | GameState::Draw)
    }

    pub fn winning_side(&self) -> Option<usize> {
        match self.game_state {
            GameState::SideWon(side) => Some(side),
            _ => None,
        }
    }

    pub fn players_needing_replacement(&self) -> Vec<usize> {
        self.players
            .iter()
            .enumerate()
            .filter(|(_, player)| player.pending_switch.is_some())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn to_snapshot_bytes(&self) -> BattleResult<Vec<u8>> {
        postcard::to_allocvec(self)
            .map_err(|err| BattleStateError::Snapshot(err.to_string()).into())
    }

    pub fn from_snapshot_bytes(bytes: &[u8]) -> BattleResult<Self> {
        postcard::from_bytes(bytes).map_err(|err| BattleStateError::Snapshot(err.to_string()).into())
    }

    pub fn to_json(&self) -> BattleResult<String> {
        serde_json::to_string(self).map_err(|err| BattleStateError::Snapshot(err.to_string()).into())
    }
}
