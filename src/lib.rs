// In: src/lib.rs

//! Pokemon Battle Engine
//!
//! Deterministic turn resolution for creature battles. Given the actions
//! chosen for a turn, the engine orders them, runs each through the
//! accuracy / critical / damage / effect pipeline, applies end-of-turn
//! phases, and returns the ordered event log together with the new state.
//! All rule tables are data, and every random decision goes through an
//! injected `RandomSource`.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod errors;
pub mod player;
pub mod pokemon;
pub mod rng;
pub mod rule_data;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    AbilityData, AbilityEffect, AbilityId, BaseStats, FixedDamage, Hazard, HitCount, ItemData, ItemEffect,
    ItemId, MoveCategory, MoveData, MoveEffect, MoveId, MoveTarget, NatureData, NatureId, PokemonType,
    SpeciesData, SpeciesId, StatType, StatusType, Target, TeamCondition, Terrain, TypeChart, VolatileType,
    Weather,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::calculators::{DamageCalculator, DamageContext, DamageModifier, DamageOutcome};
pub use battle::engine::{resolve_turn, resolve_turn_with, submit_replacements, validate_actions};
pub use battle::resolver::{resolve_action, BattleContext};
pub use battle::runner::{spawn_encounter, EncounterHandle, TurnReport};
pub use battle::state::{BattleEvent, BattleState, EventBus, GameState};

// Core runtime types for a battle.
pub use player::{BattlePlayer, PendingSwitch, PlayerAction};
pub use pokemon::{MoveInstance, PokemonInst, StatusCondition};
pub use rng::{RandomSource, SeededRandom, TurnRng};
pub use rule_data::RuleData;

// Crate-specific error and result types.
pub use errors::{ActionError, BattleEngineError, BattleResult, BattleStateError, RuleDataError, RuleDataResult};
