// Battle rule schema: the shared, serializable definitions that rule tables
// are written in. Nothing in here has behavior beyond lookup and simple
// derived properties; the engine crate owns all battle logic.

pub use battle_data::*;
pub use held_effects::*;
pub use ids::*;
pub use move_data::*;
pub use pokemon_types::*;
pub use species_data::*;

pub mod battle_data;
pub mod held_effects;
pub mod ids;
pub mod move_data;
pub mod pokemon_types;
pub mod species_data;
