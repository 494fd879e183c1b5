pub mod abilities;
pub mod action_stack;
pub mod calculators;
pub mod commands;
pub mod conditions;
pub mod engine;
pub mod field;
pub mod move_effects;
pub mod resolver;
pub mod runner;
pub mod state;
pub mod stats;
pub mod status;

#[cfg(test)]
mod tests;
