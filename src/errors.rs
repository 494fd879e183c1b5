use schema::{AbilityId, ItemId, MoveId, NatureId, SpeciesId};
use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    #[error("Rule data error: {0}")]
    RuleData(#[from] RuleDataError),
    #[error("Illegal action: {0}")]
    IllegalAction(#[from] ActionError),
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Missing or malformed rule data. Fatal at setup time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleDataError {
    #[error("Move not found: {0}")]
    MoveNotFound(MoveId),
    #[error("Species not found: {0}")]
    SpeciesNotFound(SpeciesId),
    #[error("Ability not found: {0}")]
    AbilityNotFound(AbilityId),
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("Nature not found: {0}")]
    NatureNotFound(NatureId),
    #[error("Malformed rule data: {0}")]
    MalformedData(String),
    #[error("Failed to parse rule data: {0}")]
    Parse(String),
    #[error("Failed to read rule data from {path}: {reason}")]
    Io { path: String, reason: String },
}

/// A submitted action that cannot be executed. Rejected before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Battle is not accepting actions")]
    NotAcceptingActions,
    #[error("Invalid player index: {0}")]
    InvalidPlayerIndex(usize),
    #[error("Player {0} submitted more than one action")]
    DuplicateAction(usize),
    #[error("Player {0} has not submitted an action")]
    MissingAction(usize),
    #[error("Player {0} has no Pokemon able to battle")]
    NoActivePokemon(usize),
    #[error("Invalid move index: {0}")]
    InvalidMoveIndex(usize),
    #[error("Move {0} has no PP remaining")]
    NoPpRemaining(MoveId),
    #[error("Held item locks the user into {0}")]
    ChoiceLocked(MoveId),
    #[error("Unknown move: {0}")]
    UnknownMove(MoveId),
    #[error("Invalid target: player {0}")]
    InvalidTarget(usize),
    #[error("Invalid Pokemon index: {0}")]
    InvalidPokemonIndex(usize),
    #[error("Cannot switch to fainted Pokemon at index {0}")]
    SwitchToFainted(usize),
    #[error("Pokemon at index {0} is already active")]
    AlreadyActive(usize),
    #[error("Player {0} is trapped and cannot switch")]
    Trapped(usize),
    #[error("Player {0} is locked into a multi-turn move")]
    LockedIntoMove(usize),
    #[error("Player {0} does not need a replacement")]
    ReplacementNotNeeded(usize),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("No active Pokemon for player {0}")]
    NoActivePokemon(usize),
    #[error("Invalid player index: {0}")]
    InvalidPlayerIndex(usize),
    #[error("Inconsistent battle state: {0}")]
    InconsistentState(String),
    #[error("Battle is already over")]
    BattleOver,
    #[error("Snapshot encoding failed: {0}")]
    Snapshot(String),
    #[error("Encounter task is no longer running")]
    EncounterClosed,
}

/// Result type alias for battle engine operations
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Result type alias for rule data operations
pub type RuleDataResult<T> = Result<T, RuleDataError>;
