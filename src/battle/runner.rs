//! One task per encounter.
//!
//! [`spawn_encounter`] moves a `BattleState` into a tokio task that owns it
//! together with its random source. Callers talk to it through the cloneable
//! [`EncounterHandle`]; each request carries a oneshot reply channel, so turns
//! for one encounter are strictly serialized while separate encounters run
//! concurrently.
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::battle::engine::{resolve_turn, submit_replacements};
use crate::battle::state::{BattleEvent, BattleState};
use crate::errors::{BattleResult, BattleStateError};
use crate::player::PlayerAction;
use crate::rng::SeededRandom;
use crate::rule_data::RuleData;

const COMMAND_BUFFER: usize = 16;

/// Events of one resolved turn (or replacement phase) and the state it left.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub events: Vec<BattleEvent>,
    pub state: BattleState,
}

#[derive(Debug)]
enum EncounterCommand {
    SubmitTurn {
        actions: Vec<(usize, PlayerAction)>,
        reply: oneshot::Sender<BattleResult<TurnReport>>,
    },
    SubmitReplacements {
        replacements: Vec<(usize, usize)>,
        reply: oneshot::Sender<BattleResult<TurnReport>>,
    },
    Snapshot {
        reply: oneshot::Sender<BattleState>,
    },
}

/// Client-facing handle to a running encounter.
#[derive(Debug, Clone)]
pub struct EncounterHandle {
    command_tx: mpsc::Sender<EncounterCommand>,
}

impl EncounterHandle {
    pub async fn submit_turn(&self, actions: Vec<(usize, PlayerAction)>) -> BattleResult<TurnReport> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(EncounterCommand::SubmitTurn { actions, reply }).await?;
        reply_rx.await.map_err(|_| BattleStateError::EncounterClosed)?
    }

    pub async fn submit_replacements(&self, replacements: Vec<(usize, usize)>) -> BattleResult<TurnReport> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(EncounterCommand::SubmitReplacements { replacements, reply })
            .await?;
        reply_rx.await.map_err(|_| BattleStateError::EncounterClosed)?
    }

    /// Current state (read-only copy).
    pub async fn snapshot(&self) -> BattleResult<BattleState> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(EncounterCommand::Snapshot { reply }).await?;
        Ok(reply_rx.await.map_err(|_| BattleStateError::EncounterClosed)?)
    }

    async fn send(&self, command: EncounterCommand) -> BattleResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| BattleStateError::EncounterClosed.into())
    }
}

/// Spawns the owner task for one encounter. The task ends when every handle
/// has been dropped.
pub fn spawn_encounter(state: BattleState, rules: Arc<RuleData>, seed: u64) -> EncounterHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let worker = EncounterWorker {
        state,
        rules,
        rng: SeededRandom::new(seed),
        command_rx,
    };
    tokio::spawn(worker.run());
    EncounterHandle { command_tx }
}

struct EncounterWorker {
    state: BattleState,
    rules: Arc<RuleData>,
    rng: SeededRandom,
    command_rx: mpsc::Receiver<EncounterCommand>,
}

impl EncounterWorker {
    async fn run(mut self) {
        info!(battle = %self.state.battle_id, "encounter started");
        while let Some(command) = self.command_rx.recv().await {
            self.handle_command(command);
        }
        info!(battle = %self.state.battle_id, draws = self.rng.draws(), "encounter closed");
    }

    fn handle_command(&mut self, command: EncounterCommand) {
        match command {
            EncounterCommand::SubmitTurn { actions, reply } => {
                let result = resolve_turn(&mut self.state, &self.rules, &actions, &mut self.rng).map(|bus| TurnReport {
                    events: bus.into_events(),
                    state: self.state.clone(),
                });
                if reply.send(result).is_err() {
                    debug!("SubmitTurn reply channel closed (caller dropped)");
                }
            }
            EncounterCommand::SubmitReplacements { replacements, reply } => {
                let result = submit_replacements(&mut self.state, &self.rules, &replacements, &mut self.rng).map(|bus| {
                    TurnReport {
                        events: bus.into_events(),
                        state: self.state.clone(),
                    }
                });
                if reply.send(result).is_err() {
                    debug!("SubmitReplacements reply channel closed (caller dropped)");
                }
            }
            EncounterCommand::Snapshot { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
        }
    }
}
