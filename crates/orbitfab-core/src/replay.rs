//! Replay recording and playback for debugging.
//!
//! Records the ticks and facility commands applied to a factory, starting
//! from an initial state. Playing the log back reproduces the exact same
//! state, with optional hash verification at checkpoints.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::command::{CommandError, FactoryCommand, apply_command};
use crate::state::FactoryState;
use crate::tick::{ThroughputTarget, tick};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from encoding, decoding, or replaying a log.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("command {index} failed during replay: {source}")]
    Command {
        index: usize,
        #[source]
        source: CommandError,
    },
}

// ---------------------------------------------------------------------------
// ReplayCommand
// ---------------------------------------------------------------------------

/// A step that can be recorded and replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplayCommand {
    Tick {
        elapsed_days: f64,
        target: ThroughputTarget,
    },
    Apply(FactoryCommand),
}

/// Details about where replay verification failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    /// The command index where the mismatch was detected.
    pub command_index: usize,
    pub expected_hash: u64,
    pub actual_hash: u64,
}

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

/// A recorded sequence of steps starting from a known state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayLog {
    pub initial_state: FactoryState,
    pub commands: Vec<ReplayCommand>,
    /// `(command_index, state_hash)` pairs checked during playback.
    pub hash_checkpoints: Vec<(usize, u64)>,
}

impl ReplayLog {
    pub fn new(initial_state: &FactoryState) -> Self {
        Self {
            initial_state: initial_state.clone(),
            commands: Vec::new(),
            hash_checkpoints: Vec::new(),
        }
    }

    pub fn record(&mut self, cmd: ReplayCommand) {
        self.commands.push(cmd);
    }

    /// Record a step together with the hash of the state it produced.
    pub fn record_with_hash(&mut self, cmd: ReplayCommand, hash: u64) {
        let index = self.commands.len();
        self.commands.push(cmd);
        self.hash_checkpoints.push((index, hash));
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn serialize(&self) -> Result<Vec<u8>, ReplayError> {
        bitcode::serialize(self).map_err(|e| ReplayError::Encode(e.to_string()))
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, ReplayError> {
        bitcode::deserialize(data).map_err(|e| ReplayError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

/// The result of replaying a log.
#[derive(Debug)]
pub struct ReplayResult {
    pub final_state: FactoryState,
    pub commands_executed: usize,
    /// Whether all hash checkpoints matched.
    pub is_verified: bool,
    pub first_mismatch: Option<ReplayMismatch>,
}

/// Apply one recorded step.
pub fn apply_replay_command(
    state: &FactoryState,
    cmd: &ReplayCommand,
) -> Result<FactoryState, CommandError> {
    match cmd {
        ReplayCommand::Tick {
            elapsed_days,
            target,
        } => Ok(tick(state, *elapsed_days, *target).next_state),
        ReplayCommand::Apply(command) => apply_command(state, command),
    }
}

/// Replay a log and verify hash checkpoints.
pub fn replay_and_verify(log: &ReplayLog) -> Result<ReplayResult, ReplayError> {
    let mut state = log.initial_state.clone();
    let mut first_mismatch = None;
    let mut checkpoints = log.hash_checkpoints.iter().peekable();

    for (index, cmd) in log.commands.iter().enumerate() {
        state = apply_replay_command(&state, cmd)
            .map_err(|source| ReplayError::Command { index, source })?;

        while let Some(&&(at, expected)) = checkpoints.peek() {
            if at != index {
                break;
            }
            checkpoints.next();
            let actual = state.state_hash();
            if actual != expected && first_mismatch.is_none() {
                warn!(index, expected, actual, "replay diverged");
                first_mismatch = Some(ReplayMismatch {
                    command_index: index,
                    expected_hash: expected,
                    actual_hash: actual,
                });
            }
        }
    }

    Ok(ReplayResult {
        final_state: state,
        commands_executed: log.commands.len(),
        is_verified: first_mismatch.is_none(),
        first_mismatch,
    })
}
