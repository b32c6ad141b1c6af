//! Operator commands staged for the next tick boundary.
//!
//! Commands are validated when submitted and executed at the start of the
//! next tick, so every tick runs on one consistent set of outlet settings.

use crate::station::TankKey;
use pf_components::common::check_command_fraction;
use pf_core::ids::StationId;
use serde::{Deserialize, Serialize};

/// What to do to a tank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Set the outlet opening (valve position or pump speed) in [0, 1].
    SetOpening(f64),
    /// Refill a supply tank to capacity.
    Fill,
    /// Empty a tank.
    Flush,
}

impl Action {
    /// Check the action against the tank it addresses.
    ///
    /// Returns a human-readable reason on rejection.
    pub fn check(self, tank: TankKey) -> Result<(), String> {
        match self {
            Action::SetOpening(fraction) => check_command_fraction(fraction, "open fraction")
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Action::Fill if tank.is_mixer() => {
                Err("the mixing tank is filled from its supplies".to_string())
            }
            Action::Fill | Action::Flush => Ok(()),
        }
    }
}

/// Resolved tank address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub station: StationId,
    pub tank: TankKey,
}

/// A validated command bound to a resolved target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub target: Target,
    pub action: Action,
}

/// Outcome of a command executed at a tick boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    pub command: Command,
    /// Level fraction of the addressed tank right after execution
    pub level_fraction: f64,
}

/// Commands waiting for the next tick boundary.
///
/// Keeps an optional bounded history of executed commands for replay and
/// debugging.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: Vec<Command>,
    /// Executed commands: (tick boundary, command)
    history: Vec<(u64, Command)>,
    /// 0 = no history
    max_history: usize,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            max_history,
            ..Self::default()
        }
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn push_batch(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.pending.extend(commands);
    }

    /// Take every pending command, in submission order.
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    /// Remember a command that ran at the `tick` boundary.
    pub fn record(&mut self, tick: u64, command: Command) {
        if self.max_history == 0 {
            return;
        }
        self.history.push((tick, command));
        let excess = self.history.len().saturating_sub(self.max_history);
        if excess > 0 {
            self.history.drain(..excess);
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn history(&self) -> &[(u64, Command)] {
        &self.history
    }
}
