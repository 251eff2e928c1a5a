use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use super::{Command, Mode};

/// The one piece of state shared between the receiver and the animation
/// loop. Every write replaces the whole command under the lock and bumps a
/// generation counter, which is how the loop tells whether a command it is
/// finishing is still the current one.
#[derive(Clone, Debug)]
pub struct CommandState {
    inner: Arc<Mutex<Versioned>>,
}

#[derive(Debug)]
struct Versioned {
    command: Command,
    generation: u64,
}

/// A consistent copy of the command as of one generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub command: Command,
    pub generation: u64,
}

impl CommandState {
    pub fn new(command: Command) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Versioned {
                command,
                generation: 0,
            })),
        }
    }

    // Nothing panics while holding the lock, but a poisoned mutex still holds
    // a whole command so it is safe to keep going.
    fn lock(&self) -> MutexGuard<'_, Versioned> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.lock();
        Snapshot {
            command: inner.command.clone(),
            generation: inner.generation,
        }
    }

    /// Replace the command with whatever `update` builds from the current
    /// one. Returns the new generation.
    pub fn replace(&self, update: impl FnOnce(&Command) -> Command) -> u64 {
        let mut inner = self.lock();
        inner.command = update(&inner.command);
        inner.generation += 1;
        inner.generation
    }

    /// Put the strip back to Idle after a terminal mode finished, unless a
    /// newer command arrived while it was rendering. Only the mode is
    /// touched. Returns whether the reset happened.
    pub fn finish(&self, generation: u64) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(
                "Not clearing {}: superseded by generation {}",
                inner.command.mode, inner.generation
            );
            return false;
        }
        inner.command.mode = Mode::Idle;
        true
    }
}
