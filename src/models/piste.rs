//! Piste: one allocatable strip onto which a single active bout is scheduled.

use serde::{Deserialize, Serialize};

/// Derived occupancy state for display. `staged` while a bout is reserved but
/// not started; a piste can be occupied *and* staged when the next bout is
/// queued onto it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PisteState {
    Free,
    Staged,
    Occupied,
    Disabled,
}

/// A single piste, identified by its 1-based number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Piste {
    pub number: u32,
    pub staged: bool,
    pub occupied: bool,
    pub disabled: bool,
}

impl Piste {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            staged: false,
            occupied: false,
            disabled: false,
        }
    }

    pub fn state(&self) -> PisteState {
        if self.disabled {
            PisteState::Disabled
        } else if self.occupied {
            PisteState::Occupied
        } else if self.staged {
            PisteState::Staged
        } else {
            PisteState::Free
        }
    }

    /// Immediately available: nothing reserved, nothing running.
    pub fn free_now(&self) -> bool {
        !self.staged && !self.occupied && !self.disabled
    }

    /// A staged bout started on this piste.
    pub fn match_started(&mut self) {
        self.staged = false;
        self.occupied = true;
    }

    /// The ongoing bout finished.
    pub fn match_finished(&mut self) {
        self.occupied = false;
    }

    pub fn reset(&mut self) {
        self.staged = false;
        self.occupied = false;
    }
}
