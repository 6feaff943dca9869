//=========================================================================
// Transition Slot
//=========================================================================
//
// Single-entry mailbox for navigation requests.
//
// Worlds (or the input router) write here during a frame. The controller
// takes the request at the start of the next tick, so a request made
// while a world executes is honoured one frame later.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== WorldTransition =====================================================

/// A navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldTransition {
    /// Following world, wrapping to the first.
    Next,

    /// Preceding world, wrapping to the last.
    Previous,

    /// Absolute registry index.
    Goto(usize),
}

//=== TransitionSlot ======================================================

/// Holds at most one pending [`WorldTransition`]; last writer wins.
#[derive(Debug, Default)]
pub struct TransitionSlot {
    pending: Option<WorldTransition>,
}

impl TransitionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request, returning any request it overwrote.
    pub fn request(&mut self, transition: WorldTransition) -> Option<WorldTransition> {
        let replaced = self.pending.replace(transition);
        if let Some(old) = replaced {
            debug!(target: "world", "Transition {:?} superseded by {:?}", old, transition);
        }
        replaced
    }

    pub fn peek(&self) -> Option<WorldTransition> {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    /// Removes the pending request. Only the controller clears the slot.
    pub(crate) fn take(&mut self) -> Option<WorldTransition> {
        self.pending.take()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
