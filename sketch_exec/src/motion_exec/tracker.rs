//! Tracks the state of a single dispatched move from its feedback

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use robot_if::{CmdFeedback, FeedbackClass};
use std::time::Instant;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State machine following one move from dispatch to a terminal state.
///
/// ```text
/// Dispatched --(processing)--> Processing --(at goal, settled)--> Settled
///     |                            |
///     +----(failed / other)--------+--> Failed
///                                  |
///                                  +--(processing after deadline)--> TimedOut
/// ```
///
/// The deadline is only checked against feedback, so a move which settled just before the
/// deadline is never reported as timed out.
#[derive(Debug, Clone)]
pub struct MoveTracker {
    state: MoveState,

    /// Time after which the move is considered timed out.
    deadline: Instant,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveState {
    /// The command has been sent but no feedback has been received yet.
    Dispatched,

    /// The robot is executing the command.
    Processing,

    /// The robot is at the goal and has stopped moving.
    Settled,

    /// The command ended without reaching the goal.
    Failed(CmdFeedback),

    /// The robot was still processing the command after the deadline, with that feedback.
    TimedOut(CmdFeedback),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MoveTracker {
    pub fn new(deadline: Instant) -> Self {
        Self {
            state: MoveState::Dispatched,
            deadline,
        }
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            MoveState::Settled | MoveState::Failed(_) | MoveState::TimedOut(_)
        )
    }

    /// Advance the state machine with new feedback received at `now`.
    ///
    /// Once a terminal state is reached further feedback is ignored.
    pub fn update(&mut self, feedback: CmdFeedback, now: Instant) -> MoveState {
        if self.is_terminal() {
            return self.state;
        }

        self.state = match feedback.classify() {
            FeedbackClass::AtGoalSettled => MoveState::Settled,
            FeedbackClass::Failed | FeedbackClass::Other => MoveState::Failed(feedback),
            FeedbackClass::Processing => {
                if now >= self.deadline {
                    MoveState::TimedOut(feedback)
                } else {
                    MoveState::Processing
                }
            }
        };

        trace!("Move feedback {} -> {:?}", feedback, self.state);

        self.state
    }
}
