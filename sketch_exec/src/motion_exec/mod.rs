//! # Motion executor
//!
//! Executes a sequence of planned [`Move`]s on the robot, one at a time. For each move:
//!
//! 1. A fresh transform snapshot is requested from the robot.
//! 2. The move's body-relative goal is resolved into the execution frame using that snapshot.
//! 3. The resolved goal is dispatched with a bounded end time.
//! 4. Feedback is polled until the robot is settled at the goal, the command fails, or the move
//!    times out.
//!
//! Execution stops at the first move which doesn't complete. Nothing is retried, since sending
//! further relative moves from an unconfirmed pose would compound the position error.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod tracker;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chrono::Utc;
use log::{debug, error, info};
use std::{
    thread,
    time::{Duration, Instant},
};

use robot_if::{
    frame::resolve_goal, CmdFeedback, CommandClient, FrameError, FrameId, GoalCmd, RobotIfError,
    StateClient,
};
use util::time::seconds_to_duration;

use crate::path_planner::Move;

pub use params::{ExecParams, ExecParamsError};
pub use tracker::{MoveState, MoveTracker};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which abort the execution of a move sequence.
///
/// All errors raised while executing a move carry the `index` of that move. Moves `0..index`
/// were completed before the error.
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("Invalid execution parameters: {0}")]
    InvalidParams(ExecParamsError),

    #[error("Move {index}: could not get the robot's transforms: {source}")]
    StateQuery { index: usize, source: RobotIfError },

    #[error("Move {index}: could not resolve the goal: {source}")]
    Frame { index: usize, source: FrameError },

    #[error("Move {index}: could not dispatch the command: {source}")]
    Dispatch { index: usize, source: RobotIfError },

    #[error("Move {index}: could not get command feedback: {source}")]
    Feedback { index: usize, source: RobotIfError },

    #[error("Move {index}: timed out before settling at the goal (last feedback: {last_feedback})")]
    MotionTimeout {
        index: usize,
        last_feedback: CmdFeedback,
    },

    #[error("Move {index}: failed to reach the goal: {feedback}")]
    MotionFailed { index: usize, feedback: CmdFeedback },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionError {
    /// Index of the move that failed, which is also the number of moves that were completed.
    ///
    /// `None` if execution never started.
    pub fn index(&self) -> Option<usize> {
        match *self {
            MotionError::InvalidParams(_) => None,
            MotionError::StateQuery { index, .. }
            | MotionError::Frame { index, .. }
            | MotionError::Dispatch { index, .. }
            | MotionError::Feedback { index, .. }
            | MotionError::MotionTimeout { index, .. }
            | MotionError::MotionFailed { index, .. } => Some(index),
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute the moves in order in the given frame.
///
/// Blocks until every move has settled, or returns the error which stopped execution. The
/// caller must hold exclusive control of the robot for the whole sequence.
pub fn execute<R>(
    moves: &[Move],
    frame: FrameId,
    robot: &mut R,
    params: &ExecParams,
) -> Result<(), MotionError>
where
    R: StateClient + CommandClient,
{
    params.validate().map_err(MotionError::InvalidParams)?;

    info!("Executing {} moves in the {} frame", moves.len(), frame);

    for (index, mv) in moves.iter().enumerate() {
        execute_move(index, mv, frame, robot, params)?;
    }

    info!("Completed the movement!");

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a single move, blocking until it reaches a terminal state.
fn execute_move<R>(
    index: usize,
    mv: &Move,
    frame: FrameId,
    robot: &mut R,
    params: &ExecParams,
) -> Result<(), MotionError>
where
    R: StateClient + CommandClient,
{
    // The snapshot must be taken for this move, the body has moved since the last one
    let snapshot = robot
        .get_transform_snapshot()
        .map_err(|source| MotionError::StateQuery { index, source })?;

    let body_tform_goal = mv.body_goal();
    let frame_tform_goal = resolve_goal(&snapshot, frame, body_tform_goal)
        .map_err(|source| MotionError::Frame { index, source })?;

    info!(
        "Moving {}: {} (dx={:.3}, dy={:.3}, dyaw={:.3})",
        index, mv, body_tform_goal.x, body_tform_goal.y, body_tform_goal.angle
    );
    debug!("Goal in {}: {}", frame, frame_tform_goal);

    // Validation bounds both times, so these can't overflow
    let end_time = Instant::now() + Duration::from_secs_f64(params.cmd_end_time_s);
    let poll_period = Duration::from_secs_f64(params.poll_period_s);

    let cmd = GoalCmd {
        goal: frame_tform_goal,
        frame,
        end_time: Utc::now() + seconds_to_duration(params.cmd_end_time_s),
        stair_hint: params.stair_hint,
    };

    let id = robot
        .submit_goal(&cmd)
        .map_err(|source| MotionError::Dispatch { index, source })?;

    let mut tracker = MoveTracker::new(end_time);

    loop {
        // Always poll once more after the deadline, the move may have settled while sleeping
        let feedback = robot
            .poll_feedback(id)
            .map_err(|source| MotionError::Feedback { index, source })?;

        match tracker.update(feedback, Instant::now()) {
            MoveState::Settled => {
                info!("Arrived at the goal");
                return Ok(());
            }
            MoveState::Failed(feedback) => {
                error!("Failed to reach the goal: {}", feedback);
                return Err(MotionError::MotionFailed { index, feedback });
            }
            MoveState::TimedOut(last_feedback) => {
                error!("Timed out waiting for move {} to settle", index);
                return Err(MotionError::MotionTimeout {
                    index,
                    last_feedback,
                });
            }
            MoveState::Dispatched | MoveState::Processing => thread::sleep(poll_period),
        }
    }
}
