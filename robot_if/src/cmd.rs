//! # Goal commands and feedback

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::frame::{FrameId, Se2Pose};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A command to move the robot to a goal pose in a fixed frame.
///
/// The robot stops once it arrives at the goal. The command expires at `end_time`, after which
/// the robot stops wherever it is and reports [`CmdStatus::CommandTimedOut`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalCmd {
    /// The goal pose expressed in `frame`.
    pub goal: Se2Pose,

    /// The frame the goal is expressed in.
    pub frame: FrameId,

    /// Time at which the command expires.
    pub end_time: DateTime<Utc>,

    /// Hint to the robot's mobility layer that it may encounter stairs.
    pub stair_hint: bool,
}

/// Identifier of a command accepted by the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CmdId(pub u64);

/// Feedback on an executing goal command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmdFeedback {
    /// Overall status of the mobility command.
    pub status: CmdStatus,

    /// Progress of the trajectory towards the goal.
    pub traj_status: TrajStatus,

    /// Whether the body is still moving.
    pub body_status: BodyStatus,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Overall status of a mobility command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmdStatus {
    Unknown,

    /// The command is still being executed. This is also the status of a command which has
    /// reached its goal but has not expired yet.
    Processing,

    /// A newer command replaced this one.
    CommandOverridden,

    /// The command's end time passed.
    CommandTimedOut,

    /// The robot is frozen (estop or fault) and cannot execute commands.
    RobotFrozen,

    /// The command cannot be executed on this robot.
    IncompatibleHardware,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrajStatus {
    Unknown,
    AtGoal,
    NearGoal,
    GoingToGoal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyStatus {
    Unknown,
    Moving,
    Settled,
}

/// Coarse interpretation of a [`CmdFeedback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackClass {
    /// Still moving towards the goal.
    Processing,

    /// At the goal and no longer moving.
    AtGoalSettled,

    /// The command ended without reaching the goal.
    Failed,

    /// The robot didn't report a recognisable status.
    Other,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CmdFeedback {
    pub fn new(status: CmdStatus, traj_status: TrajStatus, body_status: BodyStatus) -> Self {
        Self {
            status,
            traj_status,
            body_status,
        }
    }

    /// Feedback for a command that has arrived and settled.
    pub fn settled() -> Self {
        Self::new(CmdStatus::Processing, TrajStatus::AtGoal, BodyStatus::Settled)
    }

    /// Feedback for a command that is still driving towards its goal.
    pub fn going_to_goal() -> Self {
        Self::new(CmdStatus::Processing, TrajStatus::GoingToGoal, BodyStatus::Moving)
    }

    pub fn classify(&self) -> FeedbackClass {
        match self.status {
            CmdStatus::Processing => {
                if self.traj_status == TrajStatus::AtGoal
                    && self.body_status == BodyStatus::Settled
                {
                    FeedbackClass::AtGoalSettled
                } else {
                    FeedbackClass::Processing
                }
            }
            CmdStatus::Unknown => FeedbackClass::Other,
            CmdStatus::CommandOverridden
            | CmdStatus::CommandTimedOut
            | CmdStatus::RobotFrozen
            | CmdStatus::IncompatibleHardware => FeedbackClass::Failed,
        }
    }
}

impl fmt::Display for CmdFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} (traj: {:?}, body: {:?})",
            self.status, self.traj_status, self.body_status
        )
    }
}

impl fmt::Display for CmdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
