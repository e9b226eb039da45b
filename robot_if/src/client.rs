//! # Robot client traits
//!
//! The motion executor is written against these traits rather than a concrete robot, so that
//! it can drive a remote robot over the network, or a simulated one.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::{
    cmd::{CmdFeedback, CmdId, GoalCmd},
    frame::TransformSnapshot,
};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Access to the robot's kinematic state.
pub trait StateClient {
    /// Get the robot's current transform snapshot.
    fn get_transform_snapshot(&mut self) -> Result<TransformSnapshot, RobotIfError>;
}

/// Access to the robot's command channel.
pub trait CommandClient {
    /// Submit a goal command, returning the id the robot assigned to it.
    fn submit_goal(&mut self, cmd: &GoalCmd) -> Result<CmdId, RobotIfError>;

    /// Get the latest feedback on a previously submitted command.
    fn poll_feedback(&mut self, id: CmdId) -> Result<CmdFeedback, RobotIfError>;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum RobotIfError {
    #[error("The client is not connected to the robot")]
    NotConnected,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("The robot rejected the request: {0}")]
    Rejected(String),

    #[error("The robot has no record of command {0}")]
    UnknownCommand(CmdId),
}
