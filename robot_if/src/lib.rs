//! # Robot interface crate.
//!
//! Provides the interface between the sketch navigation software and the mobile robot it drives:
//! reference frames and planar transforms, goal commands and their feedback, the client traits
//! the motion executor is written against, and the network messages used to reach a remote
//! robot.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Reference frames and SE(2) transforms between them
pub mod frame;

/// Goal commands and command feedback
pub mod cmd;

/// Client traits for querying and commanding the robot
pub mod client;

/// Network module
#[cfg(feature = "net")]
pub mod net;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use client::{CommandClient, RobotIfError, StateClient};
pub use cmd::{BodyStatus, CmdFeedback, CmdId, CmdStatus, FeedbackClass, GoalCmd, TrajStatus};
pub use frame::{FrameError, FrameId, Se2Pose, TransformSnapshot};
