//! Simulated robot parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use robot_if::Se2Pose;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the simulated robot.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimRobotParams {
    /// Maximum distance driven per feedback request.
    ///
    /// Units: meters
    pub linear_step_m: f64,

    /// Maximum rotation per feedback request.
    ///
    /// Units: radians
    pub angular_step_rad: f64,

    /// Number of feedback requests the body keeps moving for after arriving at the goal.
    pub settle_polls: u32,

    /// Pose of the body in the odom frame at start up.
    pub start_pose_odom: Se2Pose,

    /// Pose of the vision frame origin in the odom frame.
    pub odom_tform_vision: Se2Pose,

    /// Endpoint the `robot_sim` server binds to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimRobotParams {
    fn default() -> Self {
        Self {
            linear_step_m: 0.05,
            angular_step_rad: 0.1,
            settle_polls: 2,
            start_pose_odom: Se2Pose::identity(),
            odom_tform_vision: Se2Pose::new(1.5, -0.5, 0.3),
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    "tcp://*:5040".into()
}
