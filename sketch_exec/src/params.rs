//! # Sketch Executable Parameters
//!
//! This module provide parameters for the sketch executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use robot_if::FrameId;

use crate::{motion_exec::ExecParams, path_planner::MapParams};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchExecParams {
    /// Dimensions of the map the waypoints are captured on
    pub map: MapParams,

    /// Position of the robot on the map in pixels, used as the first waypoint
    pub start_px: [f64; 2],

    /// Frame the moves are executed in
    pub frame: FrameId,

    /// Motion execution parameters
    pub exec: ExecParams,

    /// Network endpoint of the robot server
    pub robot_endpoint: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_params() {
        let params: SketchExecParams = util::params::load_from_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../params/sketch_exec.toml"
        ))
        .unwrap();

        assert_eq!(params.frame, FrameId::Odom);
        assert!(params.exec.validate().is_ok());
        assert!(crate::path_planner::Scale::from_map(&params.map).is_ok());
    }
}
