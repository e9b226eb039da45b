//! # Sketch navigation library.
//!
//! Turns waypoints drawn on a map into a sequence of turn and translate moves, and executes those
//! moves on a robot one at a time.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Waypoint capture - collects the waypoints of a route in map pixels
pub mod capture;

/// Path planner - converts waypoints into turn and translate moves
pub mod path_planner;

/// Motion executor - sends moves to the robot and waits for each to settle
pub mod motion_exec;

/// Simulated robot - a deterministic robot used for dry runs and testing
pub mod sim_robot;

/// Robot client - talks to a robot server over the network
#[cfg(feature = "net")]
pub mod robot_client;

/// Robot server - serves network requests on behalf of a local robot
#[cfg(feature = "net")]
pub mod robot_server;

/// Parameters of the sketch executable
pub mod params;
