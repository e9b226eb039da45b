//! Relative moves produced by the planner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use robot_if::Se2Pose;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A single relative move of the robot.
///
/// Each move is relative to the pose the robot was left in by the previous move, so a sequence
/// of moves is only valid when executed in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Move {
    /// Turn on the spot.
    ///
    /// The angle is in (-pi, pi], positive turning towards the robot's left.
    Turn { angle_rad: f64 },

    /// Drive straight forwards along the current heading.
    ///
    /// The distance is never negative.
    Translate { dist_m: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Move {
    /// The goal of this move relative to the robot's body before the move starts.
    pub fn body_goal(&self) -> Se2Pose {
        match *self {
            Move::Turn { angle_rad } => Se2Pose::new(0.0, 0.0, angle_rad),
            Move::Translate { dist_m } => Se2Pose::new(dist_m, 0.0, 0.0),
        }
    }

    pub fn is_turn(&self) -> bool {
        matches!(self, Move::Turn { .. })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Turn { angle_rad } => write!(f, "Turn({:.2} deg)", angle_rad.to_degrees()),
            Move::Translate { dist_m } => write!(f, "Translate({:.3} m)", dist_m),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_body_goal() {
        assert_eq!(
            Move::Turn { angle_rad: 0.5 }.body_goal(),
            Se2Pose::new(0.0, 0.0, 0.5)
        );
        assert_eq!(
            Move::Translate { dist_m: 1.5 }.body_goal(),
            Se2Pose::new(1.5, 0.0, 0.0)
        );
        assert_eq!(
            Move::Turn {
                angle_rad: std::f64::consts::FRAC_PI_2
            }
            .to_string(),
            "Turn(90.00 deg)"
        );
    }
}
