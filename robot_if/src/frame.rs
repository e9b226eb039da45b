//! # Frames
//!
//! Named reference frames and planar rigid transforms between them.
//!
//! Transforms are named `a_tform_b`, meaning the pose of frame `b` expressed in frame `a`, so
//! that `a_tform_b * b_tform_c == a_tform_c`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Isometry2, Vector2};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A planar pose, or equivalently a rigid transform in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Se2Pose {
    /// Units: meters
    pub x: f64,

    /// Units: meters
    pub y: f64,

    /// Rotation about the frame's Z+ axis.
    ///
    /// Units: radians
    pub angle: f64,
}

/// A snapshot of the robot's kinematic transforms at one instant.
///
/// Each entry maps a frame to `frame_tform_body`. The body frame itself is implicit and always
/// resolves to the identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformSnapshot {
    frames: HashMap<FrameId, Se2Pose>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Reference frames known to the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameId {
    /// Fixed world frame estimated from the robot's odometry.
    Odom,

    /// Fixed world frame estimated from the robot's visual odometry.
    Vision,

    /// The robot's own body frame, which moves with the robot.
    Body,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameError {
    #[error("The frame {0} is not present in the transform snapshot")]
    UnknownFrame(FrameId),

    #[error("Unrecognised frame name \"{0}\", expected one of odom, vision, body")]
    UnknownFrameName(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Se2Pose {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    /// Convert into an nalgebra isometry.
    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2::new(self.x, self.y), self.angle)
    }

    /// Build from an nalgebra isometry, the angle is given in (-pi, pi].
    pub fn from_isometry(iso: &Isometry2<f64>) -> Self {
        Self {
            x: iso.translation.vector.x,
            y: iso.translation.vector.y,
            angle: iso.rotation.angle(),
        }
    }

    /// Return `b_tform_a` given `self == a_tform_b`.
    pub fn inverse(&self) -> Self {
        Self::from_isometry(&self.to_isometry().inverse())
    }

    /// The translational part of the pose.
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl std::ops::Mul for Se2Pose {
    type Output = Se2Pose;

    fn mul(self, rhs: Se2Pose) -> Self::Output {
        Se2Pose::from_isometry(&(self.to_isometry() * rhs.to_isometry()))
    }
}

impl fmt::Display for Se2Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x={:.3} m, y={:.3} m, angle={:.2} deg)",
            self.x,
            self.y,
            self.angle.to_degrees()
        )
    }
}

impl TransformSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `frame_tform_body` for the given frame.
    ///
    /// Setting the body frame is ignored since it's always the identity.
    pub fn insert(&mut self, frame: FrameId, frame_tform_body: Se2Pose) {
        if frame != FrameId::Body {
            self.frames.insert(frame, frame_tform_body);
        }
    }

    /// Return `frame_tform_body` for the given frame.
    pub fn get_frame_tform_body(&self, frame: FrameId) -> Result<Se2Pose, FrameError> {
        match frame {
            FrameId::Body => Ok(Se2Pose::identity()),
            f => self
                .frames
                .get(&f)
                .copied()
                .ok_or(FrameError::UnknownFrame(f)),
        }
    }

    /// Get the transform between two frames in the snapshot, `a_tform_b`.
    pub fn get_a_tform_b(&self, a: FrameId, b: FrameId) -> Result<Se2Pose, FrameError> {
        let a_tform_body = self.get_frame_tform_body(a)?;
        let b_tform_body = self.get_frame_tform_body(b)?;

        Ok(a_tform_body * b_tform_body.inverse())
    }
}

impl FrameId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameId::Odom => "odom",
            FrameId::Vision => "vision",
            FrameId::Body => "body",
        }
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FrameId {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "odom" => Ok(FrameId::Odom),
            "vision" => Ok(FrameId::Vision),
            "body" => Ok(FrameId::Body),
            other => Err(FrameError::UnknownFrameName(other.into())),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Resolve a goal given relative to the body into the target frame.
///
/// The snapshot must have been taken just before the goal is dispatched, since the body frame
/// moves with the robot and an old snapshot would place the goal relative to a stale pose.
pub fn resolve_goal(
    snapshot: &TransformSnapshot,
    frame: FrameId,
    body_tform_goal: Se2Pose,
) -> Result<Se2Pose, FrameError> {
    let frame_tform_body = snapshot.get_frame_tform_body(frame)?;

    Ok(frame_tform_body * body_tform_goal)
}
