//! # Simulated robot
//!
//! A kinematic stand-in for the real robot. Goals are tracked in the odom frame and the body is
//! stepped towards the current goal each time feedback is requested, so that a move takes a
//! predictable number of polls to complete regardless of wall clock time.
//!
//! Faults can be injected at a given command to exercise the executor's failure handling.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use chrono::Utc;
use log::{debug, warn};

use robot_if::{
    BodyStatus, CmdFeedback, CmdId, CmdStatus, CommandClient, FrameId, GoalCmd, RobotIfError,
    Se2Pose, StateClient, TrajStatus, TransformSnapshot,
};
use util::maths::get_ang_dist;

pub use params::SimRobotParams;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Distance under which the body is considered to be at the goal position.
///
/// Units: meters
const POS_TOLERANCE_M: f64 = 1e-9;

/// Angle under which the body is considered to be at the goal heading.
///
/// Units: radians
const ANG_TOLERANCE_RAD: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct SimRobot {
    params: SimRobotParams,

    odom_tform_body: Se2Pose,

    cmds: Vec<SimCmd>,

    faults: Vec<SimFault>,

    num_submits: usize,

    num_snapshots: usize,
}

/// A command accepted by the simulated robot.
struct SimCmd {
    cmd: GoalCmd,

    /// The goal resolved into odom when the command was accepted.
    odom_tform_goal: Se2Pose,

    status: CmdStatus,

    /// Index of the submit attempt which created this command.
    attempt: usize,

    /// Number of polls the body has been at the goal for.
    polls_at_goal: u32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Faults which can be injected into the simulation.
///
/// `cmd_index` counts submit attempts from zero, including rejected ones, so when driven by the
/// motion executor it is the index of the move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimFault {
    /// Refuse to accept the command.
    RejectDispatch { cmd_index: usize },

    /// Accept the command but never move, reporting it as processing forever, even past its end
    /// time.
    Stall { cmd_index: usize },

    /// Report the robot as frozen while executing the command.
    Freeze { cmd_index: usize },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimRobot {
    pub fn new(params: SimRobotParams) -> Self {
        Self {
            odom_tform_body: params.start_pose_odom,
            params,
            cmds: Vec::new(),
            faults: Vec::new(),
            num_submits: 0,
            num_snapshots: 0,
        }
    }

    /// Add a fault to the simulation.
    pub fn with_fault(mut self, fault: SimFault) -> Self {
        self.faults.push(fault);
        self
    }

    /// Current pose of the body in the odom frame.
    pub fn pose_odom(&self) -> Se2Pose {
        self.odom_tform_body
    }

    /// All commands accepted so far, in order.
    pub fn submitted(&self) -> Vec<GoalCmd> {
        self.cmds.iter().map(|c| c.cmd.clone()).collect()
    }

    /// Number of transform snapshots served.
    pub fn num_snapshots(&self) -> usize {
        self.num_snapshots
    }

    fn has_fault(&self, fault: SimFault) -> bool {
        self.faults.contains(&fault)
    }

    /// Move the body one step towards the goal, returning true if it's at the goal.
    fn step_towards(&mut self, odom_tform_goal: Se2Pose) -> bool {
        let to_goal = odom_tform_goal.position() - self.odom_tform_body.position();
        let dist_m = to_goal.norm();
        let ang_dist_rad = get_ang_dist(self.odom_tform_body.angle, odom_tform_goal.angle);

        let position = if dist_m <= self.params.linear_step_m {
            odom_tform_goal.position()
        } else {
            self.odom_tform_body.position() + to_goal * (self.params.linear_step_m / dist_m)
        };

        let angle = if ang_dist_rad.abs() <= self.params.angular_step_rad {
            odom_tform_goal.angle
        } else {
            self.odom_tform_body.angle + self.params.angular_step_rad * ang_dist_rad.signum()
        };

        self.odom_tform_body = Se2Pose::new(position.x, position.y, util::maths::wrap_pi(angle));

        (odom_tform_goal.position() - self.odom_tform_body.position()).norm() < POS_TOLERANCE_M
            && get_ang_dist(self.odom_tform_body.angle, odom_tform_goal.angle).abs()
                < ANG_TOLERANCE_RAD
    }
}

impl StateClient for SimRobot {
    fn get_transform_snapshot(&mut self) -> Result<TransformSnapshot, RobotIfError> {
        self.num_snapshots += 1;

        let mut snapshot = TransformSnapshot::new();
        snapshot.insert(FrameId::Odom, self.odom_tform_body);
        snapshot.insert(
            FrameId::Vision,
            self.params.odom_tform_vision.inverse() * self.odom_tform_body,
        );

        Ok(snapshot)
    }
}

impl CommandClient for SimRobot {
    fn submit_goal(&mut self, cmd: &GoalCmd) -> Result<CmdId, RobotIfError> {
        let cmd_index = self.num_submits;
        self.num_submits += 1;

        if self.has_fault(SimFault::RejectDispatch { cmd_index }) {
            warn!("Sim: rejecting command {}", cmd_index);
            return Err(RobotIfError::Rejected(format!(
                "Command {} rejected by fault injection",
                cmd_index
            )));
        }

        let odom_tform_goal = match cmd.frame {
            FrameId::Odom => cmd.goal,
            FrameId::Vision => self.params.odom_tform_vision * cmd.goal,
            FrameId::Body => self.odom_tform_body * cmd.goal,
        };

        // Any command still executing is replaced by the new one
        for old in self.cmds.iter_mut() {
            if old.status == CmdStatus::Processing {
                old.status = CmdStatus::CommandOverridden;
            }
        }

        debug!(
            "Sim: accepted command {} to {} in odom",
            cmd_index, odom_tform_goal
        );

        self.cmds.push(SimCmd {
            cmd: cmd.clone(),
            odom_tform_goal,
            status: CmdStatus::Processing,
            attempt: cmd_index,
            polls_at_goal: 0,
        });

        Ok(CmdId((self.cmds.len() - 1) as u64))
    }

    fn poll_feedback(&mut self, id: CmdId) -> Result<CmdFeedback, RobotIfError> {
        let cmd_index = id.0 as usize;
        if cmd_index >= self.cmds.len() {
            return Err(RobotIfError::UnknownCommand(id));
        }
        let attempt = self.cmds[cmd_index].attempt;

        // Only the latest command can still be executing
        let status = self.cmds[cmd_index].status;
        if status != CmdStatus::Processing {
            return Ok(CmdFeedback::new(status, TrajStatus::Unknown, BodyStatus::Unknown));
        }

        if self.has_fault(SimFault::Stall { cmd_index: attempt }) {
            return Ok(CmdFeedback::going_to_goal());
        }

        if self.has_fault(SimFault::Freeze { cmd_index: attempt }) {
            self.cmds[cmd_index].status = CmdStatus::RobotFrozen;
            return Ok(CmdFeedback::new(
                CmdStatus::RobotFrozen,
                TrajStatus::GoingToGoal,
                BodyStatus::Unknown,
            ));
        }

        if Utc::now() > self.cmds[cmd_index].cmd.end_time {
            self.cmds[cmd_index].status = CmdStatus::CommandTimedOut;
            return Ok(CmdFeedback::new(
                CmdStatus::CommandTimedOut,
                TrajStatus::Unknown,
                BodyStatus::Settled,
            ));
        }

        let odom_tform_goal = self.cmds[cmd_index].odom_tform_goal;
        if !self.step_towards(odom_tform_goal) {
            return Ok(CmdFeedback::going_to_goal());
        }

        // At the goal, wait for the body to settle
        let cmd = &mut self.cmds[cmd_index];
        if cmd.polls_at_goal < self.params.settle_polls {
            cmd.polls_at_goal += 1;
            Ok(CmdFeedback::new(
                CmdStatus::Processing,
                TrajStatus::AtGoal,
                BodyStatus::Moving,
            ))
        } else {
            Ok(CmdFeedback::settled())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Duration;
    use std::f64::consts::FRAC_PI_2;

    fn goal(goal: Se2Pose, frame: FrameId) -> GoalCmd {
        GoalCmd {
            goal,
            frame,
            end_time: Utc::now() + Duration::seconds(10),
            stair_hint: false,
        }
    }

    fn run_to_settled(robot: &mut SimRobot, id: CmdId) -> usize {
        for polls in 1..1000 {
            if robot.poll_feedback(id).unwrap() == CmdFeedback::settled() {
                return polls;
            }
        }
        panic!("Sim robot never settled");
    }

    #[test]
    fn test_drive_to_goal() {
        let mut robot = SimRobot::new(SimRobotParams::default());

        let id = robot
            .submit_goal(&goal(Se2Pose::new(1.0, 0.0, FRAC_PI_2), FrameId::Odom))
            .unwrap();
        let polls = run_to_settled(&mut robot, id);

        // About 20 steps to drive 1 m while turning in 16, then two more polls to settle
        assert!(polls >= 22 && polls <= 24, "polls = {}", polls);

        let pose = robot.pose_odom();
        assert!((pose.x - 1.0).abs() < 1e-9);
        assert!(pose.y.abs() < 1e-9);
        assert!((pose.angle - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_vision_frame() {
        let params = SimRobotParams::default();
        let odom_tform_vision = params.odom_tform_vision;
        let mut robot = SimRobot::new(params);

        // Body starts at the odom origin, so this is where it is in vision
        let snapshot = robot.get_transform_snapshot().unwrap();
        let vision_tform_body = snapshot.get_frame_tform_body(FrameId::Vision).unwrap();

        // Commanding the current pose in vision must not move the robot
        let id = robot.submit_goal(&goal(vision_tform_body, FrameId::Vision)).unwrap();
        run_to_settled(&mut robot, id);

        let pose = robot.pose_odom();
        assert!(pose.position().norm() < 1e-9);
        assert!(pose.angle.abs() < 1e-9);
        assert_eq!(robot.num_snapshots(), 1);

        let check = odom_tform_vision * vision_tform_body;
        assert!(check.position().norm() < 1e-9);
    }

    #[test]
    fn test_override_and_unknown() {
        let mut robot = SimRobot::new(SimRobotParams::default());

        let first = robot
            .submit_goal(&goal(Se2Pose::new(1.0, 0.0, 0.0), FrameId::Odom))
            .unwrap();
        let _second = robot
            .submit_goal(&goal(Se2Pose::new(0.0, 1.0, 0.0), FrameId::Odom))
            .unwrap();

        assert_eq!(
            robot.poll_feedback(first).unwrap().status,
            CmdStatus::CommandOverridden
        );
        assert_eq!(
            robot.poll_feedback(CmdId(7)),
            Err(RobotIfError::UnknownCommand(CmdId(7)))
        );
    }

    #[test]
    fn test_end_time() {
        let mut robot = SimRobot::new(SimRobotParams::default());

        let mut cmd = goal(Se2Pose::new(1.0, 0.0, 0.0), FrameId::Odom);
        cmd.end_time = Utc::now() - Duration::seconds(1);
        let id = robot.submit_goal(&cmd).unwrap();

        assert_eq!(
            robot.poll_feedback(id).unwrap().status,
            CmdStatus::CommandTimedOut
        );
    }

    #[test]
    fn test_faults() {
        let mut robot = SimRobot::new(SimRobotParams::default())
            .with_fault(SimFault::RejectDispatch { cmd_index: 0 })
            .with_fault(SimFault::Freeze { cmd_index: 1 });

        assert!(robot
            .submit_goal(&goal(Se2Pose::new(1.0, 0.0, 0.0), FrameId::Odom))
            .is_err());

        // The rejected command doesn't get an id, but faults count it as an attempt
        let id = robot
            .submit_goal(&goal(Se2Pose::new(1.0, 0.0, 0.0), FrameId::Odom))
            .unwrap();
        assert_eq!(id, CmdId(0));
        assert_eq!(
            robot.poll_feedback(id).unwrap().status,
            CmdStatus::RobotFrozen
        );
        assert!(robot.pose_odom().position().norm() < 1e-12);
    }
}
