//! # Network Module
//!
//! This module provides the networking layer used to reach a remote robot over ZMQ. Requests are
//! sent by the client on a REQ socket and answered on a REP socket by the robot side, with each
//! message being the JSON encoding of a [`RobotRequest`] or [`RobotResponse`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use log::debug;
use zmq::{Context, Socket, SocketType};

use crate::{
    cmd::{CmdFeedback, CmdId, GoalCmd},
    frame::TransformSnapshot,
};

// Export zmq
pub use zmq;

// ------------------------------------------------------------------------------------------------
// MACROS
// ------------------------------------------------------------------------------------------------

macro_rules! set_sockopts {
    ($socket:expr, $(($opt:ident, $val:expr)),+) => {
        $(
            $socket.$opt($val)
                .map_err(|e| NetError::SocketOptionError(stringify!($opt).into(), e))?;
        )+
    };
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Represents options which can be set on a socket.
///
/// Most options here correspond to those found in the
/// [`zmq_setsockopt`](http://api.zeromq.org/4-2:zmq-setsockopt) documentation.
#[derive(Debug, Clone)]
pub struct SocketOptions {
    /// Indicates if the socket should bind itself to the endpoint. Servers should have this value
    /// set as `true`, clients should have it set as `false`.
    ///
    /// The default value is `false`.
    pub bind: bool,

    /// `ZMQ_REQ_CORRELATE`: Match replies with requests
    pub req_correlate: bool,

    /// `ZMQ_REQ_RELAXED`: relax strict alternation between request and reply
    pub req_relaxed: bool,

    /// `ZMQ_LINGER`: Set linger period for socket shutdown
    pub linger: i32,

    /// `ZMQ_CONNECT_TIMEOUT`: Set `connect()` timeout
    pub connect_timeout: i32,

    /// `ZMQ_RCVTIMEO`: Maximum time before a recv operation returns with `EAGAIN`
    pub recv_timeout: i32,

    /// `ZMQ_SNDTIMEO`: Maximum time before a send operation returns with `EAGAIN`
    pub send_timeout: i32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A request sent to the robot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RobotRequest {
    /// Request the current transform snapshot.
    GetTransforms,

    /// Submit a new goal command.
    SubmitGoal(GoalCmd),

    /// Request feedback on a command.
    PollFeedback(CmdId),
}

/// The robot's response to a [`RobotRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RobotResponse {
    Transforms(TransformSnapshot),
    CmdAccepted(CmdId),
    Feedback(CmdFeedback),

    /// The request could not be served.
    Error(String),
}

#[derive(thiserror::Error, Debug)]
pub enum NetError {
    #[error("Error creating the socket: {0}")]
    CreateSocketError(zmq::Error),

    #[error("Could not connect the socket: {0}")]
    CouldNotConnect(zmq::Error),

    #[error("Could not set the {0} socket option: {1}")]
    SocketOptionError(String, zmq::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SocketOptions {
    /// Set these options on the given socket.
    pub fn set(&self, socket: &Socket) -> Result<(), NetError> {
        // Set all the socket options, we use a macro here to make the error handling nice and
        // easy
        set_sockopts!(
            socket,
            (set_connect_timeout, self.connect_timeout),
            (set_linger, self.linger),
            (set_rcvtimeo, self.recv_timeout),
            (set_sndtimeo, self.send_timeout)
        );

        // If the socket is a req type set the req-specific options
        if let Ok(SocketType::REQ) = socket.get_socket_type() {
            set_sockopts!(
                socket,
                (set_req_correlate, self.req_correlate),
                (set_req_relaxed, self.req_relaxed)
            );
        }

        Ok(())
    }
}

impl Default for SocketOptions {
    fn default() -> Self {
        // Defaults for sockopts taken from http://api.zeromq.org/4-2:zmq-setsockopt
        Self {
            bind: false,
            connect_timeout: 0,
            linger: 30_000,
            recv_timeout: -1,
            req_correlate: false,
            req_relaxed: false,
            send_timeout: -1,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Create a socket, apply the options to it, and bind or connect it to the endpoint.
///
/// ## Arguments
/// - `ctx`: the zmq context which will be used to create the socket
/// - `socket_type`: the type of zmq socket to create
/// - `socket_options`: a [`SocketOptions`] struct specifying how to configure the socket
/// - `endpoint`: a zmq endpoint string, such as `"tcp://localhost:5040"`
pub fn open_socket(
    ctx: &Context,
    socket_type: SocketType,
    socket_options: &SocketOptions,
    endpoint: &str,
) -> Result<Socket, NetError> {
    let socket = ctx
        .socket(socket_type)
        .map_err(NetError::CreateSocketError)?;

    socket_options.set(&socket)?;

    match socket_options.bind {
        false => socket.connect(endpoint),
        true => socket.bind(endpoint),
    }
    .map_err(NetError::CouldNotConnect)?;

    debug!(
        "{} {:?} socket to {}",
        if socket_options.bind { "Bound" } else { "Connected" },
        socket_type,
        endpoint
    );

    Ok(socket)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::{FrameId, Se2Pose};
    use chrono::TimeZone;

    #[test]
    fn test_request_json() {
        let req = RobotRequest::SubmitGoal(GoalCmd {
            goal: Se2Pose::new(1.0, -0.5, 0.25),
            frame: FrameId::Vision,
            end_time: chrono::Utc.timestamp(1_600_000_000, 0),
            stair_hint: false,
        });

        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"vision\""));

        let parsed: RobotRequest = serde_json::from_str(&json).unwrap();
        match parsed {
            RobotRequest::SubmitGoal(cmd) => {
                assert_eq!(cmd.frame, FrameId::Vision);
                assert_eq!(cmd.goal, Se2Pose::new(1.0, -0.5, 0.25));
            }
            r => panic!("Unexpected request {:?}", r),
        }
    }

    #[test]
    fn test_req_rep_inproc() {
        let ctx = zmq::Context::new();

        let server = open_socket(
            &ctx,
            zmq::REP,
            &SocketOptions {
                bind: true,
                ..Default::default()
            },
            "inproc://robot_if_test",
        )
        .unwrap();
        let client = open_socket(
            &ctx,
            zmq::REQ,
            &SocketOptions {
                recv_timeout: 1000,
                ..Default::default()
            },
            "inproc://robot_if_test",
        )
        .unwrap();

        client
            .send(&serde_json::to_string(&RobotRequest::PollFeedback(CmdId(3))).unwrap(), 0)
            .unwrap();

        let msg = server.recv_msg(0).unwrap();
        let req: RobotRequest = serde_json::from_str(msg.as_str().unwrap()).unwrap();
        match req {
            RobotRequest::PollFeedback(id) => assert_eq!(id, CmdId(3)),
            r => panic!("Unexpected request {:?}", r),
        }
        server
            .send(
                &serde_json::to_string(&RobotResponse::Feedback(CmdFeedback::settled())).unwrap(),
                0,
            )
            .unwrap();

        let msg = client.recv_msg(0).unwrap();
        let resp: RobotResponse = serde_json::from_str(msg.as_str().unwrap()).unwrap();
        match resp {
            RobotResponse::Feedback(fb) => assert_eq!(fb, CmdFeedback::settled()),
            r => panic!("Unexpected response {:?}", r),
        }
    }
}
