//! # Robot Client
//!
//! This module provides networking abstractions to connect to a robot server, such as the one
//! hosted by the `robot_sim` executable.
//!
//! Requests are made over a single REQ socket, with every call blocking until the server replies
//! or the socket times out.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;

use robot_if::{
    net::{open_socket, zmq, NetError, RobotRequest, RobotResponse, SocketOptions},
    CmdFeedback, CmdId, CommandClient, GoalCmd, RobotIfError, StateClient, TransformSnapshot,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct RobotClient {
    socket: zmq::Socket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum RobotClientError {
    #[error("Socket error: {0}")]
    SocketError(NetError),

    #[error("Could not send the request to the server: {0}")]
    SendError(zmq::Error),

    #[error("Could not recieve a message from the server: {0}")]
    RecvError(zmq::Error),

    #[error("Could not serialize the request: {0}")]
    SerializationError(serde_json::Error),

    #[error("Could not deserialize the response from the server: {0}")]
    DeserializeError(serde_json::Error),

    #[error("The server sent a non-UTF8 response")]
    NonUtf8Response,

    #[error("Expected a {0} response but got {1:?}")]
    UnexpectedResponse(&'static str, RobotResponse),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RobotClient {
    /// Create a new client connected to the robot server at the given endpoint.
    pub fn new(ctx: &zmq::Context, endpoint: &str) -> Result<Self, RobotClientError> {
        let socket_options = SocketOptions {
            connect_timeout: 1000,
            linger: 1,
            recv_timeout: 1000,
            send_timeout: 1000,
            req_correlate: true,
            req_relaxed: true,
            ..Default::default()
        };

        let socket = open_socket(ctx, zmq::REQ, &socket_options, endpoint)
            .map_err(RobotClientError::SocketError)?;

        Ok(Self { socket })
    }

    /// Send a request to the server and wait for its response.
    fn request(&mut self, request: &RobotRequest) -> Result<RobotResponse, RobotClientError> {
        let req_str =
            serde_json::to_string(request).map_err(RobotClientError::SerializationError)?;

        trace!("RobotClient -> {}", req_str);

        self.socket
            .send(&req_str, 0)
            .map_err(RobotClientError::SendError)?;

        let msg = self
            .socket
            .recv_msg(0)
            .map_err(RobotClientError::RecvError)?;

        let rep_str = msg.as_str().ok_or(RobotClientError::NonUtf8Response)?;

        trace!("RobotClient <- {}", rep_str);

        serde_json::from_str(rep_str).map_err(RobotClientError::DeserializeError)
    }
}

impl From<RobotClientError> for RobotIfError {
    fn from(e: RobotClientError) -> Self {
        match e {
            RobotClientError::UnexpectedResponse(_, RobotResponse::Error(msg)) => {
                RobotIfError::Rejected(msg)
            }
            e => RobotIfError::Transport(e.to_string()),
        }
    }
}

impl StateClient for RobotClient {
    fn get_transform_snapshot(&mut self) -> Result<TransformSnapshot, RobotIfError> {
        match self.request(&RobotRequest::GetTransforms)? {
            RobotResponse::Transforms(snapshot) => Ok(snapshot),
            r => Err(RobotClientError::UnexpectedResponse("Transforms", r).into()),
        }
    }
}

impl CommandClient for RobotClient {
    fn submit_goal(&mut self, cmd: &GoalCmd) -> Result<CmdId, RobotIfError> {
        match self.request(&RobotRequest::SubmitGoal(cmd.clone()))? {
            RobotResponse::CmdAccepted(id) => Ok(id),
            r => Err(RobotClientError::UnexpectedResponse("CmdAccepted", r).into()),
        }
    }

    fn poll_feedback(&mut self, id: CmdId) -> Result<CmdFeedback, RobotIfError> {
        match self.request(&RobotRequest::PollFeedback(id))? {
            RobotResponse::Feedback(fb) => Ok(fb),
            r => Err(RobotClientError::UnexpectedResponse("Feedback", r).into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim_robot::{SimRobot, SimRobotParams};
    use crate::robot_server::serve_request;
    use robot_if::FrameId;
    use std::thread;

    /// Serve `num_requests` requests from a sim robot on an inproc socket.
    fn spawn_server(
        ctx: &zmq::Context,
        endpoint: &'static str,
        num_requests: usize,
    ) -> thread::JoinHandle<SimRobot> {
        let socket = open_socket(
            ctx,
            zmq::REP,
            &SocketOptions {
                bind: true,
                ..Default::default()
            },
            endpoint,
        )
        .unwrap();

        thread::spawn(move || {
            let mut robot = SimRobot::new(SimRobotParams::default());
            for _ in 0..num_requests {
                let msg = socket.recv_msg(0).unwrap();
                let response = serve_request(&mut robot, msg.as_str().unwrap());
                socket
                    .send(&serde_json::to_string(&response).unwrap(), 0)
                    .unwrap();
            }
            robot
        })
    }

    #[test]
    fn test_client_against_sim() {
        let ctx = zmq::Context::new();
        let server = spawn_server(&ctx, "inproc://robot_client_test", 3);

        let mut client = RobotClient::new(&ctx, "inproc://robot_client_test").unwrap();

        let snapshot = client.get_transform_snapshot().unwrap();
        assert!(snapshot.get_frame_tform_body(FrameId::Vision).is_ok());

        let cmd = GoalCmd {
            goal: snapshot.get_frame_tform_body(FrameId::Odom).unwrap(),
            frame: FrameId::Odom,
            end_time: chrono::Utc::now() + chrono::Duration::seconds(10),
            stair_hint: false,
        };
        let id = client.submit_goal(&cmd).unwrap();
        assert_eq!(id, CmdId(0));

        // Unknown commands are reported by the server as errors
        assert!(matches!(
            client.poll_feedback(CmdId(5)),
            Err(RobotIfError::Rejected(_))
        ));

        let robot = server.join().unwrap();
        assert_eq!(robot.submitted().len(), 1);
    }
}
