//! # Robot Server
//!
//! Serves [`RobotRequest`]s from network clients on behalf of a local robot implementation.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{trace, warn};

use robot_if::{
    net::{zmq, RobotRequest, RobotResponse},
    CommandClient, StateClient,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum RobotServerError {
    #[error("Could not recieve a request: {0}")]
    RecvError(zmq::Error),

    #[error("Could not send the response: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the response: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Decode a single request string, pass it to the robot, and build the response.
///
/// Malformed requests and robot errors become [`RobotResponse::Error`] so that the client always
/// gets a reply.
pub fn serve_request<R>(robot: &mut R, request: &str) -> RobotResponse
where
    R: StateClient + CommandClient,
{
    let request: RobotRequest = match serde_json::from_str(request) {
        Ok(r) => r,
        Err(e) => {
            warn!("Malformed request: {}", e);
            return RobotResponse::Error(format!("Malformed request: {}", e));
        }
    };

    trace!("Serving {:?}", request);

    let response = match request {
        RobotRequest::GetTransforms => robot
            .get_transform_snapshot()
            .map(RobotResponse::Transforms),
        RobotRequest::SubmitGoal(cmd) => robot.submit_goal(&cmd).map(RobotResponse::CmdAccepted),
        RobotRequest::PollFeedback(id) => robot.poll_feedback(id).map(RobotResponse::Feedback),
    };

    response.unwrap_or_else(|e| RobotResponse::Error(e.to_string()))
}

/// Wait for one request on the REP socket and reply to it.
///
/// Returns `Ok(false)` if no request arrived before the socket's receive timeout.
pub fn serve_one<R>(socket: &zmq::Socket, robot: &mut R) -> Result<bool, RobotServerError>
where
    R: StateClient + CommandClient,
{
    let msg = match socket.recv_msg(0) {
        Ok(m) => m,
        Err(zmq::Error::EAGAIN) => return Ok(false),
        Err(e) => return Err(RobotServerError::RecvError(e)),
    };

    let response = match msg.as_str() {
        Some(s) => serve_request(robot, s),
        None => RobotResponse::Error("Request was not valid UTF8".into()),
    };

    let rep_str =
        serde_json::to_string(&response).map_err(RobotServerError::SerializationError)?;

    socket
        .send(&rep_str, 0)
        .map_err(RobotServerError::SendError)?;

    Ok(true)
}
