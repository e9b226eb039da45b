//! # Robot Simulator
//!
//! Serves a simulated robot over the network so that `sketch_exec` can be tested end to end
//! without hardware.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info};

use robot_if::net::{open_socket, zmq, SocketOptions};
use sketch_lib::{
    robot_server::serve_one,
    sim_robot::{SimRobot, SimRobotParams},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of idle receive timeouts between two status reports.
const STATUS_PERIOD_TIMEOUTS: u64 = 50;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    let session = Session::new("robot_sim", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Robot Simulator\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: SimRobotParams =
        util::params::load("robot_sim.toml").wrap_err("Could not load robot_sim params")?;

    // ---- INITIALISE NETWORK ----

    let ctx = zmq::Context::new();
    let socket_options = SocketOptions {
        bind: true,
        linger: 1,
        recv_timeout: 100,
        send_timeout: 1000,
        ..Default::default()
    };
    let socket = open_socket(&ctx, zmq::REP, &socket_options, &params.endpoint)
        .wrap_err("Could not open the server socket")?;

    info!("Serving the simulated robot on {}", params.endpoint);

    let mut robot = SimRobot::new(params);

    // ---- MAIN LOOP ----

    let mut num_idle = 0u64;
    loop {
        if serve_one(&socket, &mut robot).wrap_err("Error serving a request")? {
            num_idle = 0;
        } else {
            num_idle += 1;
            if num_idle % STATUS_PERIOD_TIMEOUTS == 0 {
                debug!(
                    "Idle, robot at {} in odom after {} commands",
                    robot.pose_odom(),
                    robot.submitted().len()
                );
            }
        }
    }
}
