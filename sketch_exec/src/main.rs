//! Main sketch navigation executable.
//!
//! # Architecture
//!
//! The executable runs once through the following steps:
//!
//!     - Initialise the session and logging
//!     - Load parameters
//!     - Capture the waypoints, either from a CSV file or typed at the prompt
//!     - Plan the turn and translate moves between the waypoints
//!     - Execute the moves on the robot, or on the simulated robot with `--sim`
//!
//! Execution stops at the first move that fails, reporting how many moves completed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{error, info, warn};
use nalgebra::Point2;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs::File, path::PathBuf};
use structopt::StructOpt;

// Internal
use robot_if::{CommandClient, FrameId, StateClient};
use sketch_lib::{
    capture::{parse_waypoint_line, read_waypoints_csv, PlanningSession},
    motion_exec::{execute, MotionError},
    params::SketchExecParams,
    path_planner::{plan, replay, Move, PlanSummary, Scale},
    sim_robot::{SimRobot, SimRobotParams},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const PROMPT: &str = "waypoint $ ";

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Drive a robot along a route sketched on a map.
#[derive(Debug, StructOpt)]
#[structopt(name = "sketch_exec")]
struct Opts {
    /// Parameter file, relative to the params directory
    #[structopt(long, default_value = "sketch_exec.toml")]
    params: String,

    /// Frame to execute the moves in (odom or vision), overrides the parameter file
    #[structopt(long)]
    frame: Option<FrameId>,

    /// CSV file of `x,y` waypoints in map pixels, otherwise waypoints are read from the prompt
    #[structopt(long, parse(from_os_str))]
    waypoints: Option<PathBuf>,

    /// Execute on the simulated robot rather than connecting to the robot server
    #[structopt(long)]
    sim: bool,

    /// Only plan the moves, don't execute them
    #[structopt(long)]
    dry_run: bool,

    /// Log at trace level
    #[structopt(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    let session = Session::new("sketch_exec", "sessions").wrap_err("Failed to create the session")?;

    let level = match opts.verbose {
        true => LevelFilter::Trace,
        false => LevelFilter::Debug,
    };
    logger_init(level, &session).wrap_err("Failed to initialise logging")?;

    info!("Sketch Navigation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: SketchExecParams =
        util::params::load(&opts.params).wrap_err("Could not load sketch_exec params")?;

    params
        .exec
        .validate()
        .wrap_err("Invalid execution parameters")?;

    let scale = Scale::from_map(&params.map).wrap_err("Invalid map parameters")?;
    let frame = opts.frame.unwrap_or(params.frame);

    info!(
        "Map scale: {:.5} m/px (x), {:.5} m/px (y), executing in the {} frame",
        scale.x_m_per_px(),
        scale.y_m_per_px(),
        frame
    );

    // ---- CAPTURE ----

    let start = Point2::new(params.start_px[0], params.start_px[1]);
    let mut planning_session =
        PlanningSession::new(start).wrap_err("Invalid start position")?;

    match opts.waypoints {
        Some(ref path) => {
            let file = File::open(path)
                .wrap_err_with(|| format!("Could not open waypoints file {:?}", path))?;
            let num = read_waypoints_csv(&mut planning_session, file)
                .wrap_err("Could not read the waypoints")?;
            info!("Loaded {} waypoints from {:?}", num, path);
        }
        None => capture_interactive(&mut planning_session)?,
    }

    let waypoints = planning_session.finish();

    // ---- PLANNING ----

    let moves = plan(waypoints.points(), &scale).wrap_err("Could not plan the route")?;

    if moves.is_empty() {
        warn!("Fewer than two waypoints given, there is nothing to do");
        return Ok(());
    }

    let summary = PlanSummary::from_moves(&moves);
    info!(
        "Planned {} moves over {} segments: {:.3} m, {:.1} deg of turning",
        moves.len(),
        summary.num_segments,
        summary.total_dist_m,
        summary.total_turn_rad.to_degrees()
    );
    for (i, mv) in moves.iter().enumerate() {
        info!("    {:3}: {}", i, mv);
    }

    if opts.dry_run {
        let start_m = Point2::from(scale.to_meters(waypoints.start().coords));
        if let Some(&end_m) = replay(&moves, start_m).last() {
            let end_px = waypoints.start() + scale.to_pixels(end_m - start_m);
            info!(
                "Dry run, the route ends at ({:.3}, {:.3}) m, ({:.0}, {:.0}) px on the map",
                end_m.x, end_m.y, end_px.x, end_px.y
            );
        }
        return Ok(());
    }

    // ---- EXECUTION ----

    let result = if opts.sim {
        let sim_params: SimRobotParams =
            util::params::load("robot_sim.toml").wrap_err("Could not load robot_sim params")?;
        let mut robot = SimRobot::new(sim_params);
        let result = run(&moves, frame, &mut robot, &params);
        info!("Simulated robot finished at {} in odom", robot.pose_odom());
        result
    } else {
        connect_and_run(&moves, frame, &params)?
    };

    result.wrap_err("Movement failed")
}

/// Read waypoints typed at the prompt until `done` is entered.
fn capture_interactive(planning_session: &mut PlanningSession) -> Result<(), Report> {
    let mut rl = DefaultEditor::new().wrap_err("Could not start the prompt")?;

    println!("Enter waypoints in map pixels as \"x y\", then \"done\" to plan the route");

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line).ok();

                match line {
                    "done" => break,
                    "undo" => warn!("Waypoints cannot be removed once added"),
                    _ => match parse_waypoint_line(line)
                        .and_then(|p| planning_session.add_waypoint(p))
                    {
                        Ok(()) => info!(
                            "Waypoint {}: {}",
                            planning_session.num_waypoints() - 1,
                            planning_session.last()
                        ),
                        Err(e) => warn!("{}", e),
                    },
                }
            }
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => return Err(eyre!("Capture cancelled")),
            Err(e) => return Err(e).wrap_err("Could not read from the prompt"),
        }
    }

    Ok(())
}

#[cfg(feature = "net")]
fn connect_and_run(
    moves: &[Move],
    frame: FrameId,
    params: &SketchExecParams,
) -> Result<Result<(), MotionError>, Report> {
    use robot_if::net::zmq;
    use sketch_lib::robot_client::RobotClient;

    let ctx = zmq::Context::new();
    let mut robot = RobotClient::new(&ctx, &params.robot_endpoint)
        .wrap_err("Could not connect to the robot server")?;
    info!("Connected to the robot at {}", params.robot_endpoint);

    Ok(run(moves, frame, &mut robot, params))
}

#[cfg(not(feature = "net"))]
fn connect_and_run(
    _moves: &[Move],
    _frame: FrameId,
    _params: &SketchExecParams,
) -> Result<Result<(), MotionError>, Report> {
    Err(eyre!("Built without network support, use --sim"))
}

/// Execute the moves on the robot and report the outcome.
fn run<R>(
    moves: &[Move],
    frame: FrameId,
    robot: &mut R,
    params: &SketchExecParams,
) -> Result<(), MotionError>
where
    R: StateClient + CommandClient,
{
    let result = execute(moves, frame, robot, &params.exec);

    match result {
        Ok(()) => info!("All {} moves completed", moves.len()),
        Err(ref e) => {
            error!("{}", e);
            if let Some(index) = e.index() {
                error!("{} of {} moves were completed", index, moves.len());
            }
        }
    }

    result
}
