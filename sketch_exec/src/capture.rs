//! # Waypoint capture
//!
//! Accumulates the waypoints sketched by the user. A [`PlanningSession`] is seeded with the
//! robot's start position, grows by appending waypoints, and is finally consumed into an
//! immutable [`Waypoints`] value which is handed to the planner.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use nalgebra::Point2;
use serde::Deserialize;
use std::io::Read;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Waypoints being captured, in capture space (pixels).
#[derive(Debug, Clone)]
pub struct PlanningSession {
    points: Vec<Point2<f64>>,
}

/// The finished sequence of waypoints, the first being the robot's start position.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoints(Vec<Point2<f64>>);

/// A row of a waypoints CSV file.
#[derive(Debug, Deserialize)]
struct WaypointRecord {
    x: f64,
    y: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Waypoints must have finite coordinates, found ({0}, {1})")]
    NonFinitePoint(f64, f64),

    #[error("Could not read the waypoints file: {0}")]
    CsvError(csv::Error),

    #[error("Could not parse \"{0}\" as a waypoint, expected \"x y\" or \"x,y\"")]
    ParseError(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PlanningSession {
    /// Start a new session at the robot's start position.
    pub fn new(start: Point2<f64>) -> Result<Self, CaptureError> {
        check_finite(&start)?;

        Ok(Self {
            points: vec![start],
        })
    }

    /// Append a waypoint to the end of the sequence.
    pub fn add_waypoint(&mut self, point: Point2<f64>) -> Result<(), CaptureError> {
        check_finite(&point)?;

        debug!("Adding a new waypoint: ({}, {})", point.x, point.y);
        self.points.push(point);

        Ok(())
    }

    /// Number of waypoints captured, including the start position.
    pub fn num_waypoints(&self) -> usize {
        self.points.len()
    }

    /// The most recently added waypoint.
    pub fn last(&self) -> Point2<f64> {
        // Never empty, the start position is always present
        self.points[self.points.len() - 1]
    }

    /// End the capture.
    pub fn finish(self) -> Waypoints {
        Waypoints(self.points)
    }
}

impl Waypoints {
    pub fn points(&self) -> &[Point2<f64>] {
        &self.0
    }

    pub fn start(&self) -> Point2<f64> {
        self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Read waypoints from a CSV file with an `x,y` header and append them to the session.
///
/// Returns the number of waypoints added.
pub fn read_waypoints_csv<R: Read>(
    session: &mut PlanningSession,
    reader: R,
) -> Result<usize, CaptureError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut num_added = 0;

    for record in csv_reader.deserialize() {
        let record: WaypointRecord = record.map_err(CaptureError::CsvError)?;
        session.add_waypoint(Point2::new(record.x, record.y))?;
        num_added += 1;
    }

    Ok(num_added)
}

/// Parse a waypoint typed at the prompt, either `x y` or `x,y`.
pub fn parse_waypoint_line(line: &str) -> Result<Point2<f64>, CaptureError> {
    let parts: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() != 2 {
        return Err(CaptureError::ParseError(line.into()));
    }

    let x = parts[0]
        .parse::<f64>()
        .map_err(|_| CaptureError::ParseError(line.into()))?;
    let y = parts[1]
        .parse::<f64>()
        .map_err(|_| CaptureError::ParseError(line.into()))?;

    let point = Point2::new(x, y);
    check_finite(&point)?;

    Ok(point)
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn check_finite(point: &Point2<f64>) -> Result<(), CaptureError> {
    if point.x.is_finite() && point.y.is_finite() {
        Ok(())
    } else {
        Err(CaptureError::NonFinitePoint(point.x, point.y))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_session() {
        let mut session = PlanningSession::new(Point2::new(100.0, 700.0)).unwrap();
        assert_eq!(session.num_waypoints(), 1);

        session.add_waypoint(Point2::new(120.0, 400.0)).unwrap();
        session.add_waypoint(Point2::new(380.0, 410.0)).unwrap();
        assert!(session.add_waypoint(Point2::new(f64::NAN, 0.0)).is_err());
        assert_eq!(session.last(), Point2::new(380.0, 410.0));

        let waypoints = session.finish();
        assert_eq!(waypoints.len(), 3);
        assert_eq!(waypoints.start(), Point2::new(100.0, 700.0));
        assert_eq!(waypoints.points()[1], Point2::new(120.0, 400.0));

        assert!(PlanningSession::new(Point2::new(0.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_read_csv() {
        let data = "x, y\n120, 400\n380.5, 410\n";
        let mut session = PlanningSession::new(Point2::new(100.0, 700.0)).unwrap();

        assert_eq!(read_waypoints_csv(&mut session, data.as_bytes()).unwrap(), 2);
        assert_eq!(session.last(), Point2::new(380.5, 410.0));

        let bad = "x,y\n120,abc\n";
        assert!(matches!(
            read_waypoints_csv(&mut session, bad.as_bytes()),
            Err(CaptureError::CsvError(_))
        ));
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_waypoint_line("120 400").unwrap(),
            Point2::new(120.0, 400.0)
        );
        assert_eq!(
            parse_waypoint_line(" 12.5, -3 ").unwrap(),
            Point2::new(12.5, -3.0)
        );
        assert!(parse_waypoint_line("120").is_err());
        assert!(parse_waypoint_line("a b").is_err());
        assert!(parse_waypoint_line("1 2 3").is_err());
        assert!(parse_waypoint_line("inf 2").is_err());
    }
}
