//! # Path planner
//!
//! Converts a sketched sequence of waypoints in capture space into a sequence of relative
//! [`Move`]s in physical units. Every segment between two consecutive waypoints becomes a turn on
//! the spot towards the next waypoint, followed by a straight translation to it.
//!
//! ## Heading convention
//!
//! Headings are measured from the capture space Y+ axis towards the X+ axis, i.e.
//! `atan2(dx, dy)`. The robot is assumed to start facing along the capture space Y+ axis, so the
//! first turn is the heading of the first segment itself.
//!
//! Headings are computed on the displacement in capture units, before scaling. Only the
//! translation distances are scaled into meters, independently along each axis.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod moves;
mod scale;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, trace};
use nalgebra::{Point2, Vector2};
use serde::Serialize;

use util::maths::wrap_pi;

pub use moves::Move;
pub use scale::{MapParams, Scale};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Heading of the robot before the first move, measured from capture space Y+.
///
/// Units: radians
pub const INITIAL_HEADING_RAD: f64 = 0.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Summary of a planned move sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlanSummary {
    /// Number of (turn, translate) segments in the plan.
    pub num_segments: usize,

    /// Sum of all translation distances.
    ///
    /// Units: meters
    pub total_dist_m: f64,

    /// Sum of the absolute value of all turns.
    ///
    /// Units: radians
    pub total_turn_rad: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("The segment ending at waypoint {} is degenerate", .index + 1)]
    InvalidSegment { index: usize },

    #[error("Scale factors must be positive and finite, found x = {x_m_per_px}, y = {y_m_per_px}")]
    InvalidScale { x_m_per_px: f64, y_m_per_px: f64 },
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Plan the moves which take the robot along the given waypoints.
///
/// The first point is the robot's start position. Fewer than two points produce an empty plan.
/// Zero length segments are skipped, and don't change the heading used for the next turn. A
/// segment with a non-finite coordinate is an [`PlanError::InvalidSegment`].
pub fn plan(points: &[Point2<f64>], scale: &Scale) -> Result<Vec<Move>, PlanError> {
    let mut moves = Vec::with_capacity(2 * points.len().saturating_sub(1));

    // Heading of the last segment that produced moves
    let mut heading_rad = INITIAL_HEADING_RAD;

    for (index, pair) in points.windows(2).enumerate() {
        let delta_px = pair[1] - pair[0];

        if !(delta_px.x.is_finite() && delta_px.y.is_finite()) {
            return Err(PlanError::InvalidSegment { index });
        }

        if delta_px.x == 0.0 && delta_px.y == 0.0 {
            debug!("Skipping zero length segment to waypoint {}", index + 1);
            continue;
        }

        let delta_m = scale.to_meters(delta_px);

        // Note x over y, heading is measured from the Y+ axis
        let seg_heading_rad = delta_px.x.atan2(delta_px.y);
        let turn_rad = wrap_pi(seg_heading_rad - heading_rad);
        heading_rad = seg_heading_rad;

        trace!(
            "Segment {}: heading {:.2} deg, turn {:.2} deg, length {:.3} m",
            index,
            seg_heading_rad.to_degrees(),
            turn_rad.to_degrees(),
            delta_m.norm()
        );

        moves.push(Move::Turn {
            angle_rad: turn_rad,
        });
        moves.push(Move::Translate {
            dist_m: delta_m.norm(),
        });
    }

    Ok(moves)
}

/// Dead reckon a move sequence from the given start point.
///
/// The returned polyline is in meters, starts at `start_m`, and has one point per translation.
/// The robot is assumed to start at [`INITIAL_HEADING_RAD`]. For an isotropic scale this
/// recovers the scaled waypoints.
pub fn replay(moves: &[Move], start_m: Point2<f64>) -> Vec<Point2<f64>> {
    let mut points = vec![start_m];
    let mut position = start_m;
    let mut heading_rad = INITIAL_HEADING_RAD;

    for mv in moves {
        match *mv {
            Move::Turn { angle_rad } => heading_rad = wrap_pi(heading_rad + angle_rad),
            Move::Translate { dist_m } => {
                position += dist_m * Vector2::new(heading_rad.sin(), heading_rad.cos());
                points.push(position);
            }
        }
    }

    points
}

impl PlanSummary {
    pub fn from_moves(moves: &[Move]) -> Self {
        moves
            .iter()
            .fold(PlanSummary::default(), |mut summary, mv| {
                match *mv {
                    Move::Turn { angle_rad } => summary.total_turn_rad += angle_rad.abs(),
                    Move::Translate { dist_m } => {
                        summary.num_segments += 1;
                        summary.total_dist_m += dist_m
                    }
                }
                summary
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

    const EPS: f64 = 1e-9;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point2<f64>> {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn turns(moves: &[Move]) -> Vec<f64> {
        moves
            .iter()
            .filter_map(|m| match m {
                Move::Turn { angle_rad } => Some(*angle_rad),
                _ => None,
            })
            .collect()
    }

    fn dists(moves: &[Move]) -> Vec<f64> {
        moves
            .iter()
            .filter_map(|m| match m {
                Move::Translate { dist_m } => Some(*dist_m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_square_corner() {
        let scale = Scale::isotropic(0.01).unwrap();
        let moves = plan(&pts(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0)]), &scale).unwrap();

        assert_eq!(moves.len(), 4);
        assert!(moves[0].is_turn() && !moves[1].is_turn());
        assert!(moves[2].is_turn() && !moves[3].is_turn());

        let t = turns(&moves);
        assert!(t[0].abs() < EPS);
        assert!((t[1] - FRAC_PI_2).abs() < EPS);

        let d = dists(&moves);
        assert!((d[0] - 1.0).abs() < EPS);
        assert!((d[1] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_too_few_points() {
        let scale = Scale::isotropic(0.01).unwrap();

        assert!(plan(&[], &scale).unwrap().is_empty());
        assert!(plan(&pts(&[(220.0, 650.0)]), &scale).unwrap().is_empty());

        // One segment is exactly one turn followed by one translation
        let moves = plan(&pts(&[(220.0, 650.0), (300.0, 650.0)]), &scale).unwrap();
        match moves.as_slice() {
            [Move::Turn { angle_rad }, Move::Translate { dist_m }] => {
                assert!((angle_rad - FRAC_PI_2).abs() < EPS);
                assert!((dist_m - 0.8).abs() < EPS);
            }
            m => panic!("Expected one turn then one translation, got {:?}", m),
        }
    }

    #[test]
    fn test_straight_line() {
        let scale = Scale::new(0.01, 0.02).unwrap();
        let moves = plan(
            &pts(&[(0.0, 0.0), (10.0, 20.0), (30.0, 60.0), (35.0, 70.0)]),
            &scale,
        )
        .unwrap();

        let t = turns(&moves);
        assert_eq!(t.len(), 3);
        assert!((t[0] - 10f64.atan2(20.0)).abs() < EPS);
        for turn in &t[1..] {
            assert!(turn.abs() < EPS, "turn = {}", turn);
        }
    }

    #[test]
    fn test_anisotropic_heading() {
        let scale = Scale::new(0.01, 0.02).unwrap();
        let moves = plan(&pts(&[(0.0, 0.0), (1.0, 1.0)]), &scale).unwrap();

        // Heading follows the capture space diagonal, only the distance is scaled
        assert!((turns(&moves)[0] - FRAC_PI_4).abs() < EPS);
        assert!((dists(&moves)[0] - 0.0005f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_shortest_turn() {
        let scale = Scale::isotropic(1.0).unwrap();

        // Heading goes from just under +pi to just over -pi, which must be a small left turn
        // rather than almost a full turn to the right.
        let moves = plan(&pts(&[(0.0, 0.0), (1.0, -100.0), (0.0, -200.0)]), &scale).unwrap();
        let t = turns(&moves);
        assert!(t[1].abs() < 0.1, "turn = {}", t[1]);

        // A full reversal is a half turn, reported as +pi
        let moves = plan(&pts(&[(0.0, 0.0), (0.0, 10.0), (0.0, 0.0)]), &scale).unwrap();
        let t = turns(&moves);
        assert!((t[1] - PI).abs() < EPS);
    }

    #[test]
    fn test_turn_range_and_equivalence() {
        let scale = Scale::isotropic(1.0).unwrap();

        // Points spread around a circle in a scrambled order give a wide variety of headings
        let points: Vec<Point2<f64>> = (0..64)
            .map(|i| {
                let a = (i * 37 % 64) as f64 / 64.0 * TAU;
                Point2::new(100.0 * a.cos() + i as f64, 100.0 * a.sin())
            })
            .collect();
        let moves = plan(&points, &scale).unwrap();

        let mut heading_prev = INITIAL_HEADING_RAD;
        let mut turn_iter = turns(&moves).into_iter();
        for pair in points.windows(2) {
            let d = pair[1] - pair[0];
            let heading_next = d.x.atan2(d.y);
            let turn = turn_iter.next().unwrap();

            assert!(turn > -PI && turn <= PI);

            // Same rotation modulo a full turn
            let diff = util::maths::rem_euclid(turn - (heading_next - heading_prev), TAU);
            assert!(diff < EPS || (TAU - diff) < EPS);

            heading_prev = heading_next;
        }
    }

    #[test]
    fn test_zero_length_segments_skipped() {
        let scale = Scale::isotropic(0.01).unwrap();
        let with_dup = plan(
            &pts(&[(0.0, 0.0), (0.0, 100.0), (0.0, 100.0), (100.0, 100.0)]),
            &scale,
        )
        .unwrap();
        let without_dup =
            plan(&pts(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0)]), &scale).unwrap();

        assert_eq!(with_dup, without_dup);

        // Only a repeated start gives no moves at all
        assert!(plan(&pts(&[(5.0, 5.0), (5.0, 5.0)]), &scale)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_invalid_segment() {
        let scale = Scale::isotropic(0.01).unwrap();
        let res = plan(
            &pts(&[(0.0, 0.0), (0.0, 100.0), (f64::NAN, 100.0)]),
            &scale,
        );

        assert_eq!(res, Err(PlanError::InvalidSegment { index: 1 }));
    }

    #[test]
    fn test_deterministic() {
        let scale = Scale::new(0.0061, 0.0061).unwrap();
        let points = pts(&[(100.0, 700.0), (120.0, 420.0), (380.0, 410.0), (390.0, 90.0)]);

        let a = plan(&points, &scale).unwrap();
        let b = plan(&points, &scale).unwrap();

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_replay_round_trip() {
        let scale = Scale::isotropic(0.0061).unwrap();
        let points = pts(&[
            (100.0, 700.0),
            (120.0, 420.0),
            (380.0, 410.0),
            (390.0, 90.0),
            (60.0, 95.0),
            (80.0, 650.0),
        ]);

        let moves = plan(&points, &scale).unwrap();
        let replayed = replay(&moves, Point2::origin());

        assert_eq!(replayed.len(), points.len());
        for (p_px, r_m) in points.iter().zip(replayed.iter()) {
            let expected_m = scale.to_meters(*p_px - points[0]);
            assert!((expected_m - r_m.coords).norm() < 1e-9);
        }
    }

    #[test]
    fn test_summary() {
        let moves = vec![
            Move::Turn { angle_rad: -0.5 },
            Move::Translate { dist_m: 1.0 },
            Move::Turn { angle_rad: 0.25 },
            Move::Translate { dist_m: 2.0 },
        ];

        let summary = PlanSummary::from_moves(&moves);
        assert_eq!(summary.num_segments, 2);
        assert!((summary.total_dist_m - 3.0).abs() < EPS);
        assert!((summary.total_turn_rad - 0.75).abs() < EPS);
    }
}
