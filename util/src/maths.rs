//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Wrap an angle into the range (-pi, pi].
///
/// A value of exactly -pi maps to +pi, so a half turn is always reported as positive.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float,
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let mut wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    if wrapped <= -pi_t {
        wrapped = wrapped + tau_t;
    }
    if wrapped > pi_t {
        wrapped = wrapped - tau_t;
    }

    wrapped
}

/// Get the shortest signed angular distance to go from `a` to `b`.
///
/// The result is in (-pi, pi], positive being in the direction of increasing angle.
pub fn get_ang_dist<T>(a: T, b: T) -> T
where
    T: Float,
{
    wrap_pi(b - a)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{PI, TAU};

    const EPS: f64 = 1e-12;

    #[test]
    fn test_wrap_pi() {
        assert_eq!(wrap_pi(0f64), 0f64);
        assert!((wrap_pi(PI) - PI).abs() < EPS);
        assert!((wrap_pi(-PI) - PI).abs() < EPS);
        assert!((wrap_pi(TAU) - 0.0).abs() < EPS);
        assert!((wrap_pi(1.5 * PI) + 0.5 * PI).abs() < EPS);
        assert!((wrap_pi(-1.5 * PI) - 0.5 * PI).abs() < EPS);
    }

    #[test]
    fn test_wrap_pi_range() {
        let mut angle = -20.0;
        while angle < 20.0 {
            let w = wrap_pi(angle);
            assert!(w > -PI && w <= PI, "wrap_pi({}) = {}", angle, w);

            // Wrapping must not change the rotation itself
            let diff = rem_euclid(angle - w, TAU);
            assert!(diff < 1e-9 || (TAU - diff) < 1e-9);

            angle += 0.01;
        }
    }

    #[test]
    fn test_get_ang_dist() {
        assert!((get_ang_dist(1f64, 2f64) - 1.0).abs() < EPS);
        assert!((get_ang_dist(2f64, 1f64) + 1.0).abs() < EPS);
        assert!(get_ang_dist(0f64, TAU).abs() < EPS);
        assert!((get_ang_dist(0.1f64, TAU - 0.1) + 0.2).abs() < 1e-9);
    }
}
