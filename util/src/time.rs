//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Convert a number of seconds into a duration.
///
/// Negative or non-finite values produce a zero duration.
pub fn seconds_to_duration(seconds: f64) -> chrono::Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return chrono::Duration::zero();
    }

    chrono::Duration::nanoseconds((seconds * NANOS_PER_SECOND as f64) as i64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_conversion() {
        assert_eq!(duration_to_seconds(chrono::Duration::milliseconds(1500)), Some(1.5));
        assert_eq!(seconds_to_duration(0.25), chrono::Duration::milliseconds(250));
        assert_eq!(seconds_to_duration(-1.0), chrono::Duration::zero());
        assert_eq!(seconds_to_duration(f64::NAN), chrono::Duration::zero());
    }
}
