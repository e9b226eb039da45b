//! Motion executor parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Longest end time or poll period accepted.
///
/// Units: seconds
pub const MAX_TIME_S: f64 = 86_400.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the motion executor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecParams {
    /// Time after dispatch at which each goal command expires. The executor stops waiting for a
    /// move once this has passed.
    ///
    /// Units: seconds
    pub cmd_end_time_s: f64,

    /// Period between two feedback requests for the executing move.
    ///
    /// Units: seconds
    pub poll_period_s: f64,

    /// Tell the robot it may encounter stairs.
    #[serde(default)]
    pub stair_hint: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ExecParamsError {
    #[error("The command end time must be positive and at most {max} s, found {0} s", max = MAX_TIME_S)]
    InvalidEndTime(f64),

    #[error("The poll period must be positive and at most {max} s, found {0} s", max = MAX_TIME_S)]
    InvalidPollPeriod(f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ExecParams {
    /// Check the parameters can be used for execution.
    ///
    /// A zero poll period would spin on the robot's feedback service.
    pub fn validate(&self) -> Result<(), ExecParamsError> {
        if !in_time_range(self.cmd_end_time_s) {
            return Err(ExecParamsError::InvalidEndTime(self.cmd_end_time_s));
        }
        if !in_time_range(self.poll_period_s) {
            return Err(ExecParamsError::InvalidPollPeriod(self.poll_period_s));
        }

        Ok(())
    }
}

impl Default for ExecParams {
    fn default() -> Self {
        Self {
            cmd_end_time_s: 10.0,
            poll_period_s: 0.05,
            stair_hint: false,
        }
    }
}

fn in_time_range(time_s: f64) -> bool {
    time_s > 0.0 && time_s <= MAX_TIME_S
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ExecParams::default().validate().is_ok());

        let params = ExecParams {
            cmd_end_time_s: 1e20,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ExecParamsError::InvalidEndTime(1e20)));

        let params = ExecParams {
            poll_period_s: f64::INFINITY,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ExecParamsError::InvalidPollPeriod(f64::INFINITY))
        );

        let params = ExecParams {
            cmd_end_time_s: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
