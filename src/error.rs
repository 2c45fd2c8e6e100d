//! Controller error types.
//!
//! Construction-time failures (a collaborator that was never supplied, a
//! config value outside its safe range) surface here instead of as a panic on
//! first use.

use std::fmt;

/// Top-level error enum for the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// A required collaborator was not supplied before the simulation was built.
    MissingCollaborator {
        /// Name of the missing collaborator (for logging).
        name: &'static str,
    },

    /// Config value is outside its safe operating range.
    UnsafeConstant {
        /// Name of the config key.
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::MissingCollaborator { name } => {
                write!(f, "required collaborator '{}' was not supplied", name)
            }
            ControllerError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for ControllerError {}

/// Convenience alias: a `Result` using `ControllerError` as the error type.
pub type ControllerResult<T> = Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collaborator_names_the_collaborator() {
        let err = ControllerError::MissingCollaborator {
            name: "ground_probe",
        };
        assert!(err.to_string().contains("ground_probe"));
    }

    #[test]
    fn unsafe_constant_reports_range() {
        let err = ControllerError::UnsafeConstant {
            name: "coyote_time",
            value: 9.0,
            safe_range: "[0.0, 5.0]",
        };
        let msg = err.to_string();
        assert!(msg.contains("coyote_time"));
        assert!(msg.contains("[0.0, 5.0]"));
    }
}
