//! Errors raised when building worlds, shapes and bodies.
//!
//! Only construction can fail. Once a world is running, numerical
//! degeneracies are absorbed by epsilon guards and contact cancellation.

use thiserror::Error;

/// Error returned by fallible constructors and config validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A [`PhysicsConfig`](crate::PhysicsConfig) field is out of range.
    #[error("invalid physics config: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
    /// Shape geometry that would produce NaNs or empty bounds.
    #[error("invalid shape: {0}")]
    InvalidShape(&'static str),
    /// Body mass must be positive and finite.
    #[error("invalid mass {0}: mass must be positive and finite")]
    InvalidMass(f64),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = PhysicsError::InvalidConfig {
            field: "substep",
            reason: "must be at least 1",
        };
        assert_eq!(
            err.to_string(),
            "invalid physics config: `substep` must be at least 1"
        );
        assert_eq!(
            PhysicsError::InvalidShape("circle radius must be positive").to_string(),
            "invalid shape: circle radius must be positive"
        );
        assert!(PhysicsError::InvalidMass(-1.0).to_string().contains("-1"));
    }
}
