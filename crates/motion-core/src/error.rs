//! Error types for the motion engine.

use thiserror::Error;

/// Result type for motion operations.
pub type Result<T> = std::result::Result<T, MotionError>;

/// Errors that can occur while binding transitions or drawing a frame.
///
/// Interpolation states (partial progress, indefinite repeat, zero-duration
/// transitions) are never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    /// A transition was addressed to a property the entity never registered.
    #[error("property `{property}` is not registered on {entity}")]
    UnknownProperty {
        entity: &'static str,
        property: String,
    },

    /// A composite drawable was drawn without its external content.
    #[error("{container} has no content assigned")]
    MissingContent { container: &'static str },

    /// An easing name did not match any known easing function.
    #[error("unknown easing function: {0}")]
    UnknownEasing(String),

    /// The drawing backend rejected a command.
    #[error("backend error: {0}")]
    Backend(String),
}
