//! CLI output: error mapping from runtime errors to stable CLI surface.

use crate::error::RuntimeError;

/// Map runtime errors to a string for CLI output.
pub fn map_error(e: &RuntimeError) -> String {
    match e {
        RuntimeError::UnknownSurface(label) => {
            format!("Scenario refers to surface '{}' before it was created", label)
        }
        other => other.to_string(),
    }
}
