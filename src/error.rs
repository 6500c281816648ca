//! Error taxonomy shared by the editor core and its adapters.

use thiserror::Error;

/// Input rejected locally, before any external call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Play name cannot be empty.")]
    EmptyPlayName,

    #[error("Describe the opponent formation first.")]
    EmptyFormation,

    #[error("The playbook has no plays to summarize.")]
    EmptyPlaybook,
}

/// Failures reported by a [`crate::store::PlayStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("not signed in")]
    NotSignedIn,

    #[error("failed to write play: {0}")]
    Write(String),

    #[error("failed to read playbook: {0}")]
    Read(String),
}

/// A stored diagram blob that could not be turned back into a play.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
    #[error("malformed diagram JSON: {0}")]
    Json(String),

    #[error("malformed route path `{path}`: {reason}")]
    Path { path: String, reason: String },

    #[error("`{0}` has a coordinate that is not a finite number")]
    NonFinite(String),

    #[error("id `{0}` is used by more than one player or route")]
    DuplicateId(String),
}

impl From<serde_json::Error> for DeserializationError {
    fn from(err: serde_json::Error) -> Self {
        DeserializationError::Json(err.to_string())
    }
}

/// Failures reported by a [`crate::advisor::PlayAdvisor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiServiceError {
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("AI service request failed: {0}")]
    Transport(String),

    #[error("AI service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI service returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures while exporting a printable diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("failed to parse generated SVG: {0}")]
    Svg(String),

    #[error("failed to rasterize diagram: {0}")]
    Raster(String),

    #[error("failed to write export: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(
            ValidationError::EmptyPlayName.to_string(),
            "Play name cannot be empty."
        );
    }

    #[test]
    fn json_errors_convert_to_deserialization_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let converted: DeserializationError = err.into();
        assert!(matches!(converted, DeserializationError::Json(_)));
    }
}
