//! Error types for payload decoding and event-specific validation.

use thiserror::Error;

/// The request body could not be decoded into a payload document.
///
/// Only syntax is checked here; business rules belong to [`ValidationError`].
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The text is not valid JSON (this includes an empty body).
    #[error("malformed JSON payload: {0}")]
    Syntax(#[from] serde_json::Error),
    /// The text is valid JSON but its top-level value is not an object.
    #[error("malformed JSON payload: expected an object but found {found}")]
    NotAnObject {
        /// JSON type of the top-level value (e.g. `"an array"`).
        found: &'static str,
    },
}

/// A parsed payload does not have the shape a particular event requires.
///
/// The `Display` output is returned verbatim to the caller, so it names the
/// offending field using the dotted path into the payload document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent or `null`.
    #[error("missing required field '{path}'")]
    MissingField { path: String },
    /// A field is present but has the wrong type or an unusable value.
    #[error("field '{path}' must be {expected}")]
    InvalidField {
        path: String,
        expected: &'static str,
    },
    /// The payload is well-formed but describes something this event cannot handle.
    #[error("{message}")]
    Unsupported { message: String },
}

impl ValidationError {
    pub(crate) fn missing(path: &str) -> Self {
        Self::MissingField {
            path: path.to_string(),
        }
    }

    pub(crate) fn invalid(path: &str, expected: &'static str) -> Self {
        Self::InvalidField {
            path: path.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_name_the_field() {
        let missing = ValidationError::missing("resource.repository.remoteUrl");
        assert_eq!(
            missing.to_string(),
            "missing required field 'resource.repository.remoteUrl'"
        );

        let invalid = ValidationError::invalid("resource.pullRequestId", "a positive integer");
        assert_eq!(
            invalid.to_string(),
            "field 'resource.pullRequestId' must be a positive integer"
        );
    }

    #[test]
    fn unsupported_message_is_verbatim() {
        let err = ValidationError::Unsupported {
            message: "Nothing to do here".to_string(),
        };
        assert_eq!(err.to_string(), "Nothing to do here");
    }

    #[test]
    fn payload_error_not_an_object_display() {
        let err = PayloadError::NotAnObject { found: "an array" };
        assert_eq!(
            err.to_string(),
            "malformed JSON payload: expected an object but found an array"
        );
    }
}
