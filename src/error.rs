//! Error types for rollcall.
//!
//! All errors are strongly typed using thiserror. Classification outcomes
//! (`Ambiguous`, `Unmatched`) are *not* errors — they are normal results that
//! drive the clarification flow. Only directory-integrity violations,
//! configuration mistakes, and uncoverable clarification answers surface here.

use thiserror::Error;

use crate::person::PersonId;

/// Directory-integrity violations detected at index build time.
///
/// These are fatal for the build: the index is unusable until the population
/// is corrected. They are never produced during resolution.
#[derive(Debug, Error)]
pub enum DirectoryIntegrityError {
    /// Two records share the same person id.
    #[error("Duplicate person id: {id}")]
    DuplicateId {
        /// The offending id.
        id: PersonId,
    },

    /// Two records share the same email address (compared case-insensitively).
    #[error("Duplicate email address '{email}' (second occurrence on person {id})")]
    DuplicateEmail {
        /// The id of the second record carrying the email.
        id: PersonId,
        /// The duplicated address.
        email: String,
    },

    /// A record has an empty or whitespace-only display name.
    #[error("Person {id} has an empty display name")]
    EmptyFullName {
        /// The offending id.
        id: PersonId,
    },

    /// A record's email address is not well-formed.
    #[error("Person {id} has a malformed email address: '{email}'")]
    MalformedEmail {
        /// The offending id.
        id: PersonId,
        /// The rejected address.
        email: String,
    },
}

/// Validation errors for resolver configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Similarity threshold must lie in [0.0, 1.0].
    #[error("Similarity threshold {value} is out of range [0.0, 1.0]")]
    ThresholdOutOfRange {
        /// The rejected value.
        value: f32,
    },

    /// The raw-hit bound must be at least 1.
    #[error("top_k must be at least 1 (got {value})")]
    InvalidTopK {
        /// The rejected value.
        value: usize,
    },
}

/// Recoverable failures while merging a clarification answer.
///
/// An `Unresolved` merge never discards already-accepted resolutions; the
/// caller re-prompts with the same session.
#[derive(Debug, Error)]
pub enum ClarificationError {
    /// No line of the user's answer covered this pending name.
    #[error("Clarification answer did not cover pending name '{name}'")]
    Unresolved {
        /// The input name still waiting for a choice.
        name: String,
    },
}

/// Top-level error type for rollcall.
#[derive(Debug, Error)]
pub enum RollcallError {
    /// Directory integrity violation at build time.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryIntegrityError),

    /// Invalid resolver configuration.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Clarification merge failure.
    #[error("Clarification error: {0}")]
    Clarification(#[from] ClarificationError),

    /// Internal invariant violation.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },
}

impl RollcallError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error is recoverable by re-prompting the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Clarification(_))
    }
}

/// Result type alias for rollcall operations.
pub type RollcallResult<T> = Result<T, RollcallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_id_message_names_the_id() {
        let err = DirectoryIntegrityError::DuplicateId {
            id: PersonId::from("42"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("42"));
        assert!(msg.contains("Duplicate person id"));
    }

    #[test]
    fn duplicate_email_message_names_the_address() {
        let err = DirectoryIntegrityError::DuplicateEmail {
            id: PersonId::from("7"),
            email: "a@b.com".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("a@b.com"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn threshold_out_of_range_message() {
        let err = ValidationError::ThresholdOutOfRange { value: 1.5 };
        let msg = format!("{err}");
        assert!(msg.contains("1.5"));
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn unresolved_is_recoverable() {
        let err: RollcallError = ClarificationError::Unresolved {
            name: "Ahmet".to_string(),
        }
        .into();
        assert!(err.is_recoverable());
        assert!(format!("{err}").contains("Ahmet"));
    }

    #[test]
    fn directory_error_is_not_recoverable() {
        let err: RollcallError = DirectoryIntegrityError::EmptyFullName {
            id: PersonId::from("1"),
        }
        .into();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn internal_error_carries_message() {
        let err = RollcallError::internal("unexpected state");
        assert!(format!("{err}").contains("unexpected state"));
    }
}
