//! Error types for profile workflows.
//!
//! Every provider method and workflow step returns `Result<_, ProfileError>`;
//! errors are values surfaced to the UI as a single message plus an optional
//! field marker. Nothing is retried automatically and no failure is fatal to
//! the process.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The editor field an error relates to, for UI focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorField {
    /// The public display name input
    DisplayName,
    /// The custom slug input
    Slug,
    /// The link list
    Links,
}

/// Errors produced by profile workflows and providers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// User input failed validation
    #[error("{message}")]
    Validation {
        /// The field the message relates to, when there is a single one
        field: Option<EditorField>,
        /// Human-readable description
        message: String,
    },

    /// The requested slug is already taken by another profile
    #[error("the public name '{slug}' is already in use")]
    SlugConflict {
        /// The conflicting slug
        slug: String,
    },

    /// A record was not found
    #[error("{what} not found")]
    NotFound {
        /// What was being looked up ("profile", "link", ...)
        what: String,
    },

    /// The backing store reported an error
    #[error("backend error: {message}")]
    Backend {
        /// Human-readable description extracted from the backend
        message: String,
    },

    /// A multi-step write completed partially
    ///
    /// The create and update paths are not atomic: a profile row can exist
    /// without its links, or links can be deleted without their replacements
    /// landing. This is surfaced honestly rather than rolled back.
    #[error("partial write: {message}")]
    PartialWrite {
        /// Which step failed and what state the data was left in
        message: String,
    },

    /// No authenticated user in the session context
    #[error("not authenticated")]
    Unauthenticated,

    /// The QR renderer failed
    #[error("QR export failed: {message}")]
    QrExport {
        /// Renderer-reported reason
        message: String,
    },
}

impl ProfileError {
    /// Shorthand for a validation error without a field marker.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Shorthand for a backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        let err = ProfileError::SlugConflict {
            slug: "ana-perez".into(),
        };
        assert_eq!(err.to_string(), "the public name 'ana-perez' is already in use");

        let err = ProfileError::validation("Display name is required");
        assert_eq!(err.to_string(), "Display name is required");
    }
}
