// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel through reports and logs)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Structural Errors (malformed tree specs, caller contract violations)
    // ========================================================================
    #[error("Malformed tree: {reason}")]
    Structural { reason: String },

    // ========================================================================
    // Validation Errors (user-supplied strings)
    // ========================================================================
    #[error("Invalid {field} '{value}': {reason}")]
    Validation {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    pub(crate) fn structural(reason: impl Into<String>) -> Self {
        Self::Structural {
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Structural { reason } => vec![
                "The package layout description is malformed".into(),
                format!("Details: {}", reason),
            ],
            Self::Validation { field, .. } => match *field {
                "package" => vec![
                    "Package names start with a letter".into(),
                    "Use only letters, hyphens and underscores".into(),
                    "Examples: demo, my-package, my_package".into(),
                ],
                "version" => vec!["Versions look like 0.1 or 1.2.3".into()],
                "email" => vec!["Emails look like name@example.com".into()],
                "user" => vec![
                    "Usernames are alphanumeric with single inner hyphens".into(),
                ],
                _ => vec![format!("Check the value given for {}", field)],
            },
            Self::MissingRequiredField { field } => {
                vec![format!("Provide a value for '{}'", field)]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Structural { .. } => ErrorCategory::Structure,
            Self::Validation { .. } | Self::MissingRequiredField { .. } => {
                ErrorCategory::Validation
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Structure,
}
