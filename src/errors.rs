//! Unified error types for the gradebook.
//!
//! The grading engine itself never fails; these errors come from the record
//! store, from boundary validation of incoming marks, and from configuration.

use thiserror::Error;

/// Every failure the crate can surface to a caller.
#[derive(Debug, Error)]
pub enum Error {
    /// The record store rejected or failed a request
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A record failed boundary validation before reaching the store
    #[error("Validation error: {message}")]
    Validation {
        /// What was rejected
        message: String,
    },

    /// Marks outside `0..=max_marks`
    #[error("Invalid marks {marks}: must be between 0 and {max_marks}")]
    InvalidMarks {
        /// Marks as entered
        marks: f64,
        /// Maximum allowed for the subject
        max_marks: f64,
    },

    #[error("Student not found: {id}")]
    #[allow(missing_docs)]
    StudentNotFound { id: i64 },

    #[error("Subject not found: {id}")]
    #[allow(missing_docs)]
    SubjectNotFound { id: i64 },

    #[error("Exam type not found: {id}")]
    #[allow(missing_docs)]
    ExamTypeNotFound { id: i64 },

    #[error("Assessment not found: {id}")]
    #[allow(missing_docs)]
    AssessmentNotFound { id: i64 },

    /// The school singleton has not been saved yet
    #[error("School information has not been configured")]
    SchoolNotConfigured,

    /// Filesystem failure (writing a rendered report, reading config)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatting command output failed
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
