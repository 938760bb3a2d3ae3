//! Domain error taxonomy. Every roster, registry and storage operation returns
//! one of these instead of panicking so the front-end can always turn a failure
//! into a footer message.

use thiserror::Error;

/// Failures raised by the records model and its persistence bridge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordsError {
    /// A required text field was blank after trimming.
    #[error("{0} is required.")]
    MissingField(&'static str),

    /// Ages must be strictly positive.
    #[error("Age must be a positive number (got {0}).")]
    InvalidAge(i64),

    /// Grades live in the closed range 0..=100.
    #[error("Grade must be between 0 and 100 (got {0}).")]
    GradeOutOfRange(f64),

    #[error("Student is not enrolled in {0}.")]
    NotEnrolled(String),

    #[error("Student is already enrolled in {0}.")]
    AlreadyEnrolled(String),

    #[error("Group \"{0}\" already exists.")]
    GroupExists(String),

    #[error("Student {student_id} is already in group \"{group}\".")]
    AlreadyMember { group: String, student_id: String },

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// The key-value store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored data was readable but failed shape or invariant checks.
    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}

impl RecordsError {
    /// Returns `true` for failures of the persistence layer rather than of the
    /// user's input.
    pub fn is_persistence(&self) -> bool {
        matches!(self, RecordsError::Storage(_) | RecordsError::Corrupt(_))
    }

    /// Returns `true` for failed lookups of students or groups.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            RecordsError::StudentNotFound(_) | RecordsError::GroupNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RecordsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_error_kinds() {
        assert!(RecordsError::Storage("disk full".into()).is_persistence());
        assert!(RecordsError::Corrupt("bad json".into()).is_persistence());
        assert!(!RecordsError::MissingField("First name").is_persistence());
        assert!(RecordsError::GroupNotFound("G1".into()).is_lookup());
        assert!(!RecordsError::GradeOutOfRange(101.0).is_lookup());
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            RecordsError::MissingField("First name").to_string(),
            "First name is required."
        );
        assert_eq!(
            RecordsError::GroupExists("G1".into()).to_string(),
            "Group \"G1\" already exists."
        );
    }
}
