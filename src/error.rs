//! Owned error snapshots kept by the [`Recorder`](crate::Recorder).

use sea_orm::DbErr;
use thiserror::Error;

/// A captured copy of a `DbErr`.
///
/// `DbErr` is not `Clone`, so the recorder keeps its display text together
/// with the record-not-found classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordedError {
    /// The statement found no matching record.
    #[error("{0}")]
    RecordNotFound(String),

    /// Any other database error.
    #[error("{0}")]
    Other(String),
}

impl RecordedError {
    /// Whether the original error was `DbErr::RecordNotFound`.
    pub fn is_record_not_found(&self) -> bool {
        matches!(self, RecordedError::RecordNotFound(_))
    }
}

impl From<&DbErr> for RecordedError {
    fn from(err: &DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) => RecordedError::RecordNotFound(err.to_string()),
            other => RecordedError::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_record_not_found() {
        let err = DbErr::RecordNotFound("user 7".to_string());
        let recorded = RecordedError::from(&err);
        assert!(recorded.is_record_not_found());
        assert_eq!(recorded.to_string(), err.to_string());
    }

    #[test]
    fn test_from_other() {
        let err = DbErr::Custom("constraint violated".to_string());
        let recorded = RecordedError::from(&err);
        assert!(!recorded.is_record_not_found());
        assert_eq!(recorded.to_string(), err.to_string());
    }
}
