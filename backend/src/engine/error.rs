//! Error and warning types raised while resolving a waitlist.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::schedule_index::IndexError;
use crate::models::{MalformedInterval, StudentId};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Conditions that stop a resolution.
///
/// `UnknownStudent` and `MalformedInterval` only surface here under the
/// `abort` policy; under `exclude` they become [`StudentWarning`]s instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("student {0} has no resolvable schedule")]
    UnknownStudent(StudentId),

    #[error("student {student} has an unusable schedule row '{section}': {source}")]
    MalformedInterval {
        student: StudentId,
        section: String,
        #[source]
        source: MalformedInterval,
    },

    #[error("resolution exceeded its time budget of {} ms", .0.as_millis())]
    Timeout(Duration),
}

impl EngineError {
    /// The warning code this error would carry under the `exclude` policy.
    pub fn warning_code(&self) -> Option<WarningCode> {
        match self {
            EngineError::UnknownStudent(_) => Some(WarningCode::UnknownStudent),
            EngineError::MalformedInterval { .. } => Some(WarningCode::MalformedInterval),
            EngineError::Timeout(_) => None,
        }
    }
}

impl From<IndexError> for EngineError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::UnknownStudent(id) => EngineError::UnknownStudent(id),
            IndexError::MalformedInterval {
                student,
                section,
                source,
            } => EngineError::MalformedInterval {
                student,
                section,
                source,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    UnknownStudent,
    MalformedInterval,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::UnknownStudent => "unknown_student",
            WarningCode::MalformedInterval => "malformed_interval",
        }
    }
}

/// A student left out of the computation, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentWarning {
    pub student: StudentId,
    pub code: WarningCode,
    pub message: String,
}

impl From<&IndexError> for StudentWarning {
    fn from(err: &IndexError) -> Self {
        let (student, code) = match err {
            IndexError::UnknownStudent(id) => (*id, WarningCode::UnknownStudent),
            IndexError::MalformedInterval { student, .. } => {
                (*student, WarningCode::MalformedInterval)
            }
        };
        Self {
            student,
            code,
            message: format!("{}; student excluded", err),
        }
    }
}
