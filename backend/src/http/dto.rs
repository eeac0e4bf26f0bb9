//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

pub use crate::engine::StudentWarning;
pub use crate::services::WaitlistRequest as ResolveRequest;

use crate::engine::{Proposal, Resolution};
use crate::models::{CourseKey, StudentId};

/// One proposed slot as rendered on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResult {
    /// Full weekday name, e.g. `Tuesday`
    pub day: String,
    /// `HH:MM-HH:MM`
    pub time: String,
    /// Covered students, ascending
    pub students: Vec<StudentId>,
}

impl From<&Proposal> for SlotResult {
    fn from(p: &Proposal) -> Self {
        Self {
            day: p.slot.day_label(),
            time: p.slot.time_label(),
            students: p.students.clone(),
        }
    }
}

/// Response body of `POST /v1/waitlist/resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub results: Vec<SlotResult>,
    /// Students left out of the computation; omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<StudentWarning>,
}

impl From<&Resolution> for ResolveResponse {
    fn from(r: &Resolution) -> Self {
        Self {
            results: r.proposals.iter().map(SlotResult::from).collect(),
            warnings: r.warnings.clone(),
        }
    }
}

/// Response body of `GET /v1/courses/{subject}/{catalog}/waitlist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistResponse {
    pub subject: String,
    pub catalog: String,
    pub students: Vec<StudentId>,
}

impl WaitlistResponse {
    pub fn new(key: CourseKey, students: Vec<StudentId>) -> Self {
        Self {
            subject: key.subject,
            catalog: key.catalog,
            students,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Repository connection status
    pub repository: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resolution_serializes_bare_results() {
        let body =
            serde_json::to_string(&ResolveResponse::from(&Resolution::default())).unwrap();
        assert_eq!(body, r#"{"results":[]}"#);
    }
}
