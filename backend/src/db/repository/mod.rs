//! Repository traits for course and enrollment data.
//!
//! The trait is split by concern, like the tables behind it:
//! - [`CourseRepository`]: course offerings, held room time, waitlists
//! - [`EnrollmentRepository`]: students' currently enrolled sections
//!
//! [`FullRepository`] combines both and is what the service and HTTP layers
//! hold behind an `Arc<dyn FullRepository>`.

pub mod error;

use std::collections::HashMap;

use async_trait::async_trait;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use super::models::CourseRecord;
use crate::models::{CourseKey, EnrolledMeeting, StudentId};

/// Course offerings and their waitlists.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Check if the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Look up a course offering.
    ///
    /// # Returns
    /// * `Ok(Some(CourseRecord))` if the course exists
    /// * `Ok(None)` if it does not
    async fn find_course(&self, key: &CourseKey) -> RepositoryResult<Option<CourseRecord>>;

    /// Waitlisted students of a course, in registration order.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` if the course does not exist
    async fn waitlisted_students(&self, key: &CourseKey) -> RepositoryResult<Vec<StudentId>>;
}

/// Students' enrolled schedules.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Fetch the enrolled meetings of the given students.
    ///
    /// Students that are not known to the store are absent from the returned
    /// map. A known student without sections maps to an empty list.
    async fn fetch_enrollments(
        &self,
        students: &[StudentId],
    ) -> RepositoryResult<HashMap<StudentId, Vec<EnrolledMeeting>>>;
}

/// Everything the waitlist service needs from storage.
pub trait FullRepository: CourseRepository + EnrollmentRepository {}

impl<T> FullRepository for T where T: CourseRepository + EnrollmentRepository {}
