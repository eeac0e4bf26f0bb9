//! Repository-agnostic data access used by the waitlist service.
//!
//! These functions work with any [`FullRepository`] and turn storage records
//! into the read-only snapshot the engine consumes.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  services::waitlist (orchestration)          │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │  db::services (this module)                  │
//! │  - course lookup with NotFound context       │
//! │  - enrolled-schedule snapshot                │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │  Repository traits ─► LocalRepository        │
//! └──────────────────────────────────────────────┘
//! ```

use log::debug;

use super::models::CourseRecord;
use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::engine::ScheduleIndex;
use crate::models::{CourseKey, StudentId};

// ==================== Health & Connection ====================

/// Check if the repository is healthy.
///
/// # Returns
/// * `Ok(true)` if the store is reachable
/// * `Err` if the check itself fails
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Courses ====================

/// Fetch a course that must exist.
///
/// # Returns
/// * `Err(RepositoryError::NotFound)` if there is no such course
pub async fn find_course<R: FullRepository + ?Sized>(
    repo: &R,
    key: &CourseKey,
) -> RepositoryResult<CourseRecord> {
    repo.find_course(key).await?.ok_or_else(|| {
        RepositoryError::not_found_with_context(
            format!("course {}", key),
            ErrorContext::new("find_course")
                .with_entity("course")
                .with_entity_id(key),
        )
    })
}

/// Waitlisted students of a course, in registration order.
pub async fn waitlisted_students<R: FullRepository + ?Sized>(
    repo: &R,
    key: &CourseKey,
) -> RepositoryResult<Vec<StudentId>> {
    repo.waitlisted_students(key).await
}

// ==================== Enrollments ====================

/// Build a schedule snapshot for the given students.
///
/// Unknown students are left out of the index; the engine reports them.
pub async fn load_schedule_index<R: FullRepository + ?Sized>(
    repo: &R,
    students: &[StudentId],
) -> RepositoryResult<ScheduleIndex> {
    let enrollments = repo.fetch_enrollments(students).await?;
    debug!(
        "Loaded schedules for {} of {} requested students",
        enrollments.len(),
        students.len()
    );
    Ok(ScheduleIndex::from_snapshot(enrollments))
}
