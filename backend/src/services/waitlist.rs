//! Waitlist resolution orchestration.
//!
//! Validates a request, loads the course and the students' enrolled
//! schedules from the repository, runs the engine on a blocking thread under
//! the configured wall-clock budget, and records the result for export.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;

use super::proposal_store::ProposalStore;
use crate::db::{services as db_services, FullRepository, RepositoryError};
use crate::engine::{
    Deadline, EngineError, Resolution, ResolutionRequest, SlotConstraints, WaitlistEngine,
};
use crate::models::{BusyInterval, Component, CourseKey, StudentId};

#[derive(Debug, thiserror::Error)]
pub enum WaitlistError {
    /// Rejected before any computation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown course: {0}")]
    UnknownCourse(CourseKey),

    /// The wall-clock budget ran out; no partial result is kept.
    #[error("Resolution timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    /// A student problem under the `abort` policy.
    #[error(transparent)]
    Engine(EngineError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for WaitlistError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Timeout(budget) => WaitlistError::Timeout(budget),
            other => WaitlistError::Engine(other),
        }
    }
}

/// One "find me overflow slots" request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaitlistRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub catalog: String,
    #[serde(default)]
    pub students: Vec<StudentId>,
    /// Overrides the course's own overflow component.
    #[serde(default)]
    pub component: Option<Component>,
    /// Extra windows in which no slot may be placed.
    #[serde(default)]
    pub blackouts: Vec<BusyInterval>,
}

impl WaitlistRequest {
    pub fn new(
        subject: impl Into<String>,
        catalog: impl Into<String>,
        students: Vec<StudentId>,
    ) -> Self {
        Self {
            subject: subject.into(),
            catalog: catalog.into(),
            students,
            ..Self::default()
        }
    }
}

/// Result of a successful resolution.
#[derive(Debug, Clone)]
pub struct WaitlistOutcome {
    pub course: CourseKey,
    pub component: Component,
    pub resolution: Resolution,
}

/// Collapse duplicates, keeping the first occurrence of each id.
fn dedup_students(students: &[StudentId]) -> Vec<StudentId> {
    let mut seen = HashSet::with_capacity(students.len());
    students.iter().copied().filter(|s| seen.insert(*s)).collect()
}

/// Resolve one course's waitlist.
///
/// # Arguments
/// * `repo` - Source of course metadata and enrolled schedules
/// * `engine` - Configured engine; its `timeout_ms` bounds the whole call
/// * `store` - Receives the proposals on success
/// * `request` - Course and candidate students
///
/// # Returns
/// * `Err(WaitlistError::InvalidRequest)` for a blank subject or catalog
///   (or an empty student list when `reject_empty_students` is set)
/// * `Err(WaitlistError::UnknownCourse)` if the course does not exist
/// * `Err(WaitlistError::Timeout)` if the budget is exceeded
pub async fn resolve_waitlist(
    repo: &dyn FullRepository,
    engine: Arc<WaitlistEngine>,
    store: &ProposalStore,
    request: WaitlistRequest,
) -> Result<WaitlistOutcome, WaitlistError> {
    let course_key = CourseKey::new(&request.subject, &request.catalog).ok_or_else(|| {
        WaitlistError::InvalidRequest("subject and catalog are required".to_string())
    })?;
    let students = dedup_students(&request.students);
    if students.is_empty() && engine.config().reject_empty_students {
        return Err(WaitlistError::InvalidRequest(
            "students must not be empty".to_string(),
        ));
    }

    let budget = engine.config().timeout();
    let deadline = Deadline::new(budget);
    let work = run_resolution(repo, engine, course_key, students, request, deadline);
    let outcome = match tokio::time::timeout(budget, work).await {
        Ok(result) => result?,
        Err(_) => return Err(WaitlistError::Timeout(budget)),
    };

    store.record(
        outcome.course.clone(),
        outcome.component,
        outcome.resolution.proposals.clone(),
    );
    info!(
        "Resolved waitlist for {} ({}): {} proposals, {} warnings",
        outcome.course,
        outcome.component,
        outcome.resolution.proposals.len(),
        outcome.resolution.warnings.len()
    );
    Ok(outcome)
}

async fn run_resolution(
    repo: &dyn FullRepository,
    engine: Arc<WaitlistEngine>,
    course_key: CourseKey,
    students: Vec<StudentId>,
    request: WaitlistRequest,
    deadline: Deadline,
) -> Result<WaitlistOutcome, WaitlistError> {
    let course = match db_services::find_course(repo, &course_key).await {
        Ok(course) => course,
        Err(e) if e.is_not_found() => return Err(WaitlistError::UnknownCourse(course_key)),
        Err(e) => return Err(e.into()),
    };
    let component = request.component.unwrap_or(course.component);

    if students.is_empty() {
        return Ok(WaitlistOutcome {
            course: course.key,
            component,
            resolution: Resolution::default(),
        });
    }

    let held = course
        .held_intervals()
        .map_err(|e| WaitlistError::Internal(format!("held time of {}: {}", course.key, e)))?;
    let index = db_services::load_schedule_index(repo, &students).await?;
    debug!(
        "{}: {} of {} students have schedules, {} held intervals",
        course.key,
        index.len(),
        students.len(),
        held.len()
    );

    let engine_request = ResolutionRequest {
        component,
        students,
        constraints: SlotConstraints {
            held,
            blackouts: request.blackouts,
        },
    };
    let resolution = tokio::task::spawn_blocking(move || {
        engine.resolve(&index, &engine_request, Some(&deadline))
    })
    .await
    .map_err(|e| WaitlistError::Internal(format!("resolution task failed: {}", e)))??;

    Ok(WaitlistOutcome {
        course: course.key,
        component,
        resolution,
    })
}

/// Waitlisted students of a course.
pub async fn course_waitlist(
    repo: &dyn FullRepository,
    subject: &str,
    catalog: &str,
) -> Result<(CourseKey, Vec<StudentId>), WaitlistError> {
    let key = CourseKey::new(subject, catalog).ok_or_else(|| {
        WaitlistError::InvalidRequest("subject and catalog are required".to_string())
    })?;
    match db_services::waitlisted_students(repo, &key).await {
        Ok(students) => Ok((key, students)),
        Err(e) if e.is_not_found() => Err(WaitlistError::UnknownCourse(key)),
        Err(e) => Err(e.into()),
    }
}
