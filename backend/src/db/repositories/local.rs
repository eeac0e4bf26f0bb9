//! In-memory local repository implementation.
//!
//! Stores courses and student enrollments in `HashMap`s behind a single lock.
//! Used by unit and integration tests, and by the server when no external
//! store is configured (optionally seeded from a JSON file).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::models::{CourseRecord, SeedData, StudentRecord};
use crate::db::repository::*;
use crate::models::{CourseKey, EnrolledMeeting, StudentId};

/// In-memory local repository.
///
/// Cloning shares the underlying data.
///
/// # Example
/// ```
/// use waitlist_resolver::db::repositories::LocalRepository;
/// use waitlist_resolver::db::models::{CourseRecord, StudentRecord};
/// use waitlist_resolver::models::{Component, CourseKey, StudentId};
///
/// let repo = LocalRepository::new();
/// let key = CourseKey::new("coen", "243").unwrap();
/// repo.insert_course(CourseRecord::new(key, Component::Lab)).unwrap();
/// repo.insert_student(StudentRecord { id: StudentId(1), enrollments: vec![] });
/// assert_eq!(repo.course_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Debug)]
struct LocalData {
    courses: HashMap<CourseKey, CourseRecord>,
    students: HashMap<StudentId, Vec<EnrolledMeeting>>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            courses: HashMap::new(),
            students: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository populated from seed data.
    pub fn from_seed(seed: SeedData) -> RepositoryResult<Self> {
        let repo = Self::new();
        repo.load_seed(seed)?;
        Ok(repo)
    }

    /// Create a repository populated from a JSON seed file.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON document of the form `{"courses": [...], "students": [...]}`
    ///
    /// # Returns
    /// * `Err(RepositoryError::ConfigurationError)` if the file cannot be read or parsed
    /// * `Err(RepositoryError::ValidationError)` if a course record is invalid
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read seed file {}: {}",
                path.display(),
                e
            ))
        })?;
        let seed: SeedData = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to parse seed file {}: {}",
                path.display(),
                e
            ))
        })?;
        log::info!(
            "Loaded seed file {} ({} courses, {} students)",
            path.display(),
            seed.courses.len(),
            seed.students.len()
        );
        Self::from_seed(seed)
    }

    /// Add every course and student of a seed document.
    ///
    /// Courses are validated before anything is inserted, so a bad seed leaves
    /// the repository untouched.
    pub fn load_seed(&self, seed: SeedData) -> RepositoryResult<()> {
        let courses = seed
            .courses
            .into_iter()
            .map(normalize_course)
            .collect::<RepositoryResult<Vec<_>>>()?;

        let mut data = self.data.write();
        for course in courses {
            if data.courses.insert(course.key.clone(), course).is_some() {
                log::warn!("Duplicate course in seed data, keeping the last one");
            }
        }
        for student in seed.students {
            data.students.insert(student.id, student.enrollments);
        }
        Ok(())
    }

    /// Add or replace a course offering.
    pub fn insert_course(&self, course: CourseRecord) -> RepositoryResult<()> {
        let course = normalize_course(course)?;
        self.data.write().courses.insert(course.key.clone(), course);
        Ok(())
    }

    /// Add or replace a student's enrolled schedule.
    ///
    /// Rows are stored as given; malformed meeting times are reported when
    /// the schedule is resolved, not here.
    pub fn insert_student(&self, student: StudentRecord) {
        self.data
            .write()
            .students
            .insert(student.id, student.enrollments);
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn course_count(&self) -> usize {
        self.data.read().courses.len()
    }

    pub fn student_count(&self) -> usize {
        self.data.read().students.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection("Repository is not healthy"))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_course(mut course: CourseRecord) -> RepositoryResult<CourseRecord> {
    let raw = course.key.clone();
    course.key = CourseKey::new(&raw.subject, &raw.catalog).ok_or_else(|| {
        RepositoryError::validation_with_context(
            "course subject and catalog must not be blank",
            ErrorContext::new("insert_course").with_entity("course"),
        )
    })?;
    course.held_intervals().map_err(|e| {
        RepositoryError::validation_with_context(
            e.to_string(),
            ErrorContext::new("insert_course")
                .with_entity("course")
                .with_entity_id(&course.key),
        )
    })?;
    Ok(course)
}

#[async_trait]
impl CourseRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn find_course(&self, key: &CourseKey) -> RepositoryResult<Option<CourseRecord>> {
        self.check_health()
            .map_err(|e| e.with_operation("find_course"))?;
        Ok(self.data.read().courses.get(key).cloned())
    }

    async fn waitlisted_students(&self, key: &CourseKey) -> RepositoryResult<Vec<StudentId>> {
        self.check_health()
            .map_err(|e| e.with_operation("waitlisted_students"))?;
        self.data
            .read()
            .courses
            .get(key)
            .map(|c| c.waitlist.clone())
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("course {}", key),
                    ErrorContext::new("waitlisted_students")
                        .with_entity("course")
                        .with_entity_id(key),
                )
            })
    }
}

#[async_trait]
impl EnrollmentRepository for LocalRepository {
    async fn fetch_enrollments(
        &self,
        students: &[StudentId],
    ) -> RepositoryResult<HashMap<StudentId, Vec<EnrolledMeeting>>> {
        self.check_health()
            .map_err(|e| e.with_operation("fetch_enrollments"))?;
        let data = self.data.read();
        Ok(students
            .iter()
            .filter_map(|id| data.students.get(id).map(|rows| (*id, rows.clone())))
            .collect())
    }
}
