//! Student → busy intervals, built from a read-only snapshot of enrolled
//! schedule rows.
//!
//! The index owns its snapshot for the duration of one resolution call. It is
//! never mutated by the engine and never cached across calls.

use std::collections::{BTreeSet, HashMap};

use crate::models::{BusyInterval, EnrolledMeeting, MalformedInterval, StudentId};

/// Why a student's busy intervals could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("student {0} has no resolvable schedule")]
    UnknownStudent(StudentId),

    #[error("student {student} has an unusable schedule row '{section}': {source}")]
    MalformedInterval {
        student: StudentId,
        section: String,
        #[source]
        source: MalformedInterval,
    },
}

/// A student together with the busy intervals implied by their enrolment.
///
/// Intervals are kept sorted (Monday-first) and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentAvailability {
    student: StudentId,
    intervals: Vec<BusyInterval>,
}

impl StudentAvailability {
    pub fn new<I>(student: StudentId, intervals: I) -> Self
    where
        I: IntoIterator<Item = BusyInterval>,
    {
        let set: BTreeSet<BusyInterval> = intervals.into_iter().collect();
        Self {
            student,
            intervals: set.into_iter().collect(),
        }
    }

    pub fn student(&self) -> StudentId {
        self.student
    }

    pub fn intervals(&self) -> &[BusyInterval] {
        &self.intervals
    }

    /// True if no busy interval overlaps `slot`. Stops at the first conflict.
    pub fn is_free(&self, slot: &BusyInterval) -> bool {
        !slot.overlaps_any(&self.intervals)
    }
}

/// Snapshot of enrolled meetings keyed by student.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    enrollments: HashMap<StudentId, Vec<EnrolledMeeting>>,
}

impl ScheduleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over a snapshot. Students missing from the map are unknown;
    /// students mapped to an empty list are known and free all week.
    pub fn from_snapshot(enrollments: HashMap<StudentId, Vec<EnrolledMeeting>>) -> Self {
        Self { enrollments }
    }

    pub fn insert(&mut self, student: StudentId, meetings: Vec<EnrolledMeeting>) {
        self.enrollments.insert(student, meetings);
    }

    pub fn contains(&self, student: StudentId) -> bool {
        self.enrollments.contains_key(&student)
    }

    pub fn len(&self) -> usize {
        self.enrollments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enrollments.is_empty()
    }

    /// Busy intervals implied by a student's enrolled sections.
    ///
    /// A single malformed row makes the whole set unreliable, so the first one
    /// found fails the student.
    pub fn busy_intervals_for(
        &self,
        student: StudentId,
    ) -> Result<BTreeSet<BusyInterval>, IndexError> {
        let meetings = self
            .enrollments
            .get(&student)
            .ok_or(IndexError::UnknownStudent(student))?;

        let mut busy = BTreeSet::new();
        for meeting in meetings {
            let intervals =
                meeting
                    .pattern
                    .intervals()
                    .map_err(|source| IndexError::MalformedInterval {
                        student,
                        section: meeting.section.clone(),
                        source,
                    })?;
            busy.extend(intervals);
        }
        Ok(busy)
    }

    pub fn availability_for(&self, student: StudentId) -> Result<StudentAvailability, IndexError> {
        self.busy_intervals_for(student)
            .map(|busy| StudentAvailability::new(student, busy))
    }
}
