//! Persistent records owned by the repository layer.
//!
//! These mirror the rows the institution's schedule tables hold for one
//! course offering and one student. The engine never sees them directly; the
//! service layer turns them into a [`ScheduleIndex`](crate::engine::ScheduleIndex)
//! snapshot and [`SlotConstraints`](crate::engine::SlotConstraints).

use serde::{Deserialize, Serialize};

use crate::models::{
    BusyInterval, Component, CourseKey, EnrolledMeeting, MalformedInterval, MeetingPattern,
    StudentId,
};

/// A course offering that may need an overflow section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(flatten)]
    pub key: CourseKey,
    /// Component an overflow section would be opened for.
    #[serde(default)]
    pub component: Component,
    /// Weekly patterns already booked in the rooms this course can use.
    #[serde(default)]
    pub held: Vec<MeetingPattern>,
    /// Waitlisted students, in registration order.
    #[serde(default)]
    pub waitlist: Vec<StudentId>,
}

impl CourseRecord {
    pub fn new(key: CourseKey, component: Component) -> Self {
        Self {
            key,
            component,
            held: Vec::new(),
            waitlist: Vec::new(),
        }
    }

    /// Expand held patterns into busy intervals.
    pub fn held_intervals(&self) -> Result<Vec<BusyInterval>, MalformedInterval> {
        let mut out = Vec::new();
        for pattern in &self.held {
            out.extend(pattern.intervals()?);
        }
        Ok(out)
    }
}

/// A student and the sections they are currently enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: StudentId,
    #[serde(default)]
    pub enrollments: Vec<EnrolledMeeting>,
}

/// Seed document for the in-memory repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
    #[serde(default)]
    pub students: Vec<StudentRecord>,
}
