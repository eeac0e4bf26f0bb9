//! Weekly meeting patterns as stored in the institution's schedule table.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::course::Component;
use super::interval::{BusyInterval, CycleWeek, MalformedInterval};
use super::time::hhmm;

/// A recurring meeting: a set of weekdays sharing one start/end time.
///
/// Unlike [`BusyInterval`], a pattern is raw data and is not validated on
/// construction; [`MeetingPattern::intervals`] does that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingPattern {
    pub days: Vec<Weekday>,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Alternate-week labs meet in one cycle week only.
    #[serde(default, skip_serializing_if = "CycleWeek::is_every")]
    pub week: CycleWeek,
}

impl MeetingPattern {
    pub fn new(days: Vec<Weekday>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            days,
            start,
            end,
            week: CycleWeek::Every,
        }
    }

    pub fn in_week(mut self, week: CycleWeek) -> Self {
        self.week = week;
        self
    }

    /// `00:00`–`00:00` marks a section with no scheduled meeting time
    /// (online or TBA). Such rows occupy nothing.
    pub fn is_unscheduled(&self) -> bool {
        self.start == NaiveTime::MIN && self.end == NaiveTime::MIN
    }

    /// Expand into one busy interval per meeting day.
    ///
    /// Unscheduled patterns and patterns without days expand to nothing.
    /// Any other pattern with `end <= start` is rejected.
    pub fn intervals(&self) -> Result<Vec<BusyInterval>, MalformedInterval> {
        if self.is_unscheduled() {
            return Ok(Vec::new());
        }
        self.days
            .iter()
            .map(|day| {
                BusyInterval::new(*day, self.start, self.end).map(|iv| iv.in_week(self.week))
            })
            .collect()
    }
}

/// One enrolled section on a student's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledMeeting {
    /// Free-form section label, e.g. `COEN 212 LEC A`.
    pub section: String,
    #[serde(default)]
    pub component: Component,
    #[serde(flatten)]
    pub pattern: MeetingPattern,
}
