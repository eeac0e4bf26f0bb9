//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{NaiveTime, Weekday};
use waitlist_resolver::db::models::{CourseRecord, StudentRecord};
use waitlist_resolver::db::LocalRepository;
use waitlist_resolver::engine::{ComponentDurations, EngineConfig};
use waitlist_resolver::models::{
    BusyInterval, Component, CourseKey, CycleWeek, EnrolledMeeting, MeetingPattern, StudentId,
};

// ==================== Time & schedule builders ====================

pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub fn busy(day: Weekday, start: (u32, u32), end: (u32, u32)) -> BusyInterval {
    BusyInterval::new(day, hm(start.0, start.1), hm(end.0, end.1)).expect("valid interval")
}

pub fn lecture(
    section: &str,
    days: &[Weekday],
    start: (u32, u32),
    end: (u32, u32),
) -> EnrolledMeeting {
    EnrolledMeeting {
        section: section.to_string(),
        component: Component::Lecture,
        pattern: MeetingPattern::new(days.to_vec(), hm(start.0, start.1), hm(end.0, end.1)),
    }
}

/// A lab row that meets in one week of the two-week cycle.
pub fn alternate_week_lab(
    section: &str,
    day: Weekday,
    start: (u32, u32),
    end: (u32, u32),
    week: CycleWeek,
) -> EnrolledMeeting {
    EnrolledMeeting {
        section: section.to_string(),
        component: Component::Lab,
        pattern: MeetingPattern::new(vec![day], hm(start.0, start.1), hm(end.0, end.1))
            .in_week(week),
    }
}

pub fn student(id: i64, enrollments: Vec<EnrolledMeeting>) -> StudentRecord {
    StudentRecord {
        id: StudentId(id),
        enrollments,
    }
}

pub fn ids(raw: &[i64]) -> Vec<StudentId> {
    raw.iter().copied().map(StudentId).collect()
}

// ==================== Engine configurations ====================

/// Hourly grid over the given days and window, with one-hour labs.
pub fn hourly_config(days: &[Weekday], start_hour: u32, end_hour: u32) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.grid.weekdays = days.to_vec();
    config.grid.day_start = hm(start_hour, 0);
    config.grid.day_end = hm(end_hour, 0);
    config.grid.quantization_minutes = 60;
    config.components.lab = ComponentDurations::fixed(60);
    config
}

/// Grid whose only lab candidates are Mon 10:00-11:00 and Tue 09:00-10:00.
pub fn two_slot_config() -> EngineConfig {
    let mut config = hourly_config(&[Weekday::Mon, Weekday::Tue], 9, 11);
    config.grid.blackouts = vec![
        busy(Weekday::Mon, (9, 0), (10, 0)),
        busy(Weekday::Tue, (10, 0), (11, 0)),
    ];
    config
}

// ==================== Repositories ====================

/// SUBJ 101 with three waitlisted students:
/// 1 busy Mon 10-11, 2 busy Tue 10-11, 3 free all week.
pub fn subj_101_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    let mut course = CourseRecord::new(
        CourseKey::new("SUBJ", "101").expect("course key"),
        Component::Lab,
    );
    course.waitlist = ids(&[1, 2, 3]);
    repo.insert_course(course).expect("insert course");
    repo.insert_student(student(
        1,
        vec![lecture("SUBJ 200 A", &[Weekday::Mon], (10, 0), (11, 0))],
    ));
    repo.insert_student(student(
        2,
        vec![lecture("SUBJ 300 B", &[Weekday::Tue], (10, 0), (11, 0))],
    ));
    repo.insert_student(student(3, vec![]));
    repo
}

pub fn sample_seed_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample_seed.json")
}

pub fn sample_config_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("waitlist.toml")
}

// ==================== Environment ====================

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with environment variables set (`Some`) or removed (`None`),
/// restoring the previous values afterwards, even on panic.
///
/// Calls are serialized because the environment is process-global.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _restore = EnvRestore::apply(changes);
    f()
}

struct EnvRestore {
    previous: Vec<(String, Option<String>)>,
}

impl EnvRestore {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let previous = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (key, value) in changes {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
        Self { previous }
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}
