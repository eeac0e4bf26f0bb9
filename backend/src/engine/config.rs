//! Explicit configuration for one engine instance.
//!
//! Nothing in the engine reads globals: the grid, per-component durations,
//! the selector bound and the error policy all arrive through [`EngineConfig`],
//! so tests can vary any of them freely.

use std::time::Duration;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::time::{hhmm, hhmm_list, hm, minutes_of_day, weekday_index};
use crate::models::{BusyInterval, Component, CycleWeek};

/// Invalid engine settings, reported when a configuration is loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineConfigError {
    #[error("grid quantization must be at least one minute")]
    ZeroQuantization,

    #[error("operating window is empty: day_end {day_end} is not after day_start {day_start}")]
    EmptyWindow { day_start: String, day_end: String },

    #[error("{component}: duration bounds {min}..={max} minutes are invalid")]
    InvalidDuration { component: Component, min: u32, max: u32 },

    #[error("{component}: start time {start} is not on the {quantum}-minute grid")]
    OffGridStart {
        component: Component,
        start: String,
        quantum: u32,
    },

    #[error("selector max_proposals must be at least 1")]
    ZeroProposals,
}

/// What to do with a student whose schedule cannot be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentIssuePolicy {
    /// Drop the student and report a warning.
    #[default]
    Exclude,
    /// Fail the whole resolution.
    Abort,
}

/// How the selector turns coverage results into proposals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// Ranked list when one slot fits everybody, greedy rounds otherwise.
    #[default]
    Auto,
    /// Top-K by coverage size, ties by candidate order.
    Ranked,
    /// Greedy multi-round cover of the not-yet-covered remainder.
    Greedy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Upper bound K on the number of proposals returned.
    pub max_proposals: usize,
    pub strategy: SelectionStrategy,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_proposals: 5,
            strategy: SelectionStrategy::Auto,
        }
    }
}

/// Session length bounds for one component type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDurations {
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
    /// Fixed start times. Empty means every grid boundary in the window.
    #[serde(default, with = "hhmm_list", skip_serializing_if = "Vec::is_empty")]
    pub start_times: Vec<NaiveTime>,
}

impl ComponentDurations {
    pub fn fixed(minutes: u32) -> Self {
        Self {
            min_duration_minutes: minutes,
            max_duration_minutes: minutes,
            start_times: Vec::new(),
        }
    }

    pub fn with_start_times(mut self, start_times: Vec<NaiveTime>) -> Self {
        self.start_times = start_times;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentTable {
    pub lecture: ComponentDurations,
    pub lab: ComponentDurations,
    pub tutorial: ComponentDurations,
}

impl ComponentTable {
    pub fn get(&self, component: Component) -> &ComponentDurations {
        match component {
            Component::Lecture => &self.lecture,
            Component::Lab => &self.lab,
            Component::Tutorial => &self.tutorial,
        }
    }
}

impl Default for ComponentTable {
    fn default() -> Self {
        Self {
            lecture: ComponentDurations::fixed(75),
            lab: ComponentDurations::fixed(180).with_start_times(vec![
                hm(8, 45),
                hm(11, 45),
                hm(14, 45),
                hm(17, 45),
            ]),
            tutorial: ComponentDurations::fixed(50),
        }
    }
}

/// The institution's time grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub weekdays: Vec<Weekday>,
    #[serde(with = "hhmm")]
    pub day_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub day_end: NaiveTime,
    pub quantization_minutes: u32,
    /// Institution-wide windows in which no new slot may be placed.
    pub blackouts: Vec<BusyInterval>,
    /// Place slots in week 1 or week 2 of the two-week cycle instead of
    /// every week.
    pub two_week_cycle: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            day_start: hm(8, 0),
            day_end: hm(22, 0),
            quantization_minutes: 15,
            blackouts: Vec::new(),
            two_week_cycle: false,
        }
    }
}

impl GridConfig {
    /// Weekdays in Monday-first order without repeats.
    pub fn ordered_weekdays(&self) -> Vec<Weekday> {
        let mut days = self.weekdays.clone();
        days.sort_by_key(|d| weekday_index(*d));
        days.dedup();
        days
    }

    /// Weeks a candidate can be placed in, in enumeration order.
    pub fn cycle_weeks(&self) -> &'static [CycleWeek] {
        if self.two_week_cycle {
            &[CycleWeek::First, CycleWeek::Second]
        } else {
            &[CycleWeek::Every]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock budget for one resolution call.
    pub timeout_ms: u64,
    pub student_issue_policy: StudentIssuePolicy,
    /// Treat an empty student list as an invalid request instead of an empty result.
    pub reject_empty_students: bool,
    pub grid: GridConfig,
    pub components: ComponentTable,
    pub selector: SelectorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            student_issue_policy: StudentIssuePolicy::Exclude,
            reject_empty_students: false,
            grid: GridConfig::default(),
            components: ComponentTable::default(),
            selector: SelectorConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check the settings for contradictions.
    ///
    /// A configuration that passes may still produce zero candidates (e.g. a
    /// lab longer than the window); that is reported as "no proposals", not
    /// as an error.
    pub fn validate(&self) -> Result<(), EngineConfigError> {
        let quantum = self.grid.quantization_minutes;
        if quantum == 0 {
            return Err(EngineConfigError::ZeroQuantization);
        }
        if self.grid.day_end <= self.grid.day_start {
            return Err(EngineConfigError::EmptyWindow {
                day_start: self.grid.day_start.format("%H:%M").to_string(),
                day_end: self.grid.day_end.format("%H:%M").to_string(),
            });
        }
        if self.selector.max_proposals == 0 {
            return Err(EngineConfigError::ZeroProposals);
        }

        let origin = minutes_of_day(self.grid.day_start);
        for component in [Component::Lecture, Component::Lab, Component::Tutorial] {
            let d = self.components.get(component);
            if d.min_duration_minutes == 0 || d.min_duration_minutes > d.max_duration_minutes {
                return Err(EngineConfigError::InvalidDuration {
                    component,
                    min: d.min_duration_minutes,
                    max: d.max_duration_minutes,
                });
            }
            for start in &d.start_times {
                let m = minutes_of_day(*start);
                if m < origin || (m - origin) % quantum != 0 {
                    return Err(EngineConfigError::OffGridStart {
                        component,
                        start: start.format("%H:%M").to_string(),
                        quantum,
                    });
                }
            }
        }
        Ok(())
    }
}
