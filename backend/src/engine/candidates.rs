//! Enumeration of legal new-slot placements on the institution's grid.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::Serialize;

use super::config::{ComponentTable, EngineConfig, GridConfig};
use crate::models::time::{format_hhmm, minutes_of_day, time_from_minutes, weekday_name};
use crate::models::{BusyInterval, Component, CycleWeek};

/// A hypothetical new recurring meeting time.
///
/// A pure value: two candidates with the same week, weekday, start and end
/// are the same candidate. Ordering is cycle week, then Monday-first weekday,
/// then start, then end, which is the tie-break order used by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SlotCandidate(BusyInterval);

impl SlotCandidate {
    pub fn new(interval: BusyInterval) -> Self {
        Self(interval)
    }

    pub fn interval(&self) -> &BusyInterval {
        &self.0
    }

    pub fn week(&self) -> CycleWeek {
        self.0.week()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn start(&self) -> NaiveTime {
        self.0.start()
    }

    pub fn end(&self) -> NaiveTime {
        self.0.end()
    }

    /// Human-readable day, e.g. `Tuesday` or `Tuesday (week 2)`.
    pub fn day_label(&self) -> String {
        let day = weekday_name(self.weekday());
        match self.week().number() {
            Some(n) => format!("{} (week {})", day, n),
            None => day.to_string(),
        }
    }

    /// Human-readable time range, e.g. `09:00-10:00`.
    pub fn time_label(&self) -> String {
        format!("{}-{}", format_hhmm(self.start()), format_hhmm(self.end()))
    }
}

impl fmt::Display for SlotCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day_label(), self.time_label())
    }
}

/// Time that is already taken for this course: held room bookings and
/// explicit blackout windows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotConstraints {
    /// Existing bookings of the rooms the new section could use.
    pub held: Vec<BusyInterval>,
    /// Caller-supplied windows in which no slot may be placed.
    pub blackouts: Vec<BusyInterval>,
}

impl SlotConstraints {
    fn blocks(&self, slot: &BusyInterval) -> bool {
        slot.overlaps_any(&self.held) || slot.overlaps_any(&self.blackouts)
    }
}

/// Enumerates candidates over a fixed grid.
///
/// Output is deterministic (Monday-first, then start, then end) and free of
/// duplicates regardless of how the grid or anchors were written.
pub struct CandidateGenerator<'a> {
    grid: &'a GridConfig,
    components: &'a ComponentTable,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            grid: &config.grid,
            components: &config.components,
        }
    }

    pub fn candidates_for(
        &self,
        component: Component,
        constraints: &SlotConstraints,
    ) -> Vec<SlotCandidate> {
        let quantum = self.grid.quantization_minutes;
        let window_start = minutes_of_day(self.grid.day_start);
        let window_end = minutes_of_day(self.grid.day_end);
        let durations = self.components.get(component);

        if quantum == 0 || window_end <= window_start {
            log::warn!(
                "Operating window {}..{} / {} min yields no candidates",
                format_hhmm(self.grid.day_start),
                format_hhmm(self.grid.day_end),
                quantum
            );
            return Vec::new();
        }

        let starts: Vec<u32> = if durations.start_times.is_empty() {
            (window_start..window_end).step_by(quantum as usize).collect()
        } else {
            durations
                .start_times
                .iter()
                .map(|t| minutes_of_day(*t))
                .filter(|m| *m >= window_start)
                .collect()
        };
        let lengths: Vec<u32> = if durations.min_duration_minutes == 0 {
            Vec::new()
        } else {
            (durations.min_duration_minutes..=durations.max_duration_minutes)
                .step_by(quantum as usize)
                .collect()
        };

        // Every (start, end) pair that fits inside the window.
        let mut spans = Vec::new();
        for &start in &starts {
            for &length in &lengths {
                let end = start + length;
                if end > window_end {
                    break;
                }
                if let (Some(s), Some(e)) = (time_from_minutes(start), time_from_minutes(end)) {
                    spans.push((s, e));
                }
            }
        }

        let days = self.grid.ordered_weekdays();
        let mut out = BTreeSet::new();
        for &week in self.grid.cycle_weeks() {
            for &day in &days {
                for &(start, end) in &spans {
                    let Ok(slot) = BusyInterval::new(day, start, end) else {
                        continue;
                    };
                    let slot = slot.in_week(week);
                    if constraints.blocks(&slot) || slot.overlaps_any(&self.grid.blackouts) {
                        continue;
                    }
                    out.insert(SlotCandidate(slot));
                }
            }
        }

        log::debug!("{} candidate slots for {} component", out.len(), component);
        out.into_iter().collect()
    }
}
