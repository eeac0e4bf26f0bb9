//! Weekly recurring busy periods and the overlap test everything else builds on.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::time::{format_hhmm, hhmm, minutes_of_day, weekday_index};

/// Rejected interval: the end is not strictly after the start.
///
/// Intervals never cross midnight, so `end <= start` is always a data error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "malformed interval on {weekday}: end {} is not after start {}",
    .end.format("%H:%M"),
    .start.format("%H:%M")
)]
pub struct MalformedInterval {
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Which weeks of the two-week teaching cycle a meeting occupies.
///
/// Alternate-week labs run in one week only. Everything else recurs every
/// week and conflicts with both.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CycleWeek {
    #[default]
    Every,
    First,
    Second,
}

impl CycleWeek {
    pub fn is_every(&self) -> bool {
        matches!(self, CycleWeek::Every)
    }

    /// True if meetings in `self` and `other` can fall in the same week.
    pub fn shares_week_with(self, other: CycleWeek) -> bool {
        self.is_every() || other.is_every() || self == other
    }

    /// `1` or `2` for a single cycle week, `None` for weekly meetings.
    pub fn number(self) -> Option<u8> {
        match self {
            CycleWeek::Every => None,
            CycleWeek::First => Some(1),
            CycleWeek::Second => Some(2),
        }
    }
}

/// A recurring busy period on a single day, weekly or in one cycle week.
///
/// Construction goes through [`BusyInterval::new`], which guarantees
/// `start < end`. The value is immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BusyInterval {
    #[serde(skip_serializing_if = "CycleWeek::is_every")]
    week: CycleWeek,
    weekday: Weekday,
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
}

impl BusyInterval {
    /// Create a new weekly interval, rejecting `end <= start`.
    pub fn new(
        weekday: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Self, MalformedInterval> {
        if end <= start {
            return Err(MalformedInterval {
                weekday,
                start,
                end,
            });
        }
        Ok(Self {
            week: CycleWeek::Every,
            weekday,
            start,
            end,
        })
    }

    /// The same interval restricted to one cycle week.
    pub fn in_week(mut self, week: CycleWeek) -> Self {
        self.week = week;
        self
    }

    pub fn week(&self) -> CycleWeek {
        self.week
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Length of the interval in whole minutes.
    pub fn duration_minutes(&self) -> u32 {
        minutes_of_day(self.end) - minutes_of_day(self.start)
    }

    /// Half-open overlap test: same weekday in a shared cycle week and
    /// `start_a < end_b && start_b < end_a`.
    ///
    /// Touching intervals (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, other: &BusyInterval) -> bool {
        self.weekday == other.weekday
            && self.week.shares_week_with(other.week)
            && self.start < other.end
            && other.start < self.end
    }

    /// True if any interval in `others` overlaps this one. Stops at the first hit.
    pub fn overlaps_any<'a, I>(&self, others: I) -> bool
    where
        I: IntoIterator<Item = &'a BusyInterval>,
    {
        others.into_iter().any(|other| self.overlaps(other))
    }

    fn sort_key(&self) -> (CycleWeek, u8, NaiveTime, NaiveTime) {
        (self.week, weekday_index(self.weekday), self.start, self.end)
    }
}

/// Free-function form of [`BusyInterval::overlaps`].
pub fn overlaps(a: &BusyInterval, b: &BusyInterval) -> bool {
    a.overlaps(b)
}

// Cycle week, then Monday-first weekday, then start, then end.
impl Ord for BusyInterval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for BusyInterval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BusyInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weekday)?;
        if let Some(n) = self.week.number() {
            write!(f, " (week {})", n)?;
        }
        write!(f, " {}-{}", format_hhmm(self.start), format_hhmm(self.end))
    }
}

#[derive(Deserialize)]
struct RawInterval {
    #[serde(default)]
    week: CycleWeek,
    #[serde(alias = "day")]
    weekday: Weekday,
    #[serde(with = "hhmm")]
    start: NaiveTime,
    #[serde(with = "hhmm")]
    end: NaiveTime,
}

impl<'de> Deserialize<'de> for BusyInterval {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = RawInterval::deserialize(d)?;
        BusyInterval::new(raw.weekday, raw.start, raw.end)
            .map(|iv| iv.in_week(raw.week))
            .map_err(serde::de::Error::custom)
    }
}
