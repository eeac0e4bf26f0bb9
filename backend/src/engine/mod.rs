//! Waitlist resolution engine.
//!
//! Given one course component, a set of waitlisted students and a snapshot of
//! their enrolled schedules, propose new meeting-time slots that as many of
//! those students as possible can attend.
//!
//! # Pipeline
//!
//! ```text
//! students ──► ScheduleIndex ──► StudentAvailability[]
//!                                         │
//! grid + constraints ──► CandidateGenerator ──► SlotCandidate[]
//!                                         │
//!                          matcher (candidates × students) ──► CoverageResult[]
//!                                         │
//!                               SlotSelector ──► Proposal[]
//! ```
//!
//! The engine is a pure function of its inputs and configuration. It holds
//! no state between calls, does no I/O and never mutates the snapshot, so it
//! is safe to run concurrently for any number of courses.

pub mod candidates;
pub mod config;
pub mod error;
pub mod matcher;
pub mod schedule_index;
pub mod selector;

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

pub use candidates::{CandidateGenerator, SlotCandidate, SlotConstraints};
pub use config::{
    ComponentDurations, ComponentTable, EngineConfig, EngineConfigError, GridConfig,
    SelectionStrategy, SelectorConfig, StudentIssuePolicy,
};
pub use error::{EngineError, EngineResult, StudentWarning, WarningCode};
pub use matcher::{match_all, match_candidate, CoverageResult};
pub use schedule_index::{IndexError, ScheduleIndex, StudentAvailability};
pub use selector::{Proposal, SlotSelector};

use crate::models::{Component, StudentId};

/// Wall-clock budget for one resolution call.
///
/// Checked between candidate evaluations and between greedy rounds; work in
/// progress when it expires is discarded.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    pub fn check(&self) -> EngineResult<()> {
        if self.is_expired() {
            Err(EngineError::Timeout(self.budget))
        } else {
            Ok(())
        }
    }
}

/// Input to one resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolutionRequest {
    pub component: Component,
    /// Candidate students. Duplicates are ignored.
    pub students: Vec<StudentId>,
    pub constraints: SlotConstraints,
}

/// Output of one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub proposals: Vec<Proposal>,
    /// Students left out under the `exclude` policy, ascending by id.
    pub warnings: Vec<StudentWarning>,
    pub candidates_evaluated: usize,
    pub students_evaluated: usize,
}

/// The resolution engine, bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct WaitlistEngine {
    config: EngineConfig,
}

impl WaitlistEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline for one course component.
    ///
    /// An empty student list, or one where every student was excluded, is a
    /// successful empty result. Zero candidates is likewise an empty result.
    pub fn resolve(
        &self,
        index: &ScheduleIndex,
        request: &ResolutionRequest,
        deadline: Option<&Deadline>,
    ) -> EngineResult<Resolution> {
        let requested: BTreeSet<StudentId> = request.students.iter().copied().collect();
        if requested.is_empty() {
            return Ok(Resolution::default());
        }

        let mut available = Vec::with_capacity(requested.len());
        let mut warnings = Vec::new();
        for &student in &requested {
            match index.availability_for(student) {
                Ok(a) => available.push(a),
                Err(err) => match self.config.student_issue_policy {
                    StudentIssuePolicy::Abort => return Err(err.into()),
                    StudentIssuePolicy::Exclude => {
                        log::warn!("Excluding student {}: {}", student, err);
                        warnings.push(StudentWarning::from(&err));
                    }
                },
            }
        }

        let evaluated: BTreeSet<StudentId> = available.iter().map(|a| a.student()).collect();
        if evaluated.is_empty() {
            return Ok(Resolution {
                warnings,
                ..Resolution::default()
            });
        }

        let candidates = CandidateGenerator::new(&self.config)
            .candidates_for(request.component, &request.constraints);
        if candidates.is_empty() {
            log::info!("No candidate slots for {} component", request.component);
        }

        let coverage = match_all(&candidates, &available, deadline)?;
        let selector = SlotSelector::new(self.config.selector);
        let proposals = selector.select(&coverage, &evaluated, deadline)?;

        Ok(Resolution {
            proposals,
            warnings,
            candidates_evaluated: candidates.len(),
            students_evaluated: evaluated.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::hm;
    use crate::models::{EnrolledMeeting, MeetingPattern};
    use chrono::Weekday;

    fn lecture(days: Vec<Weekday>, start: (u32, u32), end: (u32, u32)) -> EnrolledMeeting {
        EnrolledMeeting {
            section: "SECTION".to_string(),
            component: Component::Lecture,
            pattern: MeetingPattern::new(days, hm(start.0, start.1), hm(end.0, end.1)),
        }
    }

    fn hourly_config(days: Vec<Weekday>) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.grid.weekdays = days;
        config.grid.day_start = hm(9, 0);
        config.grid.day_end = hm(12, 0);
        config.grid.quantization_minutes = 60;
        config.components.lab = ComponentDurations::fixed(60);
        config
    }

    #[test]
    fn test_empty_request_is_empty_success() {
        let engine = WaitlistEngine::default();
        let out = engine
            .resolve(&ScheduleIndex::new(), &ResolutionRequest::default(), None)
            .unwrap();
        assert_eq!(out, Resolution::default());
    }

    #[test]
    fn test_exclude_policy_warns_and_continues() {
        let mut index = ScheduleIndex::new();
        index.insert(StudentId(1), vec![]);
        index.insert(
            StudentId(2),
            vec![lecture(vec![Weekday::Mon], (11, 0), (10, 0))],
        );
        let engine = WaitlistEngine::new(hourly_config(vec![Weekday::Mon]));
        let request = ResolutionRequest {
            component: Component::Lab,
            students: vec![StudentId(3), StudentId(2), StudentId(1)],
            constraints: SlotConstraints::default(),
        };
        let out = engine.resolve(&index, &request, None).unwrap();

        assert_eq!(out.students_evaluated, 1);
        let warned: Vec<_> = out.warnings.iter().map(|w| (w.student, w.code)).collect();
        assert_eq!(
            warned,
            vec![
                (StudentId(2), WarningCode::MalformedInterval),
                (StudentId(3), WarningCode::UnknownStudent),
            ]
        );
        assert!(out
            .proposals
            .iter()
            .all(|p| p.students == vec![StudentId(1)]));
    }

    #[test]
    fn test_abort_policy_fails_call() {
        let index = ScheduleIndex::new();
        let mut config = hourly_config(vec![Weekday::Mon]);
        config.student_issue_policy = StudentIssuePolicy::Abort;
        let engine = WaitlistEngine::new(config);
        let request = ResolutionRequest {
            students: vec![StudentId(42)],
            ..ResolutionRequest::default()
        };
        assert_eq!(
            engine.resolve(&index, &request, None),
            Err(EngineError::UnknownStudent(StudentId(42)))
        );
    }

    #[test]
    fn test_all_excluded_is_empty_with_warnings() {
        let engine = WaitlistEngine::default();
        let request = ResolutionRequest {
            students: vec![StudentId(1), StudentId(2)],
            ..ResolutionRequest::default()
        };
        let out = engine
            .resolve(&ScheduleIndex::new(), &request, None)
            .unwrap();
        assert!(out.proposals.is_empty());
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_no_candidates_is_empty_result() {
        let mut config = hourly_config(vec![Weekday::Mon]);
        config.components.lab = ComponentDurations::fixed(240);
        let mut index = ScheduleIndex::new();
        index.insert(StudentId(1), vec![]);
        let engine = WaitlistEngine::new(config);
        let request = ResolutionRequest {
            students: vec![StudentId(1)],
            ..ResolutionRequest::default()
        };
        let out = engine.resolve(&index, &request, None).unwrap();
        assert_eq!(out.candidates_evaluated, 0);
        assert!(out.proposals.is_empty());
    }

    #[test]
    fn test_expired_deadline_discards_work() {
        let mut index = ScheduleIndex::new();
        index.insert(StudentId(1), vec![]);
        let engine = WaitlistEngine::new(hourly_config(vec![Weekday::Mon]));
        let request = ResolutionRequest {
            students: vec![StudentId(1)],
            ..ResolutionRequest::default()
        };
        let deadline = Deadline::new(Duration::ZERO);
        assert!(matches!(
            engine.resolve(&index, &request, Some(&deadline)),
            Err(EngineError::Timeout(_))
        ));
    }

    #[test]
    fn test_duplicate_students_counted_once() {
        let mut index = ScheduleIndex::new();
        index.insert(StudentId(1), vec![]);
        let engine = WaitlistEngine::new(hourly_config(vec![Weekday::Tue]));
        let request = ResolutionRequest {
            students: vec![StudentId(1), StudentId(1)],
            ..ResolutionRequest::default()
        };
        let out = engine.resolve(&index, &request, None).unwrap();
        assert_eq!(out.students_evaluated, 1);
        assert_eq!(out.proposals[0].students, vec![StudentId(1)]);
    }
}
