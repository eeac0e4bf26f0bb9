//! Candidate × student availability matching. This is the hot loop.

use std::collections::BTreeSet;

use super::candidates::SlotCandidate;
use super::error::EngineResult;
use super::schedule_index::StudentAvailability;
use super::Deadline;
use crate::models::StudentId;

/// Students who can attend one candidate slot.
///
/// Invariant: `covered` is a subset of the students the result was computed
/// from, and none of them has a busy interval overlapping `slot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageResult {
    pub slot: SlotCandidate,
    pub covered: BTreeSet<StudentId>,
}

impl CoverageResult {
    pub fn len(&self) -> usize {
        self.covered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covered.is_empty()
    }
}

/// Compute which students are free for `candidate`.
pub fn match_candidate(
    candidate: &SlotCandidate,
    students: &[StudentAvailability],
) -> CoverageResult {
    let covered = students
        .iter()
        .filter(|s| s.is_free(candidate.interval()))
        .map(StudentAvailability::student)
        .collect();
    CoverageResult {
        slot: *candidate,
        covered,
    }
}

/// Match every candidate in order, checking the deadline between candidates.
pub fn match_all(
    candidates: &[SlotCandidate],
    students: &[StudentAvailability],
    deadline: Option<&Deadline>,
) -> EngineResult<Vec<CoverageResult>> {
    let mut results = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if let Some(deadline) = deadline {
            deadline.check()?;
        }
        results.push(match_candidate(candidate, students));
    }
    Ok(results)
}
