//! Reduces coverage results to a short, ordered list of proposals.
//!
//! Two policies are available:
//!
//! - **Ranked**: candidates sorted by coverage size (descending), ties broken
//!   by candidate order, truncated to K. Each proposal lists every student
//!   who can attend the slot.
//! - **Greedy**: repeatedly take the candidate covering the most students
//!   that are still uncovered, until everyone is covered, no candidate adds
//!   anyone, or K proposals exist. Each proposal lists only the students it
//!   newly covers, so proposals partition the covered students.
//!
//! `Auto` uses ranked output when a single slot fits every student, and
//! greedy rounds otherwise. Minimum set cover is deliberately not attempted.

use std::collections::BTreeSet;

use serde::Serialize;

use super::candidates::SlotCandidate;
use super::config::{SelectionStrategy, SelectorConfig};
use super::error::EngineResult;
use super::matcher::CoverageResult;
use super::Deadline;
use crate::models::StudentId;

/// Externally visible unit of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proposal {
    pub slot: SlotCandidate,
    /// Ascending student ids.
    pub students: Vec<StudentId>,
}

pub struct SlotSelector {
    config: SelectorConfig,
}

impl SlotSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Select at most K proposals from `coverage`.
    ///
    /// `students` is the evaluated student set. The order of `coverage` does
    /// not matter; candidate order is re-established internally.
    pub fn select(
        &self,
        coverage: &[CoverageResult],
        students: &BTreeSet<StudentId>,
        deadline: Option<&Deadline>,
    ) -> EngineResult<Vec<Proposal>> {
        if students.is_empty() || self.config.max_proposals == 0 {
            return Ok(Vec::new());
        }

        let mut viable: Vec<&CoverageResult> = coverage.iter().filter(|c| !c.is_empty()).collect();
        viable.sort_by(|a, b| a.slot.cmp(&b.slot));

        let strategy = match self.config.strategy {
            SelectionStrategy::Auto => {
                if viable.iter().any(|c| c.covered.is_superset(students)) {
                    SelectionStrategy::Ranked
                } else {
                    SelectionStrategy::Greedy
                }
            }
            fixed => fixed,
        };

        let proposals = match strategy {
            SelectionStrategy::Greedy => self.greedy(&viable, students, deadline)?,
            _ => self.ranked(viable),
        };
        log::debug!(
            "Selected {} proposal(s) from {} viable candidates ({:?})",
            proposals.len(),
            coverage.iter().filter(|c| !c.is_empty()).count(),
            strategy
        );
        Ok(proposals)
    }

    fn ranked(&self, mut viable: Vec<&CoverageResult>) -> Vec<Proposal> {
        // Stable sort keeps candidate order within equal coverage sizes.
        viable.sort_by(|a, b| b.len().cmp(&a.len()));
        viable
            .into_iter()
            .take(self.config.max_proposals)
            .map(|c| Proposal {
                slot: c.slot,
                students: c.covered.iter().copied().collect(),
            })
            .collect()
    }

    fn greedy(
        &self,
        viable: &[&CoverageResult],
        students: &BTreeSet<StudentId>,
        deadline: Option<&Deadline>,
    ) -> EngineResult<Vec<Proposal>> {
        let mut remaining = students.clone();
        let mut used = vec![false; viable.len()];
        let mut proposals = Vec::new();

        while proposals.len() < self.config.max_proposals && !remaining.is_empty() {
            if let Some(deadline) = deadline {
                deadline.check()?;
            }

            // First candidate with the strictly largest gain wins ties.
            let mut best: Option<(usize, usize)> = None;
            for (i, c) in viable.iter().enumerate() {
                if used[i] {
                    continue;
                }
                let gain = c.covered.intersection(&remaining).count();
                if gain > best.map_or(0, |(_, g)| g) {
                    best = Some((i, gain));
                }
            }

            let Some((i, _)) = best else {
                break;
            };
            used[i] = true;
            let newly: Vec<StudentId> = viable[i]
                .covered
                .intersection(&remaining)
                .copied()
                .collect();
            for id in &newly {
                remaining.remove(id);
            }
            log::debug!(
                "Greedy round {}: {} covers {} new student(s), {} left",
                proposals.len() + 1,
                viable[i].slot,
                newly.len(),
                remaining.len()
            );
            proposals.push(Proposal {
                slot: viable[i].slot,
                students: newly,
            });
        }

        Ok(proposals)
    }
}
