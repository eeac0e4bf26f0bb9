//! Last computed proposals per course.
//!
//! A small in-memory store that keeps the most recent successful resolution
//! of each course so it can be exported as a report. Each resolution
//! overwrites the previous one for that course. Nothing is persisted.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::Proposal;
use crate::models::{Component, CourseKey};

/// Proposals computed for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredProposals {
    pub course: CourseKey,
    pub component: Component,
    pub proposals: Vec<Proposal>,
    pub computed_at: DateTime<Utc>,
}

/// In-memory proposal store. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct ProposalStore {
    entries: Arc<RwLock<HashMap<CourseKey, StoredProposals>>>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored proposals of a course.
    pub fn record(&self, course: CourseKey, component: Component, proposals: Vec<Proposal>) {
        let entry = StoredProposals {
            course: course.clone(),
            component,
            proposals,
            computed_at: Utc::now(),
        };
        self.entries.write().insert(course, entry);
    }

    /// Most recent proposals of a course, if any were computed.
    pub fn get(&self, course: &CourseKey) -> Option<StoredProposals> {
        self.entries.read().get(course).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
