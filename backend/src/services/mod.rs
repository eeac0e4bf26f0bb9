//! Service layer for business logic and orchestration.
//!
//! Sits between the repository and the HTTP layer: it validates requests,
//! builds the engine's inputs from stored data, and keeps the last computed
//! proposals for report export.

pub mod proposal_store;
pub mod report;
pub mod waitlist;

pub use proposal_store::{ProposalStore, StoredProposals};
pub use report::{proposals_to_csv, report_file_name, ReportError};
pub use waitlist::{
    course_waitlist, resolve_waitlist, WaitlistError, WaitlistOutcome, WaitlistRequest,
};
