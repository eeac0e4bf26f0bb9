//! Repository implementations.
//!
//! - `local`: in-memory store for tests, demos and seeded local runs
pub mod local;

pub use local::LocalRepository;
