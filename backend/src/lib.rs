//! # Waitlist Resolver
//!
//! Proposes overflow meeting times for over-subscribed course sections.
//!
//! Given a course and a set of waitlisted students, the engine enumerates the
//! legal new-slot placements on the institution's time grid, checks every
//! placement against each student's enrolled schedule, and returns a short,
//! deterministic list of slots that accommodate as many students as possible.
//!
//! ## Architecture
//!
//! - [`models`]: intervals, meeting patterns, course and student identifiers
//! - [`engine`]: the pure resolution pipeline (index, generator, matcher, selector)
//! - [`db`]: repository traits and the in-memory repository
//! - [`services`]: request validation, orchestration, proposal store, CSV export
//! - [`config`]: TOML application configuration
//! - [`http`]: Axum-based REST API (feature `http-server`)

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod engine;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
