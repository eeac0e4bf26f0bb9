//! Storage layer for course and enrollment data.
//!
//! The waitlist engine reads a snapshot of students' enrolled schedules and a
//! course's held room time through the Repository pattern, so the backing
//! store can be swapped without touching the engine or the HTTP layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, services)                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  - CourseRepository                                     │
//! │  - EnrollmentRepository                                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼───────────────┐
//!     │  Local Repository (in-memory) │
//!     └───────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use waitlist_resolver::db::{services, RepositoryFactory, RepositoryType};
//! use waitlist_resolver::models::CourseKey;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = RepositoryFactory::create(RepositoryType::Local);
//! let key = CourseKey::new("COEN", "243").ok_or("blank course")?;
//! let waitlist = services::waitlisted_students(repo.as_ref(), &key).await?;
//! # Ok(())
//! # }
//! ```

pub mod factory;
pub mod models;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositorySettings;
pub use repositories::LocalRepository;
pub use repository::{
    CourseRepository, EnrollmentRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult,
};
