//! HTTP server module.
//!
//! Exposes waitlist resolution and its support queries as a REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - CSV export, error mapping                              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Orchestration, timeout, proposal store                 │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Engine (pure)            Repository Layer (db/)          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Endpoints
//!
//! | Method | Path                                             |
//! |--------|--------------------------------------------------|
//! | GET    | `/health`                                        |
//! | POST   | `/v1/waitlist/resolve`                           |
//! | GET    | `/v1/courses/{subject}/{catalog}/waitlist`       |
//! | GET    | `/v1/courses/{subject}/{catalog}/proposals/export` |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
