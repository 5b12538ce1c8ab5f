//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP window)
//!     → Pass to query validation and the handler
//! ```
//!
//! # Design Decisions
//! - Rejected requests stop here: no validation, no upstream calls
//! - Limiter state is an explicit `Arc` injected as middleware state

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, Decision, RateLimiter};
