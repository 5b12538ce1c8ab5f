//! Launch listing: the one endpoint this service exposes.
//!
//! # Data Flow
//! ```text
//! raw query → query.rs (whitelist, then range checks) → Page
//! upstream JSON → transform.rs (decode, join by rocket_id, paginate)
//!     → Vec<TransformedLaunch> (model.rs)
//! ```

pub mod handler;
pub mod model;
pub mod query;
pub mod transform;

pub use model::{PayloadSummary, RocketSummary, TransformedLaunch};
pub use query::{Page, QueryError};
