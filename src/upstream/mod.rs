//! Upstream provider access.
//!
//! # Data Flow
//! ```text
//! launches handler
//!     → client.rs GET <base>/v3/launches  ┐ concurrently
//!     → client.rs GET <base>/v3/rockets   ┘
//!     → untyped JSON handed back for decoding by the transform step
//! ```

pub mod client;

pub use client::{SpacexClient, UpstreamError};
