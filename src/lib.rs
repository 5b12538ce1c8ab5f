//! Launch gateway library: a rate-limited `/launches` endpoint that joins
//! SpaceX launch and rocket listings and serves them paginated.

pub mod config;
pub mod http;
pub mod launches;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
