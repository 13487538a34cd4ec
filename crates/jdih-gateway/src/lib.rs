//! Search gateway for the JDIH regulation site.
//!
//! Provides a `SearchGateway` abstraction for the bot core, the
//! `JdihGateway` HTTP implementation (query building, pacing, one retry,
//! tolerant HTML extraction), and `MockGateway` for tests.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod mock;
pub mod parsers;

// Re-export key types for convenience
pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::SearchGateway;
pub use http::JdihGateway;
pub use mock::MockGateway;
