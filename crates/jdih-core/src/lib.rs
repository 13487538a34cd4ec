//! JDIH bot core, the part every chat transport and the admin API share.
//!
//! Raw message text goes through [`command::Command`] to an [`intent::Intent`],
//! the [`dispatcher::Dispatcher`] runs the matching handler against a
//! [`jdih_gateway::SearchGateway`], records the interaction in
//! [`history::History`], hands results to an [`audit::AuditSink`], and renders
//! the reply with [`format`].

pub mod audit;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod format;
pub mod history;
pub mod intent;
pub mod transport;

pub use audit::{AuditError, AuditRecord, AuditResult, AuditSink};
pub use config::CoreConfig;
pub use dispatcher::Dispatcher;
pub use history::History;
pub use intent::Intent;
pub use transport::{ChatTransport, TransportError};
