use async_trait::async_trait;
use shared::{
    domain::{Entry, NewEntry, Session},
    protocol::Ordering,
};

pub mod config;
pub mod controller;
pub mod error;
mod gateway;

pub use config::{ConfigError, GatewayConfig, Settings};
pub use controller::{ActionError, FormStatus, Notice, SessionStatus, ViewController, ViewState};
pub use error::GatewayError;
pub use gateway::HttpGateway;

/// Auth and data capabilities of the hosted backend. Every call is a single
/// round trip; implementations do not retry.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn current_session(&self) -> Result<Option<Session>, GatewayError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError>;
    /// Best effort. The stored session is dropped before the outcome is known.
    async fn sign_out(&self) -> Result<(), GatewayError>;
    async fn list_entries(&self, ordering: &Ordering) -> Result<Vec<Entry>, GatewayError>;
    async fn insert_entry(&self, entry: &NewEntry) -> Result<(), GatewayError>;
}
