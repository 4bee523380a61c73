//! Capabilities the load generator needs from the remote data store

use crate::errors::ClientError;
use crate::token::AuthToken;

/// Opens connections to the service
#[async_trait::async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection to `address:port`
    async fn connect(&self, address: &str, port: u16) -> Result<Box<dyn Connection>, ClientError>;
}

/// One open connection to the service.
///
/// Every call after login takes the token explicitly; the connection itself
/// holds no authorization state.
#[async_trait::async_trait]
pub trait Connection: Send {
    /// Log in with the given credentials
    async fn login(&mut self, username: &[u8], password: &[u8]) -> Result<AuthToken, ClientError>;

    /// Select a database; the returned token supersedes the one passed in
    async fn use_database(
        &mut self,
        token: &AuthToken,
        database: &str,
    ) -> Result<AuthToken, ClientError>;

    /// Health probe
    async fn health(&mut self, token: &AuthToken) -> Result<(), ClientError>;

    /// Current database state probe
    async fn current_state(&mut self, token: &AuthToken) -> Result<(), ClientError>;

    /// Release the connection
    async fn disconnect(&mut self);
}
