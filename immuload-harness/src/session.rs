//! Session establishment and teardown
//!
//! A [`Session`] is one connection plus the token every call on it carries.
//! It lives for exactly one batch iteration of one worker and is consumed by
//! [`Session::close`], so it can be torn down at most once.

use crate::errors::{SetupError, SetupStage};
use crate::ids::{BatchIndex, WorkerId};
use immuload_client::{AuthToken, ClientError, Connection, Connector};
use immuload_config::ConnectionConfig;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An authenticated connection owned by a single worker
pub struct Session {
    worker: WorkerId,
    batch: BatchIndex,
    connection: Box<dyn Connection>,
    token: AuthToken,
}

impl Session {
    pub fn worker(&self) -> WorkerId {
        self.worker
    }

    /// Token carried by every call on this session
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub async fn health(&mut self) -> Result<(), ClientError> {
        self.connection.health(&self.token).await
    }

    pub async fn current_state(&mut self) -> Result<(), ClientError> {
        self.connection.current_state(&self.token).await
    }

    /// Release the connection
    pub async fn close(mut self) {
        self.connection.disconnect().await;
        debug!(worker = %self.worker, batch = %self.batch, "Session closed");
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("worker", &self.worker)
            .field("batch", &self.batch)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// Builds sessions from the shared connection settings
pub struct SessionFactory {
    connector: Arc<dyn Connector>,
    config: ConnectionConfig,
}

impl SessionFactory {
    pub fn new(connector: Arc<dyn Connector>, config: ConnectionConfig) -> Self {
        Self { connector, config }
    }

    /// Connect, log in and, when a database is configured, select it.
    ///
    /// The token returned by database selection replaces the login token.
    /// When login or selection fails the connection is released before the
    /// error is returned.
    pub async fn establish(
        &self,
        worker: WorkerId,
        batch: BatchIndex,
    ) -> Result<Session, SetupError> {
        let fail = |stage, cause| SetupError::new(stage, worker, batch, cause);

        let mut connection = self
            .connector
            .connect(&self.config.address, self.config.port)
            .await
            .map_err(|e| fail(SetupStage::Connect, e))?;

        let mut token = match connection
            .login(
                self.config.username.as_bytes(),
                self.config.password.as_bytes(),
            )
            .await
        {
            Ok(token) => token,
            Err(e) => {
                connection.disconnect().await;
                return Err(fail(SetupStage::Authenticate, e));
            }
        };

        if let Some(database) = self.config.database() {
            token = match connection.use_database(&token, database).await {
                Ok(database_token) => database_token,
                Err(e) => {
                    connection.disconnect().await;
                    return Err(fail(SetupStage::SelectDatabase, e));
                }
            };
            debug!(worker = %worker, batch = %batch, database, "Database selected");
        }

        Ok(Session {
            worker,
            batch,
            connection,
            token,
        })
    }
}
