//! In-process stand-in for the remote data store
//!
//! [`InMemoryService`] implements [`Connector`] without any network I/O. It
//! issues tokens, enforces that every probe carries the token most recently
//! issued on its connection, records each accepted probe with a timestamp and
//! counts connection lifecycle events. Failures of a setup stage can be
//! scripted to exercise fleet abort.

use crate::errors::SetupStage;
use async_trait::async_trait;
use immuload_client::{AuthToken, ClientError, Connection, Connector};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

/// Which probe a [`ProbeRecord`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Health,
    CurrentState,
}

/// One accepted probe
#[derive(Debug, Clone)]
pub struct ProbeRecord {
    pub connection: u64,
    pub kind: ProbeKind,
    pub token: String,
    pub at: Instant,
}

/// Counters for everything the service has seen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub connects: u64,
    pub logins: u64,
    pub database_selections: u64,
    pub health_probes: u64,
    pub state_probes: u64,
    pub rejected_probes: u64,
    pub setup_failures: u64,
    pub disconnects: u64,
}

impl ServiceStats {
    /// Connections opened and not yet released
    pub fn open_connections(&self) -> u64 {
        self.connects - self.disconnects
    }
}

#[derive(Debug, Clone, Copy)]
struct ScriptedFailure {
    stage: SetupStage,
    from_attempt: u64,
}

#[derive(Debug, Default)]
struct Attempts {
    connect: u64,
    login: u64,
    select: u64,
}

#[derive(Debug)]
struct Shared {
    failure: Option<ScriptedFailure>,
    stats: Mutex<ServiceStats>,
    attempts: Mutex<Attempts>,
    probes: Mutex<Vec<ProbeRecord>>,
}

impl Shared {
    /// Count an attempt at `stage` and decide whether it fails
    fn attempt(&self, stage: SetupStage) -> bool {
        let mut attempts = self.attempts.lock();
        let n = match stage {
            SetupStage::Connect => &mut attempts.connect,
            SetupStage::Authenticate => &mut attempts.login,
            SetupStage::SelectDatabase => &mut attempts.select,
        };
        *n += 1;

        let fails = matches!(
            self.failure,
            Some(f) if f.stage == stage && *n >= f.from_attempt
        );
        if fails {
            self.stats.lock().setup_failures += 1;
        }
        fails
    }
}

/// In-memory [`Connector`] implementation
#[derive(Debug, Clone)]
pub struct InMemoryService {
    shared: Arc<Shared>,
}

impl InMemoryService {
    /// A service on which every call succeeds
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A service on which the `from_attempt`-th attempt (1-based) at `stage`,
    /// and every later one, fails
    pub fn failing(stage: SetupStage, from_attempt: u64) -> Self {
        Self::build(Some(ScriptedFailure {
            stage,
            from_attempt: from_attempt.max(1),
        }))
    }

    fn build(failure: Option<ScriptedFailure>) -> Self {
        Self {
            shared: Arc::new(Shared {
                failure,
                stats: Mutex::new(ServiceStats::default()),
                attempts: Mutex::new(Attempts::default()),
                probes: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn stats(&self) -> ServiceStats {
        *self.shared.stats.lock()
    }

    /// Accepted probes in arrival order
    pub fn probes(&self) -> Vec<ProbeRecord> {
        self.shared.probes.lock().clone()
    }
}

impl Default for InMemoryService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for InMemoryService {
    async fn connect(&self, address: &str, port: u16) -> Result<Box<dyn Connection>, ClientError> {
        if self.shared.attempt(SetupStage::Connect) {
            return Err(ClientError::Connect {
                endpoint: format!("memory://{}:{}", address, port),
                reason: "scripted connect failure".into(),
            });
        }

        let id = {
            let mut stats = self.shared.stats.lock();
            stats.connects += 1;
            stats.connects
        };
        debug!(connection = id, "In-memory connection opened");

        Ok(Box::new(InMemoryConnection {
            id,
            shared: Arc::clone(&self.shared),
            current: None,
            open: true,
        }))
    }
}

struct InMemoryConnection {
    id: u64,
    shared: Arc<Shared>,
    current: Option<AuthToken>,
    open: bool,
}

impl InMemoryConnection {
    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.open {
            Ok(())
        } else {
            Err(ClientError::Disconnected)
        }
    }

    fn check_token(&self, method: &'static str, token: &AuthToken) -> Result<(), ClientError> {
        if self.current.as_ref() == Some(token) {
            Ok(())
        } else {
            Err(ClientError::Rpc {
                method,
                status: tonic::Status::unauthenticated("invalid token"),
            })
        }
    }

    fn probe(
        &mut self,
        method: &'static str,
        kind: ProbeKind,
        token: &AuthToken,
    ) -> Result<(), ClientError> {
        self.ensure_open()?;
        if let Err(e) = self.check_token(method, token) {
            self.shared.stats.lock().rejected_probes += 1;
            return Err(e);
        }

        {
            let mut stats = self.shared.stats.lock();
            match kind {
                ProbeKind::Health => stats.health_probes += 1,
                ProbeKind::CurrentState => stats.state_probes += 1,
            }
        }
        self.shared.probes.lock().push(ProbeRecord {
            connection: self.id,
            kind,
            token: token.as_str().to_string(),
            at: Instant::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl Connection for InMemoryConnection {
    async fn login(&mut self, username: &[u8], _password: &[u8]) -> Result<AuthToken, ClientError> {
        self.ensure_open()?;
        if self.shared.attempt(SetupStage::Authenticate) {
            return Err(ClientError::Rpc {
                method: "Login",
                status: tonic::Status::permission_denied("invalid user name or password"),
            });
        }

        let n = {
            let mut stats = self.shared.stats.lock();
            stats.logins += 1;
            stats.logins
        };
        let token = AuthToken::new(format!(
            "login-{}-{}",
            String::from_utf8_lossy(username),
            n
        ));
        self.current = Some(token.clone());
        Ok(token)
    }

    async fn use_database(
        &mut self,
        token: &AuthToken,
        database: &str,
    ) -> Result<AuthToken, ClientError> {
        self.ensure_open()?;
        self.check_token("UseDatabase", token)?;
        if self.shared.attempt(SetupStage::SelectDatabase) {
            return Err(ClientError::Rpc {
                method: "UseDatabase",
                status: tonic::Status::not_found(format!("database {} does not exist", database)),
            });
        }

        let n = {
            let mut stats = self.shared.stats.lock();
            stats.database_selections += 1;
            stats.database_selections
        };
        let token = AuthToken::new(format!("db-{}-{}", database, n));
        self.current = Some(token.clone());
        Ok(token)
    }

    async fn health(&mut self, token: &AuthToken) -> Result<(), ClientError> {
        self.probe("Health", ProbeKind::Health, token)
    }

    async fn current_state(&mut self, token: &AuthToken) -> Result<(), ClientError> {
        self.probe("CurrentState", ProbeKind::CurrentState, token)
    }

    async fn disconnect(&mut self) {
        if std::mem::replace(&mut self.open, false) {
            self.shared.stats.lock().disconnects += 1;
            debug!(connection = self.id, "In-memory connection released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_token_supersedes_login_token() {
        let service = InMemoryService::new();
        let mut conn = service.connect("127.0.0.1", 3322).await.unwrap();

        let login = conn.login(b"immudb", b"immudb").await.unwrap();
        let db = conn.use_database(&login, "ledger").await.unwrap();
        assert_eq!(db.as_str(), "db-ledger-1");

        assert!(conn.health(&db).await.is_ok());
        let err = conn.health(&login).await.unwrap_err();
        assert_eq!(err.code(), Some(tonic::Code::Unauthenticated));

        let stats = service.stats();
        assert_eq!(stats.health_probes, 1);
        assert_eq!(stats.rejected_probes, 1);
    }

    #[tokio::test]
    async fn test_scripted_failure_starts_at_attempt() {
        let service = InMemoryService::failing(SetupStage::Connect, 2);

        assert!(service.connect("h", 1).await.is_ok());
        assert!(matches!(
            service.connect("h", 1).await,
            Err(ClientError::Connect { .. })
        ));
        assert!(service.connect("h", 1).await.is_err());

        let stats = service.stats();
        assert_eq!(stats.connects, 1);
        assert_eq!(stats.setup_failures, 2);
    }

    #[tokio::test]
    async fn test_disconnect_is_counted_once() {
        let service = InMemoryService::new();
        let mut conn = service.connect("h", 1).await.unwrap();
        let token = conn.login(b"immudb", b"").await.unwrap();

        conn.disconnect().await;
        conn.disconnect().await;

        assert!(matches!(
            conn.health(&token).await,
            Err(ClientError::Disconnected)
        ));
        assert_eq!(service.stats().disconnects, 1);
        assert_eq!(service.stats().open_connections(), 0);
    }
}
