//! gRPC transport to the data store service

use crate::errors::ClientError;
use crate::proto::{self, paths};
use crate::service::{Connection, Connector};
use crate::token::AuthToken;
use http::uri::PathAndQuery;
use std::net::Ipv6Addr;
use std::time::Duration;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, trace, warn};

/// Opens plaintext HTTP/2 channels to the service
#[derive(Debug, Clone)]
pub struct GrpcConnector {
    connect_timeout: Duration,
}

impl GrpcConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

/// Build the endpoint URI, bracketing IPv6 literals
pub fn endpoint_uri(address: &str, port: u16) -> String {
    if address.parse::<Ipv6Addr>().is_ok() {
        format!("http://[{}]:{}", address, port)
    } else {
        format!("http://{}:{}", address, port)
    }
}

/// Render an error together with its source chain
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait::async_trait]
impl Connector for GrpcConnector {
    async fn connect(&self, address: &str, port: u16) -> Result<Box<dyn Connection>, ClientError> {
        let uri = endpoint_uri(address, port);

        let endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| ClientError::InvalidEndpoint {
                endpoint: uri.clone(),
                reason: describe(&e),
            })?
            .connect_timeout(self.connect_timeout);

        let channel = endpoint.connect().await.map_err(|e| ClientError::Connect {
            endpoint: uri.clone(),
            reason: describe(&e),
        })?;

        debug!(endpoint = %uri, "Connected");
        Ok(Box::new(GrpcConnection {
            endpoint: uri,
            grpc: Some(Grpc::new(channel)),
        }))
    }
}

/// One HTTP/2 channel; dropped on disconnect
pub struct GrpcConnection {
    endpoint: String,
    grpc: Option<Grpc<Channel>>,
}

impl GrpcConnection {
    async fn unary<Req, Resp>(
        &mut self,
        method: &'static str,
        path: &'static str,
        message: Req,
        token: Option<&AuthToken>,
    ) -> Result<Resp, ClientError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let grpc = self.grpc.as_mut().ok_or(ClientError::Disconnected)?;

        grpc.ready().await.map_err(|e| ClientError::Rpc {
            method,
            status: tonic::Status::unavailable(format!("channel not ready: {}", describe(&e))),
        })?;

        let mut request = tonic::Request::new(message);
        if let Some(token) = token {
            token.apply(request.metadata_mut())?;
        }

        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = grpc
            .unary(request, PathAndQuery::from_static(path), codec)
            .await
            .map_err(|status| ClientError::Rpc { method, status })?;

        Ok(response.into_inner())
    }
}

#[async_trait::async_trait]
impl Connection for GrpcConnection {
    async fn login(&mut self, username: &[u8], password: &[u8]) -> Result<AuthToken, ClientError> {
        let request = proto::LoginRequest {
            user: username.to_vec(),
            password: password.to_vec(),
        };
        let response: proto::LoginResponse =
            self.unary("Login", paths::LOGIN, request, None).await?;

        if !response.warning.is_empty() {
            warn!(
                endpoint = %self.endpoint,
                "Login warning: {}",
                String::from_utf8_lossy(&response.warning)
            );
        }

        Ok(AuthToken::new(response.token))
    }

    async fn use_database(
        &mut self,
        token: &AuthToken,
        database: &str,
    ) -> Result<AuthToken, ClientError> {
        let request = proto::Database {
            database_name: database.to_string(),
        };
        let reply: proto::UseDatabaseReply = self
            .unary("UseDatabase", paths::USE_DATABASE, request, Some(token))
            .await?;

        Ok(AuthToken::new(reply.token))
    }

    async fn health(&mut self, token: &AuthToken) -> Result<(), ClientError> {
        let response: proto::HealthResponse =
            self.unary("Health", paths::HEALTH, (), Some(token)).await?;
        trace!(status = response.status, version = %response.version, "Health");
        Ok(())
    }

    async fn current_state(&mut self, token: &AuthToken) -> Result<(), ClientError> {
        let state: proto::ImmutableState = self
            .unary("CurrentState", paths::CURRENT_STATE, (), Some(token))
            .await?;
        trace!(db = %state.db, tx_id = state.tx_id, "CurrentState");
        Ok(())
    }

    async fn disconnect(&mut self) {
        if self.grpc.take().is_some() {
            debug!(endpoint = %self.endpoint, "Disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_uri() {
        assert_eq!(endpoint_uri("127.0.0.1", 3322), "http://127.0.0.1:3322");
        assert_eq!(endpoint_uri("db.internal", 3322), "http://db.internal:3322");
        assert_eq!(endpoint_uri("::1", 3322), "http://[::1]:3322");
    }

    #[tokio::test]
    async fn test_calls_after_disconnect_fail() {
        let channel = Endpoint::from_static("http://127.0.0.1:3322").connect_lazy();
        let mut connection = GrpcConnection {
            endpoint: "http://127.0.0.1:3322".to_string(),
            grpc: Some(Grpc::new(channel)),
        };

        connection.disconnect().await;
        // Second disconnect is a no-op
        connection.disconnect().await;

        let token = AuthToken::new("t");
        assert!(matches!(
            connection.health(&token).await,
            Err(ClientError::Disconnected)
        ));
        assert!(matches!(
            connection.login(b"immudb", b"immudb").await,
            Err(ClientError::Disconnected)
        ));
    }
}
