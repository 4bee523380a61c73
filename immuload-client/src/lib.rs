//! Remote data store client for immuload
//!
//! The load generator only ever talks to the service through the
//! [`Connector`] and [`Connection`] traits; [`GrpcConnector`] is the
//! production implementation speaking the service's gRPC API.

pub mod errors;
pub mod grpc;
pub mod proto;
pub mod service;
pub mod token;

// Re-export main types for convenience
pub use errors::ClientError;
pub use grpc::{GrpcConnection, GrpcConnector};
pub use service::{Connection, Connector};
pub use token::AuthToken;
