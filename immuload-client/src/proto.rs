//! Protobuf messages of the `immudb.schema.ImmuService` methods used by the
//! load generator. Only the fields we send or log are declared; prost skips
//! the rest when decoding.

/// Fully qualified gRPC method paths
pub mod paths {
    pub const LOGIN: &str = "/immudb.schema.ImmuService/Login";
    pub const USE_DATABASE: &str = "/immudb.schema.ImmuService/UseDatabase";
    pub const HEALTH: &str = "/immudb.schema.ImmuService/Health";
    pub const CURRENT_STATE: &str = "/immudb.schema.ImmuService/CurrentState";
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoginRequest {
    #[prost(bytes = "vec", tag = "1")]
    pub user: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub password: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoginResponse {
    #[prost(string, tag = "1")]
    pub token: String,
    #[prost(bytes = "vec", tag = "2")]
    pub warning: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Database {
    #[prost(string, tag = "1")]
    pub database_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UseDatabaseReply {
    #[prost(string, tag = "1")]
    pub token: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HealthResponse {
    #[prost(bool, tag = "1")]
    pub status: bool,
    #[prost(string, tag = "2")]
    pub version: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ImmutableState {
    #[prost(string, tag = "1")]
    pub db: String,
    #[prost(uint64, tag = "2")]
    pub tx_id: u64,
    #[prost(bytes = "vec", tag = "3")]
    pub tx_hash: Vec<u8>,
}
