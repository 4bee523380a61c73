//! Serialization helpers for configuration

use serde::Serializer;
use std::time::Duration;

/// Serialize a `Duration` as whole milliseconds
pub fn serialize_duration_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
