//! Authentication token handed out by login and database selection

use crate::errors::ClientError;
use tonic::metadata::{AsciiMetadataValue, MetadataMap};

/// Metadata key the service reads the token from
pub const AUTHORIZATION_KEY: &str = "authorization";

/// Opaque bearer credential issued by the service.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Attach this token to outgoing request metadata, replacing any token
    /// already present.
    pub fn apply(&self, metadata: &mut MetadataMap) -> Result<(), ClientError> {
        let value: AsciiMetadataValue = self
            .0
            .parse()
            .map_err(|_| ClientError::InvalidToken("non-ASCII or control characters".into()))?;
        metadata.insert(AUTHORIZATION_KEY, value);
        Ok(())
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthToken(<{} bytes>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = AuthToken::new("eyJhbGciOi.secret");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret"));
        assert_eq!(debug, "AuthToken(<17 bytes>)");
    }

    #[test]
    fn test_apply_replaces_previous_token() {
        let mut metadata = MetadataMap::new();
        AuthToken::new("login-token").apply(&mut metadata).unwrap();
        AuthToken::new("database-token").apply(&mut metadata).unwrap();

        let values: Vec<_> = metadata.get_all(AUTHORIZATION_KEY).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].to_str().unwrap(), "database-token");
    }

    #[test]
    fn test_apply_rejects_unprintable_token() {
        let mut metadata = MetadataMap::new();
        let err = AuthToken::new("bad\ntoken").apply(&mut metadata).unwrap_err();
        assert!(matches!(err, ClientError::InvalidToken(_)));
        assert!(metadata.get(AUTHORIZATION_KEY).is_none());
    }
}
