use std::future::Future;

use alias_sync_core::contract::AliasTarget;

/// Failure modes of the remote alias operations. Only `NotFound` from an
/// update is recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasApiError {
    NotFound(String),
    Service(String),
}

impl AliasApiError {
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(message) | Self::Service(message) => message,
        }
    }
}

impl std::fmt::Display for AliasApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AliasApiError {}

/// Both operations resolve to the ARN of the alias they touched.
pub trait AliasApi {
    fn update_alias(
        &self,
        target: &AliasTarget,
    ) -> impl Future<Output = Result<String, AliasApiError>> + Send;

    fn create_alias(
        &self,
        target: &AliasTarget,
    ) -> impl Future<Output = Result<String, AliasApiError>> + Send;
}
