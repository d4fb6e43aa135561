use std::future::Future;

use alias_sync_core::contract::{ArtifactCredentials, S3Location};

pub trait ArtifactSource {
    fn fetch_artifact(
        &self,
        location: &S3Location,
        credentials: Option<&ArtifactCredentials>,
    ) -> impl Future<Output = Result<Vec<u8>, String>> + Send;
}
