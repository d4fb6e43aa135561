use alias_sync_core::contract::{AliasTarget, FunctionVersionRecord};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::adapters::alias_api::{AliasApi, AliasApiError};
use crate::logging::{log_error, log_info};

const COMPONENT: &str = "alias_synchronizer";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AliasOutcome {
    Updated { alias_arn: String },
    Created { alias_arn: String },
}

impl AliasOutcome {
    pub fn alias_arn(&self) -> &str {
        match self {
            Self::Updated { alias_arn } | Self::Created { alias_arn } => alias_arn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasSyncError {
    UpdateFailed {
        target: AliasTarget,
        source: AliasApiError,
    },
    CreateFailed {
        target: AliasTarget,
        source: AliasApiError,
    },
}

impl AliasSyncError {
    pub fn target(&self) -> &AliasTarget {
        match self {
            Self::UpdateFailed { target, .. } | Self::CreateFailed { target, .. } => target,
        }
    }
}

impl std::fmt::Display for AliasSyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpdateFailed { target, source } => write!(
                f,
                "Failed to update {} alias for {}: {source}",
                target.alias_name, target.function_name
            ),
            Self::CreateFailed { target, source } => write!(
                f,
                "Failed to create {} alias for {}: {source}",
                target.alias_name, target.function_name
            ),
        }
    }
}

impl std::error::Error for AliasSyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UpdateFailed { source, .. } | Self::CreateFailed { source, .. } => Some(source),
        }
    }
}

/// Points `alias_name` at the listed version of every function.
///
/// Records are promoted concurrently and the call settles only after every
/// record has finished. A failure on one record never abandons the others;
/// the first failure in input order is returned once all have settled.
pub async fn synchronize_aliases(
    api: &impl AliasApi,
    alias_name: &str,
    records: &[FunctionVersionRecord],
) -> Result<Vec<AliasOutcome>, AliasSyncError> {
    log_info(
        COMPONENT,
        "input_received",
        json!({
            "alias_name": alias_name,
            "records": records,
        }),
    );

    let promotions = records
        .iter()
        .map(|record| promote_alias(api, AliasTarget::for_record(record, alias_name)));

    join_all(promotions).await.into_iter().collect()
}

async fn promote_alias(
    api: &impl AliasApi,
    target: AliasTarget,
) -> Result<AliasOutcome, AliasSyncError> {
    log_info(COMPONENT, "alias_update_started", json!(target));

    match api.update_alias(&target).await {
        Ok(alias_arn) => {
            log_info(COMPONENT, "alias_updated", json!({"alias_arn": alias_arn}));
            Ok(AliasOutcome::Updated { alias_arn })
        }
        Err(AliasApiError::NotFound(_)) => {
            log_info(
                COMPONENT,
                "alias_missing",
                json!({
                    "function_name": target.function_name,
                    "alias_name": target.alias_name,
                }),
            );
            create_alias(api, target).await
        }
        Err(source) => {
            log_error(
                COMPONENT,
                "alias_update_failed",
                json!({
                    "function_name": target.function_name,
                    "alias_name": target.alias_name,
                    "message": source.message(),
                }),
            );
            Err(AliasSyncError::UpdateFailed { target, source })
        }
    }
}

async fn create_alias(
    api: &impl AliasApi,
    target: AliasTarget,
) -> Result<AliasOutcome, AliasSyncError> {
    match api.create_alias(&target).await {
        Ok(alias_arn) => {
            log_info(COMPONENT, "alias_created", json!({"alias_arn": alias_arn}));
            Ok(AliasOutcome::Created { alias_arn })
        }
        Err(source) => {
            log_error(
                COMPONENT,
                "alias_create_failed",
                json!({
                    "function_name": target.function_name,
                    "alias_name": target.alias_name,
                    "message": source.message(),
                }),
            );
            Err(AliasSyncError::CreateFailed { target, source })
        }
    }
}
