use alias_sync_core::artifact::{decode_version_records, input_artifact_location, ArtifactError};
use alias_sync_core::contract::PipelineJobEvent;
use alias_sync_core::job::{validate_job, JobValidationError, ValidatedJob};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::adapters::alias_api::AliasApi;
use crate::adapters::artifact_source::ArtifactSource;
use crate::adapters::job_reporter::JobReporter;
use crate::handlers::synchronize::{synchronize_aliases, AliasOutcome, AliasSyncError};
use crate::logging::{log_error, log_info};

const COMPONENT: &str = "job_handler";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobHandlerConfig {
    /// Archive entry holding the version list; first `.json` entry when unset.
    pub input_entry: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobResponse {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_name: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<AliasOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    Validation(JobValidationError),
    Artifact(ArtifactError),
    Sync(AliasSyncError),
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(error) => write!(f, "{error}"),
            Self::Artifact(error) => write!(f, "{error}"),
            Self::Sync(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(error) => Some(error),
            Self::Artifact(error) => Some(error),
            Self::Sync(error) => Some(error),
        }
    }
}

impl From<JobValidationError> for JobError {
    fn from(error: JobValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<ArtifactError> for JobError {
    fn from(error: ArtifactError) -> Self {
        Self::Artifact(error)
    }
}

impl From<AliasSyncError> for JobError {
    fn from(error: AliasSyncError) -> Self {
        Self::Sync(error)
    }
}

/// Validates the job, loads its version list and promotes every alias. No
/// alias call is made unless validation and artifact loading both succeed.
pub async fn run_job(
    event: PipelineJobEvent,
    config: &JobHandlerConfig,
    api: &impl AliasApi,
    source: &impl ArtifactSource,
) -> Result<(ValidatedJob, Vec<AliasOutcome>), JobError> {
    let validated = validate_job(event.job)?;

    let location = input_artifact_location(&validated.job)?;
    let bytes = source
        .fetch_artifact(location, validated.job.artifact_credentials())
        .await
        .map_err(ArtifactError::Fetch)?;
    let records = decode_version_records(&bytes, config.input_entry.as_deref())?;

    let outcomes = synchronize_aliases(api, &validated.alias_name, &records).await?;
    Ok((validated, outcomes))
}

/// Runs the job and reports its outcome to the pipeline. Job failures are
/// reported, not returned; only a failed report surfaces as `Err`.
pub async fn handle_job_event(
    event: PipelineJobEvent,
    config: &JobHandlerConfig,
    api: &impl AliasApi,
    source: &impl ArtifactSource,
    reporter: &impl JobReporter,
) -> Result<JobResponse, String> {
    let job_id = event.job.id.clone();
    log_info(COMPONENT, "job_started", json!({"job_id": job_id}));

    match run_job(event, config, api, source).await {
        Ok((validated, outcomes)) => {
            let summary = format!(
                "Pointed {} alias at {} function version(s)",
                validated.alias_name,
                outcomes.len()
            );
            reporter.report_success(&job_id, &summary).await?;
            log_info(
                COMPONENT,
                "job_succeeded",
                json!({
                    "job_id": job_id,
                    "alias_name": validated.alias_name,
                    "alias_arns": outcomes
                        .iter()
                        .map(AliasOutcome::alias_arn)
                        .collect::<Vec<_>>(),
                }),
            );
            Ok(JobResponse {
                job_id,
                status: "succeeded".to_string(),
                alias_name: Some(validated.alias_name),
                outcomes,
                message: None,
            })
        }
        Err(error) => {
            let message = error.to_string();
            log_error(
                COMPONENT,
                "job_failed",
                json!({
                    "job_id": job_id,
                    "message": message,
                }),
            );
            reporter.report_failure(&job_id, &message).await?;
            Ok(JobResponse {
                job_id,
                status: "failed".to_string(),
                alias_name: None,
                outcomes: Vec::new(),
                message: Some(message),
            })
        }
    }
}
