use alias_sync_lambda::adapters::alias_api::{AliasApi, AliasApiError};
use alias_sync_lambda::adapters::artifact_source::ArtifactSource;
use alias_sync_lambda::adapters::job_reporter::JobReporter;
use alias_sync_lambda::handlers::job::{handle_job_event, JobHandlerConfig, JobResponse};
use alias_sync_lambda::runtime::contract::{
    AliasTarget, ArtifactCredentials, PipelineJobEvent, S3Location,
};
use aws_sdk_codepipeline::types::{ExecutionDetails, FailureDetails, FailureType};
use aws_sdk_lambda::error::{DisplayErrorContext, SdkError};
use aws_sdk_lambda::operation::update_alias::UpdateAliasError;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

/// Upper bounds CodePipeline accepts for failure messages and execution summaries.
const MAX_FAILURE_MESSAGE_CHARS: usize = 5_000;
const MAX_SUMMARY_CHARS: usize = 2_048;
const ARTIFACT_CREDENTIALS_PROVIDER: &str = "codepipeline-artifact-credentials";

struct LambdaAliasApi {
    lambda_client: aws_sdk_lambda::Client,
}

impl AliasApi for LambdaAliasApi {
    async fn update_alias(&self, target: &AliasTarget) -> Result<String, AliasApiError> {
        self.lambda_client
            .update_alias()
            .function_name(&target.function_name)
            .name(&target.alias_name)
            .function_version(&target.version)
            .send()
            .await
            .map(|output| output.alias_arn().unwrap_or_default().to_string())
            .map_err(|error| classify_update_error(&error))
    }

    async fn create_alias(&self, target: &AliasTarget) -> Result<String, AliasApiError> {
        self.lambda_client
            .create_alias()
            .function_name(&target.function_name)
            .name(&target.alias_name)
            .function_version(&target.version)
            .send()
            .await
            .map(|output| output.alias_arn().unwrap_or_default().to_string())
            .map_err(|error| AliasApiError::Service(DisplayErrorContext(&error).to_string()))
    }
}

/// Only a missing alias lets the update fall back to creating it.
fn classify_update_error<R: std::fmt::Debug>(
    error: &SdkError<UpdateAliasError, R>,
) -> AliasApiError {
    let message = DisplayErrorContext(error).to_string();
    match error.as_service_error() {
        Some(service_error) if service_error.is_resource_not_found_exception() => {
            AliasApiError::NotFound(message)
        }
        _ => AliasApiError::Service(message),
    }
}

struct S3ArtifactSource {
    sdk_config: aws_config::SdkConfig,
}

impl S3ArtifactSource {
    fn client_for(&self, credentials: Option<&ArtifactCredentials>) -> aws_sdk_s3::Client {
        let mut builder = aws_sdk_s3::config::Builder::from(&self.sdk_config);
        if let Some(credentials) = credentials {
            builder = builder.credentials_provider(aws_sdk_s3::config::Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                credentials.session_token.clone(),
                None,
                ARTIFACT_CREDENTIALS_PROVIDER,
            ));
        }
        aws_sdk_s3::Client::from_conf(builder.build())
    }
}

impl ArtifactSource for S3ArtifactSource {
    async fn fetch_artifact(
        &self,
        location: &S3Location,
        credentials: Option<&ArtifactCredentials>,
    ) -> Result<Vec<u8>, String> {
        let output = self
            .client_for(credentials)
            .get_object()
            .bucket(&location.bucket_name)
            .key(&location.object_key)
            .send()
            .await
            .map_err(|error| {
                format!(
                    "failed to read s3://{}/{}: {}",
                    location.bucket_name,
                    location.object_key,
                    DisplayErrorContext(&error)
                )
            })?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|error| format!("failed to read artifact body: {error}"))?;
        Ok(body.into_bytes().to_vec())
    }
}

struct CodePipelineReporter {
    pipeline_client: aws_sdk_codepipeline::Client,
}

impl JobReporter for CodePipelineReporter {
    async fn report_success(&self, job_id: &str, summary: &str) -> Result<(), String> {
        self.pipeline_client
            .put_job_success_result()
            .job_id(job_id)
            .execution_details(
                ExecutionDetails::builder()
                    .summary(truncate_message(summary, MAX_SUMMARY_CHARS))
                    .build(),
            )
            .send()
            .await
            .map(|_| ())
            .map_err(|error| format!("failed to report job success: {}", DisplayErrorContext(&error)))
    }

    async fn report_failure(&self, job_id: &str, message: &str) -> Result<(), String> {
        let details = FailureDetails::builder()
            .r#type(FailureType::JobFailed)
            .message(truncate_message(message, MAX_FAILURE_MESSAGE_CHARS))
            .build()
            .map_err(|error| format!("invalid failure details: {error}"))?;

        self.pipeline_client
            .put_job_failure_result()
            .job_id(job_id)
            .failure_details(details)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| format!("failed to report job failure: {}", DisplayErrorContext(&error)))
    }
}

fn truncate_message(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<JobResponse, Error> {
    let job_event: PipelineJobEvent = serde_json::from_value(event.payload)
        .map_err(|error| Error::from(format!("invalid pipeline job event: {error}")))?;

    let config = JobHandlerConfig {
        input_entry: std::env::var("ALIAS_SYNC_INPUT_ENTRY")
            .ok()
            .filter(|value| !value.trim().is_empty()),
    };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let api = LambdaAliasApi {
        lambda_client: aws_sdk_lambda::Client::new(&aws_config),
    };
    let reporter = CodePipelineReporter {
        pipeline_client: aws_sdk_codepipeline::Client::new(&aws_config),
    };
    let source = S3ArtifactSource {
        sdk_config: aws_config,
    };

    handle_job_event(job_event, &config, &api, &source, &reporter)
        .await
        .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
