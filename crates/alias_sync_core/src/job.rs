use crate::contract::{
    PipelineJob, EXPECTED_INPUT_ARTIFACTS, EXPECTED_OUTPUT_ARTIFACTS, USER_PARAMETERS_KEY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Input,
    Output,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobValidationError {
    MissingConfiguration,
    ArtifactCount {
        kind: ArtifactKind,
        expected: usize,
        actual: usize,
    },
}

impl std::fmt::Display for JobValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingConfiguration => f.write_str(
                "Alias name must be specified via CodePipeline custom action user parameters",
            ),
            Self::ArtifactCount {
                kind,
                expected,
                actual,
            } => write!(f, "Expected {expected} {kind} artifact(s) but the job has {actual}"),
        }
    }
}

impl std::error::Error for JobValidationError {}

/// A job that passed validation, augmented with the alias to promote.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedJob {
    pub job: PipelineJob,
    pub alias_name: String,
}

pub fn extract_alias_name(job: &PipelineJob) -> Result<&str, JobValidationError> {
    job.data
        .as_ref()
        .and_then(|data| data.action_configuration.as_ref())
        .and_then(|action| action.configuration.as_ref())
        .and_then(|configuration| configuration.get(USER_PARAMETERS_KEY))
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or(JobValidationError::MissingConfiguration)
}

pub fn validate_job(job: PipelineJob) -> Result<ValidatedJob, JobValidationError> {
    check_artifact_count(
        ArtifactKind::Input,
        EXPECTED_INPUT_ARTIFACTS,
        job.input_artifacts().len(),
    )?;
    check_artifact_count(
        ArtifactKind::Output,
        EXPECTED_OUTPUT_ARTIFACTS,
        job.output_artifacts().len(),
    )?;

    let alias_name = extract_alias_name(&job)?.to_string();
    Ok(ValidatedJob { job, alias_name })
}

fn check_artifact_count(
    kind: ArtifactKind,
    expected: usize,
    actual: usize,
) -> Result<(), JobValidationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(JobValidationError::ArtifactCount {
            kind,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn job_from(data: Value) -> PipelineJob {
        serde_json::from_value(json!({"id": "job-1", "data": data})).expect("job should decode")
    }

    fn data_with_user_parameters(value: Value) -> Value {
        json!({
            "actionConfiguration": {"configuration": {"UserParameters": value}},
            "inputArtifacts": [{"name": "DeployOutput"}],
            "outputArtifacts": []
        })
    }

    #[test]
    fn augments_job_with_alias_name() {
        let job = job_from(data_with_user_parameters(json!("prod")));

        let validated = validate_job(job.clone()).expect("job should validate");

        assert_eq!(validated.alias_name, "prod");
        assert_eq!(validated.job, job);
    }

    #[test]
    fn keeps_alias_name_verbatim() {
        let job = job_from(data_with_user_parameters(json!("  live/v2 ")));

        let validated = validate_job(job).expect("job should validate");

        assert_eq!(validated.alias_name, "  live/v2 ");
    }

    #[test]
    fn rejects_empty_user_parameters() {
        let job = job_from(data_with_user_parameters(json!("")));

        assert_eq!(
            validate_job(job),
            Err(JobValidationError::MissingConfiguration)
        );
    }

    #[test]
    fn rejects_missing_configuration_at_every_level() {
        let cases = [
            json!({"inputArtifacts": [{"name": "in"}]}),
            json!({"inputArtifacts": [{"name": "in"}], "actionConfiguration": {}}),
            json!({"inputArtifacts": [{"name": "in"}], "actionConfiguration": {"configuration": {}}}),
            json!({
                "inputArtifacts": [{"name": "in"}],
                "actionConfiguration": {"configuration": {"FunctionName": "alias-sync"}}
            }),
        ];

        for data in cases {
            assert_eq!(
                validate_job(job_from(data)),
                Err(JobValidationError::MissingConfiguration)
            );
        }

        let without_data: PipelineJob =
            serde_json::from_value(json!({"id": "job-2"})).expect("job should decode");
        assert_eq!(
            extract_alias_name(&without_data),
            Err(JobValidationError::MissingConfiguration)
        );
    }

    #[test]
    fn checks_artifact_counts_before_configuration() {
        let no_inputs = job_from(json!({
            "actionConfiguration": {"configuration": {"UserParameters": "prod"}}
        }));
        assert_eq!(
            validate_job(no_inputs),
            Err(JobValidationError::ArtifactCount {
                kind: ArtifactKind::Input,
                expected: 1,
                actual: 0,
            })
        );

        let with_output = job_from(json!({
            "inputArtifacts": [{"name": "in"}],
            "outputArtifacts": [{"name": "out"}]
        }));
        let error = validate_job(with_output).expect_err("output artifacts are not allowed");
        assert_eq!(
            error,
            JobValidationError::ArtifactCount {
                kind: ArtifactKind::Output,
                expected: 0,
                actual: 1,
            }
        );
        assert_eq!(
            error.to_string(),
            "Expected 0 output artifact(s) but the job has 1"
        );
    }
}
