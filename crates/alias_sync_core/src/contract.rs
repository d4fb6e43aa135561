use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const USER_PARAMETERS_KEY: &str = "UserParameters";
pub const EXPECTED_INPUT_ARTIFACTS: usize = 1;
pub const EXPECTED_OUTPUT_ARTIFACTS: usize = 0;

/// Lambda invocation payload sent by the pipeline for an invoke action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineJobEvent {
    #[serde(rename = "CodePipeline.job")]
    pub job: PipelineJob,
}

/// One unit of work handed to the action. Everything below `id` is optional
/// so that absent configuration surfaces as a validation error rather than a
/// decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineJob {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JobData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_configuration: Option<ActionConfiguration>,
    #[serde(default)]
    pub input_artifacts: Vec<Artifact>,
    #[serde(default)]
    pub output_artifacts: Vec<Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_credentials: Option<ArtifactCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ArtifactLocation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactLocation {
    #[serde(rename = "type", default)]
    pub location_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_location: Option<S3Location>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct S3Location {
    pub bucket_name: String,
    pub object_key: String,
}

/// Temporary credentials the pipeline issues for reading its artifact store.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl std::fmt::Debug for ArtifactCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One deployed function and the version its alias should point at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionVersionRecord {
    #[serde(rename = "FunctionName")]
    pub function_name: String,
    #[serde(rename = "Version")]
    pub version: String,
}

impl FunctionVersionRecord {
    pub fn new(function_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            version: version.into(),
        }
    }
}

/// Targeting fields shared by the update and create alias calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AliasTarget {
    pub function_name: String,
    pub alias_name: String,
    pub version: String,
}

impl AliasTarget {
    pub fn for_record(record: &FunctionVersionRecord, alias_name: &str) -> Self {
        Self {
            function_name: record.function_name.clone(),
            alias_name: alias_name.to_string(),
            version: record.version.clone(),
        }
    }
}

impl PipelineJob {
    pub fn input_artifacts(&self) -> &[Artifact] {
        self.data
            .as_ref()
            .map(|data| data.input_artifacts.as_slice())
            .unwrap_or_default()
    }

    pub fn output_artifacts(&self) -> &[Artifact] {
        self.data
            .as_ref()
            .map(|data| data.output_artifacts.as_slice())
            .unwrap_or_default()
    }

    pub fn artifact_credentials(&self) -> Option<&ArtifactCredentials> {
        self.data
            .as_ref()
            .and_then(|data| data.artifact_credentials.as_ref())
    }
}
