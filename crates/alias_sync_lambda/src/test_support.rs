use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use alias_sync_core::contract::{AliasTarget, ArtifactCredentials, S3Location};

use crate::adapters::alias_api::{AliasApi, AliasApiError};
use crate::adapters::artifact_source::ArtifactSource;
use crate::adapters::job_reporter::JobReporter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasCall {
    Update(AliasTarget),
    Create(AliasTarget),
}

/// Alias API double keyed by function name. Aliases exist unless marked
/// missing; `with_delay` makes the update yield before it settles.
#[derive(Default)]
pub struct ScriptedAliasApi {
    missing: BTreeSet<String>,
    update_failures: BTreeSet<String>,
    create_failures: BTreeSet<String>,
    delays: BTreeMap<String, usize>,
    calls: Mutex<Vec<AliasCall>>,
    settled: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedAliasApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_alias(mut self, function_name: &str) -> Self {
        self.missing.insert(function_name.to_string());
        self
    }

    pub fn with_update_failure(mut self, function_name: &str) -> Self {
        self.update_failures.insert(function_name.to_string());
        self
    }

    pub fn with_create_failure(mut self, function_name: &str) -> Self {
        self.create_failures.insert(function_name.to_string());
        self
    }

    pub fn with_delay(mut self, function_name: &str, yields: usize) -> Self {
        self.delays.insert(function_name.to_string(), yields);
        self
    }

    pub fn calls(&self) -> Vec<AliasCall> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn settled(&self) -> Vec<String> {
        self.settled.lock().expect("poisoned mutex").clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: AliasCall) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }

    fn alias_arn(target: &AliasTarget) -> String {
        format!(
            "arn:aws:lambda:us-east-1:123456789012:function:{}:{}",
            target.function_name, target.alias_name
        )
    }
}

impl AliasApi for ScriptedAliasApi {
    async fn update_alias(&self, target: &AliasTarget) -> Result<String, AliasApiError> {
        self.record(AliasCall::Update(target.clone()));
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let yields = self.delays.get(&target.function_name).copied().unwrap_or(0);
        for _ in 0..yields {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.settled
            .lock()
            .expect("poisoned mutex")
            .push(target.function_name.clone());

        if self.update_failures.contains(&target.function_name) {
            Err(AliasApiError::Service(
                "ThrottlingException: rate exceeded".to_string(),
            ))
        } else if self.missing.contains(&target.function_name) {
            Err(AliasApiError::NotFound(format!(
                "ResourceNotFoundException: Alias not found: {}",
                Self::alias_arn(target)
            )))
        } else {
            Ok(Self::alias_arn(target))
        }
    }

    async fn create_alias(&self, target: &AliasTarget) -> Result<String, AliasApiError> {
        self.record(AliasCall::Create(target.clone()));

        if self.create_failures.contains(&target.function_name) {
            Err(AliasApiError::Service(
                "ResourceConflictException: alias already exists".to_string(),
            ))
        } else {
            Ok(Self::alias_arn(target))
        }
    }
}

pub struct StaticArtifactSource {
    body: Result<Vec<u8>, String>,
    requests: Mutex<Vec<(S3Location, Option<String>)>>,
}

impl StaticArtifactSource {
    pub fn returning(body: &str) -> Self {
        Self {
            body: Ok(body.as_bytes().to_vec()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            body: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requested locations with the access key id used for each.
    pub fn requests(&self) -> Vec<(S3Location, Option<String>)> {
        self.requests.lock().expect("poisoned mutex").clone()
    }
}

impl ArtifactSource for StaticArtifactSource {
    async fn fetch_artifact(
        &self,
        location: &S3Location,
        credentials: Option<&ArtifactCredentials>,
    ) -> Result<Vec<u8>, String> {
        self.requests.lock().expect("poisoned mutex").push((
            location.clone(),
            credentials.map(|credentials| credentials.access_key_id.clone()),
        ));
        self.body.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Success { job_id: String, summary: String },
    Failure { job_id: String, message: String },
}

#[derive(Default)]
pub struct CapturingReporter {
    reports: Mutex<Vec<Report>>,
    fail_with: Option<String>,
}

impl CapturingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reports: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports.lock().expect("poisoned mutex").clone()
    }

    fn push(&self, report: Report) -> Result<(), String> {
        self.reports.lock().expect("poisoned mutex").push(report);
        match &self.fail_with {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }
}

impl JobReporter for CapturingReporter {
    async fn report_success(&self, job_id: &str, summary: &str) -> Result<(), String> {
        self.push(Report::Success {
            job_id: job_id.to_string(),
            summary: summary.to_string(),
        })
    }

    async fn report_failure(&self, job_id: &str, message: &str) -> Result<(), String> {
        self.push(Report::Failure {
            job_id: job_id.to_string(),
            message: message.to_string(),
        })
    }
}
