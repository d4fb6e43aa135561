use std::future::Future;

/// Signals the outcome of a job back to the pipeline.
pub trait JobReporter {
    fn report_success(
        &self,
        job_id: &str,
        summary: &str,
    ) -> impl Future<Output = Result<(), String>> + Send;

    fn report_failure(
        &self,
        job_id: &str,
        message: &str,
    ) -> impl Future<Output = Result<(), String>> + Send;
}
