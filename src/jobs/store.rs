//! Job store for tracking digest job status.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{DigestJobStatus, DigestJobStatusResponse, DigestKind, DigestResponse};

/// In-memory job store for tracking digest jobs.
pub struct JobStore {
    jobs: HashMap<Uuid, JobRecord>,
}

/// Internal record for tracking a job.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub kind: DigestKind,
    pub status: DigestJobStatus,
    pub message_count: usize,
    pub chunks: usize,
    pub failed_chunks: usize,
    pub result: Option<String>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new job record.
    pub fn new(job_id: Uuid, kind: DigestKind, message_count: usize) -> Self {
        Self {
            job_id,
            kind,
            status: DigestJobStatus::Pending,
            message_count,
            chunks: 0,
            failed_chunks: 0,
            result: None,
            error: None,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Mark the job as started.
    pub fn start(&mut self) {
        self.status = DigestJobStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Mark the job as completed with its digest.
    pub fn complete(&mut self, digest: DigestResponse) {
        self.status = DigestJobStatus::Completed;
        self.chunks = digest.chunks;
        self.failed_chunks = digest.failed_chunks;
        self.result = Some(digest.text);
        self.completed_at = Some(Utc::now());
    }

    /// Mark the job as failed.
    pub fn fail(&mut self, error: String) {
        self.status = DigestJobStatus::Failed;
        self.error = Some(error);
        self.completed_at = Some(Utc::now());
    }

    /// Mark the job as failed by a digest whose text is an error marker,
    /// keeping its chunk counts.
    pub fn fail_with_digest(&mut self, digest: DigestResponse) {
        self.chunks = digest.chunks;
        self.failed_chunks = digest.failed_chunks;
        self.fail(digest.text);
    }

    /// Whether the job has reached a final state.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            DigestJobStatus::Completed | DigestJobStatus::Failed
        )
    }

    /// Convert to response type.
    pub fn to_response(&self) -> DigestJobStatusResponse {
        DigestJobStatusResponse {
            job_id: self.job_id,
            kind: self.kind,
            status: self.status,
            message_count: self.message_count,
            chunks: self.chunks,
            failed_chunks: self.failed_chunks,
            result: self.result.clone(),
            error: self.error.clone(),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

impl JobStore {
    /// Create a new job store.
    pub fn new() -> Self {
        Self {
            jobs: HashMap::new(),
        }
    }

    /// Create a new job and return its ID.
    pub fn create_job(&mut self, kind: DigestKind, message_count: usize) -> Uuid {
        let job_id = Uuid::new_v4();
        self.jobs
            .insert(job_id, JobRecord::new(job_id, kind, message_count));
        job_id
    }

    /// Get a job by ID.
    pub fn get_job(&self, job_id: Uuid) -> Option<&JobRecord> {
        self.jobs.get(&job_id)
    }

    /// Start a job.
    pub fn start_job(&mut self, job_id: Uuid) -> bool {
        self.update(job_id, JobRecord::start)
    }

    /// Complete a job with its digest.
    pub fn complete_job(&mut self, job_id: Uuid, digest: DigestResponse) -> bool {
        self.update(job_id, |job| job.complete(digest))
    }

    /// Fail a job.
    pub fn fail_job(&mut self, job_id: Uuid, error: String) -> bool {
        self.update(job_id, |job| job.fail(error))
    }

    /// Fail a job with the digest that reported the failure.
    pub fn fail_job_with_digest(&mut self, job_id: Uuid, digest: DigestResponse) -> bool {
        self.update(job_id, |job| job.fail_with_digest(digest))
    }

    /// Get job status as response.
    pub fn get_job_status(&self, job_id: Uuid) -> Option<DigestJobStatusResponse> {
        self.jobs.get(&job_id).map(|j| j.to_response())
    }

    /// Remove finished jobs older than `max_age`. Returns how many were removed.
    pub fn cleanup_finished(&mut self, max_age: chrono::Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let before = self.jobs.len();
        self.jobs.retain(|_, job| {
            !job.is_finished() || job.completed_at.map_or(true, |t| t > cutoff)
        });
        before - self.jobs.len()
    }

    /// Clean up finished jobs older than one hour.
    pub fn cleanup_old_jobs(&mut self) -> usize {
        self.cleanup_finished(chrono::Duration::hours(1))
    }

    /// Get count of jobs by status.
    pub fn get_job_counts(&self) -> HashMap<DigestJobStatus, usize> {
        let mut counts = HashMap::new();
        for job in self.jobs.values() {
            *counts.entry(job.status).or_insert(0) += 1;
        }
        counts
    }

    fn update(&mut self, job_id: Uuid, f: impl FnOnce(&mut JobRecord)) -> bool {
        match self.jobs.get_mut(&job_id) {
            Some(job) => {
                f(job);
                true
            }
            None => false,
        }
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
