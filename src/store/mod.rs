//! Durable storage for inspection requests.
//!
//! The orchestrator consumes the store through the [`RequestStore`] trait:
//! a Postgres backend for deployments and an in-memory backend for local
//! development and tests.

use crate::errors::AppError;
use crate::models::{InspectionRequest, PendingSubmission, RequestSummary};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

/// Durable CRUD over inspection-request records.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Persists a new request with status PENDING and no admin job id,
    /// assigning a unique `requestNumber` exactly once.
    ///
    /// This is the durability checkpoint: a failure here fails the whole
    /// submission.
    async fn insert(&self, submission: PendingSubmission)
        -> Result<InspectionRequest, AppError>;

    /// Returns summaries of all requests, newest first.
    async fn list_summaries(&self) -> Result<Vec<RequestSummary>, AppError>;

    /// Looks up the full record for a request number.
    async fn find_by_request_number(
        &self,
        request_number: &str,
    ) -> Result<Option<InspectionRequest>, AppError>;

    /// Records a successful forward: status PENDING -> FORWARDED plus the
    /// admin-side job id. Fails when no pending record matches.
    async fn mark_forwarded(
        &self,
        request_number: &str,
        admin_job_id: &str,
    ) -> Result<(), AppError>;

    fn backend_name(&self) -> &'static str;
}
