//! In-memory request store.
//!
//! Keeps all state in a `Vec` behind a `tokio::sync::RwLock`. Not durable:
//! everything is lost on restart. Used for local development when no
//! `DATABASE_URL` is configured, and by tests.

use crate::errors::AppError;
use crate::models::{InspectionRequest, PendingSubmission, RequestStatus, RequestSummary};
use crate::store::RequestStore;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryRequestStore {
    requests: RwLock<Vec<InspectionRequest>>,
    // Monotonic counter; never reused even across failed submissions.
    next_number: AtomicU64,
}

impl MemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestStore for MemoryRequestStore {
    async fn insert(
        &self,
        submission: PendingSubmission,
    ) -> Result<InspectionRequest, AppError> {
        let seq = self.next_number.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();

        let request = InspectionRequest {
            id: Uuid::new_v4(),
            request_number: format!("REQ-{:06}", seq),
            service_type: submission.service_type,
            customer_snapshot: submission.customer_snapshot,
            vehicle_snapshot: submission.vehicle_snapshot,
            schedule: submission.schedule,
            location: submission.location,
            status: RequestStatus::Pending,
            admin_job_id: None,
            payment: submission.payment,
            created_at: now,
            updated_at: now,
        };

        self.requests.write().await.push(request.clone());
        Ok(request)
    }

    async fn list_summaries(&self) -> Result<Vec<RequestSummary>, AppError> {
        let requests = self.requests.read().await;
        // Insertion order is creation order, so newest-first is a reverse scan.
        Ok(requests
            .iter()
            .rev()
            .map(|r| RequestSummary {
                request_id: r.request_number.clone(),
                service_type: r.service_type,
                status: r.status,
                scheduled_date: r.schedule.date,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn find_by_request_number(
        &self,
        request_number: &str,
    ) -> Result<Option<InspectionRequest>, AppError> {
        let requests = self.requests.read().await;
        Ok(requests
            .iter()
            .find(|r| r.request_number == request_number)
            .cloned())
    }

    async fn mark_forwarded(
        &self,
        request_number: &str,
        admin_job_id: &str,
    ) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let pending = requests
            .iter_mut()
            .find(|r| r.request_number == request_number && r.status == RequestStatus::Pending);

        match pending {
            Some(request) => {
                request.status = RequestStatus::Forwarded;
                request.admin_job_id = Some(admin_job_id.to_string());
                request.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "No pending inspection request {} to mark as forwarded",
                request_number
            ))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
