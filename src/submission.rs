//! Submission orchestration for inspection requests.
//!
//! The workflow sequences three phases per request:
//! 1. normalize + enrich (never fails, degrades to a null price)
//! 2. persist with status PENDING (the durability checkpoint, fails loud)
//! 3. forward to the admin job endpoint (best-effort, fails quiet)
//!
//! The caller is always answered with the post-persistence state; whatever
//! happens during forwarding is the store's and the logs' business.

use crate::enrichment;
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{
    AdminJobPayload, InspectionRequest, PendingSubmission, RequestSummary, SubmissionReceipt,
};

/// Free-text notes are capped at this many characters after trimming.
pub const NOTES_MAX_LEN: usize = 1000;

/// Trims and caps customer notes; blank notes collapse to `None`.
pub fn normalize_notes(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(NOTES_MAX_LEN).collect())
}

/// What actually happened during a submission: the durable record plus the
/// best-effort forwarding result. Callers only ever see the persisted side.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub persisted: InspectionRequest,
    pub forwarded: Result<String, AppError>,
}

/// Accepts a validated submission, persists it, and forwards it to the admin
/// service for scheduling.
///
/// The returned receipt always reflects the state right after the durability
/// checkpoint (PENDING, no admin job id), even when forwarding already
/// succeeded synchronously.
pub async fn submit_inspection_request(
    state: &AppState,
    mut submission: PendingSubmission,
) -> Result<SubmissionReceipt, AppError> {
    // Step 1: normalize free-text notes.
    submission.customer_snapshot.notes =
        normalize_notes(submission.customer_snapshot.notes.as_deref());

    // Step 2: best-effort price enrichment.
    submission.vehicle_snapshot =
        enrichment::resolve_price(&state.vehicle_master, submission.vehicle_snapshot).await;

    // Step 3: durability checkpoint. A failure here fails the submission and
    // nothing downstream is attempted.
    let persisted = state.store.insert(submission).await?;
    tracing::info!(
        request_number = %persisted.request_number,
        status = persisted.status.as_str(),
        "Inspection request saved"
    );

    let receipt = SubmissionReceipt {
        request_id: persisted.request_number.clone(),
        admin_job_id: None,
        status: persisted.status,
    };

    // Steps 4-6: forward and record the result; failures stay here.
    let outcome = forward_to_admin(state, persisted).await;
    if let Err(e) = &outcome.forwarded {
        tracing::warn!(
            request_number = %outcome.persisted.request_number,
            error = %e,
            "Forwarding to admin service failed; request stays PENDING for out-of-band retry"
        );
    }

    Ok(receipt)
}

/// Best-effort forwarding of a persisted request to the admin job endpoint.
async fn forward_to_admin(state: &AppState, persisted: InspectionRequest) -> SubmissionOutcome {
    let payload = AdminJobPayload::from_request(&persisted);
    let forwarded = state.admin_jobs.create_job(&payload).await;

    if let Ok(job_id) = &forwarded {
        if let Err(e) = state
            .store
            .mark_forwarded(&persisted.request_number, job_id)
            .await
        {
            // Forwarded remotely but not reflected locally; reconciliation is
            // a manual follow-up driven by this log line.
            tracing::error!(
                request_number = %persisted.request_number,
                admin_job_id = %job_id,
                error = %e,
                "Admin job created but local status update failed"
            );
        }
    }

    SubmissionOutcome {
        persisted,
        forwarded,
    }
}

/// Returns summaries of all inspection requests, newest first.
pub async fn get_inspection_requests(state: &AppState) -> Result<Vec<RequestSummary>, AppError> {
    state.store.list_summaries().await
}

/// Returns the full record for a request number.
///
/// The price is re-resolved against the current catalog at read time, so the
/// response reflects today's pricing rather than the value stored at
/// submission.
pub async fn get_inspection_request_by_id(
    state: &AppState,
    request_id: &str,
) -> Result<InspectionRequest, AppError> {
    let mut request = state
        .store
        .find_by_request_number(request_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Inspection request {} not found", request_id))
        })?;

    request.vehicle_snapshot =
        enrichment::resolve_price(&state.vehicle_master, request.vehicle_snapshot).await;

    Ok(request)
}
