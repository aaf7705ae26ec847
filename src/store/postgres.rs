use crate::errors::AppError;
use crate::models::{
    CustomerSnapshot, InspectionRequest, Location, Payment, PendingSubmission, RequestStatus,
    RequestSummary, Schedule, ServiceType, VehicleSnapshot,
};
use crate::store::RequestStore;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Postgres-backed request store.
///
/// One row per request: indexed scalars as columns, snapshots as JSONB.
/// Request numbers come from a dedicated sequence so concurrent submissions
/// can never collide.
pub struct PostgresRequestStore {
    pool: PgPool,
}

impl PostgresRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct RequestRow {
    id: Uuid,
    request_number: String,
    service_type: String,
    status: String,
    admin_job_id: Option<String>,
    customer_snapshot: Json<CustomerSnapshot>,
    vehicle_snapshot: Json<VehicleSnapshot>,
    schedule: Json<Schedule>,
    location: Json<Location>,
    payment: Json<Payment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RequestRow {
    fn into_request(self) -> Result<InspectionRequest, AppError> {
        let service_type = ServiceType::parse(&self.service_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Stored request {} has unknown service type '{}'",
                self.request_number, self.service_type
            ))
        })?;
        let status = RequestStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(format!(
                "Stored request {} has unknown status '{}'",
                self.request_number, self.status
            ))
        })?;

        Ok(InspectionRequest {
            id: self.id,
            request_number: self.request_number,
            service_type,
            customer_snapshot: self.customer_snapshot.0,
            vehicle_snapshot: self.vehicle_snapshot.0,
            schedule: self.schedule.0,
            location: self.location.0,
            status,
            admin_job_id: self.admin_job_id,
            payment: self.payment.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct SummaryRow {
    request_number: String,
    service_type: String,
    status: String,
    scheduled_date: NaiveDate,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl RequestStore for PostgresRequestStore {
    async fn insert(
        &self,
        submission: PendingSubmission,
    ) -> Result<InspectionRequest, AppError> {
        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            INSERT INTO inspection_requests (
                request_number, service_type, status, admin_job_id,
                customer_snapshot, vehicle_snapshot, schedule, location, payment,
                scheduled_date
            )
            VALUES (
                'REQ-' || lpad(nextval('inspection_request_number_seq')::text, 6, '0'),
                $1, 'PENDING', NULL, $2, $3, $4, $5, $6, $7
            )
            RETURNING id, request_number, service_type, status, admin_job_id,
                      customer_snapshot, vehicle_snapshot, schedule, location,
                      payment, created_at, updated_at
            "#,
        )
        .bind(submission.service_type.as_str())
        .bind(Json(&submission.customer_snapshot))
        .bind(Json(&submission.vehicle_snapshot))
        .bind(Json(&submission.schedule))
        .bind(Json(&submission.location))
        .bind(Json(&submission.payment))
        .bind(submission.schedule.date)
        .fetch_one(&self.pool)
        .await?;

        row.into_request()
    }

    async fn list_summaries(&self) -> Result<Vec<RequestSummary>, AppError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT request_number, service_type, status, scheduled_date, created_at
            FROM inspection_requests
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let service_type = ServiceType::parse(&row.service_type).ok_or_else(|| {
                    AppError::Internal(format!(
                        "Stored request {} has unknown service type '{}'",
                        row.request_number, row.service_type
                    ))
                })?;
                let status = RequestStatus::parse(&row.status).ok_or_else(|| {
                    AppError::Internal(format!(
                        "Stored request {} has unknown status '{}'",
                        row.request_number, row.status
                    ))
                })?;
                Ok(RequestSummary {
                    request_id: row.request_number,
                    service_type,
                    status,
                    scheduled_date: row.scheduled_date,
                    created_at: row.created_at,
                })
            })
            .collect()
    }

    async fn find_by_request_number(
        &self,
        request_number: &str,
    ) -> Result<Option<InspectionRequest>, AppError> {
        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, request_number, service_type, status, admin_job_id,
                   customer_snapshot, vehicle_snapshot, schedule, location,
                   payment, created_at, updated_at
            FROM inspection_requests
            WHERE request_number = $1
            "#,
        )
        .bind(request_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(RequestRow::into_request).transpose()
    }

    async fn mark_forwarded(
        &self,
        request_number: &str,
        admin_job_id: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE inspection_requests
            SET status = 'FORWARDED', admin_job_id = $2, updated_at = now()
            WHERE request_number = $1 AND status = 'PENDING'
            "#,
        )
        .bind(request_number)
        .bind(admin_job_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "No pending inspection request {} to mark as forwarded",
                request_number
            )));
        }

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
