use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Request lifecycle ============

/// Kind of inspection the customer is booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    /// Pre-delivery inspection.
    #[serde(rename = "PDI")]
    Pdi,
    /// Used-car inspection.
    #[serde(rename = "UCI")]
    Uci,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Pdi => "PDI",
            ServiceType::Uci => "UCI",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PDI" => Some(ServiceType::Pdi),
            "UCI" => Some(ServiceType::Uci),
            _ => None,
        }
    }
}

/// Lifecycle state of an inspection request.
///
/// Only moves forward: PENDING -> FORWARDED or PENDING -> FAILED.
/// FAILED is a store-side status; the forwarding path never assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Forwarded,
    Failed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Forwarded => "FORWARDED",
            RequestStatus::Failed => "FAILED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PENDING" => Some(RequestStatus::Pending),
            "FORWARDED" => Some(RequestStatus::Forwarded),
            "FAILED" => Some(RequestStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    NotRequired,
    Pending,
    Paid,
    Failed,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::NotRequired
    }
}

// ============ Snapshots ============

/// Immutable copy of the customer's contact info taken at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Free-text notes, trimmed and capped at submission time.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Copy of the vehicle description; immutable except for the resolved price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSnapshot {
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub vin: String,
    #[serde(default)]
    pub registration_number: String,
    /// Canonical catalog price; explicitly null when no catalog match exists.
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub date: NaiveDate,
    pub slot: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub coordinates: Coordinates,
}

/// Payment sub-record. Populated by processes outside this service; carried
/// and persisted verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub provider_payment_id: Option<String>,
}

// ============ Inspection request document ============

/// One inspection request as persisted in the request store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRequest {
    pub id: Uuid,
    /// Human-readable identifier, assigned exactly once at creation.
    pub request_number: String,
    pub service_type: ServiceType,
    pub customer_snapshot: CustomerSnapshot,
    pub vehicle_snapshot: VehicleSnapshot,
    pub schedule: Schedule,
    pub location: Location,
    pub status: RequestStatus,
    /// Identifier of the corresponding job in the admin system; null until
    /// forwarding succeeds.
    pub admin_job_id: Option<String>,
    pub payment: Payment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated, enriched submission ready to hit the durability checkpoint.
/// The store assigns id, request number, status and timestamps.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub service_type: ServiceType,
    pub customer_snapshot: CustomerSnapshot,
    pub vehicle_snapshot: VehicleSnapshot,
    pub schedule: Schedule,
    pub location: Location,
    pub payment: Payment,
}

/// Projection returned by the list endpoint, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub request_id: String,
    pub service_type: ServiceType,
    pub status: RequestStatus,
    pub scheduled_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// What the caller gets back from a submission.
///
/// Always reflects the state right after the durability checkpoint: PENDING
/// with no admin job id, regardless of whether forwarding already succeeded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub request_id: String,
    pub admin_job_id: Option<String>,
    pub status: RequestStatus,
}

// ============ Vehicle master catalog ============

/// Read-only mirror of an admin-side brand. Never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
}

/// Read-only mirror of an admin-side model. Never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogModel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
}

// ============ Forwarding ============

/// Payload handed to the admin job-creation endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminJobPayload {
    pub request_number: String,
    pub service_type: ServiceType,
    pub customer_snapshot: CustomerSnapshot,
    pub vehicle_snapshot: VehicleSnapshot,
    pub schedule: Schedule,
    pub location: Location,
}

impl AdminJobPayload {
    /// Builds the forwarding payload from a persisted record.
    pub fn from_request(request: &InspectionRequest) -> Self {
        Self {
            request_number: request.request_number.clone(),
            service_type: request.service_type,
            customer_snapshot: request.customer_snapshot.clone(),
            vehicle_snapshot: request.vehicle_snapshot.clone(),
            schedule: request.schedule.clone(),
            location: request.location.clone(),
        }
    }
}
