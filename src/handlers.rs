use crate::admin_auth::AdminTokenCache;
use crate::admin_jobs::AdminJobsClient;
use crate::config::Config;
use crate::errors::AppError;
use crate::store::RequestStore;
use crate::submission;
use crate::validation::{validate_inspection_request, InspectionRequestPayload};
use crate::vehicle_master::VehicleMasterGateway;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Durable request store (Postgres in deployments, in-memory otherwise).
    pub store: Arc<dyn RequestStore>,
    /// Process-wide admin credential cache.
    pub auth: Arc<AdminTokenCache>,
    /// Client for the admin vehicle-master catalog.
    pub vehicle_master: VehicleMasterGateway,
    /// Client for the admin job-creation endpoint.
    pub admin_jobs: AdminJobsClient,
}

impl AppState {
    /// Wires up the admin-service clients around a shared token cache.
    pub fn new(config: Config, store: Arc<dyn RequestStore>) -> Result<Self, AppError> {
        let timeout = Duration::from_millis(config.admin_timeout_ms);
        let auth = Arc::new(AdminTokenCache::new(
            config.admin_base_url.clone(),
            config.admin_email.clone(),
            config.admin_password.clone(),
            timeout,
        )?);
        let vehicle_master =
            VehicleMasterGateway::new(config.admin_base_url.clone(), auth.clone(), timeout)?;
        let admin_jobs =
            AdminJobsClient::new(config.admin_base_url.clone(), auth.clone(), timeout)?;

        Ok(Self {
            config,
            store,
            auth,
            vehicle_master,
            admin_jobs,
        })
    }
}

fn success_body(data: Value, message: &str) -> Value {
    json!({
        "success": true,
        "data": data,
        "message": message,
    })
}

/// Health check endpoint. Bypasses rate limiting.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "status": "ok",
            "time": Utc::now().to_rfc3339(),
        })),
    )
}

/// POST /api/customer/inspection-request
///
/// Validates and submits a new inspection request. The response always
/// reflects the persisted PENDING state; forwarding happens best-effort
/// behind the scenes.
pub async fn create_inspection_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InspectionRequestPayload>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let submission = validate_inspection_request(payload)?;
    let receipt = submission::submit_inspection_request(&state, submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(success_body(
            json!(receipt),
            "Inspection request saved. Awaiting admin assignment.",
        )),
    ))
}

/// GET /api/customer/inspection-requests
pub async fn list_inspection_requests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let summaries = submission::get_inspection_requests(&state).await?;
    Ok(Json(success_body(
        json!(summaries),
        "Inspection requests fetched successfully",
    )))
}

/// GET /api/customer/inspection-requests/:request_id
///
/// Returns the full record with the price re-resolved against the current
/// catalog.
pub async fn get_inspection_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let request = submission::get_inspection_request_by_id(&state, &request_id).await?;
    Ok(Json(success_body(
        json!(request),
        "Inspection request fetched successfully",
    )))
}

/// GET /api/customer/vehicle-master/brands
pub async fn fetch_brands(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let brands = state.vehicle_master.list_brands().await?;

    // Sanitize response - only expose id and name
    let sanitized: Vec<Value> = brands
        .iter()
        .map(|brand| json!({"id": brand.id, "name": brand.name}))
        .collect();

    Ok(Json(success_body(
        json!(sanitized),
        "Brands fetched successfully",
    )))
}

/// GET /api/customer/vehicle-master/brands/:brand_id/models
pub async fn fetch_models_by_brand(
    State(state): State<Arc<AppState>>,
    Path(brand_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let models = state.vehicle_master.list_models(&brand_id).await?;

    // Sanitize response - only expose id, name, and price
    let sanitized: Vec<Value> = models
        .iter()
        .map(|model| json!({"id": model.id, "name": model.name, "price": model.price}))
        .collect();

    Ok(Json(success_body(
        json!(sanitized),
        "Models fetched successfully",
    )))
}
