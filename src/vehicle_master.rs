use crate::admin_auth::AdminTokenCache;
use crate::errors::AppError;
use crate::models::{Brand, CatalogModel};
use axum::http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Client for the admin service's vehicle-master catalog.
///
/// Brands and models are read-only mirrors of admin data, fetched fresh per
/// call; nothing is cached locally. A single failed attempt is surfaced
/// immediately, no retries.
pub struct VehicleMasterGateway {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<AdminTokenCache>,
}

#[derive(Debug, Deserialize)]
struct BrandsEnvelope {
    #[serde(default)]
    data: Option<BrandsData>,
}

#[derive(Debug, Deserialize)]
struct BrandsData {
    #[serde(default)]
    brands: Option<Vec<Brand>>,
}

#[derive(Debug, Deserialize)]
struct ModelsEnvelope {
    #[serde(default)]
    data: Option<ModelsData>,
}

#[derive(Debug, Deserialize)]
struct ModelsData {
    #[serde(default)]
    models: Option<Vec<CatalogModel>>,
}

impl VehicleMasterGateway {
    /// Creates a new gateway.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the admin service.
    /// * `auth` - Shared token cache used to authenticate outbound calls.
    /// * `timeout` - Bound applied to every catalog call.
    pub fn new(
        base_url: String,
        auth: Arc<AdminTokenCache>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::Internal(format!("Failed to create vehicle master client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// Fetches all active car brands from the admin service.
    pub async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        let url = format!("{}/vehicle-master/brands", self.base_url);
        let body = self.get_authenticated(&url).await?;

        let envelope: BrandsEnvelope = serde_json::from_slice(&body).map_err(|e| {
            AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: format!("Failed to parse brands response: {}", e),
            }
        })?;

        let brands = envelope.data.and_then(|d| d.brands).unwrap_or_default();
        tracing::info!(total_brands = brands.len(), "Brands fetched successfully");
        Ok(brands)
    }

    /// Fetches all active models for a specific brand.
    ///
    /// Fails with a validation error before any network call when `brand_id`
    /// is empty or blank.
    pub async fn list_models(&self, brand_id: &str) -> Result<Vec<CatalogModel>, AppError> {
        if brand_id.trim().is_empty() {
            return Err(AppError::Validation(
                "Invalid brand ID provided".to_string(),
            ));
        }

        let url = format!("{}/vehicle-master/brands/{}/models", self.base_url, brand_id);
        let body = self.get_authenticated(&url).await?;

        let envelope: ModelsEnvelope = serde_json::from_slice(&body).map_err(|e| {
            AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: format!("Failed to parse models response: {}", e),
            }
        })?;

        let models = envelope.data.and_then(|d| d.models).unwrap_or_default();
        tracing::info!(
            brand_id = brand_id,
            total_models = models.len(),
            "Models fetched successfully"
        );
        Ok(models)
    }

    /// Performs a bearer-authenticated GET, mapping timeouts to 504 and
    /// invalidating the token cache on a 401.
    async fn get_authenticated(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let token = self.auth.token().await?;

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| AppError::from_upstream("Vehicle master request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            if status == StatusCode::UNAUTHORIZED {
                // Known-bad token; the next call re-authenticates.
                self.auth.invalidate().await;
            }
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Upstream {
                status,
                message: format!("Admin service returned {}: {}", status, error_text),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::from_upstream("Failed to read admin response", e))?;

        Ok(bytes.to_vec())
    }
}
