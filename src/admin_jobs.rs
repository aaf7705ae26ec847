use crate::admin_auth::AdminTokenCache;
use crate::errors::AppError;
use crate::models::AdminJobPayload;
use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// Client for the admin service's job-creation endpoint.
///
/// Used for the best-effort forwarding step after a request is durable; the
/// orchestrator decides what to do with a failure, this client only reports it.
pub struct AdminJobsClient {
    client: reqwest::Client,
    base_url: String,
    auth: Arc<AdminTokenCache>,
}

impl AdminJobsClient {
    pub fn new(
        base_url: String,
        auth: Arc<AdminTokenCache>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create admin jobs client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    /// Creates a job in the admin system for a persisted inspection request.
    ///
    /// # Arguments
    ///
    /// * `payload` - The forwarding payload built from the stored record.
    ///
    /// # Returns
    ///
    /// * `Result<String, AppError>` - The ID of the created admin job.
    pub async fn create_job(&self, payload: &AdminJobPayload) -> Result<String, AppError> {
        let url = format!("{}/jobs", self.base_url);
        tracing::info!(
            request_number = %payload.request_number,
            "Forwarding inspection request to admin service"
        );

        let token = self.auth.token().await?;

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", token))
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::from_upstream("Failed to create admin job", e))?;

        if !response.status().is_success() {
            let status = response.status();
            if status == StatusCode::UNAUTHORIZED {
                self.auth.invalidate().await;
            }
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Upstream {
                status,
                message: format!("Admin job creation failed {}: {}", status, error_text),
            });
        }

        let response_data: serde_json::Value = response.json().await.map_err(|e| {
            AppError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: format!("Failed to parse job creation response: {}", e),
            }
        })?;

        // Admin responds with {data: {id}}; some deployments return the id
        // as a number.
        let data_id = response_data.get("data").and_then(|d| d.get("id"));
        let job_id = match data_id {
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => {
                tracing::warn!("Unexpected admin job response format: {:?}", response_data);
                return Err(AppError::Upstream {
                    status: StatusCode::BAD_GATEWAY,
                    message: "Job creation response missing 'data.id' field".to_string(),
                });
            }
        };

        tracing::info!(
            request_number = %payload.request_number,
            admin_job_id = %job_id,
            "Admin job created successfully"
        );
        Ok(job_id)
    }
}
