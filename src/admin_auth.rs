use crate::errors::AppError;
use axum::http::StatusCode;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Refuse to hand out a token within this window of its expiry, so a call
/// in flight when the token lapses does not fail with a stale credential.
const TOKEN_SAFETY_MARGIN_SECS: u64 = 60;

/// Fallback lifetime when the login response omits `expiresIn`.
const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Process-wide cache of the admin service bearer credential.
///
/// A miss performs one login against `POST {adminBase}/auth/login`. The slot
/// is guarded by a mutex held across the login call, so concurrent misses
/// share a single in-flight login instead of issuing duplicates.
pub struct AdminTokenCache {
    client: reqwest::Client,
    base_url: String,
    email: String,
    password: String,
    slot: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Deserialize)]
struct LoginEnvelope {
    #[serde(default)]
    data: Option<LoginData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl AdminTokenCache {
    /// Creates a token cache for the given admin service credentials.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the admin service.
    /// * `email` / `password` - Configured service credentials.
    /// * `timeout` - Bound applied to the login call.
    pub fn new(
        base_url: String,
        email: String,
        password: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create admin auth client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            email,
            password,
            slot: Mutex::new(None),
        })
    }

    /// Returns a valid bearer token, logging in when the cached one is
    /// missing or inside the safety margin of its expiry.
    pub async fn token(&self) -> Result<String, AppError> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if Instant::now() < cached.expires_at {
                tracing::debug!("Using cached admin token");
                return Ok(cached.token.clone());
            }
        }

        // Expired or never fetched; any failure below leaves the slot empty.
        *slot = None;

        match self.login().await {
            Ok((token, expires_in)) => {
                let ttl = expires_in.saturating_sub(TOKEN_SAFETY_MARGIN_SECS);
                *slot = Some(CachedToken {
                    token: token.clone(),
                    expires_at: Instant::now() + Duration::from_secs(ttl),
                });
                tracing::info!("Successfully authenticated with admin service");
                Ok(token)
            }
            Err(e) => Err(e),
        }
    }

    /// Clears the cached credential unconditionally.
    ///
    /// Called after a downstream admin call reports an authorization failure,
    /// forcing the next `token()` to re-authenticate.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        *slot = None;
        tracing::info!("Cached admin token cleared");
    }

    async fn login(&self) -> Result<(String, u64), AppError> {
        let url = format!("{}/auth/login", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "email": self.email,
                "password": self.password,
            }))
            .send()
            .await
            .map_err(|e| AppError::Auth {
                status: StatusCode::BAD_GATEWAY,
                message: format!("Failed to authenticate with admin service: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Auth {
                status,
                message: format!("Failed to authenticate with admin service: {}", error_text),
            });
        }

        let envelope: LoginEnvelope = response.json().await.map_err(|e| AppError::Auth {
            status: StatusCode::BAD_GATEWAY,
            message: format!("Failed to parse admin login response: {}", e),
        })?;

        let data = envelope.data.unwrap_or(LoginData {
            token: None,
            expires_in: None,
        });

        let token = data
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Auth {
                status: StatusCode::BAD_GATEWAY,
                message: "No token received from admin service".to_string(),
            })?;

        Ok((token, data.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS)))
    }
}
