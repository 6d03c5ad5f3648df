// REST client for the fleet backend
use crate::error::{FleetError, Result};
use crate::models::{Fault, Station, User, Vehicle};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of a successful `POST /api/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the backend root; a trailing `/api` is tolerated
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let trimmed = trimmed.strip_suffix("/api").unwrap_or(trimmed);
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(FleetError::ConfigError(format!(
                "API base_url must start with http:// or https:// (got '{}')",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: trimmed.to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.endpoint("auth/login");
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            return Err(FleetError::AuthenticationFailed(api_error_message(&body)));
        }

        Ok(check_status(response).await?.json().await?)
    }

    pub async fn me(&self) -> Result<User> {
        self.get_json("auth/me").await
    }

    pub async fn vehicles(&self) -> Result<Vec<Vehicle>> {
        self.get_json("vehicles").await
    }

    pub async fn faults(&self) -> Result<Vec<Fault>> {
        self.get_json("faults").await
    }

    pub async fn stations(&self) -> Result<Vec<Station>> {
        self.get_json("stations").await
    }

    /// The user list is manager-only; drivers get an empty list instead of an error
    pub async fn users(&self) -> Result<Vec<User>> {
        match self.get_json("users").await {
            Err(FleetError::Api { status: 403, .. }) => {
                tracing::warn!("User list not permitted for this account, driver counts will be 0");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!("GET {}", url);

        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(FleetError::TokenExpired);
    }

    let body = response.text().await.unwrap_or_default();
    Err(FleetError::Api {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

/// Pull `detail` out of an error body, falling back to the raw text
pub fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
