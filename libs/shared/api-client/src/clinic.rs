use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request rejected ({status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Thin authenticated JSON client for the remote clinic API.
///
/// The bearer credential is attached here so callers stay agnostic to how
/// it is obtained.
pub struct ClinicApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    bearer_token: String,
}

impl ClinicApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.clinic_api_url.clone(),
            api_key: config.clinic_api_key.clone(),
            bearer_token: config.clinic_api_token.clone(),
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = token.into();
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        if !self.bearer_token.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.bearer_token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>)
                            -> Result<T, ApiError>
    where T: DeserializeOwned {
        let response = self.send(method, path, body).await?;
        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Issue a request where the response body is irrelevant (e.g. DELETE).
    pub async fn request_no_content(&self, method: Method, path: &str, body: Option<Value>)
                                    -> Result<(), ApiError> {
        self.send(method, path, body).await?;
        Ok(())
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>)
                  -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self.client.request(method, &url)
            .headers(self.headers());

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN =>
                    ApiError::Unauthorized(error_text),
                StatusCode::NOT_FOUND => ApiError::NotFound(error_text),
                s if s.is_client_error() => ApiError::BadRequest {
                    status: s.as_u16(),
                    message: error_text,
                },
                s => ApiError::Server {
                    status: s.as_u16(),
                    message: error_text,
                },
            });
        }

        Ok(response)
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
