use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub clinic_api_url: String,
    pub clinic_api_key: String,
    pub clinic_api_token: String,
    pub default_page_size: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            clinic_api_url: env::var("CLINIC_API_URL")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_URL not set, using empty value");
                    String::new()
                }),
            clinic_api_key: env::var("CLINIC_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_KEY not set, using empty value");
                    String::new()
                }),
            clinic_api_token: env::var("CLINIC_API_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_TOKEN not set, using empty value");
                    String::new()
                }),
            default_page_size: env::var("CLINIC_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| {
                    warn!("CLINIC_PAGE_SIZE not set, using default of 20");
                    20
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.clinic_api_url.is_empty()
            && !self.clinic_api_key.is_empty()
    }
}
