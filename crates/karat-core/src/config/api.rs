//! Remote API configuration.

use serde::{Deserialize, Serialize};

/// Production API used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://jewelry-management-system-backend.onrender.com";

/// Configuration for the production API the console talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL; request paths such as `/api/jobs` are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}
