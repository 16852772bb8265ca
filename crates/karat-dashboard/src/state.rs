//! Dashboard application state.

use karat_client::{ApiClient, SessionStore};
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state for the dashboard.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Gateway to the production API; owns the session.
    client: ApiClient,
    /// Random per process. Browsers only get it through a same-site cookie.
    form_token: String,
}

impl AppState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                client,
                form_token: Uuid::new_v4().simple().to_string(),
            }),
        }
    }

    pub fn form_token(&self) -> &str {
        &self.inner.form_token
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub fn session(&self) -> &SessionStore {
        self.inner.client.session()
    }
}
