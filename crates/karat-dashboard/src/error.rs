//! Error types for the dashboard crate.

use crate::templates::error_page;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use karat_client::{AccessDenied, ClientError};
use thiserror::Error;

/// Errors that can occur in the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Failed to start the server.
    #[error("failed to start dashboard: {0}")]
    StartupFailed(String),

    /// The API rejected the session. It has already been cleared.
    #[error("authentication required")]
    Unauthorized,

    /// A form post that did not come from the console's own pages.
    #[error("form submission refused: it did not come from this console")]
    CrossSite,

    /// The signed-in user may not open this page.
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),

    /// The API call behind the page failed.
    #[error(transparent)]
    Client(ClientError),
}

impl From<ClientError> for DashboardError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized => DashboardError::Unauthorized,
            other => DashboardError::Client(other),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::Unauthorized => return Redirect::to("/login").into_response(),
            DashboardError::AccessDenied(denied) => {
                return Redirect::to(denied.redirect.path()).into_response();
            }
            DashboardError::Client(ClientError::Api { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            DashboardError::Client(_) => StatusCode::BAD_GATEWAY,
            DashboardError::CrossSite => StatusCode::FORBIDDEN,
            DashboardError::StartupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::debug!(status = status.as_u16(), error = %self, "Rendering error page");
        (status, Html(error_page(&self.to_string()))).into_response()
    }
}
