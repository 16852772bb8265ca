//! Authentication endpoints.

use crate::error::ClientError;
use crate::gateway::ApiClient;
use karat_core::{NewUser, TokenResponse, User};
use serde::de::IgnoredAny;

impl ApiClient {
    /// Exchange credentials for a token, then fetch and cache the profile.
    ///
    /// On any failure the session is left empty, including when it held
    /// another user before: a token is never kept without its profile, and a
    /// profile is never kept without its token.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ClientError> {
        let form = [("username", username), ("password", password)];
        let token: TokenResponse = self
            .exchange_credentials("/api/auth/login", &form)
            .await?;

        self.session().store_token(&token.access_token)?;

        let user = match self.me().await {
            Ok(user) => user,
            Err(e) => {
                self.rollback_login();
                return Err(e);
            }
        };
        if let Err(e) = self.session().store_user(&user) {
            self.rollback_login();
            return Err(e.into());
        }

        tracing::info!(username = %user.username, role = %user.role, "Logged in");
        Ok(user)
    }

    fn rollback_login(&self) {
        if let Err(e) = self.session().clear() {
            tracing::warn!(error = %e, "Failed to roll back login");
        }
    }

    /// Profile of the user the stored token belongs to.
    pub async fn me(&self) -> Result<User, ClientError> {
        self.get("/api/auth/me").await
    }

    /// Create an account. Owners use this to add staff.
    pub async fn register(&self, user: &NewUser) -> Result<(), ClientError> {
        let _: IgnoredAny = self.post_json("/api/auth/register", user).await?;
        tracing::info!(username = %user.username, role = %user.role, "Registered user");
        Ok(())
    }
}
