//! Navigation seam.
//!
//! The session layer decides *when* the user must go back to the login page;
//! the surface (terminal, web console) decides *how*.

/// Sends the user to the login page.
pub trait Navigator: Send + Sync {
    fn to_login(&self);
}

/// Navigator for surfaces that redirect on their own, such as the web
/// console turning an authentication error into an HTTP redirect.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn to_login(&self) {
        tracing::info!(route = "/login", "Navigating to login");
    }
}
