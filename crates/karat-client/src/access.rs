//! Role-based page gating.
//!
//! These checks only decide what the console shows. The API enforces the
//! real permissions on every request.

use crate::session::SessionStore;
use karat_core::User;
use thiserror::Error;

/// Where a surface sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    WorkerTasks,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::WorkerTasks => "/worker/tasks",
        }
    }
}

/// Who may open a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Management pages: dashboard, jobs, users, reports.
    Owner,
    /// Task pages of production staff.
    Worker,
}

impl Access {
    pub fn permits(self, user: &User) -> bool {
        match self {
            Access::Owner => user.role.is_owner(),
            Access::Worker => user.role.is_worker(),
        }
    }
}

/// The current session may not open the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("access denied; redirect to {}", redirect.path())]
pub struct AccessDenied {
    pub redirect: Route,
}

/// Where `/` sends the user.
pub fn landing(session: &SessionStore) -> Route {
    if !session.is_authenticated() {
        return Route::Login;
    }
    match session.current_user() {
        Some(user) if user.role.is_owner() => Route::Dashboard,
        Some(_) => Route::WorkerTasks,
        None => Route::Login,
    }
}

/// The signed-in user, if the session holds one that `access` permits.
pub fn authorize(session: &SessionStore, access: Access) -> Result<User, AccessDenied> {
    let denied = AccessDenied {
        redirect: Route::Login,
    };
    if !session.is_authenticated() {
        return Err(denied);
    }
    let user = session.current_user().ok_or(denied)?;
    if access.permits(&user) {
        Ok(user)
    } else {
        tracing::debug!(username = %user.username, role = %user.role, ?access, "Access denied");
        Err(denied)
    }
}
