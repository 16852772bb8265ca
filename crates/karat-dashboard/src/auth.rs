//! Login, logout and the form guard for the dashboard.
//!
//! The console signs in against the production API and keeps the result in
//! the shared session store, so the session is not tied to a browser. Form
//! posts are only accepted from the console's own pages: they must carry the
//! per-process form cookie (issued `SameSite=Strict` on page loads) and, when
//! the browser names one, an `Origin` or `Referer` on the console's host.

use axum::{
    Form,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use karat_client::access;
use serde::Deserialize;

use crate::error::DashboardError;
use crate::state::AppState;
use crate::templates::{alert_opt, html_escape, layout};

/// Form token cookie name
pub const FORM_COOKIE_NAME: &str = "karat_form";

/// Reject form posts that did not come from the console, and hand the form
/// cookie to browsers that do not have it yet.
pub async fn form_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let has_token = extract_cookie(request.headers(), FORM_COOKIE_NAME)
        .is_some_and(|value| value == state.form_token());

    if request.method() == Method::POST {
        if !has_token || !same_origin(request.headers()) {
            tracing::warn!(
                path = %request.uri().path(),
                has_token,
                "Refusing cross-site form post"
            );
            return DashboardError::CrossSite.into_response();
        }
        return next.run(request).await;
    }

    let mut response = next.run(request).await;
    if !has_token {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Strict",
            FORM_COOKIE_NAME,
            state.form_token()
        );
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// Extract a cookie value from the `Cookie` header
fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|cookie| {
        let (key, value) = cookie.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// True unless the browser says the request came from another origin.
///
/// Clients that send neither `Origin` nor `Referer` pass; the form cookie
/// still has to match.
fn same_origin(headers: &HeaderMap) -> bool {
    let source = headers
        .get(header::ORIGIN)
        .or_else(|| headers.get(header::REFERER))
        .and_then(|v| v.to_str().ok());
    let Some(source) = source else {
        return true;
    };
    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    match (url_authority(source), host) {
        (Some(authority), Some(host)) => authority.eq_ignore_ascii_case(host),
        _ => false,
    }
}

/// `host[:port]` of an http(s) URL.
fn url_authority(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))?;
    rest.split(['/', '?', '#']).next().filter(|a| !a.is_empty())
}

/// Login form data
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Handler for the login page (GET)
pub async fn login_page() -> Html<String> {
    Html(login_page_template(None, ""))
}

/// Handler for login form submission (POST)
pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.client().login(&form.username, &form.password).await {
        Ok(_) => Redirect::to(access::landing(state.session()).path()).into_response(),
        Err(e) => {
            tracing::info!(username = %form.username, error = %e, "Login failed");
            let message = e.user_message("Login failed");
            Html(login_page_template(Some(&message), &form.username)).into_response()
        }
    }
}

/// Handler for logout
pub async fn logout(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.session().logout() {
        tracing::warn!(error = %e, "Session could not be fully cleared");
    }
    Redirect::to("/login")
}

/// Generate the login page HTML
fn login_page_template(error: Option<&str>, username: &str) -> String {
    let content = format!(
        r##"<div class="w-full max-w-md mx-auto mt-12">
        <div class="text-center mb-8">
            <i class="fas fa-gem text-4xl text-primary-600"></i>
            <h1 class="text-2xl font-bold text-gray-900 mt-2">Jewelry Production Console</h1>
            <p class="text-gray-500 mt-1">Sign in to continue</p>
        </div>

        <div class="bg-white rounded-2xl shadow-xl p-8">
            {error_html}

            <form method="POST" action="/login" class="space-y-5">
                <div>
                    <label for="username" class="block text-sm font-medium text-gray-700 mb-2">Username</label>
                    <input type="text" id="username" name="username" value="{username}" required autofocus
                        class="block w-full px-4 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-primary-500 focus:border-primary-500"
                        placeholder="Enter your username">
                </div>

                <div>
                    <label for="password" class="block text-sm font-medium text-gray-700 mb-2">Password</label>
                    <input type="password" id="password" name="password" required
                        class="block w-full px-4 py-3 border border-gray-300 rounded-lg focus:ring-2 focus:ring-primary-500 focus:border-primary-500"
                        placeholder="Enter your password">
                </div>

                <button type="submit"
                    class="w-full py-3 px-4 bg-primary-600 hover:bg-primary-700 text-white font-medium rounded-lg shadow-lg">
                    <i class="fas fa-sign-in-alt"></i> Sign In
                </button>
            </form>
        </div>
    </div>"##,
        error_html = alert_opt(error),
        username = html_escape(username),
    );
    layout("Login", None, &content)
}
