//! The API gateway: every request to the production API goes through here.

use crate::error::ClientError;
use crate::session::SessionStore;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Longest response body kept on an [`ClientError::Api`].
const MAX_ERROR_BODY: usize = 2048;

/// What a 401 does to the stored session.
#[derive(Debug, Clone, Copy)]
enum Rejection {
    /// Clear and navigate to login.
    Expire,
    /// Clear only.
    Refuse,
}

/// HTTP client bound to one API base URL and one session.
///
/// Cloning is cheap; clones share the connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    http: reqwest::Client,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, ClientError> {
        Self::with_http_client(base_url, session, reqwest::Client::new())
    }

    pub fn with_http_client(
        base_url: &str,
        session: SessionStore,
        http: reqwest::Client,
    ) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Start a request, attaching the stored token if there is one.
    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let token = self.session.token();
        tracing::debug!(
            method = %method,
            path = %path,
            authenticated = token.is_some(),
            "API request"
        );
        let req = self.http.request(method, self.url(path));
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send and return the raw body of a successful response.
    async fn send(&self, req: RequestBuilder, path: &str) -> Result<String, ClientError> {
        self.send_as(req, path, Rejection::Expire).await
    }

    async fn send_as(
        &self,
        req: RequestBuilder,
        path: &str,
        rejection: Rejection,
    ) -> Result<String, ClientError> {
        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path = %path, "API answered 401");
            match rejection {
                Rejection::Expire => self.session.expire(),
                Rejection::Refuse => self.session.discard(),
            }
            return Err(ClientError::Unauthorized);
        }

        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(path = %path, status = status.as_u16(), "API error response");
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail: extract_detail(&body),
                body: truncate(body),
            });
        }
        Ok(body)
    }

    /// Generic form: method, path and an optional JSON body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        let mut req = self.builder(method, path);
        if let Some(body) = body {
            req = req.json(body);
        }
        let raw = self.send(req, path).await?;
        decode(path, &raw)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let raw = self.send(self.builder(Method::GET, path), path).await?;
        decode(path, &raw)
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.builder(Method::GET, path).query(query);
        let raw = self.send(req, path).await?;
        decode(path, &raw)
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.builder(Method::POST, path).json(body);
        let raw = self.send(req, path).await?;
        decode(path, &raw)
    }

    pub async fn post_form<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.builder(Method::POST, path).form(body);
        let raw = self.send(req, path).await?;
        decode(path, &raw)
    }

    /// Form post of login credentials. A 401 here means the credentials
    /// were refused: the session is still cleared, but nobody is sent to
    /// the login page they are already on.
    pub(crate) async fn exchange_credentials<T, B>(
        &self,
        path: &str,
        form: &B,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.builder(Method::POST, path).form(form);
        let raw = self.send_as(req, path, Rejection::Refuse).await?;
        decode(path, &raw)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let raw = self.send(self.builder(Method::DELETE, path), path).await?;
        decode(path, &raw)
    }
}

/// Decode a response body. An empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(path: &str, raw: &str) -> Result<T, ClientError> {
    let raw = if raw.trim().is_empty() { "null" } else { raw };
    serde_json::from_str(raw).map_err(|source| ClientError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Pull a human-readable message out of an error body.
///
/// The API reports `{"detail": "..."}` for business errors and
/// `{"detail": [{"msg": "...", ...}]}` for validation errors.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_base_url() {
        let session = SessionStore::in_memory();
        let err = ApiClient::new("not a url", session.clone()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));

        let err = ApiClient::new("ftp://example.com", session).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:8000/", SessionStore::in_memory()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/api/jobs"), "http://localhost:8000/api/jobs");
        assert_eq!(client.url("api/jobs"), "http://localhost:8000/api/jobs");
    }

    #[test]
    fn test_extract_detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail":"Incorrect username or password"}"#).as_deref(),
            Some("Incorrect username or password")
        );
    }

    #[test]
    fn test_extract_detail_validation_array() {
        let body = r#"{"detail":[
            {"loc":["body","initial_weight"],"msg":"field required","type":"missing"},
            {"loc":["body","design_no"],"msg":"value is not a valid string","type":"type"}
        ]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; value is not a valid string")
        );
    }

    #[test]
    fn test_extract_detail_absent() {
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(r#"{"message":"nope"}"#), None);
        assert_eq!(extract_detail(r#"{"detail":null}"#), None);
    }

    #[test]
    fn test_decode_empty_body_as_null() {
        let unit: Option<i64> = decode("/api/x", "").unwrap();
        assert_eq!(unit, None);
        let _: serde::de::IgnoredAny = decode("/api/x", "  ").unwrap();
        assert!(matches!(
            decode::<Vec<i64>>("/api/x", "{}"),
            Err(ClientError::Decode { .. })
        ));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "é".repeat(MAX_ERROR_BODY);
        let cut = truncate(body);
        assert!(cut.len() <= MAX_ERROR_BODY);
        assert!(cut.chars().all(|c| c == 'é'));
    }
}
