//! HTTP client facade for the events API.
//!
//! Every operation goes through one shared request path: compose the URL
//! from the configured base, merge headers (bearer token attached iff the
//! session holds one at call time), send, then normalize the response into
//! a decoded payload, an explicit empty result for 204, or an [`ApiError`].

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use rsvp_core::RsvpError;
use rsvp_core::event::{Event, EventDraft, EventPage};
use rsvp_core::session::{Session, SessionTokens};

/// Failures from the events API, classified so callers can react to the
/// kind of failure rather than parse messages.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401 or 403: rejected credentials or a stale token.
    #[error("authentication rejected ({status}): {detail}")]
    Auth { status: u16, detail: String },

    /// 400: the server rejected the payload.
    #[error("request rejected: {detail}")]
    Validation { detail: String },

    /// Any other non-2xx response.
    #[error("request failed ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The session store failed mid-request.
    #[error("session error: {0}")]
    Session(String),
}

impl From<RsvpError> for ApiError {
    fn from(err: RsvpError) -> Self {
        ApiError::Session(err.to_string())
    }
}

/// Token pair exactly as issued by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Client for one rsvp events server.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    /// POST /token/: exchange credentials for a token pair. The pair is
    /// persisted through the session before it is returned, so a success
    /// here means later calls will carry the bearer token.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenPair, ApiError> {
        let body = json!({ "username": username, "password": password });

        let pair: TokenPair = self
            .request(Method::POST, "/token/", Some(body), HeaderMap::new())
            .await?
            .ok_or_else(|| ApiError::Decode("token endpoint returned no content".into()))?;

        self.session.store_tokens(&SessionTokens {
            access_token: pair.access.clone(),
            refresh_token: pair.refresh.clone(),
        })?;

        Ok(pair)
    }

    /// Drop both tokens from the session. No network involved; clearing
    /// twice is the same as clearing once.
    pub fn clear_session(&self) -> Result<(), ApiError> {
        Ok(self.session.clear()?)
    }

    /// GET /events/: the first page of events, anonymous when no token is
    /// stored. A 204 reads as an empty page.
    pub async fn list_events(&self) -> Result<EventPage, ApiError> {
        Ok(self
            .request(Method::GET, "/events/", None, HeaderMap::new())
            .await?
            .unwrap_or_default())
    }

    /// POST /events/: create an event from a draft and return the stored
    /// record. The server decides whether the session is good enough.
    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event, ApiError> {
        let body = serde_json::to_value(draft)
            .map_err(|err| ApiError::Decode(format!("could not encode event payload: {err}")))?;

        self.request(Method::POST, "/events/", Some(body), HeaderMap::new())
            .await?
            .ok_or_else(|| ApiError::Decode("create returned no content".into()))
    }

    /// Shared request path for every operation. `Ok(None)` is a 204; any
    /// other success must decode as `T`.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: HeaderMap,
    ) -> Result<Option<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.session.tokens()?.map(|tokens| tokens.access_token);
        let merged = build_headers(token.as_deref(), &headers)?;

        log::debug!("{method} {url}");

        let mut request = self.http.request(method, &url).headers(merged);
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::debug!("request failed with {status}: {body}");
            return Err(classify_failure(status, &body));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response.text().await?;
        let decoded =
            serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(Some(decoded))
    }
}

/// Merge the default headers, the bearer token (iff one exists at call
/// time) and any caller-supplied headers. Caller headers win on collision.
fn build_headers(token: Option<&str>, extra: &HeaderMap) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ApiError::Session("stored access token is not a valid header value".into())
        })?;
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in extra {
        headers.insert(name.clone(), value.clone());
    }

    Ok(headers)
}

/// Map a non-2xx response to a typed error, pulling a human-readable
/// detail out of the body when the server sent one.
fn classify_failure(status: StatusCode, body: &str) -> ApiError {
    let detail = error_detail(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth {
            status: status.as_u16(),
            detail,
        },
        StatusCode::BAD_REQUEST => ApiError::Validation { detail },
        _ => ApiError::Api {
            status: status.as_u16(),
            detail,
        },
    }
}

/// Prefer a top-level "detail" string, then the whole JSON body, then the
/// canonical status reason for bodies that are not JSON at all.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|detail| detail.as_str()) {
            return detail.to_string();
        }
        return value.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
