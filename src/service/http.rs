//! Blocking HTTP client for the note service's JSON API.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Guid, Note, NoteSummary};
use crate::service::{ErrorCode, NoteFetch, NoteFilter, NoteStore, ServiceError, ServiceResult};

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("noteport/", env!("CARGO_PKG_VERSION"));

/// Note store speaking to the remote service over HTTPS.
///
/// Endpoints, relative to the configured base URL:
///
/// - `GET notes?order=&ascending=&offset=&limit=` → `{"notes": [NoteSummary]}`
/// - `GET notes/{guid}?with_content=&with_resources_data=&...` → `Note`
///
/// Requests carry the token as a bearer credential. Failures are classified
/// with [`classify_failure`].
pub struct HttpNoteStore {
    client: Client,
    base: Url,
    token: String,
}

#[derive(Deserialize)]
struct NoteList {
    notes: Vec<NoteSummary>,
}

impl HttpNoteStore {
    /// Creates a client for `endpoint` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the endpoint is not a usable base URL or
    /// the HTTP client cannot be built.
    pub fn new(endpoint: &str, token: impl Into<String>, timeout: Duration) -> ServiceResult<Self> {
        let mut base = Url::parse(endpoint).map_err(|e| {
            ServiceError::transport(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(ServiceError::transport(format!(
                "invalid endpoint '{}': not a base URL",
                endpoint
            )));
        }
        // Keep the base path as a directory so joined segments append to it.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        Ok(Self {
            client,
            base,
            token: token.into(),
        })
    }

    fn url(&self, segments: &[&str]) -> ServiceResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::transport("endpoint cannot take path segments"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> ServiceResult<T> {
        debug!(%url, "requesting");
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        response.json::<T>().map_err(|e| {
            ServiceError::transport(format!("invalid response from {}: {}", url, e))
        })
    }
}

impl NoteStore for HttpNoteStore {
    fn list_notes(
        &self,
        filter: &NoteFilter,
        offset: usize,
        limit: usize,
    ) -> ServiceResult<Vec<NoteSummary>> {
        let url = self.url(&["notes"])?;
        let query = [
            ("order", filter.order.as_str().to_string()),
            ("ascending", filter.ascending.to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        let list: NoteList = self.get(url, &query)?;
        Ok(list.notes)
    }

    fn get_note(&self, guid: &Guid, fetch: &NoteFetch) -> ServiceResult<Note> {
        let url = self.url(&["notes", guid.as_str()])?;
        let query = [
            ("with_content", fetch.with_content.to_string()),
            ("with_resources_data", fetch.with_resources_data.to_string()),
            (
                "with_resources_recognition",
                fetch.with_resources_recognition.to_string(),
            ),
            (
                "with_resources_alternate_data",
                fetch.with_resources_alternate_data.to_string(),
            ),
        ];
        self.get(url, &query)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ErrorKind {
    User,
    System,
    NotFound,
}

#[derive(Deserialize)]
struct ErrorBody {
    kind: ErrorKind,
    #[serde(default)]
    code: Option<ErrorCode>,
    #[serde(default)]
    parameter: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    identifier: Option<String>,
    #[serde(default)]
    key: Option<String>,
}

/// Classifies a non-success response into the service failure taxonomy.
///
/// A structured error body wins; otherwise the status code decides.
pub fn classify_failure(status: StatusCode, body: &str) -> ServiceError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        let error = envelope.error;
        return match error.kind {
            ErrorKind::User => ServiceError::User {
                code: error.code.unwrap_or(ErrorCode::Unknown),
                parameter: error.parameter,
            },
            ErrorKind::System => ServiceError::System {
                code: error.code.unwrap_or(ErrorCode::InternalError),
                message: error.message,
            },
            ErrorKind::NotFound => ServiceError::NotFound {
                identifier: error.identifier.unwrap_or_else(|| "resource".to_string()),
                key: error.key,
            },
        };
    }

    let user = |code| ServiceError::User {
        code,
        parameter: None,
    };
    match status {
        StatusCode::UNAUTHORIZED => user(ErrorCode::InvalidAuth),
        StatusCode::FORBIDDEN => user(ErrorCode::PermissionDenied),
        StatusCode::TOO_MANY_REQUESTS => user(ErrorCode::RateLimitReached),
        StatusCode::NOT_FOUND => ServiceError::NotFound {
            identifier: "resource".to_string(),
            key: None,
        },
        s if s.is_client_error() => user(ErrorCode::BadDataFormat),
        s => ServiceError::System {
            code: ErrorCode::InternalError,
            message: Some(format!("HTTP {}", s.as_u16())),
        },
    }
}
