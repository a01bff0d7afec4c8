use serde_json::Value;
use thiserror::Error;

/// Message shown when the transport fails without a better description.
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error";

/// Why a request to the backend did not yield usable data.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request never completed (connection refused, DNS, reset).
    #[error("{0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The body did not match any tolerated response shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

impl FetchError {
    /// Builds a server error, preferring the backend's own `message`/`error`.
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        let message = body
            .and_then(|body| {
                ["message", "error"]
                    .iter()
                    .find_map(|field| body.get(*field)?.as_str())
            })
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status code {status}"));
        FetchError::Server { status, message }
    }

    /// Text for the operator, without internal detail.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(message) => message.clone(),
            FetchError::Timeout => "Request timed out, please retry".to_string(),
            FetchError::Server { message, .. } => message.clone(),
            FetchError::MalformedResponse(_) => "Malformed response from server".to_string(),
        }
    }

    /// Shape errors count as server errors for display purposes.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            FetchError::Server { .. } | FetchError::MalformedResponse(_)
        )
    }

    /// Lets the session collaborator start its re-authentication flow.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, FetchError::Server { status: 401, .. })
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout => true,
            FetchError::Server { status, .. } => *status >= 500,
            FetchError::MalformedResponse(_) => false,
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::from_status(status.as_u16(), None)
        } else if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            log::debug!("Transport failure: {err}");
            FetchError::Network(NETWORK_ERROR_MESSAGE.to_string())
        }
    }
}
