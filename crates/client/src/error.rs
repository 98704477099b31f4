use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid service URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Network error: {source}")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to /{endpoint} failed with status {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response from /{endpoint}: {reason}")]
    Parse {
        endpoint: &'static str,
        reason: String,
    },
}

impl ClientError {
    /// Generic text for the operation that failed, without the cause.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::Network { endpoint, .. }
            | ClientError::Status { endpoint, .. }
            | ClientError::Parse { endpoint, .. }
                if *endpoint == crate::api::UPLOAD_ENDPOINT =>
            {
                "Error uploading file."
            }
            ClientError::Io { .. } => "Error uploading file.",
            ClientError::InvalidBaseUrl { .. } => "Invalid service URL. Check your configuration.",
            _ => "Error contacting server.",
        }
    }

    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Network { source: e, .. } => {
                e.is_connect() || e.is_timeout() || e.is_request()
            }
            ClientError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    /// Tags a transport failure with the endpoint it was sent to.
    pub(crate) fn network(endpoint: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| ClientError::Network { endpoint, source }
    }

    pub(crate) fn parse(endpoint: &'static str, reason: impl std::fmt::Display) -> Self {
        ClientError::Parse {
            endpoint,
            reason: reason.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
