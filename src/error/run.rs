use std::fmt;

use thiserror::Error;

/// Capability a run advertises as an extension seam but does not implement.
///
/// Carried by [`RunError::Unsupported`] so callers can detect the missing
/// feature instead of pattern-matching a generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Authentication,
    RateLimitEnforcement,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Capability::Authentication => "authentication",
            Capability::RateLimitEnforcement => "rate-limit enforcement",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: http::uri::InvalidUri,
    },
    #[error("Request failed: {source}")]
    Reqwest {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request failed: {source}")]
    Wreq {
        #[source]
        source: wreq::Error,
    },
    #[error("Request failed: {source}")]
    Hyper {
        #[source]
        source: hyper_util::client::legacy::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildReqwestClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildWreqClient {
        #[source]
        source: wreq::Error,
    },
    #[error("Failed to read response body: {source}")]
    ReadBody {
        #[source]
        source: hyper::Error,
    },
    #[error("Response body was not valid UTF-8: {source}")]
    DecodeBody {
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("Failed to build runtime: {source}")]
    BuildRuntime {
        #[source]
        source: std::io::Error,
    },
    #[error("Task was cancelled before completion.")]
    Cancelled,
    #[error("Failed to join task: {source}")]
    JoinFailed {
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("Task group aborted after {} member failure(s).", failures.len())]
    Aggregate { failures: Vec<RunError> },
    #[error("Capability '{capability}' is not implemented.")]
    Unsupported { capability: Capability },
    #[cfg(test)]
    #[error("Test failure: {message}")]
    TestFailure { message: &'static str },
}

pub type RunResult<T> = Result<T, RunError>;
