use thiserror::Error;

use crate::domain::errors::SurfaceError;

/// Errors that can occur when talking to a W3C WebDriver endpoint
#[derive(Error, Debug)]
pub enum WebDriverError {
    /// Network or connection error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The endpoint answered with a WebDriver error object
    #[error("WebDriver error {status} ({error}): {message}")]
    Command {
        status: u16,
        error: String,
        message: String,
    },

    /// The response did not have the expected shape
    #[error("Unexpected WebDriver response: {0}")]
    UnexpectedResponse(String),

    /// No session has been created, or it was deleted
    #[error("No active WebDriver session")]
    NoSession,
}

impl WebDriverError {
    /// W3C error code, for command errors
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Command { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }

    /// The element went away between lookup and use (re-render, detach)
    pub fn is_stale(&self) -> bool {
        matches!(
            self.code(),
            Some("stale element reference" | "no such element" | "detached shadow root")
        )
    }

    /// The browser session is gone
    pub fn is_session_lost(&self) -> bool {
        matches!(self, Self::NoSession) || self.code() == Some("invalid session id")
    }
}

impl From<WebDriverError> for SurfaceError {
    fn from(err: WebDriverError) -> Self {
        if err.is_session_lost() {
            return Self::SessionClosed;
        }

        match err {
            WebDriverError::Network(e) => Self::Transport(e.to_string()),
            WebDriverError::Command { error, message, .. } => match error.as_str() {
                "no such element" | "stale element reference" => Self::ElementNotFound(message),
                "element not interactable" | "element click intercepted" | "invalid element state" => {
                    Self::NotInteractable(message)
                }
                _ => Self::Protocol(format!("{error}: {message}")),
            },
            other => Self::Protocol(other.to_string()),
        }
    }
}
