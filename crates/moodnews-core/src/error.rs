//! Centralized error types for MoodNews.
//!
//! Service crates keep their own error enums; this module holds the
//! shared pieces: network classification for reqwest failures and
//! preference storage errors.

use thiserror::Error;

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Preference store errors.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preference storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl PreferenceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            PreferenceError::Io(_) => "Failed to save settings. Please try again.",
            PreferenceError::Serialization(_) => "Settings could not be saved. Please try again.",
            PreferenceError::InvalidValue { .. } => "That setting value is not supported.",
        }
    }
}

/// Extension trait for classifying reqwest errors.
pub trait ReqwestErrorExt {
    fn to_network_error(&self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn to_network_error(&self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_user_message() {
        assert_eq!(
            NetworkError::Timeout.user_message(),
            "The request timed out. Please try again."
        );
    }

    #[test]
    fn test_server_error_messages_split_on_5xx() {
        let server = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let client = NetworkError::ServerError {
            status: 400,
            message: "bad".into(),
        };
        assert!(server.user_message().contains("later"));
        assert!(!client.user_message().contains("later"));
    }

    #[test]
    fn test_invalid_preference_value_display() {
        let err = PreferenceError::InvalidValue {
            key: "units".into(),
            value: "kelvin".into(),
        };
        assert_eq!(err.to_string(), "Invalid value for units: kelvin");
    }
}
