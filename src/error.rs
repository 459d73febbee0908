//! Error types for CryptoGuide.

use thiserror::Error;

/// The main error type for CryptoGuide.
#[derive(Error, Debug)]
pub enum Error {
    /// No response was received (connection failure, timeout, DNS).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new HTTP status error.
    pub fn http(status: u16) -> Self {
        Self::Http { status }
    }

    /// Create a new decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Check if this error is recoverable (user can retry).
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if the backend reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404 })
    }

    /// Short message suitable for display in a view.
    pub fn user_message(&self) -> String {
        if self.is_not_found() {
            return "Not found".to_string();
        }
        match self {
            Self::Network(_) => "Could not reach the server".to_string(),
            Self::Http { status } if *status >= 500 => {
                format!("Server error ({status})")
            }
            Self::Http { status } => format!("Request failed ({status})"),
            Self::Decode(_) => "Unexpected response from the server".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<::config::ConfigError> for Error {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::network("timed out").is_recoverable());
        assert!(Error::http(503).is_recoverable());
        assert!(Error::http(429).is_recoverable());
        assert!(!Error::http(404).is_recoverable());
        assert!(!Error::config("bad").is_recoverable());
    }

    #[test]
    fn test_not_found() {
        assert!(Error::http(404).is_not_found());
        assert!(!Error::http(500).is_not_found());
        assert!(!Error::network("down").is_not_found());
    }

    #[test]
    fn test_user_message() {
        assert_eq!(Error::http(404).user_message(), "Not found");
        assert_eq!(Error::http(502).user_message(), "Server error (502)");
        assert_eq!(Error::http(400).user_message(), "Request failed (400)");
        assert_eq!(
            Error::network("connection refused").user_message(),
            "Could not reach the server"
        );
    }
}
