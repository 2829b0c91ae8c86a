use crate::form::ValidationError;
use thiserror::Error;

/// Fallback shown when a request never got a response and the transport
/// gave no better description.
pub const NETWORK_FALLBACK_MESSAGE: &str = "Erro na comunicação com o servidor";

#[derive(Error, Debug)]
pub enum PessoasError {
    /// The request never reached the server, or no response came back.
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Local form validation failed. Never sent to the server.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl PessoasError {
    pub fn api(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        PessoasError::Api { status, message }
    }

    pub fn network(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            PessoasError::Network(NETWORK_FALLBACK_MESSAGE.to_string())
        } else {
            PessoasError::Network(message)
        }
    }

    /// HTTP status of an `Api` error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PessoasError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, PessoasError>;
