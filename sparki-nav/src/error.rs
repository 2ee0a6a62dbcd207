//! Error types for SparkiNav

use thiserror::Error;

/// SparkiNav error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Link error: {0}")]
    Link(#[from] sparki_link::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Signal handler error: {0}")]
    Signal(String),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

impl From<ctrlc::Error> for NavError {
    fn from(e: ctrlc::Error) -> Self {
        NavError::Signal(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
