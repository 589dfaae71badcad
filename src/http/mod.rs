//! HTTP transport seam used by the Fedora storage.
//!
//! The storage never talks to `reqwest` directly: it asks an
//! [`HttpHandlerFactory`] for a fresh [`HttpHandler`] per URL, sets the
//! request method and reads the status code and body. The request is sent
//! lazily on first access and at most once per handler.
//!
//! - [`ReqwestHttpHandlerFactory`] - production factory over a shared `reqwest::Client`

mod client;

pub use client::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, ReqwestHttpHandler,
    ReqwestHttpHandlerFactory,
};

use async_trait::async_trait;
use reqwest::Method;
use thiserror::Error;

/// Transport-level failure reported by an [`HttpHandler`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The request could not be sent or the response could not be read.
    #[error("request to {url} failed: {message}")]
    Request {
        /// Target URL.
        url: String,
        /// Underlying transport error text.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {0}")]
    ClientBuild(String),
}

impl HttpError {
    #[must_use]
    pub fn request(url: &str, message: impl Into<String>) -> Self {
        Self::Request {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

/// One request against one URL.
#[async_trait]
pub trait HttpHandler: Send {
    /// Sets the HTTP method used when the request is sent.
    fn set_request_method(&mut self, method: Method);

    /// Returns the response status code, sending the request if needed.
    async fn response_code(&mut self) -> Result<u16, HttpError>;

    /// Returns the response body, sending the request if needed.
    async fn response_text(&mut self) -> Result<String, HttpError>;
}

/// Creates one [`HttpHandler`] per URL.
pub trait HttpHandlerFactory: Send + Sync {
    fn factor(&self, url: &str) -> Box<dyn HttpHandler>;
}
