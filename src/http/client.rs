//! `reqwest`-backed HTTP handlers.
//!
//! One `Client` is built per factory and shared by every handler it
//! creates, so connection pooling spans the list request and the per-item
//! content requests of a list read.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::{debug, instrument};

use crate::user_agent;

use super::{HttpError, HttpHandler, HttpHandlerFactory};

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default whole-request timeout in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Factory handing out [`ReqwestHttpHandler`]s over a shared client.
#[derive(Debug, Clone)]
pub struct ReqwestHttpHandlerFactory {
    client: Client,
}

impl ReqwestHttpHandlerFactory {
    /// Builds a factory with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientBuild`] when client construction fails.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS)
    }

    /// Builds a factory with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientBuild`] when client construction fails.
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, HttpError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(user_agent::default_user_agent())
            .gzip(true)
            .build()
            .map_err(|error| HttpError::ClientBuild(error.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpHandlerFactory for ReqwestHttpHandlerFactory {
    fn factor(&self, url: &str) -> Box<dyn HttpHandler> {
        Box::new(ReqwestHttpHandler::new(self.client.clone(), url))
    }
}

#[derive(Debug, Clone)]
struct FetchedResponse {
    code: u16,
    text: String,
}

/// Handler for a single URL. Sends on first access, then answers from the
/// fetched response.
#[derive(Debug)]
pub struct ReqwestHttpHandler {
    client: Client,
    url: String,
    method: Method,
    response: Option<FetchedResponse>,
}

impl ReqwestHttpHandler {
    fn new(client: Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
            method: Method::GET,
            response: None,
        }
    }

    async fn fetched(&mut self) -> Result<&FetchedResponse, HttpError> {
        let fetched = match self.response.take() {
            Some(fetched) => fetched,
            None => self.send().await?,
        };
        Ok(self.response.insert(fetched))
    }

    #[instrument(level = "debug", skip(self), fields(url = %self.url, method = %self.method))]
    async fn send(&self) -> Result<FetchedResponse, HttpError> {
        let response = self
            .client
            .request(self.method.clone(), &self.url)
            .send()
            .await
            .map_err(|error| HttpError::request(&self.url, error.to_string()))?;
        let code = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|error| HttpError::request(&self.url, error.to_string()))?;
        debug!(status = code, bytes = text.len(), "Received response");
        Ok(FetchedResponse { code, text })
    }
}

#[async_trait]
impl HttpHandler for ReqwestHttpHandler {
    fn set_request_method(&mut self, method: Method) {
        self.method = method;
    }

    async fn response_code(&mut self) -> Result<u16, HttpError> {
        Ok(self.fetched().await?.code)
    }

    async fn response_text(&mut self) -> Result<String, HttpError> {
        Ok(self.fetched().await?.text.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_handler_sends_request_once_for_code_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fedora/objects"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<result/>"))
            .expect(1)
            .mount(&server)
            .await;

        let factory = ReqwestHttpHandlerFactory::new().unwrap();
        let mut handler = factory.factor(&format!("{}/fedora/objects", server.uri()));
        handler.set_request_method(Method::GET);

        assert_eq!(handler.response_code().await.unwrap(), 200);
        assert_eq!(handler.response_text().await.unwrap(), "<result/>");
    }

    #[tokio::test]
    async fn test_handler_reports_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let factory = ReqwestHttpHandlerFactory::new().unwrap();
        let mut handler = factory.factor(&format!("{}/anything", server.uri()));

        assert_eq!(handler.response_code().await.unwrap(), 404);
    }

    #[tokio::test]
    async fn test_handler_transport_failure_is_request_error() {
        let factory = ReqwestHttpHandlerFactory::with_timeouts(1, 1).unwrap();
        let mut handler = factory.factor("http://127.0.0.1:9/unreachable");

        let err = handler.response_text().await.unwrap_err();
        assert!(matches!(err, HttpError::Request { .. }));
        assert!(err.to_string().contains("127.0.0.1:9"));
    }
}
