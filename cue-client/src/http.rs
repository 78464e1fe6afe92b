//! HTTP client for the occupancy backend
//!
//! Thin JSON layer over `reqwest`. Endpoint methods live in [`crate::api`].

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::wire::ErrorBody;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making network requests to the backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(%method, %url, "Sending request");
        self.client.request(method, url)
    }

    /// Make a GET request with query parameters
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::handle_response(response).await
    }

    /// Map the status, then decode the body.
    ///
    /// The body is read as text first so a malformed payload surfaces as
    /// [`ClientError::Serialization`] rather than a transport error.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::debug!(status = status.as_u16(), %message, "Backend returned an error");
            return Err(match status {
                StatusCode::NOT_FOUND => ClientError::NotFound(message),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    ClientError::Validation(message)
                }
                _ => ClientError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        serde_json::from_str(&text).map_err(Into::into)
    }
}

/// `message` of a JSON error body, else the raw body, else the reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorBody>(body) {
        return err.message;
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}
