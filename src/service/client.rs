// HTTP request service.
// Runs ServiceRequests over reqwest and converts status codes to errors.

use std::time::Duration;

use reqwest::{
    Client, Method, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DevFlagsError, Result};

use super::request::{RequestService, ServiceRequest};

const USER_AGENT_VALUE: &str = concat!("devflags/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed request service.
#[derive(Debug, Clone)]
pub struct HttpService {
    client: Client,
}

impl HttpService {
    /// Create a new service with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(DevFlagsError::Http)?;

        Ok(Self { client })
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(DevFlagsError::NotFound(response.url().to_string())),
            status => Err(DevFlagsError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

impl RequestService for HttpService {
    async fn perform_decodable_get<T>(&self, request: ServiceRequest) -> Result<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if request.method != Method::GET {
            return Err(DevFlagsError::RequestConstruction(format!(
                "expected GET, got {}",
                request.method
            )));
        }

        debug!(url = %request.url, "performing GET");
        let response = self
            .client
            .get(request.url)
            .query(&request.parameters)
            .header(ACCEPT, request.accept.header_value())
            .send()
            .await
            .map_err(DevFlagsError::Http)?;

        let response = Self::check_response(response).await?;
        let body = response.bytes().await.map_err(DevFlagsError::Http)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[tokio::test]
    async fn test_rejects_non_get() {
        let service = HttpService::new(DEFAULT_TIMEOUT).unwrap();
        let mut request = ServiceRequest::get(Url::parse("http://127.0.0.1:9/").unwrap());
        request.method = Method::POST;

        let result: Result<serde_json::Value> = service.perform_decodable_get(request).await;
        assert!(matches!(result, Err(DevFlagsError::RequestConstruction(_))));
    }
}
