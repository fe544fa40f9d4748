// Request description and the request-execution seam.
// Any transport that can run a GET and decode JSON implements RequestService.

use std::future::Future;

use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::Result;

/// Response type the caller is willing to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptType {
    #[default]
    Json,
    Any,
}

impl AcceptType {
    pub fn header_value(&self) -> &'static str {
        match self {
            AcceptType::Json => "application/json",
            AcceptType::Any => "*/*",
        }
    }
}

/// A single request: target URL, method, query parameters, accepted response type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub url: Url,
    pub method: Method,
    pub parameters: Vec<(String, String)>,
    pub accept: AcceptType,
}

impl ServiceRequest {
    /// GET request with no parameters, accepting JSON.
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            parameters: Vec::new(),
            accept: AcceptType::default(),
        }
    }

    /// Add a query parameter.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    pub fn accept(mut self, accept: AcceptType) -> Self {
        self.accept = accept;
        self
    }
}

/// Executes requests and decodes typed JSON responses.
///
/// Implementations own timeouts and transport concerns. Errors are handed
/// back to the caller unchanged.
pub trait RequestService: Send + Sync {
    fn perform_decodable_get<T>(
        &self,
        request: ServiceRequest,
    ) -> impl Future<Output = Result<T>> + Send
    where
        T: DeserializeOwned + Send + 'static;
}
