//! REST API access
//!
//! Endpoint wrappers build `ApiRequest`s and hand them to a `Transport`. The
//! HTTP implementation sits on reqwest; tests swap in a recording transport.

pub mod hmm;
pub mod samples;
pub mod users;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::list::Document;

pub use hmm::HmmApi;
pub use samples::{Algorithm, NewSample, RightsUpdate, SampleUpdate, SamplesApi};
pub use users::{NewUser, UsersApi};

/// A request against the API, relative to the server root
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body
    pub fn json(mut self, body: &impl Serialize) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Carries requests to the server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the decoded JSON body, `Null` when empty
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// `Transport` over HTTP
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    /// Turn an `ApiRequest` into a reqwest request against the configured server
    pub fn build(&self, request: &ApiRequest) -> Result<reqwest::Request> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.config.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let built = self.build(&request)?;
        log::debug!("{} {}", built.method(), built.url());

        let response = self.client.execute(built).await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::warn!("{} {} failed with {}", request.method, request.path, status);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Check page parameters against the limits list endpoints accept
pub fn validate_paging(page: u32, per_page: u32) -> Result<()> {
    if page < 1 {
        return Err(ClientError::Validation("page must be at least 1".into()));
    }

    if !(1..=100).contains(&per_page) {
        return Err(ClientError::Validation(format!(
            "per_page must be between 1 and 100, got {}",
            per_page
        )));
    }

    Ok(())
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

pub(crate) fn document(value: Value) -> Result<Document> {
    Document::from_value(value)
        .ok_or_else(|| ClientError::InvalidOperation("expected a JSON object".into()))
}

pub(crate) fn documents(value: Value) -> Result<Vec<Document>> {
    match value {
        Value::Array(items) => items.into_iter().map(document).collect(),
        _ => Err(ClientError::InvalidOperation("expected a JSON array".into())),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Records requests and replies with queued responses
    #[derive(Default)]
    pub struct RecordingTransport {
        pub requests: Mutex<Vec<ApiRequest>>,
        responses: Mutex<VecDeque<Value>>,
    }

    impl RecordingTransport {
        pub fn replying(responses: Vec<Value>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            }
        }

        pub fn last(&self) -> ApiRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: ApiRequest) -> Result<Value> {
            self.requests.lock().unwrap().push(request);
            Ok(self.responses.lock().unwrap().pop_front().unwrap_or(Value::Null))
        }
    }
}
