//! Typed calls to the nutrition backend.
//!
//! Failures never escape as faults: each one is turned into a [`ClientError`],
//! written to the status line, and the call site gets `None`.

use crate::errors::ClientError;
use crate::models::{ApiMessage, Catalog, LogMealRequest, Summary, Targets};
use crate::notifier::Notifier;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

pub const ERROR_PREFIX: &str = "🐼 Oh no! An error occurred: ";

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    notifier: Notifier,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, notifier: Notifier) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            notifier,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request and normalize the result.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ClientError::Network(err.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ClientError::Network(err.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status.as_u16(), &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|err| ClientError::Malformed(err.to_string()))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Option<T> {
        let result = self
            .call(endpoint, method, body.as_ref())
            .await
            .and_then(|value| {
                serde_json::from_value(value).map_err(|err| ClientError::Malformed(err.to_string()))
            });
        self.report(endpoint, result)
    }

    fn report<T>(&self, endpoint: &str, result: Result<T, ClientError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                error!(endpoint, error = %err, "api call failed");
                self.notifier.set_message(format!("{ERROR_PREFIX}{err}"));
                None
            }
        }
    }

    pub async fn get_summary(&self) -> Option<Summary> {
        self.fetch("/get_summary", Method::GET, None).await
    }

    pub async fn get_foods(&self) -> Option<Catalog> {
        self.fetch("/get_foods", Method::GET, None).await
    }

    pub async fn get_targets(&self) -> Option<Targets> {
        self.fetch("/get_targets", Method::GET, None).await
    }

    pub async fn log_meal(&self, request: &LogMealRequest) -> Option<ApiMessage> {
        let body = self.report("/log_meal", encode(request))?;
        self.fetch("/log_meal", Method::POST, Some(body)).await
    }

    pub async fn set_targets(&self, targets: &Targets) -> Option<ApiMessage> {
        let body = self.report("/set_targets", encode(targets))?;
        self.fetch("/set_targets", Method::POST, Some(body)).await
    }
}

fn encode<T: Serialize>(body: &T) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|err| ClientError::Malformed(err.to_string()))
}

fn error_from_body(status: u16, bytes: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<Value>(bytes).ok().and_then(|value| {
        value
            .get("error")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    });

    match message {
        Some(message) => ClientError::Server { status, message },
        None => ClientError::ServerUnparseable { status },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_wins_over_status() {
        let err = error_from_body(404, br#"{"error": "Food not found"}"#);
        assert_eq!(err.to_string(), "Food not found");
    }

    #[test]
    fn non_json_body_falls_back_to_status() {
        let err = error_from_body(502, b"<html>Bad Gateway</html>");
        assert_eq!(err, ClientError::ServerUnparseable { status: 502 });
        assert_eq!(err.to_string(), "Server error: 502");
    }

    #[test]
    fn json_without_error_falls_back_to_status() {
        let err = error_from_body(500, br#"{"message": "nope"}"#);
        assert_eq!(err.to_string(), "Server error: 500");
        let err = error_from_body(500, br#"{"error": ""}"#);
        assert_eq!(err.to_string(), "Server error: 500");
    }

    #[test]
    fn unencodable_body_reaches_status_line() {
        let notifier = Notifier::new();
        let client = ApiClient::new("http://localhost:5000/api", notifier.clone());
        let mut body = std::collections::HashMap::new();
        body.insert((1, 2), "tuple keys are not JSON");

        let encoded = client.report("/log_meal", encode(&body));

        assert!(encoded.is_none());
        assert!(notifier.message().starts_with(ERROR_PREFIX));
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = ApiClient::new("http://localhost:5000/api/", Notifier::new());
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }
}
