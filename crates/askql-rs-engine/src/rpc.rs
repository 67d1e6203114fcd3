//! JSON-over-HTTP client for the remote generation service.

use askql_rs_config::EngineConfig;
use askql_rs_protocol::EngineError;
use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
const MODEL_HEADER: HeaderName = HeaderName::from_static("x-model");

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    method: &'a str,
    params: Value,
}

#[derive(Debug, Default, Deserialize)]
struct RpcReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcFault>,
}

#[derive(Debug, Deserialize)]
struct RpcFault {
    message: String,
}

/// Posts `{"method", "params"}` envelopes to a single endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RpcClient {
    /// Build a client with optional credentials sent on every call.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<&str>,
        model: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(key.trim())
                .map_err(|_| EngineError::Request("invalid api key header".to_string()))?;
            headers.insert(API_KEY_HEADER, value);
        }
        if let Some(model) = model {
            let value = HeaderValue::from_str(model)
                .map_err(|_| EngineError::Request(format!("invalid model name: {model}")))?;
            headers.insert(MODEL_HEADER, value);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| EngineError::Request(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Build a client from the engine section of the config.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let api_key = config.api_key();
        Self::new(
            config.base_url.clone(),
            api_key.as_deref(),
            config.model.as_deref(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Endpoint every call is posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Invoke `method` and decode its `result` into `T`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, EngineError> {
        debug!("rpc call (method={method}, endpoint={})", self.endpoint);
        let response = self
            .http
            .post(&self.endpoint)
            .json(&RpcRequest { method, params })
            .send()
            .await
            .map_err(|err| EngineError::Request(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EngineError::Request(err.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<RpcReply>(&body)
                .ok()
                .and_then(|reply| reply.error)
                .map(|fault| fault.message)
                .unwrap_or_else(|| format!("{method} returned {status}: {body}"));
            return Err(EngineError::Remote(message));
        }

        let reply: RpcReply = serde_json::from_str(&body)
            .map_err(|err| EngineError::Decode(format!("{method}: {err}")))?;
        if let Some(fault) = reply.error {
            return Err(EngineError::Remote(fault.message));
        }
        let result = reply.result.ok_or_else(|| {
            EngineError::Decode(format!("{method}: reply carried neither result nor error"))
        })?;
        serde_json::from_value(result).map_err(|err| EngineError::Decode(format!("{method}: {err}")))
    }
}
