use anyhow::Context;
use async_trait::async_trait;
use log::{debug, trace, warn};
use reqwest::{
    ClientBuilder, RequestBuilder, Response, Url,
    header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::repository::Repository;

/// reqwest-backed [`Repository`] talking to the Tawseek backend.
pub struct HttpSession {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpSession {
    pub fn new(cb: ClientBuilder, config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.append(
            USER_AGENT,
            HeaderValue::from_static(concat!("tawseek-misr/", env!("CARGO_PKG_VERSION"))),
        );
        headers.append(ACCEPT, HeaderValue::from_static("application/json"));
        headers.append(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(config.language.code()),
        );
        let client = cb
            .default_headers(headers)
            .build()
            .context("Building HTTP client")?;

        Ok(HttpSession { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self
            .config
            .base_url
            .join(path)
            .with_context(|| format!("Building URL for {path}"))?)
    }

    async fn trace_send_request(operation: &str, request: RequestBuilder) -> Result<Response> {
        trace!("Sending request: {:?}", &request);
        Ok(request
            .send()
            .await
            .with_context(|| format!("Sending {operation} request"))?)
    }

    async fn trace_json_body_and_error_for_response(
        operation: &str,
        resp: Response,
    ) -> Result<Value> {
        let status = resp.status();
        debug!("{} status code: {}", operation, status);
        let body = resp.text().await.context("Reading response body")?;
        trace!("{} response body: {}", operation, body);

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: Self::error_message(&body)
                    .or_else(|| status.canonical_reason().map(str::to_string))
                    .unwrap_or_default(),
            });
        }

        Ok(serde_json::from_str(&body)
            .with_context(|| format!("Parsing {operation} response body"))?)
    }

    /// Pulls a human readable message out of an error body, if it has one.
    fn error_message(body: &str) -> Option<String> {
        let value = serde_json::from_str::<Value>(body).ok()?;
        ["description", "message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .map(str::to_string)
    }
}

#[async_trait]
impl Repository for HttpSession {
    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path)?;
        let resp = Self::trace_send_request(path, self.client.get(url)).await?;
        Self::trace_json_body_and_error_for_response(path, resp).await
    }

    async fn post(&self, path: &str, body: Value, authenticated: bool) -> Result<Value> {
        let url = self.endpoint(path)?;
        trace!("{} request body: {}", path, body);

        let mut request = self.client.post(url).json(&body);
        if authenticated {
            match &self.config.auth_token {
                Some(token) => {
                    request = request.header(AUTHORIZATION, format!("Bearer {token}"));
                }
                None => warn!("{path}: authenticated request sent without a token"),
            }
        }

        let resp = Self::trace_send_request(path, request).await?;
        Self::trace_json_body_and_error_for_response(path, resp).await
    }
}
