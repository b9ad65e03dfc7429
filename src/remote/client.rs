//! Greenfield API client

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use super::{RemoteCall, RemoteCollaborator};
use crate::config::BtcPayConfig;
use crate::{Error, Result};

/// Maximum number of characters of an error body carried into messages
const ERROR_BODY_LIMIT: usize = 500;

/// HTTP collaborator for a BTCPayServer instance
///
/// # Security
///
/// The API key lives only in the default `Authorization` header. It is never
/// logged and never appears in error messages.
pub struct BtcPayClient {
    client: Client,
    base_url: String,
    api_root: Url,
}

impl BtcPayClient {
    /// Build a client from validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the configuration is incomplete or the
    /// credential is not a valid header value.
    pub fn new(config: &BtcPayConfig) -> Result<Self> {
        config.validate()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let mut api_root = Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("Invalid BTCPAY_BASE_URL '{base_url}': {e}")))?;
        api_root
            .path_segments_mut()
            .map_err(|()| Error::Config(format!("BTCPAY_BASE_URL cannot be a base: {base_url}")))?
            .pop_if_empty()
            .extend(["api", "v1"]);

        let mut auth = HeaderValue::from_str(&format!("token {}", config.api_key))
            .map_err(|_| Error::Config("BTCPAY_API_KEY contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_root,
        })
    }

    fn url_for(&self, call: &RemoteCall) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(&call.segments);
        }
        url
    }

    async fn handle_response(&self, call: &RemoteCall, response: Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(
                procedure = %call.procedure,
                method = %call.method,
                path = %call.redacted_path(),
                status = status.as_u16(),
                "BTCPayServer API error"
            );
            let detail: String = text.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(Error::Remote {
                status: Some(status.as_u16()),
                message: format!("BTCPayServer API error: {} - {detail}", status.as_u16()),
            });
        }

        if text.trim().is_empty() {
            return Ok(json!({ "success": true }));
        }

        // A handful of endpoints answer with bare text rather than JSON.
        let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        call.shape.check(&call.procedure, &value)?;
        Ok(value)
    }
}

#[async_trait]
impl RemoteCollaborator for BtcPayClient {
    async fn call(&self, call: RemoteCall) -> Result<Value> {
        let url = self.url_for(&call);
        debug!(
            procedure = %call.procedure,
            method = %call.method,
            path = %call.redacted_path(),
            "Calling BTCPayServer"
        );

        let mut request = self.client.request(call.method.clone(), url);
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(procedure = %call.procedure, error = %e, "Request to BTCPayServer failed");
            Error::remote(format!("BTCPayServer request failed: {e}"))
        })?;

        self.handle_response(&call, response).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
