//! HTTP transport: POSTs each event as JSON to a lineage endpoint.
//!
//! Works with any OpenLineage-compatible receiver (Marquez, proxies, ...).
//! Only 200 and 201 count as delivered. There are no retries and no timeout
//! of its own; the deadline comes from the emit context.

use async_trait::async_trait;
use openlineage_core::{EmitContext, Transport, TransportError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

pub struct HttpTransport {
    client: reqwest::Client,
    uri: Url,
    api_key: Option<String>,
}

impl HttpTransport {
    /// Create a transport posting to `uri`, optionally bearer-authenticated.
    pub fn new(uri: &str, api_key: Option<String>) -> Result<Self, TransportError> {
        let uri = Url::parse(uri)
            .map_err(|e| TransportError::InvalidEndpoint(format!("{uri}: {e}")))?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Network(format!("create HTTP client: {e}")))?;

        Ok(Self {
            client,
            uri,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn emit(
        &self,
        ctx: &EmitContext,
        event: &serde_json::Value,
    ) -> Result<(), TransportError> {
        let body = serde_json::to_vec(event)?;

        let mut request = self
            .client
            .post(self.uri.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(ref api_key) = self.api_key {
            request = request.bearer_auth(api_key);
        }

        debug!(uri = %self.uri, "Posting lineage event");

        ctx.scope(async move {
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            let status = response.status();
            if status != StatusCode::OK && status != StatusCode::CREATED {
                let body = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), body = %body, "Lineage endpoint rejected event");
                return Err(TransportError::Status {
                    status_code: status.as_u16(),
                    body,
                });
            }

            Ok::<(), TransportError>(())
        })
        .await?
    }
}
