//! HTTP secret backend speaking the AWS secrets agent protocol.
//!
//! The agent (the Secrets Manager Agent sidecar or the Parameters and Secrets
//! Lambda extension) listens locally and serves
//! `GET /secretsmanager/get?secretId=<id>`, authenticated by the
//! `X-Aws-Parameters-Secrets-Token` header. The agent is bound to a region by
//! its own configuration; the requested region is only recorded for tracing.

use serde::Deserialize;

use shopfront_auth::{SecretBackend, SecretBackendError};

use crate::config::SecretBackendConfig;

const TOKEN_HEADER: &str = "X-Aws-Parameters-Secrets-Token";

#[derive(Debug, Deserialize)]
struct AgentSecretResponse {
    #[serde(rename = "SecretString")]
    secret_string: Option<String>,
}

/// Single-attempt secret fetcher with a bounded client timeout.
#[derive(Debug, Clone)]
pub struct AgentSecretBackend {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl AgentSecretBackend {
    pub fn new(config: &SecretBackendConfig) -> Result<Self, SecretBackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SecretBackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }
}

#[async_trait::async_trait]
impl SecretBackend for AgentSecretBackend {
    async fn fetch_secret(
        &self,
        identifier: &str,
        region: &str,
    ) -> Result<serde_json::Value, SecretBackendError> {
        tracing::debug!(endpoint = %self.endpoint, identifier, region, "requesting secret");

        let mut req = self
            .client
            .get(format!("{}/secretsmanager/get", self.endpoint))
            .query(&[("secretId", identifier)]);
        if let Some(token) = &self.token {
            req = req.header(TOKEN_HEADER, token);
        }

        let res = req
            .send()
            .await
            .map_err(|e| SecretBackendError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(SecretBackendError::Status {
                identifier: identifier.to_string(),
                status: status.as_u16(),
            });
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| SecretBackendError::Transport(e.to_string()))?;
        let envelope: AgentSecretResponse = serde_json::from_slice(&body)?;
        let secret = envelope
            .secret_string
            .ok_or_else(|| SecretBackendError::MissingPayload(identifier.to_string()))?;

        Ok(serde_json::from_str(&secret)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one canned HTTP response and hand back the raw request.
    async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (endpoint, handle)
    }

    fn backend(endpoint: String, token: Option<&str>) -> AgentSecretBackend {
        AgentSecretBackend::new(&SecretBackendConfig {
            endpoint,
            token: token.map(str::to_string),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_and_parses_secret_string() {
        let body = serde_json::json!({
            "Name": "shop/api_key",
            "SecretString": "{\"api_key\":\"from-agent\"}"
        })
        .to_string();
        let (endpoint, server) = serve_once("200 OK", body).await;

        let doc = backend(endpoint, Some("tok"))
            .fetch_secret("shop/api_key", "us-east-1")
            .await
            .unwrap();
        assert_eq!(doc["api_key"], "from-agent");

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /secretsmanager/get?secretid=shop%2fapi_key "));
        assert!(request.contains("x-aws-parameters-secrets-token: tok"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let (endpoint, _server) = serve_once("404 Not Found", "{}".to_string()).await;

        match backend(endpoint, None).fetch_secret("missing", "us-east-1").await {
            Err(SecretBackendError::Status { status, identifier }) => {
                assert_eq!(status, 404);
                assert_eq!(identifier, "missing");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_secret_string_is_reported() {
        let (endpoint, _server) = serve_once("200 OK", "{\"Name\":\"x\"}".to_string()).await;

        assert!(matches!(
            backend(endpoint, None).fetch_secret("x", "us-east-1").await,
            Err(SecretBackendError::MissingPayload(_))
        ));
    }

    #[tokio::test]
    async fn non_json_secret_string_is_reported() {
        let body = serde_json::json!({"SecretString": "plain-text"}).to_string();
        let (endpoint, _server) = serve_once("200 OK", body).await;

        assert!(matches!(
            backend(endpoint, None).fetch_secret("x", "us-east-1").await,
            Err(SecretBackendError::InvalidPayload(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_agent_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        assert!(matches!(
            backend(endpoint, None).fetch_secret("x", "us-east-1").await,
            Err(SecretBackendError::Transport(_))
        ));
    }
}
