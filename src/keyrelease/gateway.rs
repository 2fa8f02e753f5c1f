//! HTTP gateway implementation of the threshold-network contract.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::codec;
use crate::error::{VaultError, VaultResult};
use crate::traits::{DecryptRequest, EncryptRequest, EncryptResponse, ThresholdNetwork};

/// Error body shape returned by the gateway on failed requests.
#[derive(Debug, Deserialize)]
struct GatewayError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// Success body of a decrypt call: reconstructed plaintext, base64.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecryptResponse {
    plaintext: String,
}

/// Client for a key-release gateway endpoint fronting the threshold
/// network's SDK surface.
pub struct ThresholdGateway {
    client: reqwest::Client,
    base_url: String,
}

impl ThresholdGateway {
    pub fn new(base_url: &str, timeout: Duration) -> VaultResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VaultError::Validation(format!("HTTP client error: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Map a gateway error response to the pipeline's taxonomy. The
    /// status code is the primary signal; the body's error code breaks
    /// ties for gateways that answer 400 for everything.
    fn classify_error(status: u16, body: &str) -> VaultError {
        let parsed: GatewayError = serde_json::from_str(body).unwrap_or(GatewayError {
            error: String::new(),
            message: body.to_string(),
        });
        let detail = if parsed.message.is_empty() {
            parsed.error.clone()
        } else {
            parsed.message.clone()
        };

        if status == 401 || parsed.error == "invalid_auth_sig" {
            VaultError::AuthenticationInvalid(detail)
        } else if status == 403 || parsed.error == "access_denied" {
            VaultError::EntitlementDenied(detail)
        } else {
            VaultError::KeyRelease(format!("gateway answered {status}: {detail}"))
        }
    }

    async fn post<B: serde::Serialize, O: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> VaultResult<O> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| VaultError::KeyRelease(format!("gateway unreachable: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| VaultError::KeyRelease(format!("gateway body unreadable: {e}")))?;

        if !status.is_success() {
            return Err(Self::classify_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| VaultError::Serialization(format!("gateway response: {e}")))
    }
}

#[async_trait]
impl ThresholdNetwork for ThresholdGateway {
    async fn connect(&self) -> VaultResult<()> {
        let url = format!("{}/v1/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VaultError::KeyRelease(format!("gateway unreachable: {e}")))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(VaultError::KeyRelease(format!(
                "gateway health check answered {}",
                response.status()
            )))
        }
    }

    async fn encrypt(&self, request: &EncryptRequest) -> VaultResult<EncryptResponse> {
        self.post("/v1/encrypt", request).await
    }

    async fn decrypt(&self, request: &DecryptRequest) -> VaultResult<Vec<u8>> {
        let response: DecryptResponse = self.post("/v1/decrypt", request).await?;
        codec::base64_to_bytes(&response.plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth_error_by_status() {
        let err = ThresholdGateway::classify_error(401, r#"{"message":"stale"}"#);
        assert!(err.is_auth_invalid());
    }

    #[test]
    fn test_classify_auth_error_by_code() {
        let err =
            ThresholdGateway::classify_error(400, r#"{"error":"invalid_auth_sig","message":"x"}"#);
        assert!(err.is_auth_invalid());
    }

    #[test]
    fn test_classify_denial() {
        let err = ThresholdGateway::classify_error(403, r#"{"message":"no valid pass"}"#);
        assert!(matches!(err, VaultError::EntitlementDenied(_)));

        let err =
            ThresholdGateway::classify_error(400, r#"{"error":"access_denied","message":"x"}"#);
        assert!(matches!(err, VaultError::EntitlementDenied(_)));
    }

    #[test]
    fn test_classify_other_errors_with_unparseable_body() {
        let err = ThresholdGateway::classify_error(500, "<html>oops</html>");
        match err {
            VaultError::KeyRelease(msg) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("oops"));
            }
            other => panic!("expected KeyRelease, got {other:?}"),
        }
    }
}
