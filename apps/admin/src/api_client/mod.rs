//! API client: the single point of entry for every call to the remote biometric API.
//!
//! No other module builds upstream URLs or attaches bearer tokens. Each operation
//! maps one REST endpoint to one typed request/response pair and is exposed
//! through a per-feature trait (`RiskGroupApi`, `DeviceApi`, `BiometricApi`,
//! `UserDirectoryApi`) so the dashboard view-models can be driven by fakes.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::CredentialProvider;
use crate::config::Config;
use crate::models::MessageResponse;

pub mod biometrics;
pub mod devices;
pub mod envelope;
pub mod risk_groups;
pub mod users;

pub use biometrics::{BiometricApi, Metric};
pub use devices::DeviceApi;
pub use risk_groups::RiskGroupApi;
pub use users::UserDirectoryApi;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Raised locally, before any request is sent.
    #[error("No access token found")]
    MissingCredentials,

    #[error("Failed to {operation}")]
    RequestFailed {
        operation: &'static str,
        status: u16,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from {operation}: {detail}")]
    Decode {
        operation: &'static str,
        detail: String,
    },
}

/// How list reads react to a response that does not match the documented schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Substitute an empty result and log a warning.
    #[default]
    Lenient,
    /// Surface the mismatch as an error.
    Strict,
}

impl DecodePolicy {
    /// Applies the policy to a list read. Missing credentials always propagate.
    pub fn recover<T>(
        self,
        operation: &'static str,
        result: Result<T, ApiError>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, ApiError> {
        match result {
            Ok(value) => Ok(value),
            Err(ApiError::MissingCredentials) => Err(ApiError::MissingCredentials),
            Err(e) if self == DecodePolicy::Lenient => {
                warn!("{operation} failed, substituting empty result: {e}");
                Ok(fallback())
            }
            Err(e) => Err(e),
        }
    }
}

/// Unauthenticated client shared across requests. Holds the connection pool and
/// endpoint configuration; call `authorize` to obtain a client bound to credentials.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    policy: DecodePolicy,
    user_directory_path: String,
    profile_path: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.http_timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            policy: config.decode_policy,
            user_directory_path: config.user_directory_path.clone(),
            profile_path: config.profile_path.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn authorize(&self, credentials: Arc<dyn CredentialProvider>) -> AuthorizedClient {
        AuthorizedClient {
            api: self.clone(),
            credentials,
        }
    }
}

/// Client bound to one set of credentials. Implements every service trait.
#[derive(Clone)]
pub struct AuthorizedClient {
    api: ApiClient,
    credentials: Arc<dyn CredentialProvider>,
}

impl AuthorizedClient {
    pub fn policy(&self) -> DecodePolicy {
        self.api.policy
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.credentials
            .access_token()
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingCredentials)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api.base_url, path)
    }

    /// Sends an authenticated request. Fails before touching the network when no
    /// token is available; any non-2xx status becomes `RequestFailed`.
    async fn send(
        &self,
        method: Method,
        path: &str,
        operation: &'static str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, ApiError> {
        let token = self.bearer()?;

        debug!("{method} {path} ({operation})");
        let request = self
            .api
            .client
            .request(method, self.url(path))
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json");

        let response = build(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{operation} returned {status}");
            return Err(ApiError::RequestFailed {
                operation,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, operation, |r| r).await?;
        decode_body(response, operation).await
    }

    async fn get_json_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        operation: &'static str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let response = self
            .send(Method::GET, path, operation, |r| r.query(query))
            .await?;
        decode_body(response, operation).await
    }

    async fn mutate(
        &self,
        method: Method,
        path: &str,
        operation: &'static str,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.send(method, path, operation, |r| r).await?;
        decode_message(response, operation).await
    }

    async fn mutate_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        operation: &'static str,
        body: &B,
    ) -> Result<MessageResponse, ApiError> {
        let response = self.send(method, path, operation, |r| r.json(body)).await?;
        decode_message(response, operation).await
    }
}

async fn decode_body<T: DeserializeOwned>(
    response: Response,
    operation: &'static str,
) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        operation,
        detail: e.to_string(),
    })
}

/// Mutations acknowledge with `{message}`; an empty body is accepted as success.
async fn decode_message(
    response: Response,
    operation: &'static str,
) -> Result<MessageResponse, ApiError> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(MessageResponse::default());
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        operation,
        detail: e.to_string(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_policy_substitutes_fallback() {
        let result: Result<Vec<u8>, ApiError> = Err(ApiError::RequestFailed {
            operation: "fetch risk groups",
            status: 500,
        });
        let recovered = DecodePolicy::Lenient.recover("fetch risk groups", result, Vec::new);
        assert!(recovered.unwrap().is_empty());
    }

    #[test]
    fn test_lenient_policy_never_hides_missing_credentials() {
        let result: Result<Vec<u8>, ApiError> = Err(ApiError::MissingCredentials);
        let recovered = DecodePolicy::Lenient.recover("fetch risk groups", result, Vec::new);
        assert!(matches!(recovered, Err(ApiError::MissingCredentials)));
    }

    #[test]
    fn test_strict_policy_propagates() {
        let result: Result<Vec<u8>, ApiError> = Err(ApiError::Decode {
            operation: "fetch risk groups",
            detail: "expected array".to_string(),
        });
        let recovered = DecodePolicy::Strict.recover("fetch risk groups", result, Vec::new);
        assert!(matches!(recovered, Err(ApiError::Decode { .. })));
    }

    #[test]
    fn test_request_failed_message_is_generic() {
        let err = ApiError::RequestFailed {
            operation: "create risk group",
            status: 503,
        };
        assert_eq!(err.to_string(), "Failed to create risk group");
    }
}
