//! Credentials are an explicit object threaded into the API client, never read
//! from ambient storage. The dashboard accepts them as a bearer header or as the
//! `accessToken`/`refreshToken` cookies the login flow writes.

use std::fmt;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
};

use crate::errors::AppError;

pub mod guard;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Source of the bearer token attached to every upstream call.
/// Implementations may refresh or expire tokens; the client only asks for the current one.
pub trait CredentialProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String> {
        None
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl Credentials {
    #[cfg(test)]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            refresh_token: None,
        }
    }

    /// Reads `Authorization: Bearer`, falling back to the token cookies.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cookies = parse_cookies(headers);
        let cookie = |key: &str| {
            cookies
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.clone())
                .filter(|value| !value.is_empty())
        };

        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Self {
            access_token: bearer.or_else(|| cookie(ACCESS_TOKEN_KEY)),
            refresh_token: cookie(REFRESH_TOKEN_KEY),
        }
    }

    pub fn is_present(&self) -> bool {
        self.access_token.is_some()
    }
}

impl CredentialProvider for Credentials {
    fn access_token(&self) -> Option<String> {
        self.access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.refresh_token.clone()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Rejects requests that carry no access token, before any upstream call.
#[async_trait]
impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let credentials = Credentials::from_headers(&parts.headers);
        if credentials.is_present() {
            Ok(credentials)
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
