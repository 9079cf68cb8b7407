use std::sync::Arc;

use axum::{
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::api_client::{ApiClient, UserDirectoryApi};
use crate::auth::{Credentials, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

pub const LOGIN_ROUTE: &str = "/login";

#[derive(Debug)]
pub enum SessionOutcome {
    Active(Value),
    /// Profile check failed: both token cookies are cleared and the caller is sent to login.
    Expired,
}

/// Probes the profile endpoint with the caller's credentials.
pub async fn check_session(api: &ApiClient, credentials: Option<Credentials>) -> SessionOutcome {
    let Some(credentials) = credentials else {
        return SessionOutcome::Expired;
    };
    match api.authorize(Arc::new(credentials)).get_current_profile().await {
        Ok(profile) => SessionOutcome::Active(profile),
        Err(e) => {
            info!("session check failed, redirecting to login: {e}");
            SessionOutcome::Expired
        }
    }
}

fn expired_cookie(key: &str) -> String {
    format!("{key}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

impl IntoResponse for SessionOutcome {
    fn into_response(self) -> Response {
        match self {
            SessionOutcome::Active(profile) => Json(json!({
                "authenticated": true,
                "profile": profile
            }))
            .into_response(),
            SessionOutcome::Expired => (
                AppendHeaders([
                    (SET_COOKIE, expired_cookie(ACCESS_TOKEN_KEY)),
                    (SET_COOKIE, expired_cookie(REFRESH_TOKEN_KEY)),
                ]),
                Redirect::to(LOGIN_ROUTE),
            )
                .into_response(),
        }
    }
}
