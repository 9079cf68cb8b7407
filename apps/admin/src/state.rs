use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::api_client::{ApiClient, AuthorizedClient};
use crate::auth::Credentials;
use crate::config::Config;
use crate::errors::AppError;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub actions: ActionGuard,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            api: ApiClient::new(config),
            actions: ActionGuard::default(),
        }
    }

    /// Client bound to the caller's credentials for the duration of one request.
    pub fn client(&self, credentials: Credentials) -> Arc<AuthorizedClient> {
        Arc::new(self.api.authorize(Arc::new(credentials)))
    }
}

/// Rejects a mutation while an identical one (same action, same target) is still
/// in flight. Stands in for the per-button "loading" flags of a browser UI.
#[derive(Clone, Default)]
pub struct ActionGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ActionGuard {
    pub fn begin(&self, key: impl Into<String>) -> Result<ActionTicket, AppError> {
        let key = key.into();
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !in_flight.insert(key.clone()) {
            return Err(AppError::Busy(key));
        }
        Ok(ActionTicket {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }
}

/// Releases its action key when dropped.
pub struct ActionTicket {
    key: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl Drop for ActionTicket {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_action_is_rejected_until_released() {
        let guard = ActionGuard::default();
        let ticket = guard.begin("add:1:2").unwrap();
        assert!(matches!(guard.begin("add:1:2"), Err(AppError::Busy(_))));
        assert!(guard.begin("add:1:3").is_ok());

        drop(ticket);
        assert!(guard.begin("add:1:2").is_ok());
    }
}
