use async_trait::async_trait;
use serde_json::Value;

use crate::api_client::envelope::decode_list;
use crate::api_client::{ApiError, AuthorizedClient};
use crate::models::UserProfile;

/// User directory and profile endpoints. Their paths are configurable.
#[async_trait]
pub trait UserDirectoryApi: Send + Sync {
    async fn get_user_profiles(&self) -> Result<Vec<UserProfile>, ApiError>;

    /// Profile of the credential holder. Used only as an authentication probe.
    async fn get_current_profile(&self) -> Result<Value, ApiError>;
}

#[async_trait]
impl UserDirectoryApi for AuthorizedClient {
    async fn get_user_profiles(&self) -> Result<Vec<UserProfile>, ApiError> {
        const OPERATION: &str = "fetch users";
        let value: Value = self
            .get_json(&self.api.user_directory_path, OPERATION)
            .await?;
        decode_list(value, OPERATION)
    }

    async fn get_current_profile(&self) -> Result<Value, ApiError> {
        self.get_json(&self.api.profile_path, "fetch current profile")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::test_support::client_for;
    use crate::config::DEFAULT_USER_DIRECTORY_PATH;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_user_profiles_accept_wrapped_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DEFAULT_USER_DIRECTORY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 1, "email": "a@b.c", "firstName": "A", "lastName": "B"}]
            })))
            .mount(&server)
            .await;

        let users = client_for(&server.uri(), Some("t"))
            .get_user_profiles()
            .await
            .unwrap();
        assert_eq!(users[0].email, "a@b.c");
    }

    #[tokio::test]
    async fn test_user_profiles_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server.uri(), Some("t"))
            .get_user_profiles()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch users");
    }
}
