use serde::Deserialize;

use crate::models::CreateRiskGroupRequest;

/// Create-group form. Values are trimmed on submit and the form is cleared
/// only once the server has accepted the group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGroupForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CreateGroupForm {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// `None` when the trimmed name is empty; no request should be sent.
    pub fn request(&self) -> Option<CreateRiskGroupRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(CreateRiskGroupRequest {
            name: name.to_string(),
            description: self.description.trim().to_string(),
        })
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_fields() {
        let request = CreateGroupForm::new("  Cardiac ", "\thigh HR\n").request().unwrap();
        assert_eq!(request.name, "Cardiac");
        assert_eq!(request.description, "high HR");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(CreateGroupForm::new("   ", "desc").request().is_none());
    }

    #[tokio::test]
    async fn test_blank_name_never_reaches_the_server() {
        use crate::dashboard::fake::FakeBackend;
        use crate::dashboard::groups_page::GroupsPage;
        use std::sync::Arc;

        let backend = Arc::new(FakeBackend::default());
        let mut page = GroupsPage::new(backend.clone());
        let mut form = CreateGroupForm::new(" ", "");
        assert!(!page.create_group(&mut form).await);
        assert!(backend.calls().is_empty());
    }
}
