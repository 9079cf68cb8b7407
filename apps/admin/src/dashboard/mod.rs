// Dashboard view-models. Each one owns the transient state of one screen,
// calls the API client directly and reports outcomes through `Notifications`.
// Views never share state except through the ids handed to them.

pub mod add_user;
pub mod biometrics;
pub mod create_group;
pub mod devices;
pub mod display;
pub mod group_assignment;
pub mod groups_page;
pub mod notifications;
pub mod user_groups;

#[cfg(test)]
pub(crate) mod fake;

pub use add_user::AddUserModal;
pub use biometrics::{BiometricTab, TimeRange};
pub use create_group::CreateGroupForm;
pub use devices::{DeviceDetails, DevicesPage};
pub use group_assignment::GroupAssignmentEditor;
pub use groups_page::GroupsPage;
pub use user_groups::UserGroupsTab;
