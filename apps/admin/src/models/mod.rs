// Records exchanged verbatim with the remote biometric API.
// Field names follow the upstream camelCase JSON.

pub mod biometric;
pub mod device;
pub mod risk_group;
pub mod user;

pub use biometric::{BiometricParams, BiometricResponse};
pub use device::Device;
pub use risk_group::{
    CreateRiskGroupRequest, MemberSortField, MessageResponse, RiskGroup, RiskGroupMember,
    RiskGroupMembersParams, RiskGroupMembersResponse, SortOrder, UpdateRiskGroupRequest,
    UserGroupEntry, UserRiskGroups,
};
pub use user::UserProfile;
