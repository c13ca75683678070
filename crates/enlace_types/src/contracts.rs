use crate::menu::NavItem;
use crate::section::SectionKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtToken {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NavigationQuery {
    pub active: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NavigationResponse {
    Loading,
    Ready {
        items: Vec<NavItem>,
        active_section: Option<SectionKey>,
        is_admin: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PermissionsResponse {
    Loading,
    Ready {
        role: String,
        sections: Vec<SectionKey>,
        is_admin: bool,
    },
}

/// Data availability of the `requires_data` sections visible to the caller.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SectionDataResponse {
    pub sections: BTreeMap<SectionKey, bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommunityRequest {
    pub name: String,
    pub municipality: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBeneficiaryRequest {
    pub community_id: i64,
    pub full_name: String,
    pub gender: String,
    pub age: Option<i32>,
    pub program: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BeneficiaryQuery {
    pub community_id: Option<i64>,
    pub program: Option<String>,
    pub active: Option<bool>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateVolunteerRequest {
    pub full_name: String,
    pub email: String,
    pub community_id: Option<i64>,
    #[serde(default)]
    pub hours: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VolunteerQuery {
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub contact_email: Option<String>,
    pub community_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFormTemplateRequest {
    pub name: String,
    pub section_key: SectionKey,
    pub fields: Vec<FormField>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FormTemplateQuery {
    pub include_archived: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormTemplateUidRequest {
    pub uid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignRoleRequest {
    pub user_id: i64,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserIdRequest {
    pub user_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityStats {
    pub community_id: Option<i64>,
    pub community: String,
    pub beneficiaries: i64,
    pub active_beneficiaries: i64,
    pub average_age: Option<f64>,
    pub share_percent: f64,
    pub by_gender: BTreeMap<String, i64>,
    pub volunteers: i64,
    pub volunteer_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStatsResponse {
    pub communities: Vec<CommunityStats>,
    pub totals: CommunityStats,
}
