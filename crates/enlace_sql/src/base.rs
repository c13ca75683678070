use crate::schemas::schema::{
    Beneficiary, Community, FormTemplate, Organization, RoleGrant, User, UserSummary, Volunteer,
};
use async_trait::async_trait;
use enlace_error::error::SqlError;
use enlace_settings::config::DatabaseSettings;
use enlace_types::{
    BeneficiaryQuery, CreateBeneficiaryRequest, CreateCommunityRequest,
    CreateFormTemplateRequest, CreateOrganizationRequest, CreateVolunteerRequest,
    ABRAZANDO_LEYENDAS, ORGANIZACIONES_FORMULARIOS, PIMCO_ESTADISTICA,
};
use std::fmt;

pub enum SqlTableNames {
    Roles,
    RoleSections,
    Users,
    Communities,
    Beneficiaries,
    Volunteers,
    Organizations,
    FormTemplates,
}

impl fmt::Display for SqlTableNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table_name = match self {
            SqlTableNames::Roles => "enlace_roles",
            SqlTableNames::RoleSections => "enlace_role_sections",
            SqlTableNames::Users => "enlace_users",
            SqlTableNames::Communities => "enlace_communities",
            SqlTableNames::Beneficiaries => "enlace_beneficiaries",
            SqlTableNames::Volunteers => "enlace_volunteers",
            SqlTableNames::Organizations => "enlace_organizations",
            SqlTableNames::FormTemplates => "enlace_form_templates",
        };
        write!(f, "{}", table_name)
    }
}

/// Rows backing a `requires_data` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionDataset {
    /// Beneficiaries enrolled in a program
    Program(String),
    /// Form templates that are not archived
    ActiveFormTemplates,
}

impl SectionDataset {
    pub fn for_section(key: &str) -> Option<SectionDataset> {
        match key {
            PIMCO_ESTADISTICA => Some(SectionDataset::Program("pimco".to_string())),
            ABRAZANDO_LEYENDAS => Some(SectionDataset::Program(ABRAZANDO_LEYENDAS.to_string())),
            ORGANIZACIONES_FORMULARIOS => Some(SectionDataset::ActiveFormTemplates),
            _ => None,
        }
    }
}

/// Map driver errors onto the error kinds callers act on
pub fn map_query_error(e: sqlx::Error) -> SqlError {
    if let Some(db_error) = e.as_database_error() {
        if db_error.is_foreign_key_violation() {
            return SqlError::InvalidReference(db_error.message().to_string());
        }
        if db_error.is_unique_violation() {
            return SqlError::Conflict(db_error.message().to_string());
        }
    }
    SqlError::QueryError(format!("{}", e))
}

#[async_trait]
pub trait SqlClient {
    async fn new(settings: &DatabaseSettings) -> Result<Self, SqlError>
    where
        Self: Sized;
    async fn run_migrations(&self) -> Result<(), SqlError>;

    // roles and users
    async fn get_role_grants(&self) -> Result<Vec<RoleGrant>, SqlError>;
    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserSummary, SqlError>;
    async fn get_user(&self, username: &str) -> Result<Option<User>, SqlError>;
    async fn get_user_by_id(&self, user_id: i64) -> Result<User, SqlError>;
    async fn list_users(&self) -> Result<Vec<UserSummary>, SqlError>;
    async fn update_user_role(&self, user_id: i64, role: &str) -> Result<UserSummary, SqlError>;
    async fn set_user_active(&self, user_id: i64, active: bool) -> Result<UserSummary, SqlError>;

    // program data
    async fn insert_community(&self, request: &CreateCommunityRequest)
        -> Result<Community, SqlError>;
    async fn list_communities(&self) -> Result<Vec<Community>, SqlError>;
    async fn insert_beneficiary(
        &self,
        request: &CreateBeneficiaryRequest,
    ) -> Result<Beneficiary, SqlError>;
    async fn query_beneficiaries(
        &self,
        query_args: &BeneficiaryQuery,
    ) -> Result<Vec<Beneficiary>, SqlError>;
    async fn insert_volunteer(&self, request: &CreateVolunteerRequest)
        -> Result<Volunteer, SqlError>;
    async fn list_volunteers(&self, active: Option<bool>) -> Result<Vec<Volunteer>, SqlError>;
    async fn insert_organization(
        &self,
        request: &CreateOrganizationRequest,
    ) -> Result<Organization, SqlError>;
    async fn list_organizations(&self) -> Result<Vec<Organization>, SqlError>;

    // form templates
    async fn insert_form_template(
        &self,
        request: &CreateFormTemplateRequest,
    ) -> Result<FormTemplate, SqlError>;
    async fn list_form_templates(
        &self,
        include_archived: bool,
    ) -> Result<Vec<FormTemplate>, SqlError>;
    async fn set_form_template_archived(
        &self,
        uid: &str,
        archived: bool,
    ) -> Result<FormTemplate, SqlError>;

    async fn count_rows(&self, dataset: &SectionDataset) -> Result<i64, SqlError>;
}
