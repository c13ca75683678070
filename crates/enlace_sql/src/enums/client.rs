use crate::base::{SectionDataset, SqlClient};
use crate::postgres::client::PostgresClient;
use crate::schemas::schema::{
    Beneficiary, Community, FormTemplate, Organization, RoleGrant, User, UserSummary, Volunteer,
};
use crate::sqlite::client::SqliteClient;
use async_trait::async_trait;
use enlace_error::error::SqlError;
use enlace_settings::config::{DatabaseSettings, SqlType};
use enlace_types::{
    BeneficiaryQuery, CreateBeneficiaryRequest, CreateCommunityRequest,
    CreateFormTemplateRequest, CreateOrganizationRequest, CreateVolunteerRequest,
};
use tracing::info;

#[derive(Debug, Clone)]
pub enum SqlClientEnum {
    Postgres(PostgresClient),
    Sqlite(SqliteClient),
}

impl SqlClientEnum {
    pub fn name(&self) -> &str {
        match self {
            SqlClientEnum::Postgres(_) => "Postgres",
            SqlClientEnum::Sqlite(_) => "Sqlite",
        }
    }
}

#[async_trait]
impl SqlClient for SqlClientEnum {
    async fn new(settings: &DatabaseSettings) -> Result<Self, SqlError> {
        info!("Connecting to {} database", settings.sql_type);
        match settings.sql_type {
            SqlType::Postgres => {
                let client = PostgresClient::new(settings).await?;
                Ok(SqlClientEnum::Postgres(client))
            }
            SqlType::Sqlite => {
                let client = SqliteClient::new(settings).await?;
                Ok(SqlClientEnum::Sqlite(client))
            }
        }
    }

    async fn run_migrations(&self) -> Result<(), SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.run_migrations().await,
            SqlClientEnum::Sqlite(client) => client.run_migrations().await,
        }
    }

    async fn get_role_grants(&self) -> Result<Vec<RoleGrant>, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.get_role_grants().await,
            SqlClientEnum::Sqlite(client) => client.get_role_grants().await,
        }
    }

    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserSummary, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => {
                client.insert_user(username, password_hash, role).await
            }
            SqlClientEnum::Sqlite(client) => {
                client.insert_user(username, password_hash, role).await
            }
        }
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.get_user(username).await,
            SqlClientEnum::Sqlite(client) => client.get_user(username).await,
        }
    }

    async fn get_user_by_id(&self, user_id: i64) -> Result<User, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.get_user_by_id(user_id).await,
            SqlClientEnum::Sqlite(client) => client.get_user_by_id(user_id).await,
        }
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.list_users().await,
            SqlClientEnum::Sqlite(client) => client.list_users().await,
        }
    }

    async fn update_user_role(&self, user_id: i64, role: &str) -> Result<UserSummary, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.update_user_role(user_id, role).await,
            SqlClientEnum::Sqlite(client) => client.update_user_role(user_id, role).await,
        }
    }

    async fn set_user_active(&self, user_id: i64, active: bool) -> Result<UserSummary, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.set_user_active(user_id, active).await,
            SqlClientEnum::Sqlite(client) => client.set_user_active(user_id, active).await,
        }
    }

    async fn insert_community(
        &self,
        request: &CreateCommunityRequest,
    ) -> Result<Community, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.insert_community(request).await,
            SqlClientEnum::Sqlite(client) => client.insert_community(request).await,
        }
    }

    async fn list_communities(&self) -> Result<Vec<Community>, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.list_communities().await,
            SqlClientEnum::Sqlite(client) => client.list_communities().await,
        }
    }

    async fn insert_beneficiary(
        &self,
        request: &CreateBeneficiaryRequest,
    ) -> Result<Beneficiary, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.insert_beneficiary(request).await,
            SqlClientEnum::Sqlite(client) => client.insert_beneficiary(request).await,
        }
    }

    async fn query_beneficiaries(
        &self,
        query_args: &BeneficiaryQuery,
    ) -> Result<Vec<Beneficiary>, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.query_beneficiaries(query_args).await,
            SqlClientEnum::Sqlite(client) => client.query_beneficiaries(query_args).await,
        }
    }

    async fn insert_volunteer(
        &self,
        request: &CreateVolunteerRequest,
    ) -> Result<Volunteer, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.insert_volunteer(request).await,
            SqlClientEnum::Sqlite(client) => client.insert_volunteer(request).await,
        }
    }

    async fn list_volunteers(&self, active: Option<bool>) -> Result<Vec<Volunteer>, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.list_volunteers(active).await,
            SqlClientEnum::Sqlite(client) => client.list_volunteers(active).await,
        }
    }

    async fn insert_organization(
        &self,
        request: &CreateOrganizationRequest,
    ) -> Result<Organization, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.insert_organization(request).await,
            SqlClientEnum::Sqlite(client) => client.insert_organization(request).await,
        }
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.list_organizations().await,
            SqlClientEnum::Sqlite(client) => client.list_organizations().await,
        }
    }

    async fn insert_form_template(
        &self,
        request: &CreateFormTemplateRequest,
    ) -> Result<FormTemplate, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.insert_form_template(request).await,
            SqlClientEnum::Sqlite(client) => client.insert_form_template(request).await,
        }
    }

    async fn list_form_templates(
        &self,
        include_archived: bool,
    ) -> Result<Vec<FormTemplate>, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.list_form_templates(include_archived).await,
            SqlClientEnum::Sqlite(client) => client.list_form_templates(include_archived).await,
        }
    }

    async fn set_form_template_archived(
        &self,
        uid: &str,
        archived: bool,
    ) -> Result<FormTemplate, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => {
                client.set_form_template_archived(uid, archived).await
            }
            SqlClientEnum::Sqlite(client) => client.set_form_template_archived(uid, archived).await,
        }
    }

    async fn count_rows(&self, dataset: &SectionDataset) -> Result<i64, SqlError> {
        match self {
            SqlClientEnum::Postgres(client) => client.count_rows(dataset).await,
            SqlClientEnum::Sqlite(client) => client.count_rows(dataset).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sql_client_enum_sqlite() {
        let settings = DatabaseSettings {
            connection_uri: "sqlite::memory:".to_string(),
            max_connections: 1,
            sql_type: SqlType::Sqlite,
        };

        let client = SqlClientEnum::new(&settings).await.unwrap();
        assert_eq!(client.name(), "Sqlite");
        assert!(!client.get_role_grants().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sql_client_enum_bad_uri() {
        let settings = DatabaseSettings {
            connection_uri: "sqlite:///definitely/missing/dir/enlace.db".to_string(),
            max_connections: 1,
            sql_type: SqlType::Sqlite,
        };

        assert!(matches!(
            SqlClientEnum::new(&settings).await,
            Err(SqlError::ConnectionError(_))
        ));
    }
}
