use crate::base::{map_query_error, SectionDataset, SqlClient, SqlTableNames};
use crate::schemas::schema::{
    Beneficiary, Community, FormTemplate, Organization, RoleGrant, User, UserSummary, Volunteer,
};
use crate::sqlite::helper::{
    SqliteQueryHelper, BENEFICIARY_COLUMNS, FORM_TEMPLATE_COLUMNS, VOLUNTEER_COLUMNS,
};
use async_trait::async_trait;
use enlace_error::error::SqlError;
use enlace_settings::config::DatabaseSettings;
use enlace_types::{
    BeneficiaryQuery, CreateBeneficiaryRequest, CreateCommunityRequest,
    CreateFormTemplateRequest, CreateOrganizationRequest, CreateVolunteerRequest,
};
use enlace_utils::utils::create_uuid4;
use sqlx::{sqlite::SqlitePoolOptions, types::Json, Pool, QueryBuilder, Sqlite};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SqliteClient {
    pub pool: Pool<Sqlite>,
}

#[async_trait]
impl SqlClient for SqliteClient {
    async fn new(settings: &DatabaseSettings) -> Result<Self, SqlError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.connection_uri)
            .await
            .map_err(|e| SqlError::ConnectionError(format!("{}", e)))?;

        let client = Self { pool };

        // run migrations
        client.run_migrations().await?;

        Ok(client)
    }

    async fn run_migrations(&self) -> Result<(), SqlError> {
        info!("Running migrations");
        sqlx::migrate!("src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| SqlError::MigrationError(format!("{}", e)))?;

        Ok(())
    }

    async fn get_role_grants(&self) -> Result<Vec<RoleGrant>, SqlError> {
        let query = SqliteQueryHelper::get_role_grants_query();

        sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<UserSummary, SqlError> {
        let query = SqliteQueryHelper::get_user_insert_query();

        sqlx::query_as(&query)
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, SqlError> {
        let query = SqliteQueryHelper::get_user_query();

        sqlx::query_as(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn get_user_by_id(&self, user_id: i64) -> Result<User, SqlError> {
        let query = SqliteQueryHelper::get_user_by_id_query();

        let user: Option<User> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error)?;

        user.ok_or_else(|| SqlError::NotFound(format!("user {}", user_id)))
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, SqlError> {
        let query = SqliteQueryHelper::get_users_query();

        sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn update_user_role(&self, user_id: i64, role: &str) -> Result<UserSummary, SqlError> {
        let query = SqliteQueryHelper::get_user_role_update_query();

        let user: Option<UserSummary> = sqlx::query_as(&query)
            .bind(role)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error)?;

        user.ok_or_else(|| SqlError::NotFound(format!("user {}", user_id)))
    }

    async fn set_user_active(&self, user_id: i64, active: bool) -> Result<UserSummary, SqlError> {
        let query = SqliteQueryHelper::get_user_active_update_query();

        let user: Option<UserSummary> = sqlx::query_as(&query)
            .bind(active)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error)?;

        user.ok_or_else(|| SqlError::NotFound(format!("user {}", user_id)))
    }

    async fn insert_community(
        &self,
        request: &CreateCommunityRequest,
    ) -> Result<Community, SqlError> {
        let query = SqliteQueryHelper::get_community_insert_query();

        sqlx::query_as(&query)
            .bind(&request.name)
            .bind(&request.municipality)
            .fetch_one(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn list_communities(&self) -> Result<Vec<Community>, SqlError> {
        let query = SqliteQueryHelper::get_communities_query();

        sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn insert_beneficiary(
        &self,
        request: &CreateBeneficiaryRequest,
    ) -> Result<Beneficiary, SqlError> {
        let query = SqliteQueryHelper::get_beneficiary_insert_query();

        sqlx::query_as(&query)
            .bind(request.community_id)
            .bind(&request.full_name)
            .bind(&request.gender)
            .bind(request.age)
            .bind(&request.program)
            .fetch_one(&self.pool)
            .await
            .map_err(map_query_error)
    }

    /// Query beneficiaries based on the query arguments. Filters left as `None` are not applied.
    async fn query_beneficiaries(
        &self,
        query_args: &BeneficiaryQuery,
    ) -> Result<Vec<Beneficiary>, SqlError> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {} WHERE 1=1",
            BENEFICIARY_COLUMNS,
            SqlTableNames::Beneficiaries
        ));

        if let Some(community_id) = query_args.community_id {
            builder.push(" AND community_id = ");
            builder.push_bind(community_id);
        }

        if let Some(program) = &query_args.program {
            builder.push(" AND program = ");
            builder.push_bind(program.clone());
        }

        if let Some(active) = query_args.active {
            builder.push(" AND active = ");
            builder.push_bind(active);
        }

        if let Some(search) = &query_args.search {
            builder.push(" AND LOWER(full_name) LIKE ");
            builder.push_bind(format!("%{}%", search.to_lowercase()));
        }

        builder.push(" ORDER BY full_name, id");

        if let Some(limit) = query_args.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }

        debug!("Querying beneficiaries: {}", builder.sql());

        builder
            .build_query_as::<Beneficiary>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn insert_volunteer(
        &self,
        request: &CreateVolunteerRequest,
    ) -> Result<Volunteer, SqlError> {
        let query = SqliteQueryHelper::get_volunteer_insert_query();

        sqlx::query_as(&query)
            .bind(&request.full_name)
            .bind(&request.email)
            .bind(request.community_id)
            .bind(request.hours)
            .fetch_one(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn list_volunteers(&self, active: Option<bool>) -> Result<Vec<Volunteer>, SqlError> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {}",
            VOLUNTEER_COLUMNS,
            SqlTableNames::Volunteers
        ));

        if let Some(active) = active {
            builder.push(" WHERE active = ");
            builder.push_bind(active);
        }
        builder.push(" ORDER BY full_name, id");

        builder
            .build_query_as::<Volunteer>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn insert_organization(
        &self,
        request: &CreateOrganizationRequest,
    ) -> Result<Organization, SqlError> {
        let query = SqliteQueryHelper::get_organization_insert_query();

        sqlx::query_as(&query)
            .bind(&request.name)
            .bind(&request.contact_email)
            .bind(request.community_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, SqlError> {
        let query = SqliteQueryHelper::get_organizations_query();

        sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn insert_form_template(
        &self,
        request: &CreateFormTemplateRequest,
    ) -> Result<FormTemplate, SqlError> {
        let query = SqliteQueryHelper::get_form_template_insert_query();

        sqlx::query_as(&query)
            .bind(create_uuid4())
            .bind(&request.name)
            .bind(request.section_key.as_str())
            .bind(Json(&request.fields))
            .fetch_one(&self.pool)
            .await
            .map_err(map_query_error)
    }

    async fn list_form_templates(
        &self,
        include_archived: bool,
    ) -> Result<Vec<FormTemplate>, SqlError> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {}",
            FORM_TEMPLATE_COLUMNS,
            SqlTableNames::FormTemplates
        ));

        if !include_archived {
            builder.push(" WHERE archived_at IS NULL");
        }
        builder.push(" ORDER BY created_at DESC, name");

        builder
            .build_query_as::<FormTemplate>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_query_error)
    }

    /// Soft delete or restore a template. Repeating either operation keeps the current state.
    async fn set_form_template_archived(
        &self,
        uid: &str,
        archived: bool,
    ) -> Result<FormTemplate, SqlError> {
        let query = if archived {
            SqliteQueryHelper::get_form_template_archive_query()
        } else {
            SqliteQueryHelper::get_form_template_restore_query()
        };

        let template: Option<FormTemplate> = sqlx::query_as(&query)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_query_error)?;

        template.ok_or_else(|| SqlError::NotFound(format!("form template {}", uid)))
    }

    async fn count_rows(&self, dataset: &SectionDataset) -> Result<i64, SqlError> {
        let count = match dataset {
            SectionDataset::Program(program) => {
                let query = SqliteQueryHelper::get_program_count_query();
                sqlx::query_scalar::<_, i64>(&query)
                    .bind(program)
                    .fetch_one(&self.pool)
                    .await
            }
            SectionDataset::ActiveFormTemplates => {
                let query = SqliteQueryHelper::get_active_form_template_count_query();
                sqlx::query_scalar::<_, i64>(&query)
                    .fetch_one(&self.pool)
                    .await
            }
        }
        .map_err(map_query_error)?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use enlace_settings::config::SqlType;
    use enlace_types::{FieldKind, FormField, SectionKey};

    async fn client() -> SqliteClient {
        let config = DatabaseSettings {
            connection_uri: "sqlite::memory:".to_string(),
            max_connections: 1,
            sql_type: SqlType::Sqlite,
        };

        SqliteClient::new(&config).await.unwrap()
    }

    async fn community(client: &SqliteClient, name: &str) -> Community {
        client
            .insert_community(&CreateCommunityRequest {
                name: name.to_string(),
                municipality: "San Pedro".to_string(),
            })
            .await
            .unwrap()
    }

    fn beneficiary(community_id: i64, name: &str, program: &str) -> CreateBeneficiaryRequest {
        CreateBeneficiaryRequest {
            community_id,
            full_name: name.to_string(),
            gender: "F".to_string(),
            age: Some(30),
            program: program.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sqlite() {
        let _client = client().await;
    }

    #[tokio::test]
    async fn test_sqlite_role_grants_seeded() {
        let client = client().await;
        let grants = client.get_role_grants().await.unwrap();

        let admin: Vec<&RoleGrant> = grants.iter().filter(|g| g.role == "admin").collect();
        assert_eq!(admin.len(), 1);
        assert!(admin[0].is_admin);
        assert_eq!(admin[0].section_key, None);

        let viewer: Vec<&str> = grants
            .iter()
            .filter(|g| g.role == "viewer")
            .filter_map(|g| g.section_key.as_deref())
            .collect();
        assert_eq!(viewer, vec!["abrazando-leyendas", "pimco-estadistica"]);
    }

    #[tokio::test]
    async fn test_sqlite_users() {
        let client = client().await;

        let created = client.insert_user("ana", "hash", "volunteer").await.unwrap();
        assert!(created.active);
        assert_eq!(created.role, "volunteer");

        let user = client.get_user("ana").await.unwrap().unwrap();
        assert_eq!(user.id, created.id);
        assert_eq!(user.password_hash, "hash");
        assert!(client.get_user("nobody").await.unwrap().is_none());

        // duplicate usernames and unknown roles are rejected
        assert!(matches!(
            client.insert_user("ana", "hash", "viewer").await,
            Err(SqlError::Conflict(_))
        ));
        assert!(matches!(
            client.insert_user("luis", "hash", "auditor").await,
            Err(SqlError::InvalidReference(_))
        ));

        let updated = client.update_user_role(created.id, "viewer").await.unwrap();
        assert_eq!(updated.role, "viewer");

        let deactivated = client.set_user_active(created.id, false).await.unwrap();
        assert!(!deactivated.active);
        assert!(!client.get_user_by_id(created.id).await.unwrap().active);

        let restored = client.set_user_active(created.id, true).await.unwrap();
        assert!(restored.active);

        assert!(matches!(
            client.get_user_by_id(999).await,
            Err(SqlError::NotFound(_))
        ));
        assert!(matches!(
            client.set_user_active(999, false).await,
            Err(SqlError::NotFound(_))
        ));

        assert_eq!(client.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_beneficiaries() {
        let client = client().await;
        let norte = community(&client, "Norte").await;
        let sur = community(&client, "Sur").await;

        client
            .insert_beneficiary(&beneficiary(norte.id, "Maria Lopez", "pimco"))
            .await
            .unwrap();
        client
            .insert_beneficiary(&beneficiary(norte.id, "Jose Perez", "abrazando-leyendas"))
            .await
            .unwrap();
        client
            .insert_beneficiary(&beneficiary(sur.id, "Marta Diaz", "pimco"))
            .await
            .unwrap();

        // unknown community
        assert!(matches!(
            client
                .insert_beneficiary(&beneficiary(42, "Nadie", "pimco"))
                .await,
            Err(SqlError::InvalidReference(_))
        ));

        let all = client
            .query_beneficiaries(&BeneficiaryQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].full_name, "Jose Perez");

        let pimco = client
            .query_beneficiaries(&BeneficiaryQuery {
                program: Some("pimco".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pimco.len(), 2);

        let norte_pimco = client
            .query_beneficiaries(&BeneficiaryQuery {
                community_id: Some(norte.id),
                program: Some("pimco".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(norte_pimco.len(), 1);
        assert_eq!(norte_pimco[0].full_name, "Maria Lopez");

        let search = client
            .query_beneficiaries(&BeneficiaryQuery {
                search: Some("MAR".to_string()),
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(search.len(), 1);
        assert_eq!(search[0].full_name, "Maria Lopez");

        let active = client
            .query_beneficiaries(&BeneficiaryQuery {
                active: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_volunteers_and_organizations() {
        let client = client().await;
        let norte = community(&client, "Norte").await;

        let volunteer = client
            .insert_volunteer(&CreateVolunteerRequest {
                full_name: "Pedro Ruiz".to_string(),
                email: "pedro@example.org".to_string(),
                community_id: Some(norte.id),
                hours: 12.5,
            })
            .await
            .unwrap();
        assert_eq!(volunteer.hours, 12.5);
        assert!(volunteer.active);

        assert_eq!(client.list_volunteers(None).await.unwrap().len(), 1);
        assert_eq!(client.list_volunteers(Some(true)).await.unwrap().len(), 1);
        assert!(client.list_volunteers(Some(false)).await.unwrap().is_empty());

        let organization = client
            .insert_organization(&CreateOrganizationRequest {
                name: "Fundacion Sol".to_string(),
                contact_email: None,
                community_id: Some(norte.id),
            })
            .await
            .unwrap();
        assert_eq!(organization.contact_email, None);
        assert_eq!(client.list_organizations().await.unwrap().len(), 1);

        let communities = client.list_communities().await.unwrap();
        assert_eq!(communities.len(), 1);
        assert_eq!(communities[0].name, "Norte");
    }

    #[tokio::test]
    async fn test_sqlite_form_templates() {
        let client = client().await;

        let template = client
            .insert_form_template(&CreateFormTemplateRequest {
                name: "Encuesta inicial".to_string(),
                section_key: SectionKey::from("organizaciones-formularios"),
                fields: vec![FormField {
                    label: "Nombre".to_string(),
                    kind: FieldKind::Text,
                    required: true,
                }],
            })
            .await
            .unwrap();
        assert!(!template.is_archived());
        assert_eq!(template.fields.0.len(), 1);

        let archived = client
            .set_form_template_archived(&template.uid, true)
            .await
            .unwrap();
        assert!(archived.is_archived());

        // archiving twice keeps the first timestamp
        let again = client
            .set_form_template_archived(&template.uid, true)
            .await
            .unwrap();
        assert_eq!(again.archived_at, archived.archived_at);

        assert!(client.list_form_templates(false).await.unwrap().is_empty());
        assert_eq!(client.list_form_templates(true).await.unwrap().len(), 1);

        let restored = client
            .set_form_template_archived(&template.uid, false)
            .await
            .unwrap();
        assert!(!restored.is_archived());
        assert_eq!(client.list_form_templates(false).await.unwrap().len(), 1);

        assert!(matches!(
            client.set_form_template_archived("missing", true).await,
            Err(SqlError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_sqlite_count_rows() {
        let client = client().await;
        let pimco = SectionDataset::Program("pimco".to_string());

        assert_eq!(client.count_rows(&pimco).await.unwrap(), 0);
        assert_eq!(
            client
                .count_rows(&SectionDataset::ActiveFormTemplates)
                .await
                .unwrap(),
            0
        );

        let norte = community(&client, "Norte").await;
        client
            .insert_beneficiary(&beneficiary(norte.id, "Maria Lopez", "pimco"))
            .await
            .unwrap();

        assert_eq!(client.count_rows(&pimco).await.unwrap(), 1);
        assert_eq!(
            client
                .count_rows(&SectionDataset::Program("abrazando-leyendas".to_string()))
                .await
                .unwrap(),
            0
        );
    }
}
