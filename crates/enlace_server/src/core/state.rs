use crate::core::error::ServerError;
use crate::core::session::SessionRegistry;
use enlace_auth::auth::AuthManager;
use enlace_auth::permission::{PermissionSet, RoleTable};
use enlace_auth::schema::SessionContext;
use enlace_nav::menu::Menu;
use enlace_settings::config::EnlaceConfig;
use enlace_sql::enums::client::SqlClientEnum;
use enlace_types::{SectionAccess, ADMIN_USUARIOS};
use std::sync::Arc;

pub struct AppState {
    pub sql_client: Arc<SqlClientEnum>,
    pub auth_manager: Arc<AuthManager>,
    pub config: Arc<EnlaceConfig>,
    pub menu: Arc<Menu>,
    pub role_table: Arc<RoleTable>,
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Permission set of the caller, `None` while the session is loading
    pub async fn permissions(&self, session: &SessionContext) -> Option<PermissionSet> {
        self.sessions
            .permissions(session, self.sql_client.as_ref(), &self.role_table)
            .await
    }

    /// Refuse the request unless the caller may view `section`
    pub async fn require_section(
        &self,
        session: &SessionContext,
        section: &str,
    ) -> Result<PermissionSet, ServerError> {
        let permissions = self
            .permissions(session)
            .await
            .ok_or(ServerError::Loading)?;

        if !permissions.can_view_section(section) {
            return Err(ServerError::Forbidden(section.to_string()));
        }

        Ok(permissions)
    }

    pub async fn require_admin(
        &self,
        session: &SessionContext,
    ) -> Result<PermissionSet, ServerError> {
        let permissions = self
            .permissions(session)
            .await
            .ok_or(ServerError::Loading)?;

        if !permissions.is_admin() {
            return Err(ServerError::Forbidden(ADMIN_USUARIOS.to_string()));
        }

        Ok(permissions)
    }
}
