use crate::core::session::SessionRegistry;
use crate::core::state::AppState;
use anyhow::{Context, Result as AnyhowResult};
use enlace_auth::auth::{hash_password, AuthManager};
use enlace_auth::permission::PermissionSource;
use enlace_logging::logging::setup_logging;
use enlace_nav::menu::Menu;
use enlace_settings::config::EnlaceConfig;
use enlace_sql::base::SqlClient;
use enlace_sql::enums::client::SqlClientEnum;
use enlace_types::ADMIN_ROLE;
use enlace_utils::color::LogColors;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn setup_components() -> AnyhowResult<EnlaceConfig> {
    // setup config
    let config =
        EnlaceConfig::from_env().context(LogColors::brand("Invalid enlace configuration"))?;

    // start logging
    setup_logging(&config.log_level)
        .await
        .context(LogColors::brand("Failed to setup logging"))?;

    info!("Starting Enlace Server ....");

    Ok(config)
}

/// Connect to the store and load everything that stays fixed for the life of the process
pub async fn setup_state(config: EnlaceConfig) -> AnyhowResult<AppState> {
    let db_settings = config
        .database_settings()
        .context(LogColors::brand("Invalid database settings"))?;

    // connecting also runs migrations
    let sql_client = SqlClientEnum::new(&db_settings)
        .await
        .context(LogColors::brand("Failed to setup sql client"))?;

    info!("Sql client: {}", sql_client.name());

    let menu = Menu::load(config.menu_path.as_deref())
        .context(LogColors::brand("Failed to load navigation menu"))?;

    let role_table = sql_client
        .role_table()
        .await
        .context(LogColors::brand("Failed to load role table"))?;

    for key in role_table.unknown_sections(&menu.section_keys()) {
        warn!("Role grants reference section {} which is not in the menu", key);
    }

    info!(
        "Loaded {} roles, requires data policy: {}",
        role_table.role_names().len(),
        config.requires_data_policy
    );

    bootstrap_admin(&config, &sql_client).await?;

    let auth_manager = AuthManager::new(&config.auth_settings());

    Ok(AppState {
        sql_client: Arc::new(sql_client),
        auth_manager: Arc::new(auth_manager),
        config: Arc::new(config),
        menu: Arc::new(menu),
        role_table: Arc::new(role_table),
        sessions: SessionRegistry::new(),
    })
}

async fn bootstrap_admin(config: &EnlaceConfig, sql_client: &SqlClientEnum) -> AnyhowResult<()> {
    let Some((username, password)) = config.bootstrap_admin() else {
        return Ok(());
    };

    if sql_client
        .get_user(username)
        .await
        .context(LogColors::brand("Failed to look up bootstrap admin"))?
        .is_some()
    {
        info!("Admin user {} already exists", username);
        return Ok(());
    }

    let password_hash =
        hash_password(password).context(LogColors::brand("Failed to hash admin password"))?;

    sql_client
        .insert_user(username, &password_hash, ADMIN_ROLE)
        .await
        .context(LogColors::brand("Failed to create bootstrap admin"))?;

    info!("Created admin user {}", LogColors::green(username));

    Ok(())
}
