mod core;

use crate::core::router::create_router;
use crate::core::setup::{setup_components, setup_state};
use anyhow::Context;
use enlace_utils::color::LogColors;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = setup_components().await?;
    let bind_address = config.bind_address();

    let app_state = Arc::new(setup_state(config).await?);
    let app = create_router(app_state).await;

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| LogColors::alert(&format!("Failed to bind {}", bind_address)))?;

    info!("Enlace server listening on {}", bind_address);

    axum::serve(listener, app)
        .await
        .context(LogColors::alert("Server stopped unexpectedly"))?;

    Ok(())
}
