use anyhow::Context;

use userdesk::backend::BackendClient;
use userdesk::config::Settings;
use userdesk::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let settings = Settings::load()?;
    let backend = BackendClient::new(&settings)?;

    let addr: std::net::SocketAddr = settings
        .bind_address
        .parse()
        .context("Invalid bind address")?;

    let app = create_app(AppState { settings, backend });

    tracing::info!("listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .context("Failed to bind listen address")?,
        app,
    )
    .await
    .context("Server error")?;

    Ok(())
}
