mod configuration;
mod error;
mod routes;
mod state;

use anyhow::Result;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use toolchat::conversation::ConversationStore;
use toolchat::orchestrator::Orchestrator;
use toolchat::providers::factory;
use toolchat::tools::ToolRegistry;

use configuration::Settings;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new()?;
    let addr = settings.server.socket_addr()?;

    let provider = factory::get_provider(settings.provider.into_config())?;
    let orchestrator = Orchestrator::new(
        provider,
        ToolRegistry::with_builtins(),
        ConversationStore::new(),
    );
    let state = AppState::new(orchestrator);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::configure(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
