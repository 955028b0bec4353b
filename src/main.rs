use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_api::api::router;
use todo_api::auth::AuthService;
use todo_api::config::{AppConfig, TodoOwnership};
use todo_api::db::SqliteStore;
use todo_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "todo_api=debug,tower_http=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = match SqliteStore::connect(&config.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("Error while connecting: {}", e);
            std::process::exit(1);
        }
    };
    info!("database connected");

    if config.ownership == TodoOwnership::Shared {
        warn!("todos are shared: any authenticated user can read, update and delete any todo");
    }

    let auth = AuthService::new(config.auth.clone())?;
    let state = AppState::new(Arc::new(store), auth, config.ownership);

    let app = router(state);

    let addr = config.listen_addr();
    info!("listening on http://{} (todo ownership: {})", addr, config.ownership);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
