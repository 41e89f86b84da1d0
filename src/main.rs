use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use legalis::api::{api_router, ApiContext};
use legalis::intelligence::{GeminiClient, ReviewGenerator};
use legalis::news::NewsService;
use legalis::storage::ObjectStore;
use legalis::{config, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    std::fs::create_dir_all(config::objects_dir())?;
    let conn = db::open_database(&config::db_path())?;
    bootstrap_session(&conn)?;
    let database = db::shared(conn);

    let store = Arc::new(ObjectStore::new(config::objects_dir()));
    let generator: Arc<dyn ReviewGenerator> = Arc::new(GeminiClient::from_env());
    let news = Arc::new(NewsService::from_env());
    let ctx = ApiContext::new(database, store, generator, news);

    let addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, version = config::APP_VERSION, "{} listening", config::APP_NAME);
    axum::serve(listener, api_router(ctx)).await?;

    Ok(())
}

/// Identity provisioning lives outside this service; until a provider is
/// wired in, a first run creates one user and logs its bearer token once.
fn bootstrap_session(
    conn: &rusqlite::Connection,
) -> Result<(), Box<dyn std::error::Error>> {
    let sessions: i64 = conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
    if sessions == 0 {
        let user_id = uuid::Uuid::new_v4();
        let token = legalis::db::repository::session::create_session(conn, &user_id)?;
        tracing::warn!(%user_id, token = %token, "No sessions found; created a bootstrap session");
    }
    Ok(())
}
