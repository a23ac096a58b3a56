use std::{process, sync::Arc};

use notes_api::{
    config, create_router,
    repository::{MemoryNoteStore, NoteStore, PgNoteStore},
    service::NoteService,
};

#[tokio::main]
async fn main() {
    // Log setup
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("notes_api=debug,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        process::exit(1);
    });

    // Store creation and migration
    let store: Arc<dyn NoteStore> = match &cfg.database_dsn {
        Some(dsn) => {
            let mut store = PgNoteStore::new(dsn).await.unwrap_or_else(|e| {
                tracing::error!("Failed to establish database connection: {e}");
                process::exit(1);
            });
            store.migrate().await.unwrap_or_else(|e| {
                tracing::error!("Failed to migrate database: {e}");
                process::exit(1);
            });
            Arc::new(store)
        }
        None => {
            tracing::warn!("No database DSN configured, notes will be kept in memory");
            Arc::new(MemoryNoteStore::new())
        }
    };

    // Service creation
    let service = NoteService::new(store);
    let router = create_router(service);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to port {}: {e}", cfg.port);
            process::exit(1);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Started listening on {}", addr),
        Err(e) => tracing::warn!("Listening on unknown address: {e}"),
    }

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("HTTP server error: {e}");
        process::exit(1);
    }
}
