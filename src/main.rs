use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use equiptrack_api::{
    app_router,
    auth::USER_ID_HEADER,
    config, db,
    outbox::OutboxWorker,
    sales_store::{InMemorySalesStore, MongoSalesStore, SalesStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);
    info!(environment = %cfg.environment, "starting equiptrack api");

    let db = Arc::new(
        db::establish_connection_from_app_config(&cfg)
            .await
            .context("failed to connect to the database")?,
    );

    let store: Arc<dyn SalesStore> = match cfg.mongo_url.as_deref() {
        Some(url) => Arc::new(
            MongoSalesStore::connect(url, &cfg.mongo_database)
                .await
                .context("failed to connect to the document store")?,
        ),
        None => {
            warn!("no document store configured; sales documents go to an in-memory store");
            Arc::new(InMemorySalesStore::new())
        }
    };

    OutboxWorker::new(
        db.clone(),
        store,
        Duration::from_millis(cfg.outbox_poll_interval_ms),
        cfg.outbox_max_attempts,
    )
    .spawn();

    let cors = build_cors(cfg.cors_allowed_origins.as_deref());
    let addr = format!("{}:{}", cfg.host, cfg.port);
    let state = Arc::new(AppState::new(db, cfg));

    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

fn build_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];
    let headers = [
        header::CONTENT_TYPE,
        HeaderName::from_static(USER_ID_HEADER),
    ];

    match allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .filter_map(|o| match o.parse::<HeaderValue>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!(origin = %o, "ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(methods)
                .allow_headers(headers)
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
