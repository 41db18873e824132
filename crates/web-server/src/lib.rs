use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use database::{DbRepository, DocumentStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing;

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState<S> {
    pub db_repo: DbRepository<S>,
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(store: S) -> Arc<Self> {
        Arc::new(Self {
            db_repo: DbRepository::new(store),
        })
    }
}

/// Builds the application router over any document store.
pub fn build_router<S: DocumentStore>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/students",
            get(handlers::get_students::<S>).post(handlers::create_student::<S>),
        )
        .route(
            "/courses",
            get(handlers::get_courses::<S>).post(handlers::create_course::<S>),
        )
        .route(
            "/attendance",
            get(handlers::get_attendance::<S>).post(handlers::mark_attendance::<S>),
        )
        .route(
            "/attendance/:course_id/:date_str",
            get(handlers::get_attendance_for_day::<S>),
        )
        .with_state(state)
        .layer(cors)
        // Logs every incoming request and its response status.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Serves the API on `addr` until Ctrl+C or SIGTERM.
pub async fn run_server<S: DocumentStore>(store: S, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
