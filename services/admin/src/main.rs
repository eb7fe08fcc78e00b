use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tower::ServiceBuilder;
use tracing::info;

use backoffice_admin::config::AdminConfig;
use backoffice_admin::middleware::{TokenSecret, authenticate};
use backoffice_admin::router::build_router;
use backoffice_admin::state::AppState;
use backoffice_admin_migration::Migrator;
use backoffice_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};
use backoffice_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing("backoffice_admin=info,tower_http=info");

    let config = AdminConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("failed to apply migrations");
        info!("migrations applied");
    }

    let state = AppState { db };
    let secret = TokenSecret(Arc::from(config.jwt_secret));

    let router = build_router(state)
        .layer(from_fn_with_state(secret, authenticate))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(propagate_request_id_layer())
                .layer(trace_layer()),
        );

    let addr = format!("0.0.0.0:{}", config.admin_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("admin service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
