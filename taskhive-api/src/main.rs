//! # Taskhive API Server
//!
//! The Taskhive HTTP server: account registration with email confirmation,
//! JWT sessions, projects with manager/team authorization, task status
//! tracking, and notes.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p taskhive-api
//! ```
//!
//! With no `DATABASE_URL` the server runs on the in-memory store; with no
//! `SMTP_HOST` outbound mail is logged instead of delivered.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskhive_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskhive_shared::mail::{LogMailer, Mailer, SmtpMailer};
use taskhive_shared::store::{postgres::DatabaseConfig, MemStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhive_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskhive API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            tracing::info!("Using PostgreSQL store");
            Arc::new(
                PgStore::connect(DatabaseConfig {
                    url: url.clone(),
                    ..DatabaseConfig::default()
                })
                .await?,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store (data is not persisted)");
            Arc::new(MemStore::new())
        }
    };

    let mailer: Arc<dyn Mailer> = match config.smtp.clone() {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, "Using SMTP mailer");
            Arc::new(SmtpMailer::new(smtp)?)
        }
        None => {
            tracing::warn!("SMTP_HOST not set; outbound mail will be logged, not delivered");
            Arc::new(LogMailer::new())
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(store, mailer, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
