pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod prefs;
pub mod quotes;
pub mod reminder;
pub mod routes;
pub mod screens;
pub mod share;
pub mod store;
pub mod suggest;

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::Config;
use crate::prefs::PrefsStore;
use crate::quotes::QuoteClient;
use crate::reminder::{CommandNotifier, LogNotifier, Notifier, ReminderScheduler};
use crate::screens::QuoteScreen;
use crate::share::{CommandShareGateway, LogShareGateway, ShareGateway};
use crate::store::ReflectionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ReflectionStore,
    pub quote: QuoteScreen,
    pub reminders: Arc<ReminderScheduler>,
    pub share: Arc<dyn ShareGateway>,
}

async fn health() -> &'static str {
    "ok"
}

/// Build the full Axum application router.
///
/// Caller is responsible for running database migrations beforehand and for
/// fetching the first quote; the router only reads the current state.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::quote::router())
        .merge(routes::reflections::router())
        .merge(routes::tags::router())
        .merge(routes::reminder::router())
        .merge(routes::export::router())
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Wire every collaborator from `config`, restore the reminder, fetch the
/// first quote in the background and serve until the process stops.
pub async fn serve(config: Config, pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
    let share: Arc<dyn ShareGateway> = match config
        .share_command
        .as_deref()
        .and_then(CommandShareGateway::from_command_line)
    {
        Some(gateway) => Arc::new(gateway),
        None => Arc::new(LogShareGateway),
    };

    let notifier: Arc<dyn Notifier> = match config
        .notify_command
        .as_deref()
        .and_then(CommandNotifier::from_command_line)
    {
        Some(notifier) => Arc::new(notifier),
        None => Arc::new(LogNotifier),
    };

    let reminders = Arc::new(ReminderScheduler::new(
        notifier,
        PrefsStore::new(&config.prefs_path),
    ));
    if let Err(e) = reminders.restore().await {
        tracing::warn!("could not restore daily reminder: {e}");
    }

    let quote = QuoteScreen::new(QuoteClient::new(
        config.quote_api_url.clone(),
        config.quote_timeout,
    )?);
    tokio::spawn({
        let quote = quote.clone();
        async move {
            quote.refresh().await;
        }
    });

    let state = AppState {
        store: ReflectionStore::new(pool),
        quote,
        reminders,
        share,
    };

    let app = build_app(state);
    let listener = TcpListener::bind(config.bind_addr).await?;

    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
