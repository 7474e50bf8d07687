//! HTTP surface.
//!
//! Every partner page lives under `/{locale}/plataforma-parceiro/` and needs a
//! session; `/health` does not.

/// Session guard
pub mod auth;
/// Error responses
pub mod error;
/// Request extractors
pub mod extract;
/// Route handlers
pub mod handlers;

use crate::{
    config::portal::PortalConfig,
    core::{
        clock::{Clock, SystemClock},
        notify::{Notifier, OutboxNotifier},
    },
};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Loaded configuration
    pub config: Arc<PortalConfig>,
    /// Where bonus notifications go
    pub notifier: Arc<dyn Notifier>,
    /// Time source for the request
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Production state: outbox notifications and the system clock.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: PortalConfig) -> Self {
        Self {
            notifier: Arc::new(OutboxNotifier::new(db.clone())),
            db,
            config: Arc::new(config),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current time according to the configured clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let partner_routes = Router::new()
        .route("/{locale}/plataforma-parceiro/dashboard", get(handlers::dashboard))
        .route("/{locale}/plataforma-parceiro/comissoes", get(handlers::commissions))
        .route("/{locale}/plataforma-parceiro/leads", get(handlers::leads))
        .route(
            "/{locale}/plataforma-parceiro/leads/{id}/contato",
            post(handlers::mark_contacted),
        )
        .route(
            "/{locale}/plataforma-parceiro/perfil",
            get(handlers::profile).put(handlers::edit_profile),
        )
        .route(
            "/{locale}/plataforma-parceiro/desafio/resgatar",
            post(handlers::redeem),
        )
        .route("/{locale}/plataforma-parceiro/sair", post(handlers::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(partner_routes)
        .with_state(state)
}
