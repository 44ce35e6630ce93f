// Route exports
pub mod auth;
pub mod matches;
pub mod offers;
pub mod registry;

use actix_web::{error, web, HttpRequest};
use chrono::Duration;
use std::sync::Arc;

use crate::config::Settings;
use crate::core::{Clock, Matcher, OfferTracker};
use crate::error::{AllocationError, Result};
use crate::services::{seed::demo_accounts, AllocationStore, AuthService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AllocationStore>,
    pub tracker: Arc<OfferTracker>,
    pub matcher: Matcher,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Wire the services from settings over an existing store and clock
    pub fn from_settings(
        settings: &Settings,
        store: Arc<dyn AllocationStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if settings.offers.expiry_minutes <= 0 {
            return Err(AllocationError::InvalidInput(format!(
                "offers.expiry_minutes must be positive, got {}",
                settings.offers.expiry_minutes
            )));
        }

        let matcher = Matcher::new(settings.scoring_weights())?;
        let tracker = OfferTracker::new(
            store.clone(),
            clock,
            matcher.clone(),
            Duration::minutes(settings.offers.expiry_minutes),
        );
        let auth = AuthService::new(
            &settings.auth.jwt_secret,
            Duration::minutes(settings.auth.token_ttl_minutes),
            demo_accounts(),
        );

        Ok(Self {
            store,
            tracker: Arc::new(tracker),
            matcher,
            auth: Arc::new(auth),
        })
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(registry::configure)
            .configure(auth::configure)
            .configure(matches::configure)
            .configure(offers::configure),
    );
}

/// JSON extractor config rendering payload errors as JSON bodies
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(handle_json_payload_error)
}

/// Query extractor config rendering query errors as JSON bodies
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(handle_query_payload_error)
}

fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    AllocationError::InvalidInput(format!("Invalid JSON: {}", err)).into()
}

fn handle_query_payload_error(
    err: error::QueryPayloadError,
    req: &HttpRequest,
) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    AllocationError::InvalidInput(format!("Invalid query: {}", err)).into()
}
