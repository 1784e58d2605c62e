use actix_web::{error, web};

use crate::controller::{health, support_chat};
use crate::service::relay::RelayError;

/// Rejects malformed relay bodies with a structured 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(1024 * 1024).error_handler(|err, _req| {
        log::warn!("Invalid relay request body: {}", err);
        error::Error::from(RelayError::InvalidRequest(err.to_string()))
    })
}

/// Mounts the relay on `relay_path` plus the health probe.
pub fn configure(cfg: &mut web::ServiceConfig, relay_path: &str) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .route(relay_path, web::post().to(support_chat));
}
