//! Support Chat Relay
//!
//! This crate relays customer-support conversations to a hosted
//! chat-completion gateway and streams the answer back as server-sent events.
//! It also ships the client side: an incremental SSE reducer and a chat
//! session that turns the stream into a growing assistant message.
//!
//! # Modules
//! - `controller`: HTTP handlers for the relay endpoint
//! - `entities`: Messages, conversations and stream chunk types
//! - `error`: Bootstrap error types
//! - `middleware`: CORS, request logging and error rendering
//! - `routes`: Route registration
//! - `service`: Gateway client, stream reducer, chat client and stores
//! - `utils`: Configuration loading and initialization
//!
//! # Examples
//! ```no_run
//! use actix_web::{web, App, HttpServer};
//! use support_relay::middleware::Cors;
//! use support_relay::service::relay::GatewayClient;
//! use support_relay::utils::config::AppConfig;
//!
//! #[actix_web::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default();
//!     let gateway = web::Data::new(GatewayClient::from_config(&config.relay)?);
//!     let relay_path = config.relay.path.clone();
//!     HttpServer::new(move || {
//!         App::new()
//!             .app_data(gateway.clone())
//!             .wrap(Cors::permissive())
//!             .configure(|cfg| support_relay::routes::configure(cfg, &relay_path))
//!     })
//!     .bind("127.0.0.1:8080")?
//!     .run()
//!     .await?;
//!     Ok(())
//! }
//! ```

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod controller;
pub mod entities;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod utils;

pub use entities::*;
pub use error::AppError;
pub use utils::*;
