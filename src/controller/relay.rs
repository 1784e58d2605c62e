use crate::entities::{RelayRequest, Role};
use crate::service::relay::{GatewayClient, RelayError};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

/// Relays a support conversation to the AI gateway and streams the answer
/// back as `text/event-stream`.
pub async fn support_chat(
    gateway: web::Data<GatewayClient>,
    req: web::Json<RelayRequest>,
) -> Result<HttpResponse, RelayError> {
    let request_id = Uuid::new_v4();
    let start_time = Utc::now();
    let RelayRequest { messages } = req.into_inner();

    log::info!("[{}] Received support chat request with {} messages", request_id, messages.len());

    // the system prompt is injected here, callers may not supply their own
    if messages.iter().any(|m| m.role == Role::System) {
        log::warn!("[{}] Rejected request carrying a system message", request_id);
        return Err(RelayError::InvalidRequest("system messages are not accepted".to_string()));
    }

    let stream = gateway.open_stream(request_id, messages).await.map_err(|e| {
        log::error!("[{}] support-chat error: {}", request_id, e);
        e
    })?;

    let duration = Utc::now() - start_time;
    log::info!("[{}] Upstream stream opened in {}ms", request_id, duration.num_milliseconds());

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream))
}
