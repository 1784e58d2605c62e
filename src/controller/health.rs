use crate::middleware::ErrorResponse;
use crate::service::relay::GatewayClient;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde_json::json;

pub async fn health(gateway: web::Data<GatewayClient>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "gateway_configured": gateway.is_configured()
    }))
}

pub async fn not_found() -> HttpResponse {
    ErrorResponse::new(StatusCode::NOT_FOUND, t!("errors.http.not_found")).into_response()
}
