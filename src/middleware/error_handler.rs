use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error as ActixError, HttpResponse,
};
use serde::{Deserialize, Serialize};
use std::{future::Future, pin::Pin};

use crate::service::relay::RelayError;

/// JSON body of every error the service returns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: u16,
    pub status: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { code: status.as_u16(), status: status_text(status), error: error.into() }
    }

    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.code).unwrap_or_else(|_| {
            log::error!("{}", t!("logs.invalid_status_code", code = self.code));
            StatusCode::INTERNAL_SERVER_ERROR
        });
        HttpResponse::build(status).json(self)
    }
}

fn status_text(status: StatusCode) -> String {
    match status {
        StatusCode::BAD_REQUEST => t!("errors.http.bad_request").to_string(),
        StatusCode::PAYMENT_REQUIRED => t!("errors.http.payment_required").to_string(),
        StatusCode::NOT_FOUND => t!("errors.http.not_found").to_string(),
        StatusCode::METHOD_NOT_ALLOWED => t!("errors.http.method_not_allowed").to_string(),
        StatusCode::TOO_MANY_REQUESTS => t!("errors.http.too_many_requests").to_string(),
        StatusCode::GATEWAY_TIMEOUT => t!("errors.http.gateway_timeout").to_string(),
        s if s.is_server_error() => t!("errors.http.internal_server_error").to_string(),
        s => s.canonical_reason().unwrap_or("Unknown").to_string(),
    }
}

/// Renders an error that escaped the handlers as an [`ErrorResponse`].
///
/// Server errors are reported with a generic message; the detail only goes
/// to the log.
pub fn render_error(err: &ActixError) -> HttpResponse {
    if let Some(relay_error) = err.as_error::<RelayError>() {
        return actix_web::ResponseError::error_response(relay_error);
    }
    let status = err.as_response_error().status_code();
    let message = if status.is_server_error() {
        t!("errors.http.internal_server_error").to_string()
    } else {
        err.to_string()
    };
    ErrorResponse::new(status, message).into_response()
}

pub struct ErrorHandlerMiddleware;

impl<S, B> Transform<S, ServiceRequest> for ErrorHandlerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = ActixError;
    type Transform = ErrorHandlerService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>>>>;

    fn new_transform(&self, service: S) -> Self::Future {
        Box::pin(async move { Ok(ErrorHandlerService { service }) })
    }
}

pub struct ErrorHandlerService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ErrorHandlerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = ActixError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(
        &self,
        ctx: &mut core::task::Context<'_>,
    ) -> core::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let http_req = req.request().clone();

        log::debug!("Handling request: method={}, uri={}", http_req.method(), http_req.uri());

        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    if let Some(err) = res.response().error() {
                        log::error!(
                            "Request failed: {} {} - {}",
                            http_req.method(),
                            http_req.uri(),
                            err
                        );
                    }
                    Ok(res.map_into_boxed_body())
                }
                Err(err) => {
                    log::error!("Request failed: {} {}", http_req.method(), http_req.uri());
                    log::debug!("Error details: {:?}", err);
                    Ok(ServiceResponse::new(http_req, render_error(&err)))
                }
            }
        })
    }
}

pub fn error_handler() -> ErrorHandlerMiddleware {
    ErrorHandlerMiddleware
}
