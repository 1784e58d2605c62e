use actix_web::body::{BoxBody, EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap, HeaderValue, InvalidHeaderValue};
use actix_web::http::Method;
use actix_web::{Error, HttpResponse};
use futures::future::{ok, Ready};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::error_handler::render_error;
use crate::utils::config::CorsConfig;

#[derive(Debug, Clone)]
struct CorsHeaders {
    allow_origin: HeaderValue,
    allow_headers: HeaderValue,
    allow_methods: HeaderValue,
}

impl CorsHeaders {
    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
    }
}

/// 跨域中间件
///
/// Answers `OPTIONS` preflight requests itself, before routing or any
/// handler runs, and stamps the CORS headers on every other response,
/// errors included. Register it last so it wraps everything else.
///
/// # 示例
/// ```
/// use actix_web::App;
/// use support_relay::middleware::Cors;
///
/// App::new()
///     .wrap(Cors::permissive());
/// ```
#[derive(Debug, Clone)]
pub struct Cors {
    headers: Arc<CorsHeaders>,
}

impl Cors {
    pub fn new(config: &CorsConfig) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            headers: Arc::new(CorsHeaders {
                allow_origin: HeaderValue::from_str(&config.allow_origin)?,
                allow_headers: HeaderValue::from_str(&config.allow_headers.join(", "))?,
                allow_methods: HeaderValue::from_str(&config.allow_methods.join(", "))?,
            }),
        })
    }

    /// Any origin, with the default header allow-list.
    pub fn permissive() -> Self {
        let config = CorsConfig::default();
        Self {
            headers: Arc::new(CorsHeaders {
                allow_origin: HeaderValue::from_static("*"),
                allow_headers: HeaderValue::from_str(&config.allow_headers.join(", "))
                    .unwrap_or_else(|_| HeaderValue::from_static("content-type")),
                allow_methods: HeaderValue::from_static("GET, POST, OPTIONS"),
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Transform = CorsMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CorsMiddleware { service, headers: self.headers.clone() })
    }
}

pub struct CorsMiddleware<S> {
    service: S,
    headers: Arc<CorsHeaders>,
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(
        &self,
        ctx: &mut core::task::Context<'_>,
    ) -> core::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let headers = self.headers.clone();

        if *req.method() == Method::OPTIONS {
            log::debug!("CORS preflight: {}", req.path());
            let mut res = HttpResponse::Ok().finish();
            headers.apply(res.headers_mut());
            let res = req.into_response(res).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        let http_req = req.request().clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(mut res) => {
                    headers.apply(res.headers_mut());
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    let mut res = render_error(&err);
                    headers.apply(res.headers_mut());
                    Ok(ServiceResponse::new(http_req, res).map_into_right_body())
                }
            }
        })
    }
}
