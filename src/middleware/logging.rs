use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::Method;
use actix_web::Error;
use futures::future::{ok, Ready};
use log::Level;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// 访问日志中间件
///
/// Echoes the caller's `x-request-id` (or a fresh one) on the response and
/// writes one access line per request: server errors at `error`, client
/// errors at `warn`, preflights at `debug`. For streamed responses the time
/// covers opening the upstream stream, not relaying its body.
///
/// # 示例
/// ```
/// use actix_web::App;
/// use support_relay::middleware::Logging;
///
/// App::new()
///     .wrap(Logging);
/// ```
pub struct Logging;

impl<S, B> Transform<S, ServiceRequest> for Logging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = LoggingMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(LoggingMiddleware { service })
    }
}

pub struct LoggingMiddleware<S> {
    service: S,
}

struct AccessRecord {
    request_id: HeaderValue,
    peer: String,
    method: Method,
    path: String,
    started: Instant,
}

impl AccessRecord {
    fn from_request(req: &ServiceRequest) -> Self {
        let request_id = req
            .headers()
            .get(&REQUEST_ID_HEADER)
            .cloned()
            .or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).ok())
            .unwrap_or_else(|| HeaderValue::from_static("-"));
        Self {
            request_id,
            peer: req.connection_info().realip_remote_addr().unwrap_or("-").to_string(),
            method: req.method().clone(),
            path: req.path().to_string(),
            started: Instant::now(),
        }
    }

    fn level(&self, status: u16) -> Level {
        match status {
            500.. => Level::Error,
            400..=499 => Level::Warn,
            _ if self.method == Method::OPTIONS => Level::Debug,
            _ => Level::Info,
        }
    }

    fn write(&self, status: u16) {
        log::log!(
            self.level(status),
            "[{}] {} {} {} - {} {}ms",
            self.request_id.to_str().unwrap_or("-"),
            self.peer,
            self.method,
            self.path,
            status,
            self.started.elapsed().as_millis()
        );
    }
}

impl<S, B> Service<ServiceRequest> for LoggingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(
        &self,
        ctx: &mut core::task::Context<'_>,
    ) -> core::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let record = AccessRecord::from_request(&req);
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(mut res) => {
                    record.write(res.status().as_u16());
                    res.headers_mut().insert(REQUEST_ID_HEADER, record.request_id.clone());
                    Ok(res)
                }
                Err(err) => {
                    record.write(err.as_response_error().status_code().as_u16());
                    Err(err)
                }
            }
        })
    }
}
