pub mod cors;
pub mod error_handler;
pub mod logging;

pub use cors::Cors;
pub use cors::CorsMiddleware;
pub use error_handler::error_handler;
pub use error_handler::ErrorHandlerMiddleware;
pub use error_handler::ErrorResponse;
pub use logging::{Logging, REQUEST_ID_HEADER};
pub use logging::LoggingMiddleware;
