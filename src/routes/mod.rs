pub mod route;

pub use route::{configure, json_config};
