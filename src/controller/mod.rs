pub mod health;
pub mod relay;

pub use health::{health, not_found};
pub use relay::support_chat;
