pub mod client;
pub mod reducer;
pub mod relay;
pub mod store;
