pub mod api;
pub mod config;
pub mod error;
pub mod market;
pub mod migrate;
pub mod smoke;
pub mod store;
pub mod types;
