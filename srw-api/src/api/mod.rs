//! HTTP API handlers for srw-api

pub mod buildinfo;
pub mod health;
pub mod welcome;
pub mod wrapped;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use welcome::welcome_routes;
pub use wrapped::{wrapped_routes, TokenRequest};
