//! HTTP host for the press GraphQL schema.

pub mod config;
pub mod handlers;
pub mod observability;
pub mod server;

pub use config::AppConfig;
pub use server::{PressServer, ServerBuilder, build_app};
