//! Server-rendered front-end for a public character/episode/location catalog API.
//!
//! Every route is a GET that forwards to the catalog API: `/api/...` routes
//! return the upstream JSON untouched, the other routes render it into HTML.

mod api;
pub mod client;
pub mod config;
pub mod errors;
mod extract;
pub mod metrics_defs;
mod pages;
pub mod residents;
pub mod resources;
pub mod server;
mod templates;

#[cfg(test)]
mod testutils;

pub use errors::CatalogError;
pub use server::{AppState, Server, build_router};

/// Builds the server from `config` and serves until shutdown.
pub async fn run(config: config::Config) -> Result<(), CatalogError> {
    Server::new(config)?.serve().await
}
