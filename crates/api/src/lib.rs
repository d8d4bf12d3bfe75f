//! Image-transfer gateway server library.
//!
//! Exposes the building blocks (config, logging, state, error handling,
//! dispatcher, routes, WebSocket tail) so integration tests and the binary
//! entrypoint share the same code.

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
