//! WebSocket log tail.
//!
//! Provides the `/ws/logs` upgrade handler and the [`WsTailSink`] adapter
//! that turns forwarded log chunks into text frames.

mod handler;
pub mod sink;

pub use handler::logs_ws_handler;
pub use sink::WsTailSink;
