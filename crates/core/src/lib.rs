//! Domain logic for the image-transfer gateway.
//!
//! Everything here is HTTP-agnostic: credential merging and job
//! configuration, the append-only log store, the truncation signal and the
//! tail streamer, plus the boundary to the external transfer component.

pub mod credentials;
pub mod error;
pub mod job;
pub mod log_store;
pub mod tail;
pub mod transfer;
pub mod truncation;
pub mod types;
