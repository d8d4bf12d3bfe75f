//! Background execution of image-transfer jobs.

pub mod dispatcher;

pub use dispatcher::{Accepted, JobDispatcher};
