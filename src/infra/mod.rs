//! Infrastructure adapters.

pub mod db;
pub mod http;
pub mod memory;
pub mod telemetry;

pub use db::PostgresChangeQueue;
pub use http::{ApiState, build_router};
pub use memory::{InMemoryChangeQueue, RecordingInvalidator};
