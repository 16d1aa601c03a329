pub mod engine;
pub mod loader;
pub mod query;

pub use engine::LogEngine;
pub use loader::{LogLoader, Snapshot};
