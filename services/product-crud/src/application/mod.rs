//! 应用层

pub mod handler;

pub use handler::{CrudHandler, OperationStatus, RunSummary};
