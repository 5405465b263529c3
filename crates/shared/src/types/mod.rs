//! Common types used across the application.

pub mod deadline;
pub mod id;
pub mod pagination;

pub use deadline::Deadline;
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
