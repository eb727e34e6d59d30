//! HTTP middleware for request processing.
//!
//! Provides request deadlines and observability middleware.

pub mod deadline;
pub mod tracing;
