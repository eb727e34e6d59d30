//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_normalizer`] - URL validation, `http://` enforcement, self-reference checks
//! - [`client_ip`] - Client identity extraction for rate limiting

pub mod client_ip;
pub mod code_generator;
pub mod url_normalizer;
