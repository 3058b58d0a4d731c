//! Service-facing primitives

pub mod http;

pub use http::*;
