//! Time/distance matrix integration module
//!
//! Provides a client for the external one-to-many matrix service.

pub mod client;
pub mod models;

pub use client::MatrixClient;
pub use models::*;
