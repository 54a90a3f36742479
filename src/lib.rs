//! Streamcat - Streaming catalog addon server
//!
//! This library crate exposes the core functionality for integration testing.

pub mod catalog;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod server;
