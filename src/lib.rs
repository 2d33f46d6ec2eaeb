// ABOUTME: Library root for eikona - container image resolution.
// ABOUTME: The CLI binary is in main.rs.

pub mod client;
pub mod config;
pub mod error;
pub mod resolver;
pub mod types;
