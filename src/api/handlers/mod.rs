//! API request handlers.

/// Health check handler.
pub mod health;
/// Streaming location search handler.
pub mod locations;
/// Source catalog listing handler.
pub mod sources;
