/// TOML configuration and the hot-reloading manager.
pub mod config;
/// Phone number display formatting.
pub mod phone;
