//! Optional per-user settings (`config.toml` in the fernlock home).

pub mod settings;

pub use settings::Settings;
