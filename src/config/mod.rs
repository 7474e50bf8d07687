/// Database configuration and connection management
pub mod database;

/// Portal settings loaded from config.toml
pub mod portal;
