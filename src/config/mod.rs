/// Database configuration and connection management
pub mod database;

/// School, subject, exam type, class and report configuration from config.toml
pub mod seed;
