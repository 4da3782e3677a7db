// Core modules
pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::ReleaseConfig;
pub use error::{Result, ZitilabError};
