//! Release acquisition configuration
//!
//! The resolver never reads the process environment itself. Callers build a
//! [`ReleaseConfig`] (usually via [`ReleaseConfig::from_env`]) and pass it in.

pub mod consts;
pub mod model;

pub use model::ReleaseConfig;
