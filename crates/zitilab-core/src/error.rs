use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZitilabError {
    // Config errors
    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ZitilabError>;
