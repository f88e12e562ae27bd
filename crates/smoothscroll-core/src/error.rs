use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid step divisor: {0} (must be a finite value >= 1)")]
    InvalidDivisor(f64),

    #[error("Invalid scroll distance: {0} (must be finite)")]
    InvalidDistance(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
