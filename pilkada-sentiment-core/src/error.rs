use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A dictionary or model artifact the pipeline needs is not available.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No corpus rows (or no n-grams) left after filtering.
    #[error("no data for this selection")]
    EmptyResult,

    #[error("model artifact error: {0}")]
    Model(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn missing(what: impl Into<String>) -> Self {
        Error::MissingConfiguration(what.into())
    }

    pub fn model(message: impl Into<String>) -> Self {
        Error::Model(message.into())
    }
}
