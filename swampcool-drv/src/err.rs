pub type SwampResult = anyhow::Result<()>;

#[derive(thiserror::Error, Debug)]
pub enum SwampError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timestamp error in '{0}': {1}")]
    Timestamp(String, chrono::ParseError),

    #[error("Forecast document error: {0}")]
    Document(String),

    #[error("Forecast is {0} hours old")]
    Stale(i64),

    #[error(transparent)]
    Core(#[from] swampcool_lib::Error),
}

impl SwampError {
    /// Garbled forecast data: worse than none, the run stops.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Core(_))
    }
}

impl From<swampcool_lib::SeriesError> for SwampError {
    fn from(e: swampcool_lib::SeriesError) -> Self {
        Self::Core(e.into())
    }
}
