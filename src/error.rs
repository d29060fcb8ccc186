use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("ICU syntax error at offset {offset}: {message}")]
    Icu { message: String, offset: usize },

    #[error("invalid resource class: {0}")]
    ResourceClass(String),

    #[error("invalid locale: {0}")]
    InvalidLocale(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl Error {
    pub(crate) fn icu(message: impl Into<String>, offset: usize) -> Self {
        Error::Icu {
            message: message.into(),
            offset,
        }
    }
}
