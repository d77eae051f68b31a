use crate::config::LoadConfigError;
use crate::model::{ConfigError, ExportError, ParserError, SourceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Load failure: {0}")]
    Source(#[from] SourceError),

    #[error("Parse failure: {0}")]
    Parser(#[from] ParserError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export failure: {0}")]
    Export(#[from] ExportError),

    #[error("{0}")]
    LoadConfig(#[from] LoadConfigError),
}

pub type Result<T> = std::result::Result<T, AppError>;
