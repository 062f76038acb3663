use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not initialize logging: {0}")]
    Logging(String),
    #[error("no writable location for the log file")]
    NoLogDir,
    #[error(transparent)]
    Io(#[from] io::Error),
}
