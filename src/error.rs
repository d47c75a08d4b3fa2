use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HitError>;

#[derive(Error, Debug)]
pub enum HitError {
    #[error("Data folder '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No *.pretty files found in '{}'", .0.display())]
    NoPrettyFiles(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table error: {0}")]
    Table(#[from] csv::Error),

    #[error("Missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Malformed hit matrix: {0}")]
    MalformedMatrix(String),
}
