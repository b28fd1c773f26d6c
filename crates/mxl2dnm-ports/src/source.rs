#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("archive error: {0}")]
    Archive(String),
}
