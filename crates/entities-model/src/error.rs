use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown source kind: {0}")]
    UnknownSourceKind(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
