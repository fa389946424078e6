use thiserror::Error;

/// Every failure in the engine is local to one operation and recoverable;
/// nothing here should ever abort a session.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid style: {0}")]
    InvalidStyle(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("font: {0}")]
    Font(String),
    #[error("encode: {0}")]
    Encode(String),
    #[error("no surface: nothing has been rendered yet")]
    NoSurface,
}
