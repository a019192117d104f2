use thiserror::Error;

/// Errors arising from the extraction pipeline and its collaborators.
///
/// Extraction entry points never surface these to the caller; they are
/// logged and degraded to a `None` result. An extraction that completes but
/// recognizes no fields is not an error at all.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no usable frame ({width}x{height})")]
    AcquisitionUnavailable { width: u32, height: u32 },

    #[error("ocr engine failure: {0}")]
    Engine(String),

    #[error("storage failure: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
