use thiserror::Error;

#[derive(Error, Debug)]
pub enum CreditError {
    #[error("Image decoding error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Hash computation failed: {0}")]
    HashFailed(String),

    #[error("Target image unreadable: {0}")]
    TargetUnreadable(String),

    #[error("Detection pipeline failure: {0}")]
    PipelineFailed(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, CreditError>;
