use crate::core::FrameIndex;

pub type BellezaResult<T> = Result<T, BellezaError>;

#[derive(thiserror::Error, Debug)]
pub enum BellezaError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("composite error: {0}")]
    Composite(String),

    #[error("failed to write frame {frame}: {message}")]
    FrameWrite { frame: FrameIndex, message: String },

    #[error("encoder not found: {0}")]
    EncoderMissing(String),

    #[error("encoder failed: {0}")]
    EncoderFailure(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BellezaError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }

    pub fn frame_write(frame: FrameIndex, msg: impl Into<String>) -> Self {
        Self::FrameWrite {
            frame,
            message: msg.into(),
        }
    }

    pub fn encoder_missing(msg: impl Into<String>) -> Self {
        Self::EncoderMissing(msg.into())
    }

    pub fn encoder_failure(msg: impl Into<String>) -> Self {
        Self::EncoderFailure(msg.into())
    }
}
