/// Convenience result type used across photocard.
pub type PhotocardResult<T> = Result<T, PhotocardError>;

/// Top-level error taxonomy used by the composer APIs.
#[derive(thiserror::Error, Debug)]
pub enum PhotocardError {
    /// The capture device could not be opened (permission denied, no camera, ...).
    #[error("device access denied: {0}")]
    DeviceAccessDenied(String),

    /// An upload was not an image. Callers on the upload path treat this as a no-op.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// An upload arrived while every slot was already filled.
    #[error("all photo slots are filled")]
    SlotsFull,

    /// One of the slot payloads failed to decode; the whole set is discarded.
    #[error("decode error in slot {slot}: {reason}")]
    Decode {
        /// Zero-based slot index of the first failing image.
        slot: usize,
        /// Decoder message.
        reason: String,
    },

    /// A drawing surface could not be created or resized for a render pass.
    #[error("surface acquisition failed: {0}")]
    SurfaceAcquisition(String),

    /// A template id that is not in the registry.
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    /// Invalid caller-provided data (indices, data URIs, configuration).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PhotocardError {
    /// Build a [`PhotocardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PhotocardError::DeviceAccessDenied`] value.
    pub fn device_access_denied(msg: impl Into<String>) -> Self {
        Self::DeviceAccessDenied(msg.into())
    }

    /// Build a [`PhotocardError::UnsupportedFileType`] value.
    pub fn unsupported_file_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedFileType(msg.into())
    }

    /// Build a [`PhotocardError::SurfaceAcquisition`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::SurfaceAcquisition(msg.into())
    }

    /// Build a [`PhotocardError::Decode`] value.
    pub fn decode(slot: usize, reason: impl Into<String>) -> Self {
        Self::Decode {
            slot,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
