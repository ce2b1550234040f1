//! Core status and error types shared by every layer.

use thiserror::Error;

/// Outcome of a single read, write or update call on a layer.
///
/// Statuses are plain values. Every caller inspects them and stops
/// advancing on anything other than [`Status::Success`] or
/// [`Status::UpdateRequired`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Frame fully read, written or updated; cursor advanced.
    Success,
    /// More input is required; the missing count is reported separately.
    NotEnoughData,
    /// The bytes are wrong (checksum mismatch or inner semantic failure).
    ProtocolError,
    /// The output buffer cannot hold the frame.
    BufferOverflow,
    /// Frame written with placeholders; `update` must run before it is final.
    UpdateRequired,
}

impl Status {
    /// Returns `true` for [`Status::Success`].
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Returns `true` when a write may continue: success or a deferred update.
    pub fn is_written(self) -> bool {
        matches!(self, Status::Success | Status::UpdateRequired)
    }

    /// Converts the status into a `Result`, using `missing` for
    /// [`Status::NotEnoughData`].
    pub fn into_result(self, missing: usize) -> Result<()> {
        match self {
            Status::Success => Ok(()),
            Status::NotEnoughData => Err(FrameError::NotEnoughData { missing }),
            Status::ProtocolError => Err(FrameError::Protocol),
            Status::BufferOverflow => Err(FrameError::BufferOverflow),
            Status::UpdateRequired => Err(FrameError::UpdateRequired),
        }
    }
}

/// Error type for the `Result` based API and the stream codec.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("not enough data: {missing} more byte(s) required")]
    NotEnoughData { missing: usize },

    #[error("protocol error: checksum mismatch or malformed frame")]
    Protocol,

    #[error("buffer overflow: output buffer too small for frame")]
    BufferOverflow,

    #[error("frame requires an update pass before it is complete")]
    UpdateRequired,

    #[error("frame too large: {size} bytes (limit {limit})")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`FrameError`].
pub type Result<T> = std::result::Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result_maps_every_status() {
        assert!(Status::Success.into_result(0).is_ok());
        assert!(matches!(
            Status::NotEnoughData.into_result(3),
            Err(FrameError::NotEnoughData { missing: 3 })
        ));
        assert!(matches!(
            Status::ProtocolError.into_result(0),
            Err(FrameError::Protocol)
        ));
        assert!(matches!(
            Status::BufferOverflow.into_result(0),
            Err(FrameError::BufferOverflow)
        ));
        assert!(matches!(
            Status::UpdateRequired.into_result(0),
            Err(FrameError::UpdateRequired)
        ));
    }

    #[test]
    fn test_written_statuses() {
        assert!(Status::Success.is_written());
        assert!(Status::UpdateRequired.is_written());
        assert!(!Status::BufferOverflow.is_written());
        assert!(!Status::UpdateRequired.is_success());
    }
}
