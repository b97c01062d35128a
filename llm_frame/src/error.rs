/// Errors surfaced to the caller of a mapping operation. These all point at a
/// programming error (bad task parameters, a column that does not exist) and
/// abort the call before any row is sent to a backend.
///
/// Per-row generation failures are not represented here; they show up as
/// missing values in the output column.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("ConfigurationError: {0}")]
    Configuration(String),
    #[error("ColumnNotFound: no column named {0:?}")]
    ColumnNotFound(String),
    #[error("LengthMismatch: column {name:?} has {found} rows, the table has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

impl FrameError {
    pub(crate) fn configuration<S: Into<String>>(message: S) -> Self {
        FrameError::Configuration(message.into())
    }
}
