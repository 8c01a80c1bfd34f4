use thiserror::Error;

/// Errors returned by the checked (`try_*`) mutations of [`ObservableVec`](crate::ObservableVec).
///
/// The unchecked mutations panic with the same message instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("range {start}..{end} out of bounds for length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("range start {start} is greater than range end {end}")]
    InvalidRange { start: usize, end: usize },
}
