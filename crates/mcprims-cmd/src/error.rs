/// Errors that can occur while parsing command buffers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The wire image is shorter than a full command buffer.
    #[error("short command buffer ({len} bytes, expected {expected})")]
    ShortBuffer { len: usize, expected: usize },

    /// The response header carries a different command id than the request.
    #[error("unexpected response command id {actual:#06x} (expected {expected:#06x})")]
    UnexpectedCommand { expected: u16, actual: u16 },
}

/// A request parameter that does not fit the range its command accepts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// The value lies outside the accepted inclusive range.
    #[error("{field} out of range ({value}, valid {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

pub type Result<T> = std::result::Result<T, CodecError>;
