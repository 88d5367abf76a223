use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Allocation failed for {what}: {requested} values")]
    Allocation { what: &'static str, requested: usize },

    #[error("Invalid kernel length: {0}")]
    InvalidLength(usize),

    #[error("Invalid channel count: {0}")]
    InvalidChannels(usize),

    #[error("Invalid cutoff frequency: {0}")]
    InvalidCutoff(String),

    #[error("Kernel too short for tapered window: need 2 taps, have {0}")]
    KernelTooShort(usize),

    #[error("Degenerate kernel: {0}")]
    DegenerateKernel(String),

    #[error("Kernel length mismatch: expected {expected} taps, got {actual}")]
    KernelLengthMismatch { expected: usize, actual: usize },

    #[error("Block shape error: {0}")]
    BlockShape(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
