use thiserror::Error;

/// Every fallible operation in the crate reports one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetError {
    #[error("Dimension mismatch during {operation}: left is {left:?}, right is {right:?}")]
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Matrix data length {actual} does not match dimensions (expected {expected})")]
    InvalidDataLength { expected: usize, actual: usize },

    #[error("A network needs at least one hidden layer")]
    EmptyHiddenLayers,

    #[error("Invalid network topology: {0}")]
    InvalidTopology(String),

    #[error("Input has {actual} values, network expects {expected}")]
    InputSizeMismatch { expected: usize, actual: usize },

    #[error("Expected output has {actual} values, network produces {expected}")]
    OutputSizeMismatch { expected: usize, actual: usize },

    #[error("Test set is empty")]
    EmptyTestSet,

    #[error("Dataset line {line}: {message}")]
    Dataset { line: usize, message: String },

    #[error("Invalid trainer options: {0}")]
    InvalidOptions(String),

    #[error("Batch worker failed: {0}")]
    WorkerFailed(String),

    #[error("Training did not converge within {attempts} attempts")]
    AttemptsExhausted { attempts: usize },

    #[error("Training was cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for NetError {
    fn from(e: std::io::Error) -> Self {
        NetError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for NetError {
    fn from(e: serde_json::Error) -> Self {
        NetError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NetError>;
