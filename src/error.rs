//! Error handling for the huffcode library
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! [`HuffError`] separates the distinct failure kinds a caller may want to match on.

use thiserror::Error;

/// Main error type for the huffcode library
#[derive(Error, Debug)]
pub enum HuffError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input that no code can be built from (e.g. an empty alphabet)
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error message describing the issue
        message: String,
    },

    /// A symbol with no entry in the encode table
    #[error("Unknown symbol: {symbol}")]
    UnknownSymbol {
        /// Debug rendering of the offending symbol
        symbol: String,
    },

    /// Bit stream ended in the middle of a code
    #[error("Truncated stream: {pending_bits} trailing bit(s) match no code")]
    TruncatedStream {
        /// Number of bits left in the accumulator
        pending_bits: usize,
    },

    /// A textual bit token containing characters other than `0` and `1`
    #[error("Malformed code: {message}")]
    MalformedCode {
        /// Error message describing the offending token
        message: String,
    },

    /// Decoded symbol count differs from the expected count
    #[error("Length mismatch: expected {expected} symbols, decoded {actual}")]
    LengthMismatch {
        /// Expected number of symbols
        expected: usize,
        /// Number of symbols actually decoded
        actual: usize,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl HuffError {
    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    /// Create an unknown symbol error from any debuggable symbol
    pub fn unknown_symbol<T: std::fmt::Debug + ?Sized>(symbol: &T) -> Self {
        Self::UnknownSymbol { symbol: format!("{:?}", symbol) }
    }

    /// Create a truncated stream error
    pub fn truncated_stream(pending_bits: usize) -> Self {
        Self::TruncatedStream { pending_bits }
    }

    /// Create a malformed code error
    pub fn malformed_code<S: Into<String>>(message: S) -> Self {
        Self::MalformedCode { message: message.into() }
    }

    /// Create a length mismatch error
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Create an I/O error carrying `InvalidData`
    pub fn invalid_data<S: Into<String>>(message: S) -> Self {
        Self::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, message.into()))
    }

    /// Check if this is a recoverable error
    ///
    /// Every transform in this crate is deterministic over already-read data,
    /// so only I/O failures can succeed on a second attempt.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::InvalidInput { .. } => false,
            Self::UnknownSymbol { .. } => false,
            Self::TruncatedStream { .. } => false,
            Self::MalformedCode { .. } => false,
            Self::LengthMismatch { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidInput { .. } => "input",
            Self::UnknownSymbol { .. } => "symbol",
            Self::TruncatedStream { .. } => "truncated",
            Self::MalformedCode { .. } => "malformed",
            Self::LengthMismatch { .. } => "length",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HuffError>;
