//! Error types for bit value construction, sequential reads and interpretation.
//!
//! Every fallible operation validates its inputs before touching a backing
//! buffer, so an `Err` never leaves a value half-modified.

use thiserror::Error;

/// Top-level error type for all operations on bit values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A value could not be built from an initializer
    #[error("creation error: {0}")]
    Creation(#[from] CreationError),

    /// A sequential decode ran past the end of the available bits
    #[error("read error: {0}")]
    Read(#[from] ReadError),

    /// An existing value cannot be read under the requested encoding
    #[error("interpretation error: {0}")]
    Interpret(#[from] InterpretError),

    /// A bit position or range lies outside the value
    #[error("position {position} out of range for a value of {length} bits")]
    OutOfRange { position: usize, length: usize },

    /// A binary operation was applied to values of different lengths
    #[error("length mismatch: {left} bits versus {right} bits")]
    LengthMismatch { left: usize, right: usize },
}

/// Failures while constructing a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreationError {
    #[error("unrecognised encoding name '{0}'")]
    UnknownEncoding(String),

    #[error("a non-zero length must be given with a {0} initialiser")]
    LengthRequired(&'static str),

    #[error("{encoding} initialisers do not take a length")]
    UnexpectedLength { encoding: &'static str },

    #[error("{encoding} values must be whole-byte, not {length} bits")]
    NotWholeByte { encoding: &'static str, length: usize },

    #[error("floats can only be 32 or 64 bits long, not {0} bits")]
    FloatLength(usize),

    #[error("{value} does not fit in {length} bits (allowed range [{min}, {max}])")]
    ValueOutOfRange {
        value: String,
        length: usize,
        min: String,
        max: String,
    },

    #[error("{encoding} cannot be initialised by a negative number")]
    Negative { encoding: &'static str },

    #[error("invalid character '{character}' in {encoding} initialiser")]
    InvalidCharacter { encoding: &'static str, character: char },

    #[error("cannot initialise {encoding} from '{literal}'")]
    InvalidLiteral { encoding: &'static str, literal: String },

    #[error("not enough data present: need {required} bits, have {available}")]
    NotEnoughData { required: usize, available: usize },

    #[error("malformed token '{0}'")]
    MalformedToken(String),

    #[error("{0} is too large to encode")]
    Overflow(String),
}

/// Failures while decoding sequentially from a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("read off end of value trying to read {encoding} at bit {position}")]
    PastEnd { encoding: &'static str, position: usize },

    #[error("{requested} bits requested at bit {position} but only {available} remain")]
    InsufficientBits {
        requested: usize,
        position: usize,
        available: usize,
    },

    #[error("{encoding} code at bit {position} does not fit in 128 bits")]
    CodeOverflow { encoding: &'static str, position: usize },

    #[error("a length must be given to read {0}")]
    LengthRequired(&'static str),
}

/// Failures while reading an existing value under an encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    #[error("cannot interpret a zero length value as {0}")]
    Empty(&'static str),

    #[error("cannot interpret {length} bits as {encoding}: length must be a multiple of {granularity}")]
    Granularity {
        encoding: &'static str,
        length: usize,
        granularity: usize,
    },

    #[error("a {encoding} interpretation needs exactly {expected} bits, not {length}")]
    ExactLength {
        encoding: &'static str,
        expected: &'static str,
        length: usize,
    },

    #[error("value is not a single {0} code")]
    NotSingleCode(&'static str),

    #[error("{length}-bit value does not fit a 128-bit {encoding}")]
    TooWide { encoding: &'static str, length: usize },
}

/// Type alias for Result with the crate error type
pub type Result<T> = std::result::Result<T, Error>;
