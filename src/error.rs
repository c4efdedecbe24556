use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tokenizer reached the end of input inside a quoted field.
    #[error("malformed row: {0}")]
    MalformedRow(String),

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A column was looked up by name but no header was read.
    #[error("no header metadata available to resolve column '{0}'")]
    MissingHeaderMetadata(String),

    #[error("required column {column} for field '{field}' is missing or empty")]
    RequiredColumnMissing { field: String, column: String },

    #[error("no converter registered for type {0}")]
    UnregisteredType(&'static str),

    #[error("a converter is already registered for type {0}, unregister it first")]
    DuplicateRegistration(&'static str),

    #[error("cannot register a converter for nullable wrapper {0}, register the inner type")]
    NullableRegistration(&'static str),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("index {index} out of range (size: {size})")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("no such element at index {index} (buffered: {buffered})")]
    NoSuchElement { index: isize, buffered: usize },

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Errors raised by individual value converters.
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("expected exactly one character but got {0:?}")]
    InvalidCharacter(Option<String>),

    #[error("invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid number '{value}': {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid floating point number '{value}': {source}")]
    InvalidFloat {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// Raised by caller-supplied converters.
    #[error("{0}")]
    Custom(String),
}
