//! Error types for the sanitizer.
//!
//! Sanitizing never fails on hostile input. Errors are reserved for
//! configuration mistakes and for strict mode.

/// Error types for the sanitizer
#[derive(thiserror::Error, Debug)]
pub enum SanitizerError {
    /// A builder tried to allow an element the current table does not allow.
    #[error("Element is not allowed by the current table: {0}")]
    ElementNotAllowed(String),

    /// A builder tried to allow an attribute the current table does not allow.
    #[error("Attribute is not allowed by the current table: {0}")]
    AttributeNotAllowed(String),

    #[error("Data attribute must start with \"data-\": {0}")]
    InvalidDataAttribute(String),

    #[error("Custom element name must contain a hyphen and not shadow a known element: {0}")]
    InvalidCustomElement(String),

    /// `build()` was called a second time on the same builder.
    #[error("The builder has already been built")]
    AlreadyBuilt,

    /// Strict mode found content that had to be changed.
    #[error("Unexpected change to string: {input:?} became {output:?}: {}", .changes.join(", "))]
    UnexpectedChange {
        input: String,
        output: String,
        changes: Vec<String>,
    },

    #[error("Invalid sanitizer table: {0}")]
    InvalidTable(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

/// Result type for sanitizer operations
pub type SanitizerResult<T> = Result<T, SanitizerError>;
