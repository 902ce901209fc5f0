//! Errors for reference-model loading (catalog lookup, data-file presence,
//! record parsing, and row alignment).
//!
//! ## Conventions
//! - **Line numbers are 1-based** and refer to the physical line in the
//!   record file, blank lines included.
//! - Paths are carried as display strings so the enum stays `Clone + PartialEq`.
//! - I/O and JSON failures are flattened into message-carrying variants.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

/// Result alias for model-repository operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Catalog ----
    /// No catalog entry matches the key (case-insensitive).
    UnsupportedModel { key: String },

    /// Catalog JSON could not be decoded.
    InvalidCatalog { message: String },

    /// Two catalog entries share a key (case-insensitive).
    DuplicateModelKey { key: String },

    // ---- Data files ----
    /// Allele or frequency record is absent.
    MissingDataFile { path: String },

    /// Allele record yielded zero rows.
    EmptyDataFile { key: String },

    /// Allele and frequency records have different row counts.
    RowCountMismatch { key: String, alleles: usize, frequencies: usize },

    /// Reading a file failed after it was found.
    ReadFailed { path: String, message: String },

    // ---- Record parsing ----
    /// Allele columns must hold a single character each.
    MalformedAlleleRow { line: usize, reason: &'static str },

    /// Frequency token is not a float.
    MalformedFrequency { line: usize, token: String },

    /// Frequency row has a different column count than the first row.
    RaggedFrequencyRow { line: usize, expected: usize, found: usize },

    /// Frequency must be finite and in [0, 1].
    FrequencyOutOfRange { line: usize, column: usize, value: f64 },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Catalog ----
            ModelError::UnsupportedModel { key } => {
                write!(f, "Unsupported admixture model: {key}")
            }
            ModelError::InvalidCatalog { message } => {
                write!(f, "Model catalog could not be parsed: {message}")
            }
            ModelError::DuplicateModelKey { key } => {
                write!(f, "Model catalog declares key '{key}' more than once.")
            }
            // ---- Data files ----
            ModelError::MissingDataFile { path } => {
                write!(f, "Model data file does not exist: {path}")
            }
            ModelError::EmptyDataFile { key } => {
                write!(f, "Model '{key}' has no SNP rows in its data files.")
            }
            ModelError::RowCountMismatch { key, alleles, frequencies } => {
                write!(
                    f,
                    "Model '{key}' allele and frequency row counts differ: {alleles} vs {frequencies}"
                )
            }
            ModelError::ReadFailed { path, message } => {
                write!(f, "Failed to read {path}: {message}")
            }
            // ---- Record parsing ----
            ModelError::MalformedAlleleRow { line, reason } => {
                write!(f, "Malformed allele row at line {line}. {reason}")
            }
            ModelError::MalformedFrequency { line, token } => {
                write!(f, "Frequency at line {line} is not a number: '{token}'")
            }
            ModelError::RaggedFrequencyRow { line, expected, found } => {
                write!(
                    f,
                    "Frequency row at line {line} has {found} columns; expected {expected}"
                )
            }
            ModelError::FrequencyOutOfRange { line, column, value } => {
                write!(
                    f,
                    "Frequency at line {line}, column {column} must be finite and in [0, 1]; got: {value}"
                )
            }
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> ModelError {
        ModelError::InvalidCatalog { message: err.to_string() }
    }
}

/// Convert a [`ModelError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
