use std::io;

use thiserror::Error;

use crate::types::FieldName;

/// Error type for schema resolution, classifier contract, and configuration failures.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// No recognized text field in the batch schema.
    #[error("no review text field found: expected one of {expected:?}, batch has {found:?}")]
    Schema {
        /// Field names that would have been accepted.
        expected: Vec<FieldName>,
        /// Columns the batch actually has.
        found: Vec<FieldName>,
    },
    /// Classifier output out of range or misaligned with its input.
    #[error("sentiment classifier contract violated: {0}")]
    ClassifierContract(String),
    /// The classifier itself reported a failure.
    #[error("sentiment classifier failed: {0}")]
    Classifier(String),
    /// Invalid run or extraction settings.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Config file could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Config file is not valid JSON for the schema.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
