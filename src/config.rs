use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::keywords::DEFAULT_MAX_FEATURES;
use crate::constants::sentiment::{
    DEFAULT_BATCH_SIZE, DEFAULT_NEGATIVE_THRESHOLD, DEFAULT_POSITIVE_THRESHOLD,
};
use crate::errors::AnnotationError;
use crate::sentiment::SentimentCalibrator;
use crate::types::FieldName;

/// Controls TF-IDF keyword ranking.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TfidfOptions {
    /// Vocabulary cap; the most frequent terms corpus-wide are kept.
    pub max_features: usize,
    /// Add one to document counts when computing IDF.
    pub smooth_idf: bool,
    /// L2-normalize each document row before averaging.
    pub l2_normalize: bool,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            smooth_idf: true,
            l2_normalize: true,
        }
    }
}

impl TfidfOptions {
    /// Reject a zero vocabulary cap.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        if self.max_features == 0 {
            return Err(AnnotationError::Configuration(
                "keywords.max_features must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level annotation run configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Number of texts sent to the sentiment classifier per call.
    ///
    /// Only shapes classifier memory use; results never depend on it.
    pub batch_size: usize,
    /// Signed scores `>=` this are labeled `positive`.
    pub positive_threshold: f64,
    /// Signed scores `<=` the negation of this are labeled `negative`.
    pub negative_threshold: f64,
    /// Explicit text field; when unset the candidate priority list is used.
    pub text_field: Option<FieldName>,
    /// Run per-record normalization and theme assignment on the rayon pool.
    pub parallel: bool,
    /// Keyword extraction settings.
    pub keywords: TfidfOptions,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            positive_threshold: DEFAULT_POSITIVE_THRESHOLD,
            negative_threshold: DEFAULT_NEGATIVE_THRESHOLD,
            text_field: None,
            parallel: true,
            keywords: TfidfOptions::default(),
        }
    }
}

impl AnnotatorConfig {
    /// Load a JSON config file; missing keys fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AnnotationError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the classifier batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set both polarity thresholds to the same magnitude.
    pub fn with_thresholds(mut self, threshold: f64) -> Self {
        self.positive_threshold = threshold;
        self.negative_threshold = threshold;
        self
    }

    /// Pin the text field instead of resolving it from candidates.
    pub fn with_text_field(mut self, field: impl Into<FieldName>) -> Self {
        self.text_field = Some(field.into());
        self
    }

    /// Toggle rayon for per-record stages.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check ranges before a run.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        if self.batch_size == 0 {
            return Err(AnnotationError::Configuration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        SentimentCalibrator::new(self.positive_threshold, self.negative_threshold)?;
        if let Some(field) = &self.text_field
            && field.trim().is_empty()
        {
            return Err(AnnotationError::Configuration(
                "text_field must not be blank".to_string(),
            ));
        }
        self.keywords.validate()
    }
}
