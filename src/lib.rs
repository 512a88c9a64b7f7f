#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Run configuration types.
pub mod config;
/// Centralized constants: field names, thresholds, theme keyword tables.
pub mod constants;
/// Review, batch, and annotated record types.
pub mod data;
/// Corpus keyword extraction (n-gram frequency and TF-IDF).
pub mod keywords;
/// Theme and sentiment distributions over an annotated run.
pub mod metrics;
/// Batch annotation pipeline.
pub mod pipeline;
/// Sentiment classifier contract and calibration.
pub mod sentiment;
/// Rule-based theme classification.
pub mod themes;
/// Shared type aliases.
pub mod types;
/// Text normalization helpers.
pub mod utils;

mod errors;

pub use config::{AnnotatorConfig, TfidfOptions};
pub use data::{AnnotatedBatch, AnnotatedReview, Review, ReviewBatch, TextValue, ThemeAssignment};
pub use errors::AnnotationError;
pub use keywords::{KeywordExtractor, KeywordScore, NgramCount};
pub use metrics::{
    CategoryShare, Distribution, mean_signed_score, sentiment_distribution, theme_distribution,
};
pub use pipeline::{AnnotationPipeline, resolve_text_field};
pub use sentiment::{
    RawSentiment, SentimentCalibrator, SentimentClassifier, SentimentLabel, SentimentResult,
};
pub use themes::{ThemeClassifier, ThemeLabel, ThemeRule};
pub use types::{CleanText, FieldName, Ngram, RawLabel};
pub use utils::{normalize_optional_text, normalize_review_text};
