//! Batch annotation: text-field resolution, per-record stages, and the
//! batched sentiment classifier call.
//!
//! Ownership model:
//! - `AnnotationPipeline` holds the externally loaded classifier behind an
//!   `Arc` and reuses it for every batch it annotates.
//! - Per-record stages are pure and may run on the rayon pool; results are
//!   collected by index so output order always equals input order.
//! - Classifier batch size only shapes how many texts are sent per call.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::AnnotatorConfig;
use crate::constants::fields::{OUTPUT_FIELDS, TEXT_FIELD_CANDIDATES};
use crate::data::{AnnotatedBatch, AnnotatedReview, ReviewBatch, TextValue, ThemeAssignment};
use crate::errors::AnnotationError;
use crate::keywords::KeywordExtractor;
use crate::sentiment::{SentimentCalibrator, SentimentClassifier, SentimentResult};
use crate::themes::ThemeClassifier;
use crate::types::FieldName;
use crate::utils::normalize_review_text;

/// First candidate text field present in `columns`.
pub fn resolve_text_field(columns: &[FieldName]) -> Result<FieldName, AnnotationError> {
    TEXT_FIELD_CANDIDATES
        .iter()
        .find(|candidate| columns.iter().any(|column| column == *candidate))
        .map(|candidate| candidate.to_string())
        .ok_or_else(|| AnnotationError::Schema {
            expected: TEXT_FIELD_CANDIDATES.iter().map(|c| c.to_string()).collect(),
            found: columns.to_vec(),
        })
}

/// Composes normalization, theme rules, and calibrated sentiment over a batch.
pub struct AnnotationPipeline {
    config: AnnotatorConfig,
    calibrator: SentimentCalibrator,
    themes: ThemeClassifier,
    classifier: Arc<dyn SentimentClassifier>,
}

impl AnnotationPipeline {
    /// Validate `config` and take shared ownership of a loaded classifier.
    pub fn new(
        config: AnnotatorConfig,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> Result<Self, AnnotationError> {
        config.validate()?;
        let calibrator =
            SentimentCalibrator::new(config.positive_threshold, config.negative_threshold)?;
        Ok(Self {
            config,
            calibrator,
            themes: ThemeClassifier::default(),
            classifier,
        })
    }

    /// Replace the default theme rules.
    pub fn with_theme_classifier(mut self, themes: ThemeClassifier) -> Self {
        self.themes = themes;
        self
    }

    /// Corpus keyword extractor configured from this run's keyword settings.
    pub fn keyword_extractor(&self) -> Result<KeywordExtractor, AnnotationError> {
        KeywordExtractor::from_config(&self.config)
    }

    /// Active run configuration.
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Theme rules applied to cleaned text.
    pub fn theme_classifier(&self) -> &ThemeClassifier {
        &self.themes
    }

    /// Field review text is read from for every record in `batch`.
    pub fn text_field(&self, batch: &ReviewBatch) -> Result<FieldName, AnnotationError> {
        match &self.config.text_field {
            Some(field) if batch.has_column(field) => Ok(field.clone()),
            Some(field) => Err(AnnotationError::Schema {
                expected: vec![field.clone()],
                found: batch.columns().to_vec(),
            }),
            None => resolve_text_field(batch.columns()),
        }
    }

    /// Normalized text and theme per record, in input order.
    pub fn add_themes(&self, batch: &ReviewBatch) -> Result<Vec<ThemeAssignment>, AnnotationError> {
        let field = self.text_field(batch)?;
        let texts = self.review_texts(batch, &field);
        Ok(self.assign_themes(&texts))
    }

    /// Calibrated sentiment per record, in input order.
    pub fn add_sentiment(
        &self,
        batch: &ReviewBatch,
    ) -> Result<Vec<SentimentResult>, AnnotationError> {
        let field = self.text_field(batch)?;
        let texts = self.review_texts(batch, &field);
        self.classify_texts(&texts)
    }

    /// Annotate every review; output has one record per input, same order.
    pub fn annotate(&self, batch: &ReviewBatch) -> Result<AnnotatedBatch, AnnotationError> {
        let field = self.text_field(batch)?;
        info!(
            records = batch.len(),
            text_field = %field,
            batch_size = self.config.batch_size,
            "annotating reviews"
        );
        for output in OUTPUT_FIELDS {
            if batch.has_column(output) {
                warn!(field = output, "input column will be overwritten by annotation");
            }
        }

        let texts = self.review_texts(batch, &field);
        let sentiments = self.classify_texts(&texts)?;
        let themes = self.assign_themes(&texts);

        let records: Vec<AnnotatedReview> = batch
            .records()
            .iter()
            .zip(themes)
            .zip(sentiments)
            .map(|((review, assignment), sentiment)| AnnotatedReview {
                review: review.clone(),
                clean_text: assignment.clean_text,
                theme: assignment.theme,
                sentiment,
            })
            .collect();

        info!(records = records.len(), "annotation complete");
        Ok(AnnotatedBatch::new(batch.columns().to_vec(), field, records))
    }

    fn review_texts(&self, batch: &ReviewBatch, field: &str) -> Vec<String> {
        let mut coerced = 0usize;
        let texts = batch
            .records()
            .iter()
            .map(|review| {
                let value = review.text_of(field);
                if matches!(value, TextValue::Coerced(_)) {
                    coerced += 1;
                }
                value.into_string()
            })
            .collect();
        if coerced > 0 {
            warn!(field, coerced, "non-string review text values were coerced");
        }
        texts
    }

    fn assign_themes(&self, texts: &[String]) -> Vec<ThemeAssignment> {
        let assign = |text: &String| {
            let clean_text = normalize_review_text(text);
            let theme = self.themes.assign_theme(&clean_text);
            ThemeAssignment { clean_text, theme }
        };
        if self.config.parallel {
            texts.par_iter().map(assign).collect()
        } else {
            texts.iter().map(assign).collect()
        }
    }

    fn classify_texts(&self, texts: &[String]) -> Result<Vec<SentimentResult>, AnnotationError> {
        let mut results = Vec::with_capacity(texts.len());
        for (batch_idx, chunk) in texts.chunks(self.config.batch_size).enumerate() {
            debug!(
                batch = batch_idx,
                offset = batch_idx * self.config.batch_size,
                len = chunk.len(),
                "classifying sentiment batch"
            );
            let raw = self.classifier.classify(chunk)?;
            if raw.len() != chunk.len() {
                return Err(AnnotationError::ClassifierContract(format!(
                    "classifier returned {} results for {} texts",
                    raw.len(),
                    chunk.len()
                )));
            }
            for prediction in &raw {
                results.push(self.calibrator.calibrate_raw(prediction)?);
            }
        }
        Ok(results)
    }
}
