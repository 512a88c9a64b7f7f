//! Calibration of binary classifier output into three-class sentiment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::sentiment::{
    DEFAULT_NEGATIVE_THRESHOLD, DEFAULT_POSITIVE_THRESHOLD, POSITIVE_LABEL_PREFIX,
};
use crate::errors::AnnotationError;
use crate::types::RawLabel;

/// One prediction from the external binary classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSentiment {
    /// Usually `POSITIVE` or `NEGATIVE`.
    pub label: RawLabel,
    /// Confidence in `[0, 1]`.
    pub score: f64,
}

impl RawSentiment {
    /// Prediction with the given raw label and confidence.
    pub fn new(label: impl Into<RawLabel>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Externally owned binary sentiment model.
///
/// Implementations must return exactly one prediction per input text, in
/// input order. The pipeline holds a single instance for its lifetime and
/// calls it once per batch.
pub trait SentimentClassifier: Send + Sync {
    /// Classify a batch of raw review texts.
    fn classify(&self, texts: &[String]) -> Result<Vec<RawSentiment>, AnnotationError>;
}

/// Calibrated three-class label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    /// Signed score at or above the positive threshold.
    Positive,
    /// Signed score strictly between the thresholds.
    Neutral,
    /// Signed score at or below the negated negative threshold.
    Negative,
}

impl SentimentLabel {
    /// Every label in reporting order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// Lowercase name used in annotated output.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw prediction plus its calibrated label and signed score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Classifier label, kept verbatim.
    pub raw_label: RawLabel,
    /// Classifier confidence in `[0, 1]`.
    pub raw_score: f64,
    /// Three-class label derived from `signed_score`.
    pub final_label: SentimentLabel,
    /// `raw_score` for positive raw labels, `-raw_score` otherwise.
    pub signed_score: f64,
}

/// Maps `(raw_label, raw_score)` to a three-class label and signed score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SentimentCalibrator {
    positive_threshold: f64,
    negative_threshold: f64,
}

impl Default for SentimentCalibrator {
    fn default() -> Self {
        Self {
            positive_threshold: DEFAULT_POSITIVE_THRESHOLD,
            negative_threshold: DEFAULT_NEGATIVE_THRESHOLD,
        }
    }
}

impl SentimentCalibrator {
    /// Build a calibrator; both thresholds are magnitudes in `(0, 1]`.
    pub fn new(positive_threshold: f64, negative_threshold: f64) -> Result<Self, AnnotationError> {
        for (name, value) in [
            ("positive_threshold", positive_threshold),
            ("negative_threshold", negative_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(AnnotationError::Configuration(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        Ok(Self {
            positive_threshold,
            negative_threshold,
        })
    }

    /// Calibrate one prediction.
    ///
    /// Thresholds are inclusive of the polarity class: a signed score of
    /// exactly `0.3` is `positive`, `-0.3` is `negative`.
    pub fn calibrate(
        &self,
        raw_label: &str,
        raw_score: f64,
    ) -> Result<SentimentResult, AnnotationError> {
        if !(0.0..=1.0).contains(&raw_score) {
            return Err(AnnotationError::ClassifierContract(format!(
                "score {raw_score} for label '{raw_label}' is outside [0, 1]"
            )));
        }
        let signed_score = if is_positive_label(raw_label) {
            raw_score
        } else {
            -raw_score
        };
        let final_label = if signed_score >= self.positive_threshold {
            SentimentLabel::Positive
        } else if signed_score <= -self.negative_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Ok(SentimentResult {
            raw_label: raw_label.to_string(),
            raw_score,
            final_label,
            signed_score,
        })
    }

    /// Calibrate a prediction returned by a [`SentimentClassifier`].
    pub fn calibrate_raw(&self, raw: &RawSentiment) -> Result<SentimentResult, AnnotationError> {
        self.calibrate(&raw.label, raw.score)
    }
}

fn is_positive_label(label: &str) -> bool {
    label
        .get(..POSITIVE_LABEL_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(POSITIVE_LABEL_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrated(label: &str, score: f64) -> (SentimentLabel, f64) {
        let result = SentimentCalibrator::default()
            .calibrate(label, score)
            .expect("valid score");
        (result.final_label, result.signed_score)
    }

    #[test]
    fn thresholds_are_inclusive_of_polarity() {
        assert_eq!(calibrated("POSITIVE", 0.3), (SentimentLabel::Positive, 0.3));
        assert_eq!(calibrated("NEGATIVE", 0.3), (SentimentLabel::Negative, -0.3));
        assert_eq!(calibrated("POSITIVE", 0.29), (SentimentLabel::Neutral, 0.29));
        assert_eq!(calibrated("NEGATIVE", 0.29), (SentimentLabel::Neutral, -0.29));
    }

    #[test]
    fn label_prefix_is_case_insensitive() {
        assert_eq!(calibrated("positive", 0.9).0, SentimentLabel::Positive);
        assert_eq!(calibrated("Pos", 0.9).0, SentimentLabel::Positive);
        assert_eq!(calibrated("LABEL_1", 0.9), (SentimentLabel::Negative, -0.9));
        assert_eq!(calibrated("", 0.5).1, -0.5);
        assert_eq!(calibrated("pé", 0.5).1, -0.5);
    }

    #[test]
    fn extreme_scores_stay_in_range() {
        assert_eq!(calibrated("POSITIVE", 1.0), (SentimentLabel::Positive, 1.0));
        assert_eq!(calibrated("NEGATIVE", 1.0), (SentimentLabel::Negative, -1.0));
        assert_eq!(calibrated("NEGATIVE", 0.0).0, SentimentLabel::Neutral);
    }

    #[test]
    fn out_of_range_scores_violate_the_contract() {
        let calibrator = SentimentCalibrator::default();
        for score in [1.01, -0.2, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                calibrator.calibrate("POSITIVE", score),
                Err(AnnotationError::ClassifierContract(_))
            ));
        }
    }

    #[test]
    fn raw_fields_are_preserved() {
        let result = SentimentCalibrator::default()
            .calibrate_raw(&RawSentiment::new("NEGATIVE", 0.97))
            .unwrap();
        assert_eq!(result.raw_label, "NEGATIVE");
        assert_eq!(result.raw_score, 0.97);
        assert_eq!(result.final_label, SentimentLabel::Negative);
        assert_eq!(result.signed_score, -0.97);
    }

    #[test]
    fn custom_thresholds_shift_the_neutral_band() {
        let calibrator = SentimentCalibrator::new(0.6, 0.8).unwrap();
        assert_eq!(
            calibrator.calibrate("POSITIVE", 0.6).unwrap().final_label,
            SentimentLabel::Positive
        );
        assert_eq!(
            calibrator.calibrate("NEGATIVE", 0.7).unwrap().final_label,
            SentimentLabel::Neutral
        );
        assert!(SentimentCalibrator::new(0.0, 0.3).is_err());
        assert_eq!(
            serde_json::to_string(&SentimentLabel::Neutral).unwrap(),
            "\"neutral\""
        );
    }
}
