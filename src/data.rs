use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::constants::fields::{
    CLEAN_TEXT, OUTPUT_FIELDS, SENTIMENT_LABEL, SENTIMENT_RAW_LABEL, SENTIMENT_RAW_SCORE,
    SENTIMENT_SCORE, THEME,
};
use crate::sentiment::SentimentResult;
use crate::themes::ThemeLabel;

pub use crate::types::{CleanText, FieldName};

/// Input review: ordered, opaque fields passed through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Review {
    fields: IndexMap<FieldName, Value>,
}

impl Review {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    pub fn with_field(mut self, name: impl Into<FieldName>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// True when the record carries `name`, even as null.
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.keys()
    }

    /// All fields in insertion order.
    pub fn fields(&self) -> &IndexMap<FieldName, Value> {
        &self.fields
    }

    /// Consume the record into its field map.
    pub fn into_fields(self) -> IndexMap<FieldName, Value> {
        self.fields
    }

    /// Text of `name`, with missing/null values as `""`.
    ///
    /// Numbers and booleans use their display form; arrays and objects use
    /// compact JSON.
    pub fn text_of(&self, name: &str) -> TextValue {
        match self.fields.get(name) {
            None | Some(Value::Null) => TextValue::Missing,
            Some(Value::String(text)) => TextValue::Text(text.clone()),
            Some(Value::Bool(flag)) => TextValue::Coerced(flag.to_string()),
            Some(Value::Number(number)) => TextValue::Coerced(number.to_string()),
            Some(other) => TextValue::Coerced(other.to_string()),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Review
where
    K: Into<FieldName>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Review text as resolved from a record field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextValue {
    /// Field absent or null.
    Missing,
    /// Field held a string.
    Text(String),
    /// Field held a non-string value rendered as text.
    Coerced(String),
}

impl TextValue {
    /// Resolved text; `Missing` becomes `""`.
    pub fn into_string(self) -> String {
        match self {
            TextValue::Missing => String::new(),
            TextValue::Text(text) | TextValue::Coerced(text) => text,
        }
    }
}

/// A batch of reviews with an explicit, ordered column schema.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Review>", into = "Vec<Review>")]
pub struct ReviewBatch {
    columns: Vec<FieldName>,
    records: Vec<Review>,
}

impl ReviewBatch {
    /// Batch with a declared schema; records may omit declared columns.
    pub fn new(columns: Vec<FieldName>, records: Vec<Review>) -> Self {
        let mut batch = Self { columns, records };
        let inferred = union_columns(&batch.records);
        for column in inferred {
            if !batch.columns.contains(&column) {
                batch.columns.push(column);
            }
        }
        batch
    }

    /// Batch whose schema is the ordered union of record fields.
    pub fn from_records(records: Vec<Review>) -> Self {
        Self::new(Vec::new(), records)
    }

    /// Declared and inferred columns, in order.
    pub fn columns(&self) -> &[FieldName] {
        &self.columns
    }

    /// True when `name` is part of the schema.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Records in input order.
    pub fn records(&self) -> &[Review] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Review>> for ReviewBatch {
    fn from(records: Vec<Review>) -> Self {
        Self::from_records(records)
    }
}

impl From<ReviewBatch> for Vec<Review> {
    fn from(batch: ReviewBatch) -> Self {
        batch.records
    }
}

fn union_columns(records: &[Review]) -> Vec<FieldName> {
    let seen: IndexSet<&FieldName> = records
        .iter()
        .flat_map(|record| record.field_names())
        .collect();
    seen.into_iter().cloned().collect()
}

/// Normalized text and theme for one review.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeAssignment {
    /// Normalized review text.
    pub clean_text: CleanText,
    /// Theme assigned from the normalized text.
    pub theme: ThemeLabel,
}

/// Original review plus every derived field.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedReview {
    /// Input record, unchanged.
    pub review: Review,
    /// Normalized review text.
    pub clean_text: CleanText,
    /// Theme assigned from `clean_text`.
    pub theme: ThemeLabel,
    /// Raw and calibrated sentiment.
    pub sentiment: SentimentResult,
}

impl AnnotatedReview {
    /// Flat record: original fields followed by the six derived fields.
    ///
    /// An input field sharing a derived field's name keeps its position and
    /// takes the derived value.
    pub fn to_record(&self) -> Review {
        let mut fields = self.review.fields().clone();
        fields.insert(
            SENTIMENT_RAW_LABEL.to_string(),
            Value::from(self.sentiment.raw_label.clone()),
        );
        fields.insert(
            SENTIMENT_RAW_SCORE.to_string(),
            Value::from(self.sentiment.raw_score),
        );
        fields.insert(
            SENTIMENT_LABEL.to_string(),
            Value::from(self.sentiment.final_label.as_str()),
        );
        fields.insert(
            SENTIMENT_SCORE.to_string(),
            Value::from(self.sentiment.signed_score),
        );
        fields.insert(CLEAN_TEXT.to_string(), Value::from(self.clean_text.clone()));
        fields.insert(THEME.to_string(), Value::from(self.theme.as_str()));
        Review { fields }
    }
}

impl Serialize for AnnotatedReview {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

/// Annotated output of one pipeline run, in input order.
///
/// Serializes as the array of flat annotated records.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedBatch {
    input_columns: Vec<FieldName>,
    text_field: FieldName,
    records: Vec<AnnotatedReview>,
}

impl Serialize for AnnotatedBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl AnnotatedBatch {
    pub(crate) fn new(
        input_columns: Vec<FieldName>,
        text_field: FieldName,
        records: Vec<AnnotatedReview>,
    ) -> Self {
        Self {
            input_columns,
            text_field,
            records,
        }
    }

    /// Input columns followed by derived columns not already present.
    pub fn columns(&self) -> Vec<FieldName> {
        let mut columns = self.input_columns.clone();
        for field in OUTPUT_FIELDS {
            if !columns.iter().any(|column| column == field) {
                columns.push(field.to_string());
            }
        }
        columns
    }

    /// Field the review text was read from.
    pub fn text_field(&self) -> &str {
        &self.text_field
    }

    /// Annotated records in input order.
    pub fn records(&self) -> &[AnnotatedReview] {
        &self.records
    }

    /// Consume the batch into its records.
    pub fn into_records(self) -> Vec<AnnotatedReview> {
        self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the batch holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentLabel;
    use serde_json::json;

    fn sample_annotation(review: Review) -> AnnotatedReview {
        AnnotatedReview {
            review,
            clean_text: "slow transfer".to_string(),
            theme: ThemeLabel::TransactionPerformance,
            sentiment: SentimentResult {
                raw_label: "NEGATIVE".to_string(),
                raw_score: 0.8,
                final_label: SentimentLabel::Negative,
                signed_score: -0.8,
            },
        }
    }

    #[test]
    fn batch_schema_is_ordered_union_of_fields() {
        let batch = ReviewBatch::from_records(vec![
            Review::new().with_field("id", 1).with_field("review", "a"),
            Review::new().with_field("bank", "X").with_field("id", 2),
        ]);
        assert_eq!(batch.columns(), ["id", "review", "bank"]);
        assert!(batch.has_column("bank"));

        let declared = ReviewBatch::new(vec!["content".to_string()], Vec::new());
        assert!(declared.is_empty());
        assert_eq!(declared.columns(), ["content"]);
    }

    #[test]
    fn batch_deserializes_from_record_array() {
        let batch: ReviewBatch =
            serde_json::from_str(r#"[{"review": "ok", "rating": 4}, {"review": null}]"#).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.columns(), ["review", "rating"]);
        assert_eq!(batch.records()[1].text_of("review"), TextValue::Missing);
    }

    #[test]
    fn text_values_are_coerced() {
        let review = Review::new()
            .with_field("s", "hello")
            .with_field("n", 42)
            .with_field("b", true)
            .with_field("a", json!(["x", 1]))
            .with_field("z", Value::Null);
        assert_eq!(review.text_of("s"), TextValue::Text("hello".into()));
        assert_eq!(review.text_of("n"), TextValue::Coerced("42".into()));
        assert_eq!(review.text_of("b"), TextValue::Coerced("true".into()));
        assert_eq!(review.text_of("a"), TextValue::Coerced(r#"["x",1]"#.into()));
        assert_eq!(review.text_of("z").into_string(), "");
        assert_eq!(review.text_of("missing").into_string(), "");
    }

    #[test]
    fn annotated_record_appends_fields_after_originals() {
        let annotated =
            sample_annotation(Review::new().with_field("id", 7).with_field("review", "Slow!"));
        let record = annotated.to_record();
        let names: Vec<&str> = record.field_names().map(String::as_str).collect();
        assert_eq!(
            names,
            vec![
                "id",
                "review",
                "sentiment_raw_label_bert",
                "sentiment_raw_score_bert",
                "sentiment_label_bert",
                "sentiment_score_bert",
                "clean_text",
                "theme"
            ]
        );
        assert_eq!(
            serde_json::to_value(&annotated).unwrap(),
            json!({
                "id": 7,
                "review": "Slow!",
                "sentiment_raw_label_bert": "NEGATIVE",
                "sentiment_raw_score_bert": 0.8,
                "sentiment_label_bert": "negative",
                "sentiment_score_bert": -0.8,
                "clean_text": "slow transfer",
                "theme": "Transaction Performance"
            })
        );
    }

    #[test]
    fn colliding_input_field_keeps_position() {
        let annotated = sample_annotation(
            Review::new()
                .with_field("theme", "old")
                .with_field("review", "x"),
        );
        let record = annotated.to_record();
        assert_eq!(record.field_names().next().map(String::as_str), Some("theme"));
        assert_eq!(record.get("theme"), Some(&json!("Transaction Performance")));
        assert_eq!(record.fields().len(), 7);
    }
}
