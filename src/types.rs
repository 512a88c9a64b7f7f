/// Name of a column/field in a review record.
/// Examples: `review`, `review_text`, `bank`, `rating`
pub type FieldName = String;
/// Lowercased, punctuation-free review text.
/// Example: `app keeps crashing after the update`
pub type CleanText = String;
/// Space-joined n-gram drawn from the corpus vocabulary.
/// Examples: `transfer`, `mobile banking`, `keeps crashing update`
pub type Ngram = String;
/// Raw label emitted by the external binary sentiment classifier.
/// Examples: `POSITIVE`, `NEGATIVE`
pub type RawLabel = String;
