//! Corpus-level keyword extraction.
//!
//! Both rankings are built fresh from the whole corpus on every call: the
//! vocabulary, document frequencies, and stop-word filtering are never
//! carried between calls. Ties in either ranking keep vocabulary
//! (lexicographic) order.

/// Standard English stop words.
pub mod stop_words;
/// Tokenizer, n-gram analyzer, and sparse count matrix.
pub mod vectorizer;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AnnotatorConfig, TfidfOptions};
use crate::errors::AnnotationError;
use crate::types::Ngram;
use vectorizer::CountMatrix;

/// Corpus frequency of one n-gram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramCount {
    /// Space-joined tokens.
    pub ngram: Ngram,
    /// Total occurrences across all documents.
    pub count: u64,
}

/// Mean TF-IDF weight of one word across the corpus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    /// Vocabulary term.
    pub word: Ngram,
    /// Mean weight over every document, zeros included.
    pub tfidf: f64,
}

/// Frequency and TF-IDF keyword ranking over a review corpus.
#[derive(Clone, Debug, Default)]
pub struct KeywordExtractor {
    options: TfidfOptions,
}

impl KeywordExtractor {
    /// Build an extractor with explicit TF-IDF options.
    pub fn new(options: TfidfOptions) -> Result<Self, AnnotationError> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Extractor using the keyword settings of a run configuration.
    pub fn from_config(config: &AnnotatorConfig) -> Result<Self, AnnotationError> {
        Self::new(config.keywords.clone())
    }

    /// Active TF-IDF options.
    pub fn options(&self) -> &TfidfOptions {
        &self.options
    }

    /// Every `n`-gram in the corpus ranked by total count, descending.
    pub fn ngram_frequencies<S>(&self, texts: &[S], n: usize) -> Result<Vec<NgramCount>, AnnotationError>
    where
        S: AsRef<str> + Sync,
    {
        if n == 0 {
            return Err(AnnotationError::Configuration(
                "n-gram size must be greater than zero".to_string(),
            ));
        }
        let matrix = CountMatrix::fit(texts, n);
        let totals = matrix.column_totals();
        let mut ranked: Vec<NgramCount> = matrix
            .terms()
            .iter()
            .zip(totals)
            .map(|(ngram, count)| NgramCount {
                ngram: ngram.clone(),
                count,
            })
            .collect();
        // Stable sort keeps lexicographic vocabulary order among equal counts.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        debug!(
            documents = texts.len(),
            n,
            vocabulary = ranked.len(),
            "counted corpus n-grams"
        );
        Ok(ranked)
    }

    /// The `top_k` most frequent `n`-grams.
    pub fn top_frequent_ngrams<S>(
        &self,
        texts: &[S],
        n: usize,
        top_k: usize,
    ) -> Result<Vec<NgramCount>, AnnotationError>
    where
        S: AsRef<str> + Sync,
    {
        check_top_k(top_k)?;
        let mut ranked = self.ngram_frequencies(texts, n)?;
        ranked.truncate(top_k);
        Ok(ranked)
    }

    /// The `top_k` unigrams with the highest mean TF-IDF weight.
    pub fn top_tfidf_words<S>(
        &self,
        texts: &[S],
        top_k: usize,
    ) -> Result<Vec<KeywordScore>, AnnotationError>
    where
        S: AsRef<str> + Sync,
    {
        check_top_k(top_k)?;
        let matrix = CountMatrix::fit(texts, 1).limit_features(self.options.max_features);
        let scores = matrix.mean_tfidf(&self.options);
        let mut ranked: Vec<KeywordScore> = matrix
            .terms()
            .iter()
            .zip(scores)
            .map(|(word, tfidf)| KeywordScore {
                word: word.clone(),
                tfidf,
            })
            .collect();
        ranked.sort_by(|a, b| b.tfidf.total_cmp(&a.tfidf));
        ranked.truncate(top_k);
        debug!(
            documents = texts.len(),
            vocabulary = matrix.terms().len(),
            returned = ranked.len(),
            "ranked tf-idf keywords"
        );
        Ok(ranked)
    }
}

fn check_top_k(top_k: usize) -> Result<(), AnnotationError> {
    if top_k == 0 {
        return Err(AnnotationError::Configuration(
            "top_k must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
