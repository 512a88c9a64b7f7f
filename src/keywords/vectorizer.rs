//! Corpus vectorization: tokenization, n-gram analysis, and a sparse count matrix.

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;

use super::stop_words::is_stop_word;
use crate::config::TfidfOptions;
use crate::constants::keywords::{MIN_TOKEN_CHARS, NGRAM_SEPARATOR};
use crate::types::Ngram;

/// Split text into lowercase ASCII alphanumeric tokens of at least two characters.
///
/// Unlike the usual `\w\w+` vectorizer pattern, `_` and non-ASCII letters are
/// separators here: `mixed_under_score` yields three tokens and `café` yields `caf`.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            current.push(ch);
        } else if !current.is_empty() {
            push_token(&mut tokens, &mut current);
        }
    }
    if !current.is_empty() {
        push_token(&mut tokens, &mut current);
    }
    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    if current.len() >= MIN_TOKEN_CHARS {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Stop-word-filtered n-grams of exactly `n` tokens, in document order.
///
/// Windows are taken over the filtered token sequence, so a stop word between
/// two surviving tokens does not break an n-gram.
pub fn analyze(text: &str, n: usize) -> Vec<Ngram> {
    let kept: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|token| !is_stop_word(token))
        .collect();
    if n == 0 || kept.len() < n {
        return Vec::new();
    }
    kept.windows(n)
        .map(|window| window.join(NGRAM_SEPARATOR))
        .collect()
}

/// Sparse document-term counts over a lexicographically ordered vocabulary.
#[derive(Clone, Debug, Default)]
pub struct CountMatrix {
    terms: Vec<Ngram>,
    rows: Vec<Vec<(usize, u64)>>,
}

impl CountMatrix {
    /// Count `n`-grams for every document in the corpus.
    pub fn fit<S>(texts: &[S], n: usize) -> Self
    where
        S: AsRef<str> + Sync,
    {
        let per_doc: Vec<HashMap<Ngram, u64>> = texts
            .par_iter()
            .map(|text| {
                let mut counts = HashMap::new();
                for gram in analyze(text.as_ref(), n) {
                    *counts.entry(gram).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let vocabulary: BTreeSet<&Ngram> = per_doc.iter().flat_map(|doc| doc.keys()).collect();
        let terms: Vec<Ngram> = vocabulary.into_iter().cloned().collect();
        let index: HashMap<&str, usize> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.as_str(), idx))
            .collect();

        let rows = per_doc
            .iter()
            .map(|doc| {
                let mut row: Vec<(usize, u64)> = doc
                    .iter()
                    .map(|(term, count)| (index[term.as_str()], *count))
                    .collect();
                row.sort_unstable_by_key(|(idx, _)| *idx);
                row
            })
            .collect();

        Self { terms, rows }
    }

    /// Vocabulary in column order.
    pub fn terms(&self) -> &[Ngram] {
        &self.terms
    }

    /// Number of documents (rows), including empty ones.
    pub fn n_documents(&self) -> usize {
        self.rows.len()
    }

    /// Total occurrences of each term across the corpus.
    pub fn column_totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.terms.len()];
        for row in &self.rows {
            for (idx, count) in row {
                totals[*idx] += count;
            }
        }
        totals
    }

    /// Number of documents containing each term.
    pub fn document_frequencies(&self) -> Vec<u64> {
        let mut df = vec![0u64; self.terms.len()];
        for row in &self.rows {
            for (idx, _) in row {
                df[*idx] += 1;
            }
        }
        df
    }

    /// Keep only the `max_features` most frequent terms.
    ///
    /// Ties at the cut keep the lexicographically smaller term; surviving
    /// columns stay in lexicographic order.
    pub fn limit_features(self, max_features: usize) -> Self {
        if self.terms.len() <= max_features {
            return self;
        }
        let totals = self.column_totals();
        let mut order: Vec<usize> = (0..self.terms.len()).collect();
        order.sort_by(|a, b| totals[*b].cmp(&totals[*a]));
        let mut keep: Vec<usize> = order.into_iter().take(max_features).collect();
        keep.sort_unstable();

        let mut remap = vec![None; self.terms.len()];
        for (new_idx, old_idx) in keep.iter().enumerate() {
            remap[*old_idx] = Some(new_idx);
        }
        let terms = keep.iter().map(|idx| self.terms[*idx].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .filter_map(|(idx, count)| remap[idx].map(|new_idx| (new_idx, count)))
                    .collect()
            })
            .collect();
        Self { terms, rows }
    }

    /// Mean TF-IDF weight of each column across all documents.
    pub fn mean_tfidf(&self, options: &TfidfOptions) -> Vec<f64> {
        let n_docs = self.rows.len();
        if n_docs == 0 {
            return vec![0.0; self.terms.len()];
        }
        let idf: Vec<f64> = self
            .document_frequencies()
            .into_iter()
            .map(|df| inverse_document_frequency(n_docs as f64, df as f64, options.smooth_idf))
            .collect();

        let mut sums = vec![0.0f64; self.terms.len()];
        for row in &self.rows {
            let weights: Vec<(usize, f64)> = row
                .iter()
                .map(|(idx, count)| (*idx, *count as f64 * idf[*idx]))
                .collect();
            let norm = if options.l2_normalize {
                weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
            } else {
                1.0
            };
            if norm == 0.0 {
                continue;
            }
            for (idx, weight) in weights {
                sums[idx] += weight / norm;
            }
        }
        sums.into_iter().map(|sum| sum / n_docs as f64).collect()
    }
}

fn inverse_document_frequency(n_docs: f64, df: f64, smooth: bool) -> f64 {
    if smooth {
        ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
    } else {
        (n_docs / df).ln() + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_single_characters_and_punctuation() {
        assert_eq!(
            tokenize("I can't log-in to v2 App!"),
            vec!["can", "log", "in", "to", "v2", "app"]
        );
        assert!(tokenize("a b c ! ?").is_empty());
        assert_eq!(tokenize("mixed_under_score café"), vec!["mixed", "under", "score", "caf"]);
    }

    #[test]
    fn analyze_forms_ngrams_over_filtered_tokens() {
        assert_eq!(analyze("login is slow", 2), vec!["login slow"]);
        assert_eq!(
            analyze("mobile banking app crashes", 3),
            vec!["mobile banking app", "banking app crashes"]
        );
        assert!(analyze("the and of", 1).is_empty());
        assert!(analyze("only", 2).is_empty());
    }

    #[test]
    fn count_matrix_orders_vocabulary_lexicographically() {
        let matrix = CountMatrix::fit(&["zebra apple", "mango apple apple"], 1);
        assert_eq!(matrix.terms(), ["apple", "mango", "zebra"]);
        assert_eq!(matrix.column_totals(), vec![3, 1, 1]);
        assert_eq!(matrix.document_frequencies(), vec![2, 1, 1]);
        assert_eq!(matrix.n_documents(), 2);
    }

    #[test]
    fn limit_features_keeps_most_frequent_in_vocabulary_order() {
        let matrix = CountMatrix::fit(&["delta delta beta", "alpha delta gamma gamma"], 1);
        let limited = matrix.limit_features(2);
        assert_eq!(limited.terms(), ["delta", "gamma"]);
        assert_eq!(limited.column_totals(), vec![3, 2]);

        let tie = CountMatrix::fit(&["cc bb aa"], 1).limit_features(2);
        assert_eq!(tie.terms(), ["aa", "bb"]);
    }

    #[test]
    fn mean_tfidf_matches_smoothed_l2_weights() {
        let matrix = CountMatrix::fit(&["apple banana", "apple cherry"], 1);
        let scores = matrix.mean_tfidf(&TfidfOptions::default());
        let rare_idf = (3.0f64 / 2.0).ln() + 1.0;
        let norm = (1.0 + rare_idf * rare_idf).sqrt();
        assert!((scores[0] - 1.0 / norm).abs() < 1e-12);
        assert!((scores[1] - rare_idf / norm / 2.0).abs() < 1e-12);
        assert!((scores[1] - scores[2]).abs() < 1e-12);
    }

    #[test]
    fn empty_documents_still_count_toward_the_mean() {
        let matrix = CountMatrix::fit(&["apple", "the of and"], 1);
        let scores = matrix.mean_tfidf(&TfidfOptions::default());
        assert_eq!(matrix.n_documents(), 2);
        assert!((scores[0] - 0.5).abs() < 1e-12);
    }
}
