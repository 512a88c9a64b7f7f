use indexmap::IndexMap;

use crate::data::AnnotatedReview;
use crate::sentiment::SentimentLabel;
use crate::themes::ThemeLabel;

/// Per-category counts for one annotated run.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
    /// Number of annotated records counted.
    pub total: usize,
    /// Every category in fixed order, zero counts included.
    pub per_category: Vec<CategoryShare>,
}

/// Share of a run held by one category.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryShare {
    /// Category display name.
    pub label: &'static str,
    /// Records in this category.
    pub count: usize,
    /// Fraction of `total`, `0.0` for an empty run.
    pub share: f64,
}

impl Distribution {
    fn from_counts(counts: IndexMap<&'static str, usize>) -> Self {
        let total: usize = counts.values().sum();
        let per_category = counts
            .into_iter()
            .map(|(label, count)| CategoryShare {
                label,
                count,
                share: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            })
            .collect();
        Self {
            total,
            per_category,
        }
    }

    /// Entry for `label`, if it is one of the categories.
    pub fn get(&self, label: &str) -> Option<&CategoryShare> {
        self.per_category.iter().find(|entry| entry.label == label)
    }

    /// Category with the highest count; ties go to the earlier category.
    pub fn dominant(&self) -> Option<&CategoryShare> {
        self.per_category
            .iter()
            .filter(|entry| entry.count > 0)
            .fold(None, |best: Option<&CategoryShare>, entry| match best {
                Some(current) if current.count >= entry.count => Some(current),
                _ => Some(entry),
            })
    }
}

/// Theme counts in rule order with `Other` last.
pub fn theme_distribution(records: &[AnnotatedReview]) -> Distribution {
    let mut counts: IndexMap<&'static str, usize> = ThemeLabel::ALL
        .iter()
        .map(|label| (label.as_str(), 0))
        .collect();
    for record in records {
        *counts.entry(record.theme.as_str()).or_insert(0) += 1;
    }
    Distribution::from_counts(counts)
}

/// Sentiment counts in positive, neutral, negative order.
pub fn sentiment_distribution(records: &[AnnotatedReview]) -> Distribution {
    let mut counts: IndexMap<&'static str, usize> = SentimentLabel::ALL
        .iter()
        .map(|label| (label.as_str(), 0))
        .collect();
    for record in records {
        *counts
            .entry(record.sentiment.final_label.as_str())
            .or_insert(0) += 1;
    }
    Distribution::from_counts(counts)
}

/// Mean signed sentiment score, `None` for an empty run.
pub fn mean_signed_score(records: &[AnnotatedReview]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let sum: f64 = records
        .iter()
        .map(|record| record.sentiment.signed_score)
        .sum();
    Some(sum / records.len() as f64)
}
