//! Rule-based theme assignment.
//!
//! Rules are evaluated in declaration order and the first rule with a keyword
//! contained in the lowercased text wins. Matching is plain substring
//! containment, not word-boundary aware: `bug` matches inside `debugging`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::themes::{
    ACCOUNT_ACCESS_KEYWORDS, CRASHES_BUGS_KEYWORDS, CUSTOMER_SUPPORT_KEYWORDS,
    FEATURE_REQUEST_KEYWORDS, TRANSACTION_PERFORMANCE_KEYWORDS, USER_INTERFACE_KEYWORDS,
};
use crate::errors::AnnotationError;

/// Fixed, closed set of review themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThemeLabel {
    /// Login, password, PIN, and verification problems.
    #[serde(rename = "Account Access Issues")]
    AccountAccess,
    /// Slow, delayed, or hanging transfers.
    #[serde(rename = "Transaction Performance")]
    TransactionPerformance,
    /// Crashes, freezes, and errors.
    #[serde(rename = "Crashes & Bugs")]
    CrashesAndBugs,
    /// Layout, design, and navigation.
    #[serde(rename = "User Interface & Experience")]
    UserInterface,
    /// Missing or requested functionality.
    #[serde(rename = "Feature Requests")]
    FeatureRequests,
    /// Support, service, and agents.
    #[serde(rename = "Customer Support")]
    CustomerSupport,
    /// Assigned when no rule matches.
    #[serde(rename = "Other")]
    Other,
}

impl ThemeLabel {
    /// Every label in rule order, `Other` last.
    pub const ALL: [ThemeLabel; 7] = [
        ThemeLabel::AccountAccess,
        ThemeLabel::TransactionPerformance,
        ThemeLabel::CrashesAndBugs,
        ThemeLabel::UserInterface,
        ThemeLabel::FeatureRequests,
        ThemeLabel::CustomerSupport,
        ThemeLabel::Other,
    ];

    /// Display name used in annotated output.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ThemeLabel::AccountAccess => "Account Access Issues",
            ThemeLabel::TransactionPerformance => "Transaction Performance",
            ThemeLabel::CrashesAndBugs => "Crashes & Bugs",
            ThemeLabel::UserInterface => "User Interface & Experience",
            ThemeLabel::FeatureRequests => "Feature Requests",
            ThemeLabel::CustomerSupport => "Customer Support",
            ThemeLabel::Other => "Other",
        }
    }
}

impl fmt::Display for ThemeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeLabel {
    type Err = AnnotationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ThemeLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == value)
            .ok_or_else(|| AnnotationError::Configuration(format!("unknown theme label '{value}'")))
    }
}

/// One `(theme, keywords)` rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeRule {
    /// Theme assigned when the rule matches.
    pub label: ThemeLabel,
    /// Lowercase substrings; any one of them triggers the rule.
    pub keywords: Vec<String>,
}

impl ThemeRule {
    /// Build a rule from a keyword table.
    pub fn new<K: AsRef<str>>(label: ThemeLabel, keywords: &[K]) -> Self {
        Self {
            label,
            keywords: keywords
                .iter()
                .map(|keyword| keyword.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// True when any keyword occurs in `lowered`.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }
}

/// Ordered list of rules evaluated first-match-wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeClassifier {
    rules: Vec<ThemeRule>,
}

impl Default for ThemeClassifier {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl ThemeClassifier {
    /// Build a classifier over `rules`, preserving their order.
    pub fn new(rules: Vec<ThemeRule>) -> Self {
        Self { rules }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ThemeRule] {
        &self.rules
    }

    /// Theme of the first matching rule, or [`ThemeLabel::Other`].
    pub fn assign_theme(&self, text: &str) -> ThemeLabel {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.label)
            .unwrap_or(ThemeLabel::Other)
    }

    /// Every theme whose rule matches, in rule order.
    pub fn matching_themes(&self, text: &str) -> Vec<ThemeLabel> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .filter(|rule| rule.matches(&lowered))
            .map(|rule| rule.label)
            .collect()
    }
}

/// The six production rules in evaluation order.
pub fn default_rules() -> Vec<ThemeRule> {
    vec![
        ThemeRule::new(ThemeLabel::AccountAccess, ACCOUNT_ACCESS_KEYWORDS),
        ThemeRule::new(
            ThemeLabel::TransactionPerformance,
            TRANSACTION_PERFORMANCE_KEYWORDS,
        ),
        ThemeRule::new(ThemeLabel::CrashesAndBugs, CRASHES_BUGS_KEYWORDS),
        ThemeRule::new(ThemeLabel::UserInterface, USER_INTERFACE_KEYWORDS),
        ThemeRule::new(ThemeLabel::FeatureRequests, FEATURE_REQUEST_KEYWORDS),
        ThemeRule::new(ThemeLabel::CustomerSupport, CUSTOMER_SUPPORT_KEYWORDS),
    ]
}
