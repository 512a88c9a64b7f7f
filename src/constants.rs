/// Constants used when resolving and emitting record fields.
pub mod fields {
    /// Candidate review text fields, in resolution priority order.
    pub const TEXT_FIELD_CANDIDATES: [&str; 4] = ["review", "review_text", "content", "text"];

    /// Raw classifier label (`POSITIVE` / `NEGATIVE`).
    pub const SENTIMENT_RAW_LABEL: &str = "sentiment_raw_label_bert";
    /// Raw classifier confidence in `[0, 1]`.
    pub const SENTIMENT_RAW_SCORE: &str = "sentiment_raw_score_bert";
    /// Calibrated label (`positive` / `neutral` / `negative`).
    pub const SENTIMENT_LABEL: &str = "sentiment_label_bert";
    /// Signed score in `[-1, 1]`.
    pub const SENTIMENT_SCORE: &str = "sentiment_score_bert";
    /// Normalized review text.
    pub const CLEAN_TEXT: &str = "clean_text";
    /// Assigned theme label.
    pub const THEME: &str = "theme";

    /// Output fields appended to every annotated record, in emission order.
    pub const OUTPUT_FIELDS: [&str; 6] = [
        SENTIMENT_RAW_LABEL,
        SENTIMENT_RAW_SCORE,
        SENTIMENT_LABEL,
        SENTIMENT_SCORE,
        CLEAN_TEXT,
        THEME,
    ];
}

/// Constants used by sentiment calibration.
pub mod sentiment {
    /// Case-insensitive prefix identifying a positive raw label.
    pub const POSITIVE_LABEL_PREFIX: &str = "POS";
    /// Signed scores at or above this value are `positive`.
    pub const DEFAULT_POSITIVE_THRESHOLD: f64 = 0.3;
    /// Signed scores at or below the negation of this value are `negative`.
    pub const DEFAULT_NEGATIVE_THRESHOLD: f64 = 0.3;
    /// Number of texts handed to the external classifier per call.
    pub const DEFAULT_BATCH_SIZE: usize = 64;
}

/// Constants used by corpus keyword extraction.
pub mod keywords {
    /// Vocabulary cap applied to TF-IDF ranking.
    pub const DEFAULT_MAX_FEATURES: usize = 5000;
    /// Shortest token kept by the vectorizer tokenizer.
    pub const MIN_TOKEN_CHARS: usize = 2;
    /// Separator used when joining n-gram tokens.
    pub const NGRAM_SEPARATOR: &str = " ";
}

/// Keyword tables for the fixed theme rules, one per theme in evaluation order.
pub mod themes {
    /// Account Access Issues.
    pub const ACCOUNT_ACCESS_KEYWORDS: &[&str] = &[
        "login",
        "log in",
        "password",
        "pin",
        "otp",
        "verify",
        "verification",
        "session",
    ];
    /// Transaction Performance.
    pub const TRANSACTION_PERFORMANCE_KEYWORDS: &[&str] = &[
        "slow",
        "delay",
        "delayed",
        "hang",
        "loading",
        "timeout",
        "transfer",
        "transaction",
    ];
    /// Crashes & Bugs.
    pub const CRASHES_BUGS_KEYWORDS: &[&str] = &[
        "crash", "crashes", "bug", "bugs", "freeze", "frozen", "stuck", "error", "fail",
        "problem",
    ];
    /// User Interface & Experience.
    pub const USER_INTERFACE_KEYWORDS: &[&str] = &[
        "interface",
        "ui",
        "ux",
        "design",
        "layout",
        "user friendly",
        "navigation",
        "easy to use",
    ];
    /// Feature Requests.
    pub const FEATURE_REQUEST_KEYWORDS: &[&str] = &[
        "add",
        "feature",
        "option",
        "doesn't have",
        "doesnt have",
        "missing",
        "please include",
    ];
    /// Customer Support.
    pub const CUSTOMER_SUPPORT_KEYWORDS: &[&str] =
        &["support", "help", "service", "customer care", "agent"];
}
