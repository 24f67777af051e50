//! # Expense Extraction Module
//!
//! Turns raw message text (typed or OCR output) into an [`ExpenseRecord`].
//!
//! ## Features
//!
//! - Date detection for `DD/MM/YYYY` and `YYYY-MM-DD` tokens
//! - Amount detection with optional `$` sign and thousands separators
//! - Category assignment from an open keyword table
//!
//! Extraction is a total function: missing fields fall back to defaults
//! (fixed date, zero amount, `"general"` category) and the whole input is
//! kept verbatim as the description. It never fails.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::ledger::ExpenseRecord;

/// Date recorded when the text carries no recognizable date token.
///
/// A fixed constant rather than "today" — known limitation inherited from
/// the original ledger data, kept so old and new rows stay comparable.
pub const DEFAULT_DATE: &str = "2025-11-25";

/// Category recorded when no keyword rule matches.
pub const DEFAULT_CATEGORY: &str = "general";

/// Keyword table mapping lowercase substrings to a category label.
///
/// First rule with any matching keyword wins. Extend by adding rows here;
/// nothing else in the crate needs to change.
pub const CATEGORY_KEYWORDS: &[(&[&str], &str)] = &[
    (&["supermercado", "coto"], "supermercado"),
    (&["farmacia"], "farmacia"),
];

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"\b(\d{1,2}/\d{1,2}/\d{4}|\d{4}-\d{2}-\d{2})\b")
        .expect("date pattern should be valid");
    static ref AMOUNT_RE: Regex =
        Regex::new(r"\$?(\d+(?:\.\d{2})?)").expect("amount pattern should be valid");
}

/// Extract a structured expense record from free-form text.
///
/// # Examples
///
/// ```rust
/// use gastos_bot::extractor::extract;
///
/// let record = extract("Compra en COTO supermercado $500");
/// assert_eq!(record.category, "supermercado");
/// assert_eq!(record.amount, 500.0);
/// assert_eq!(record.description, "Compra en COTO supermercado $500");
/// ```
pub fn extract(text: &str) -> ExpenseRecord {
    let record = ExpenseRecord {
        date: extract_date(text),
        amount: extract_amount(text),
        category: match_category(text),
        description: text.to_string(),
    };
    debug!(
        "Extracted record: {} / {} / {}",
        record.date, record.amount, record.category
    );
    record
}

/// First `DD/MM/YYYY` or `YYYY-MM-DD` token in the text, or [`DEFAULT_DATE`].
pub fn extract_date(text: &str) -> String {
    DATE_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_DATE.to_string())
}

/// First amount-like token in the text, parsed as a decimal.
///
/// Thousands-separator commas are stripped before matching, so `1,234.56`
/// parses as `1234.56`. The first match wins even when a later token looks
/// more like a price: digits from a leading date can shadow a `$` amount
/// further on. That is the recorded-data behavior and is kept as is.
pub fn extract_amount(text: &str) -> f64 {
    let stripped = text.replace(',', "");
    AMOUNT_RE
        .captures(&stripped)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Category from the first matching rule in [`CATEGORY_KEYWORDS`].
///
/// Matching is a case-insensitive substring test against the whole text.
pub fn match_category(text: &str) -> String {
    let lowered = text.to_lowercase();
    for (keywords, category) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return (*category).to_string();
        }
    }
    DEFAULT_CATEGORY.to_string()
}
