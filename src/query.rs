//! # Query Module
//!
//! Parsing of `/gastos` arguments into a tagged query type, plus the three
//! aggregate operations over a ledger snapshot.
//!
//! Dates are compared as strings throughout. Exact-match and range queries
//! are only coherent when all rows use the zero-padded `YYYY-MM-DD` form;
//! a row dated `2025-1-5` falls outside `desde:2025-01-01 hasta:2025-01-31`
//! under lexicographic comparison. Kept as is to match the stored data.

use log::debug;

use crate::ledger::{ExpenseRecord, Ledger};

/// A parsed `/gastos` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GastosQuery {
    /// All expenses on one exact date string.
    ByDate(String),
    /// Total spent in one category (case-insensitive).
    ByCategory(String),
    /// Total spent between two date strings, bounds inclusive.
    ByRange { desde: String, hasta: String },
    /// Anything that matches none of the recognized shapes.
    Invalid,
}

/// Parse the space-joined argument string of a `/gastos` command.
///
/// Recognizes the literal markers `fecha:`, `categoria:`, and the
/// `desde:`/`hasta:` pair, checked in that order of precedence.
///
/// # Examples
///
/// ```rust
/// use gastos_bot::query::{parse_query, GastosQuery};
///
/// assert_eq!(
///     parse_query("fecha:2025-01-05"),
///     GastosQuery::ByDate("2025-01-05".to_string())
/// );
/// assert_eq!(parse_query("total de enero"), GastosQuery::Invalid);
/// ```
pub fn parse_query(args: &str) -> GastosQuery {
    let query = if let Some((_, rest)) = args.split_once("fecha:") {
        GastosQuery::ByDate(rest.trim().to_string())
    } else if let Some((_, rest)) = args.split_once("categoria:") {
        GastosQuery::ByCategory(rest.trim().to_string())
    } else if args.contains("desde:") && args.contains("hasta:") {
        // "desde:A hasta:B": desde runs to the next space, hasta to the end.
        let desde = args
            .split_once("desde:")
            .map(|(_, rest)| rest.split(' ').next().unwrap_or("").to_string())
            .unwrap_or_default();
        let hasta = args
            .split_once("hasta:")
            .map(|(_, rest)| rest.trim().to_string())
            .unwrap_or_default();
        GastosQuery::ByRange { desde, hasta }
    } else {
        GastosQuery::Invalid
    };
    debug!("Parsed query args '{args}' into {query:?}");
    query
}

/// All records whose date field equals `fecha` exactly.
pub fn expenses_on<'a>(ledger: &'a Ledger, fecha: &str) -> Vec<&'a ExpenseRecord> {
    ledger
        .records()
        .iter()
        .filter(|record| record.date == fecha)
        .collect()
}

/// Sum of amounts in `category`, compared case-insensitively.
///
/// Returns `0.0` for an empty ledger or an unknown category; a query for
/// a category with no expenses is not an error.
pub fn total_for_category(ledger: &Ledger, category: &str) -> f64 {
    let wanted = category.to_lowercase();
    ledger
        .records()
        .iter()
        .filter(|record| record.category.to_lowercase() == wanted)
        .map(|record| record.amount)
        .sum()
}

/// Sum of amounts whose date string falls within `[desde, hasta]`.
///
/// Inclusive lexicographic comparison on the raw date strings.
pub fn total_in_range(ledger: &Ledger, desde: &str, hasta: &str) -> f64 {
    ledger
        .records()
        .iter()
        .filter(|record| record.date.as_str() >= desde && record.date.as_str() <= hasta)
        .map(|record| record.amount)
        .sum()
}
