//! # Gastos Telegram Bot
//!
//! A Telegram bot that logs expenses from a single authorized chat into a
//! shared CSV ledger hosted on GitHub. Receipt photos are run through a
//! remote OCR endpoint; the resulting text (or plain typed text) is parsed
//! into a structured expense record and appended to the ledger. Simple
//! aggregate queries (by date, category, or date range) are answered from
//! the same file.

pub mod bot;
pub mod config;
pub mod extractor;
pub mod ledger;
pub mod ocr;
pub mod query;
pub mod store;
