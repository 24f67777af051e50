//! # Ledger Module
//!
//! The in-memory expense ledger and its CSV persistence format.
//!
//! The ledger is an ordered list of expense records serialized as a UTF-8
//! CSV table with the fixed header `fecha,monto,categoria,descripcion`.
//! Insertion order is append order; there is no key, no index, and no
//! uniqueness constraint. The remote store owns the durable copy — this
//! type only ever holds a full snapshot fetched from it.

use serde::{Deserialize, Serialize};

/// Column header of the ledger CSV. Never changes across writes.
pub const CSV_HEADER: [&str; 4] = ["fecha", "monto", "categoria", "descripcion"];

/// A single expense, produced by the extractor from one message.
///
/// Immutable once appended: this system never updates or deletes rows.
/// The date is kept as the string the extractor matched; it is compared
/// as a string everywhere (see the query module for the consequences).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// Ordered sequence of expense records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
}

impl Ledger {
    /// Create a ledger with no records (serializes to the header row only).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record at the end, preserving arrival order.
    pub fn push(&mut self, record: ExpenseRecord) {
        self.records.push(record);
    }

    /// Parse a ledger from CSV text (header row expected).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gastos_bot::ledger::Ledger;
    ///
    /// let csv = "fecha,monto,categoria,descripcion\n2025-01-05,500.0,general,cena\n";
    /// let ledger = Ledger::from_csv(csv)?;
    /// assert_eq!(ledger.len(), 1);
    /// assert_eq!(ledger.records()[0].amount, 500.0);
    /// # Ok::<(), csv::Error>(())
    /// ```
    pub fn from_csv(data: &str) -> Result<Self, csv::Error> {
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(Self { records })
    }

    /// Serialize the full ledger (header + all rows) to CSV text.
    ///
    /// The header is written explicitly so an empty ledger still produces
    /// a valid one-line file. Standard CSV quoting applies to descriptions
    /// containing commas or newlines.
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;
        // The writer only ever receives UTF-8.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
