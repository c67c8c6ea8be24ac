//! CSV loading for membership exports.
//!
//! Reads the export into [`Record`] structs. Columns are located by header
//! name (case-insensitive, any order); extra columns are ignored. The first
//! row that cannot be parsed aborts the load.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::{debug, info};
use tribes_core::error::{ReportError, Result};
use tribes_core::models::Record;
use tribes_core::time_utils::parse_date;

pub const DATE_COLUMN: &str = "Date";
pub const USERNAME_COLUMN: &str = "Triber Username";
pub const PRICE_COLUMN: &str = "Tier Price";
pub const TIER_COLUMN: &str = "Tier";

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every record from the CSV file at `path`.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let records = read_records(BufReader::new(file))?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse records from any CSV source whose first line is the header.
///
/// An empty source yields no records.
pub fn read_records<R: Read>(source: R) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let columns = ColumnIndex::from_headers(reader.headers()?);
    debug!("Resolved columns: {:?}", columns);

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        records.push(columns.parse_row(&row, line)?);
    }

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Position of each required column in the header, if present.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    date: Option<usize>,
    username: Option<usize>,
    price: Option<usize>,
    tier: Option<usize>,
}

impl ColumnIndex {
    /// Match header names ignoring case and surrounding whitespace.
    /// The first matching header wins.
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Self {
            date: find(DATE_COLUMN),
            username: find(USERNAME_COLUMN),
            price: find(PRICE_COLUMN),
            tier: find(TIER_COLUMN),
        }
    }

    fn parse_row(&self, row: &StringRecord, line: u64) -> Result<Record> {
        let raw_date = field(row, self.date, DATE_COLUMN, line)?;
        let username = field(row, self.username, USERNAME_COLUMN, line)?;
        let raw_price = field(row, self.price, PRICE_COLUMN, line)?;
        let tier = field(row, self.tier, TIER_COLUMN, line)?;

        let date = parse_date(raw_date).ok_or_else(|| ReportError::DateParse {
            value: raw_date.to_string(),
            line,
        })?;

        if username.trim().is_empty() {
            return Err(ReportError::EmptyField {
                column: USERNAME_COLUMN,
                line,
            });
        }

        let price = parse_price(raw_price).ok_or_else(|| ReportError::PriceParse {
            value: raw_price.to_string(),
            line,
        })?;

        Ok(Record::new(date, username, price, tier))
    }
}

/// Fetch the field at `index`, failing when the column is absent from the
/// header or the row is too short to reach it.
fn field<'r>(
    row: &'r StringRecord,
    index: Option<usize>,
    column: &'static str,
    line: u64,
) -> Result<&'r str> {
    index
        .and_then(|i| row.get(i))
        .ok_or(ReportError::MissingColumn { column, line })
}

/// Invariant-culture decimal: optional sign, ASCII digits, at most one `.`.
/// No digit grouping, exponent or `_` separators.
fn parse_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if !is_plain_decimal(trimmed) {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

fn is_plain_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    !(int.is_empty() && frac.is_empty()) && digits(int) && digits(frac)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
