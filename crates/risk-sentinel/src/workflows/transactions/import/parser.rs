use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::str::FromStr;

use super::super::domain::TransactionEvent;
use super::ImportError;

pub(crate) fn parse_history<R: Read>(reader: R) -> Result<Vec<TransactionEvent>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut events = Vec::new();

    for (index, record) in csv_reader.deserialize::<HistoryRow>().enumerate() {
        let row = record?;
        let line = index + 1;

        let amount = Decimal::from_str(&row.amount).map_err(|_| ImportError::InvalidAmount {
            row: line,
            value: row.amount.clone(),
        })?;
        let timestamp =
            parse_timestamp(&row.timestamp).ok_or_else(|| ImportError::InvalidTimestamp {
                row: line,
                value: row.timestamp.clone(),
            })?;

        events.push(TransactionEvent {
            amount,
            timestamp,
            location: row.location,
        });
    }

    Ok(events)
}

pub(crate) fn parse_denylist<R: Read>(reader: R) -> Result<Vec<String>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut locations = Vec::new();

    for record in csv_reader.deserialize::<DenylistRow>() {
        if let Some(location) = record?.location {
            locations.push(location);
        }
    }

    Ok(locations)
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    #[serde(alias = "Amount")]
    amount: String,
    #[serde(alias = "Timestamp")]
    timestamp: String,
    #[serde(alias = "Location")]
    location: String,
}

#[derive(Debug, Deserialize)]
struct DenylistRow {
    #[serde(alias = "Location", default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// RFC 3339, or a bare `YYYY-MM-DD` read as midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
