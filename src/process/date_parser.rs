use crate::process::utils::{string_column, upsert_column};
use crate::schema::transformed_field;
use crate::schema::types::{DAY, LAST_CONTACT_DATE, MONTH};
use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{ArrayRef, Date32Builder},
    datatypes::Date32Type,
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

/// `YYYY-Mon-DD`, e.g. `2022-may-13`.
pub const CONTACT_DATE_FORMAT: &str = "%Y-%b-%d";

/// Day-of-month as a plain integer, surrounding whitespace allowed.
pub fn parse_day(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Compose `year-month-day` and parse it with [`CONTACT_DATE_FORMAT`].
pub fn parse_contact_date(year: i32, month: &str, day: u32) -> Result<NaiveDate> {
    let composed = format!("{}-{}-{}", year, month, day);
    NaiveDate::parse_from_str(&composed, CONTACT_DATE_FORMAT)
        .with_context(|| format!("{:?} is not a calendar date", composed))
}

/// Append `last_contact_date` (Date32) built from `month` and `day`.
pub fn derive_last_contact_date(batch: &RecordBatch, year: i32) -> Result<RecordBatch> {
    let months = string_column(batch, MONTH)?;
    let days = string_column(batch, DAY)?;
    let mut b = Date32Builder::with_capacity(batch.num_rows());

    for (row, (month, day)) in months.iter().zip(days.iter()).enumerate() {
        let month = month.ok_or_else(|| anyhow!("row {}: month is missing", row + 1))?;
        let raw_day = day.ok_or_else(|| anyhow!("row {}: day is missing", row + 1))?;
        let day = parse_day(raw_day).ok_or_else(|| {
            anyhow!("row {}: day {:?} is not a whole number", row + 1, raw_day)
        })?;
        let date = parse_contact_date(year, month, day)
            .with_context(|| format!("row {}: invalid last contact date", row + 1))?;
        b.append_value(Date32Type::from_naive_date(date));
    }
    debug!(rows = batch.num_rows(), year, "derived last_contact_date");

    let field = transformed_field(LAST_CONTACT_DATE)
        .ok_or_else(|| anyhow!("no target type for {}", LAST_CONTACT_DATE))?;
    upsert_column(batch, field, Arc::new(b.finish()) as ArrayRef)
}
