use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{Field, FieldRef, Schema},
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Split a header line into cleaned column names. A leading UTF-8 BOM is dropped.
pub fn parse_headers(line: &str) -> Vec<String> {
    line.trim_start_matches('\u{feff}')
        .trim_end_matches(['\r', '\n'])
        .split(',')
        .map(clean_str)
        .collect()
}

/// Borrow column `name` as a Utf8 array.
pub fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    let idx = batch
        .schema()
        .index_of(name)
        .with_context(|| format!("column {} not found", name))?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| anyhow!("column {} is not Utf8", name))
}

/// Swap column `field.name()` for `array`, keeping its position.
pub fn replace_column(batch: &RecordBatch, field: Field, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let idx = schema
        .index_of(field.name())
        .with_context(|| format!("column {} not found", field.name()))?;

    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut cols = batch.columns().to_vec();
    fields[idx] = Arc::new(field);
    cols[idx] = array;

    RecordBatch::try_new(Arc::new(Schema::new(fields)), cols)
        .with_context(|| format!("replacing column #{}", idx))
}

/// Add `array` as the last column, or replace it if the name already exists.
pub fn upsert_column(batch: &RecordBatch, field: Field, array: ArrayRef) -> Result<RecordBatch> {
    if batch.schema().index_of(field.name()).is_ok() {
        return replace_column(batch, field, array);
    }

    let mut fields: Vec<FieldRef> = batch.schema().fields().iter().cloned().collect();
    let mut cols = batch.columns().to_vec();
    let name = field.name().clone();
    fields.push(Arc::new(field));
    cols.push(array);

    RecordBatch::try_new(Arc::new(Schema::new(fields)), cols)
        .with_context(|| format!("appending column {}", name))
}
