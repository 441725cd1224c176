use crate::process::utils::{replace_column, string_column};
use crate::schema::transformed_field;
use crate::schema::types::{EDUCATION, JOB};
use anyhow::{anyhow, Result};
use arrow::{
    array::{Array, ArrayRef, StringArray},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

/// Columns whose `.` separators are rewritten to `_`.
pub const DOTTED_COLUMNS: [&str; 2] = [JOB, EDUCATION];

/// Replace every `.` with `_` in the given Utf8 columns. Nulls stay null.
pub fn replace_dots(batch: &RecordBatch, columns: &[&str]) -> Result<RecordBatch> {
    let mut out = batch.clone();
    for &name in columns {
        let sarr = string_column(&out, name)?;
        let touched = sarr.iter().flatten().filter(|s| s.contains('.')).count();
        let replaced: StringArray = sarr
            .iter()
            .map(|opt| opt.map(|s| s.replace('.', "_")))
            .collect();
        debug!(column = name, rows = touched, "replaced dots");

        let field = out.schema().field_with_name(name)?.clone();
        out = replace_column(&out, field, Arc::new(replaced) as ArrayRef)?;
    }
    Ok(out)
}

/// Turn the exact token `"unknown"` in `education` into a missing value.
pub fn education_unknown_to_null(batch: &RecordBatch) -> Result<RecordBatch> {
    let sarr = string_column(batch, EDUCATION)?;
    let nulled: StringArray = sarr
        .iter()
        .map(|opt| opt.filter(|s| *s != "unknown"))
        .collect();
    debug!(
        rows = nulled.null_count() - sarr.null_count(),
        "education unknown → null"
    );

    let field = transformed_field(EDUCATION)
        .ok_or_else(|| anyhow!("no target type for {}", EDUCATION))?;
    replace_column(batch, field, Arc::new(nulled) as ArrayRef)
}
