use crate::process::utils::{replace_column, string_column};
use crate::schema::transformed_field;
use crate::schema::types::{CAMPAIGN_OUTCOME, CREDIT_DEFAULT, MORTGAGE, PREVIOUS_OUTCOME};
use anyhow::{anyhow, Result};
use arrow::{
    array::{Array, ArrayRef, BooleanBuilder},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

/// Finite token → bool lookup. Anything not listed is rejected.
#[derive(Debug, Clone, Copy)]
pub struct BoolMapping {
    pub truthy: &'static [&'static str],
    pub falsy: &'static [&'static str],
}

impl BoolMapping {
    pub fn lookup(&self, token: &str) -> Option<bool> {
        if self.truthy.iter().any(|t| *t == token) {
            Some(true)
        } else if self.falsy.iter().any(|t| *t == token) {
            Some(false)
        } else {
            None
        }
    }
}

/// `yes` → true, `no`/`unknown` → false.
pub const YES_NO_UNKNOWN: BoolMapping = BoolMapping {
    truthy: &["yes"],
    falsy: &["no", "unknown"],
};

/// `success` → true, `nonexistent`/`failure` → false.
pub const PREVIOUS_OUTCOME_MAPPING: BoolMapping = BoolMapping {
    truthy: &["success"],
    falsy: &["nonexistent", "failure"],
};

/// Column → mapping, in the order the rules are applied.
pub const BOOL_COLUMNS: [(&str, BoolMapping); 4] = [
    (CREDIT_DEFAULT, YES_NO_UNKNOWN),
    (MORTGAGE, YES_NO_UNKNOWN),
    (CAMPAIGN_OUTCOME, YES_NO_UNKNOWN),
    (PREVIOUS_OUTCOME, PREVIOUS_OUTCOME_MAPPING),
];

/// Rewrite one Utf8 column as a non-null Boolean column.
///
/// The first value outside the mapping (or a missing value) aborts with the
/// column, the 1-based data row and the offending value.
pub fn coerce_bool_column(
    batch: &RecordBatch,
    name: &str,
    mapping: &BoolMapping,
) -> Result<RecordBatch> {
    let sarr = string_column(batch, name)?;
    let mut b = BooleanBuilder::with_capacity(sarr.len());
    let mut trues = 0usize;

    for (row, opt) in sarr.iter().enumerate() {
        let v = match opt {
            Some(s) => mapping.lookup(s).ok_or_else(|| {
                anyhow!(
                    "column {}: row {} has unmapped value {:?}",
                    name,
                    row + 1,
                    s
                )
            })?,
            None => {
                return Err(anyhow!(
                    "column {}: row {} is missing, expected one of {:?}",
                    name,
                    row + 1,
                    [mapping.truthy, mapping.falsy].concat()
                ))
            }
        };
        if v {
            trues += 1;
        }
        b.append_value(v);
    }
    debug!(column = name, trues, rows = sarr.len(), "coerced to bool");

    let field = transformed_field(name).ok_or_else(|| anyhow!("no target type for {}", name))?;
    replace_column(batch, field, Arc::new(b.finish()) as ArrayRef)
}

/// Apply every entry of [`BOOL_COLUMNS`].
pub fn coerce_bool_columns(batch: &RecordBatch) -> Result<RecordBatch> {
    let mut out = batch.clone();
    for (name, mapping) in BOOL_COLUMNS.iter() {
        out = coerce_bool_column(&out, name, mapping)?;
    }
    Ok(out)
}
