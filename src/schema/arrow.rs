// src/schema/arrow.rs

use anyhow::{anyhow, Result};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;

use super::types::{
    CAMPAIGN_OUTCOME, CREDIT_DEFAULT, EDUCATION, LAST_CONTACT_DATE, MORTGAGE, PREVIOUS_OUTCOME,
};

/// Build the read schema: every header becomes a nullable Utf8 field so
/// passthrough columns reach the output exactly as they were written.
pub fn build_string_schema(headers: &[String]) -> SchemaRef {
    let fields: Vec<Field> = headers
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, /* nullable = */ true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Final type of a column once every rule has run.
///
/// - coerced yes/no and outcome columns → Boolean (never null)
/// - last_contact_date                  → Date32 (never null)
/// - education                          → Utf8 (nullable, "unknown" is null)
/// - everything else                    → untouched
pub fn transformed_field(name: &str) -> Option<Field> {
    match name {
        CREDIT_DEFAULT | MORTGAGE | CAMPAIGN_OUTCOME | PREVIOUS_OUTCOME => {
            Some(Field::new(name, DataType::Boolean, false))
        }
        LAST_CONTACT_DATE => Some(Field::new(name, DataType::Date32, false)),
        EDUCATION => Some(Field::new(name, DataType::Utf8, true)),
        _ => None,
    }
}

/// Fail with every missing name at once rather than the first one.
pub fn require_columns(schema: &Schema, required: &[&str]) -> Result<()> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| schema.index_of(name).is_err())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "input is missing required column(s): {}",
            missing.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{CLIENT_ID, DAY, INPUT_COLUMNS, MONTH};

    #[test]
    fn string_schema_keeps_header_order() {
        let headers = vec!["b".to_string(), "a".to_string()];
        let schema = build_string_schema(&headers);
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(schema
            .fields()
            .iter()
            .all(|f| f.data_type() == &DataType::Utf8 && f.is_nullable()));
    }

    #[test]
    fn require_columns_lists_all_missing() {
        let schema = build_string_schema(&[CLIENT_ID.to_string(), DAY.to_string()]);
        let err = require_columns(&schema, INPUT_COLUMNS).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(MONTH));
        assert!(msg.contains(EDUCATION));
        assert!(!msg.contains(CLIENT_ID));
    }

    #[test]
    fn transformed_types() {
        assert_eq!(
            transformed_field(MORTGAGE).unwrap().data_type(),
            &DataType::Boolean
        );
        assert_eq!(
            transformed_field(LAST_CONTACT_DATE).unwrap().data_type(),
            &DataType::Date32
        );
        assert!(transformed_field(EDUCATION).unwrap().is_nullable());
        assert!(transformed_field("age").is_none());
    }
}
