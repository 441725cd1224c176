pub mod arrow;
pub mod types;

pub use self::arrow::{build_string_schema, require_columns, transformed_field};
pub use types::{TableSpec, CAMPAIGN, CLIENT, ECONOMICS, INPUT_COLUMNS, OUTPUT_TABLES};
