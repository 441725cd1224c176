// src/process/mod.rs
use anyhow::{anyhow, Context, Result};
use arrow::{compute::concat_batches, csv::ReaderBuilder, record_batch::RecordBatch};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    time::Instant,
};
use tracing::{debug, info, instrument};

use crate::{
    config::Config,
    schema::{build_string_schema, require_columns, INPUT_COLUMNS, OUTPUT_TABLES},
};

pub mod convert;
pub mod date_parser;
pub mod normalize;
pub mod split;
pub mod utils;

pub use split::WrittenTable;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub input_rows: usize,
    pub tables: Vec<WrittenTable>,
}

/// Read the whole input CSV into a single all-Utf8 batch.
///
/// Empty fields come back as nulls (missing values).
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_input<P: AsRef<Path>>(path: P, batch_size: usize) -> Result<RecordBatch> {
    let path = path.as_ref();

    // 1) Header line → all-string schema
    let file = File::open(path).with_context(|| format!("opening input {}", path.display()))?;
    let mut header_line = String::new();
    BufReader::new(file)
        .read_line(&mut header_line)
        .with_context(|| format!("reading header of {}", path.display()))?;
    if header_line.trim().is_empty() {
        return Err(anyhow!("{} has no header row", path.display()));
    }
    let headers = utils::parse_headers(&header_line);
    let schema = build_string_schema(&headers);
    require_columns(&schema, INPUT_COLUMNS)?;
    debug!(columns = headers.len(), "parsed header");

    // 2) Stream every batch, then glue them into one table
    let file = File::open(path).with_context(|| format!("opening input {}", path.display()))?;
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(batch_size.max(1))
        .with_quote(b'"')
        .with_delimiter(b',')
        .build(BufReader::new(file))
        .context("creating CSV reader")?;

    let batches = reader
        .enumerate()
        .map(|(i, b)| b.with_context(|| format!("reading CSV batch #{}", i)))
        .collect::<Result<Vec<RecordBatch>>>()?;
    let batch = concat_batches(&schema, &batches).context("concatenating input batches")?;

    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded input"
    );
    Ok(batch)
}

/// Apply every field rule to the loaded table, in order:
/// dots → underscores, education unknown → null, boolean coercion,
/// last_contact_date derivation.
#[instrument(level = "info", skip(batch), fields(rows = batch.num_rows()))]
pub fn transform(batch: &RecordBatch, contact_year: i32) -> Result<RecordBatch> {
    let out = normalize::replace_dots(batch, &normalize::DOTTED_COLUMNS)
        .context("normalizing text columns")?;
    let out = normalize::education_unknown_to_null(&out).context("nulling unknown education")?;
    let out = convert::coerce_bool_columns(&out).context("coercing boolean columns")?;
    let out = date_parser::derive_last_contact_date(&out, contact_year)
        .context("deriving last_contact_date")?;
    Ok(out)
}

/// Load, transform and split into `client.csv`, `campaign.csv`, `economics.csv`.
pub fn run(config: &Config) -> Result<RunSummary> {
    let start = Instant::now();

    let input = load_input(&config.input_path, config.batch_size)?;
    let transformed = transform(&input, config.contact_year)?;
    let tables = split::split_to_csv(&transformed, &OUTPUT_TABLES, &config.output_dir)?;

    info!(elapsed = ?start.elapsed(), "run complete");
    Ok(RunSummary {
        input_rows: input.num_rows(),
        tables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::*;
    use arrow::array::{Array, BooleanArray, Date32Array, StringArray};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;
    use tracing_subscriber::{fmt, EnvFilter};

    fn init_logging() {
        let _ = fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_target(false)
            .with_test_writer()
            .try_init();
    }

    const HEADER: &str = "client_id,age,job,marital,education,credit_default,mortgage,month,day,number_contacts,contact_duration,previous_campaign_contacts,previous_outcome,campaign_outcome,cons_price_idx,euribor_three_months";

    fn fixture() -> String {
        [
            HEADER,
            "0,56,housemaid,married,basic.4y,no,no,may,13,1,261,0,nonexistent,no,93.994,4.857",
            "1,57,services,married,high_school,unknown,no,may,19,1,149,0,nonexistent,no,93.994,4.857",
            "2,37,admin.,married,unknown,yes,unknown,may,13,1,226,0,success,no,93.994,4.857",
            "3,40,\"blue-collar\",single,university.degree,no,yes,aug,30,2,151,1,failure,yes,92.201,0.884",
        ]
        .join("\n")
            + "\n"
    }

    fn write_input(dir: &Path, body: &str) -> Result<std::path::PathBuf> {
        let path = dir.join("bank_marketing.csv");
        fs::write(&path, body)?;
        Ok(path)
    }

    fn col<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> &'a T {
        let idx = batch.schema().index_of(name).unwrap();
        batch.column(idx).as_any().downcast_ref::<T>().unwrap()
    }

    #[test]
    fn load_reads_every_row_as_strings() -> Result<()> {
        init_logging();
        let dir = tempdir()?;
        let path = write_input(dir.path(), &fixture())?;

        let batch = load_input(&path, 2)?;
        assert_eq!(batch.num_rows(), 4);
        assert_eq!(batch.num_columns(), INPUT_COLUMNS.len());
        assert_eq!(col::<StringArray>(&batch, JOB).value(3), "blue-collar");
        Ok(())
    }

    #[test]
    fn load_missing_file_fails_with_path() {
        let err = load_input("/definitely/not/here.csv", 10).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn load_rejects_missing_columns() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(dir.path(), "client_id,age\n1,2\n")?;
        let err = load_input(&path, 10).unwrap_err();
        assert!(err.to_string().contains("euribor_three_months"));
        Ok(())
    }

    #[test]
    fn transform_matches_worked_example() -> Result<()> {
        init_logging();
        let dir = tempdir()?;
        let path = write_input(dir.path(), &fixture())?;
        let out = transform(&load_input(&path, 1024)?, 2022)?;

        // row 2: admin. / unknown / yes / unknown / no / success / may 13
        assert_eq!(col::<StringArray>(&out, JOB).value(2), "admin_");
        assert!(col::<StringArray>(&out, EDUCATION).is_null(2));
        assert!(col::<BooleanArray>(&out, CREDIT_DEFAULT).value(2));
        assert!(!col::<BooleanArray>(&out, MORTGAGE).value(2));
        assert!(!col::<BooleanArray>(&out, CAMPAIGN_OUTCOME).value(2));
        assert!(col::<BooleanArray>(&out, PREVIOUS_OUTCOME).value(2));
        assert_eq!(
            col::<Date32Array>(&out, LAST_CONTACT_DATE).value_as_date(2),
            NaiveDate::from_ymd_opt(2022, 5, 13)
        );

        assert_eq!(col::<StringArray>(&out, EDUCATION).value(0), "basic_4y");
        assert_eq!(
            col::<StringArray>(&out, EDUCATION).value(3),
            "university_degree"
        );
        // passthrough untouched
        assert_eq!(col::<StringArray>(&out, EURIBOR_THREE_MONTHS).value(3), "0.884");
        Ok(())
    }

    #[test]
    fn run_writes_three_aligned_files() -> Result<()> {
        init_logging();
        let dir = tempdir()?;
        let path = write_input(dir.path(), &fixture())?;
        let out_dir = dir.path().join("out");
        let cfg = Config::default().with_input(&path).with_output_dir(&out_dir);

        let summary = run(&cfg)?;
        assert_eq!(summary.input_rows, 4);
        assert_eq!(summary.tables.len(), 3);
        assert!(summary.tables.iter().all(|t| t.rows == 4));

        let client = fs::read_to_string(out_dir.join("client.csv"))?;
        let campaign = fs::read_to_string(out_dir.join("campaign.csv"))?;
        let economics = fs::read_to_string(out_dir.join("economics.csv"))?;

        let client: Vec<&str> = client.lines().collect();
        assert_eq!(
            client[0],
            "client_id,age,job,marital,education,credit_default,mortgage"
        );
        assert_eq!(client[3], "2,37,admin_,married,,True,False");

        let campaign: Vec<&str> = campaign.lines().collect();
        assert_eq!(
            campaign[0],
            "client_id,number_contacts,contact_duration,previous_campaign_contacts,previous_outcome,campaign_outcome,last_contact_date"
        );
        assert_eq!(campaign[3], "2,1,226,0,True,False,2022-05-13");
        assert_eq!(campaign[4], "3,2,151,1,False,True,2022-08-30");

        let economics: Vec<&str> = economics.lines().collect();
        assert_eq!(economics[0], "client_id,cons_price_idx,euribor_three_months");

        // every client_id once per table, in input order
        for lines in [&client, &campaign, &economics] {
            let ids: Vec<&str> = lines[1..]
                .iter()
                .map(|l| l.split(',').next().unwrap())
                .collect();
            assert_eq!(ids, vec!["0", "1", "2", "3"]);
        }
        Ok(())
    }

    #[test]
    fn byte_order_mark_does_not_hide_first_column() -> Result<()> {
        let dir = tempdir()?;
        let path = write_input(dir.path(), &format!("\u{feff}{}", fixture()))?;
        let out_dir = dir.path().join("out");
        let cfg = Config::default().with_input(&path).with_output_dir(&out_dir);

        let summary = run(&cfg)?;
        assert_eq!(summary.input_rows, 4);

        let economics = fs::read_to_string(out_dir.join("economics.csv"))?;
        assert!(economics.starts_with("client_id,cons_price_idx,euribor_three_months\n0,"));
        Ok(())
    }

    #[test]
    fn fractional_day_aborts_run() -> Result<()> {
        let dir = tempdir()?;
        let body = fixture().replace("may,13,1,226", "may,1e1,1,226");
        let path = write_input(dir.path(), &body)?;
        let out_dir = dir.path().join("out");
        let cfg = Config::default().with_input(&path).with_output_dir(&out_dir);

        let err = run(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("row 3"));
        assert!(!out_dir.join("campaign.csv").exists());
        Ok(())
    }

    #[test]
    fn bad_category_aborts_before_any_output() -> Result<()> {
        let dir = tempdir()?;
        let body = fixture().replace(
            "1,57,services,married,high_school,unknown",
            "1,57,services,married,high_school,maybe",
        );
        let path = write_input(dir.path(), &body)?;
        let out_dir = dir.path().join("out");
        let cfg = Config::default().with_input(&path).with_output_dir(&out_dir);

        let err = run(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("maybe"));
        assert!(!out_dir.join("client.csv").exists());
        assert!(!out_dir.join("campaign.csv").exists());
        assert!(!out_dir.join("economics.csv").exists());
        Ok(())
    }

    #[test]
    fn invalid_date_aborts_run() -> Result<()> {
        let dir = tempdir()?;
        let body = fixture().replace("aug,30", "feb,30");
        let path = write_input(dir.path(), &body)?;
        let cfg = Config::default()
            .with_input(&path)
            .with_output_dir(dir.path().join("out"));

        let err = run(&cfg).unwrap_err();
        assert!(format!("{:#}", err).contains("row 4"));
        Ok(())
    }
}
