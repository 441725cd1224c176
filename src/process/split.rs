// src/process/split.rs
use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, BooleanArray, StringArray},
    csv::WriterBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info, instrument, warn};

use crate::schema::TableSpec;

/// One output file that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenTable {
    pub name: &'static str,
    pub path: PathBuf,
    pub rows: usize,
}

/// Select `spec.columns` (in that order) from the transformed table.
pub fn project_table(batch: &RecordBatch, spec: &TableSpec) -> Result<RecordBatch> {
    let schema = batch.schema();
    let indices = spec
        .columns
        .iter()
        .map(|name| {
            schema
                .index_of(name)
                .with_context(|| format!("{} table needs column {}", spec.name, name))
        })
        .collect::<Result<Vec<usize>>>()?;

    batch
        .project(&indices)
        .with_context(|| format!("projecting {} table", spec.name))
}

/// Build every table up front so nothing is written if any projection fails.
pub fn project_tables(batch: &RecordBatch, specs: &[TableSpec]) -> Result<Vec<RecordBatch>> {
    specs.iter().map(|spec| project_table(batch, spec)).collect()
}

/// Boolean columns → Utf8 `True`/`False`; nulls stay null, other columns untouched.
pub fn render_bools(batch: &RecordBatch) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut cols = Vec::with_capacity(batch.num_columns());

    let schema = batch.schema();
    for (arr, fld) in batch.columns().iter().zip(schema.fields()) {
        match arr.as_any().downcast_ref::<BooleanArray>() {
            Some(barr) => {
                let rendered: StringArray = barr
                    .iter()
                    .map(|opt| opt.map(|v| if v { "True" } else { "False" }))
                    .collect();
                fields.push(Field::new(fld.name(), DataType::Utf8, fld.is_nullable()));
                cols.push(Arc::new(rendered) as ArrayRef);
            }
            None => {
                fields.push(fld.as_ref().clone());
                cols.push(arr.clone());
            }
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), cols).context("rendering bool columns")
}

/// Write `batch` as CSV with a header row and no index column.
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let batch = render_bools(batch)?;
    let file = File::create(path).with_context(|| format!("creating file {}", path.display()))?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    writer
        .write(&batch)
        .with_context(|| format!("writing CSV to {}", path.display()))?;

    let mut inner = writer.into_inner();
    inner
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn tmp_path(out_dir: &Path, file_name: &str) -> PathBuf {
    out_dir.join(format!(".{}.tmp", file_name))
}

/// Project and write every table in `specs` into `out_dir`.
///
/// Each table goes to a hidden temp file first; the temp files are renamed
/// over the final names only once all of them were written.
#[instrument(level = "info", skip(batch, specs), fields(out_dir = %out_dir.display()))]
pub fn split_to_csv(
    batch: &RecordBatch,
    specs: &[TableSpec],
    out_dir: &Path,
) -> Result<Vec<WrittenTable>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let tables = project_tables(batch, specs)?;

    let mut staged: Vec<PathBuf> = Vec::with_capacity(specs.len());
    for (spec, table) in specs.iter().zip(&tables) {
        let tmp = tmp_path(out_dir, spec.file_name);
        staged.push(tmp.clone());
        if let Err(e) = write_csv(table, &tmp) {
            discard(&staged);
            return Err(e.context(format!("writing {} table", spec.name)));
        }
        debug!(table = spec.name, tmp = %tmp.display(), "staged");
    }

    let mut written = Vec::with_capacity(specs.len());
    for (i, ((spec, table), tmp)) in specs.iter().zip(&tables).zip(&staged).enumerate() {
        let path = out_dir.join(spec.file_name);
        if let Err(e) = fs::rename(tmp, &path) {
            discard(&staged[i..]);
            return Err(e).with_context(|| format!("renaming {:?} -> {:?}", tmp, path));
        }
        info!(
            table = spec.name,
            rows = table.num_rows(),
            path = %path.display(),
            "wrote"
        );
        written.push(WrittenTable {
            name: spec.name,
            path,
            rows: table.num_rows(),
        });
    }

    Ok(written)
}

fn discard(paths: &[PathBuf]) {
    for p in paths {
        if p.exists() {
            if let Err(e) = fs::remove_file(p) {
                warn!("failed to remove {}: {}", p.display(), e);
            }
        }
    }
}
