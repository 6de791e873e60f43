//! Candidate names from the experimental metadata catalog.
//!
//! The catalog is a Parquet table of per-observation metadata. Compound names
//! live in a single string column (`drug` by default), often stored as a
//! dictionary-encoded categorical.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use arrow_array::cast::AsArray;
use arrow_schema::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use tracing::{debug, info};

use crate::{ResolveError, Result};

/// Column holding compound names in the observation metadata.
pub const DEFAULT_NAME_COLUMN: &str = "drug";

/// `<base>/metadata/obs_metadata.parquet`
pub fn catalog_path(base: impl AsRef<Path>) -> PathBuf {
    base.as_ref().join("metadata").join("obs_metadata.parquet")
}

/// Unique non-null values of a string column.
pub fn read_column(path: impl AsRef<Path>, column: &str) -> Result<BTreeSet<String>> {
    let path = path.as_ref();
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;

    let index = builder.schema().index_of(column).map_err(|_| {
        ResolveError::Catalog(format!("column '{}' not found in {}", column, path.display()))
    })?;
    let data_type = builder.schema().field(index).data_type().clone();
    if !is_string_like(&data_type) {
        return Err(ResolveError::Catalog(format!(
            "column '{}' in {} is {}, not a string column",
            column,
            path.display(),
            data_type
        )));
    }

    let mask = ProjectionMask::roots(builder.parquet_schema(), [index]);
    let reader = builder.with_projection(mask).build()?;

    let mut names = BTreeSet::new();
    let mut rows = 0usize;
    for batch in reader {
        let batch = batch?;
        rows += batch.num_rows();
        let array = batch
            .column_by_name(column)
            .ok_or_else(|| ResolveError::Catalog(format!("column '{}' missing from batch", column)))?;
        let strings = arrow_cast::cast(array, &DataType::Utf8)?;
        let strings = strings
            .as_string_opt::<i32>()
            .ok_or_else(|| ResolveError::Catalog(format!("column '{}' did not cast to Utf8", column)))?;
        names.extend(strings.iter().flatten().map(String::from));
        debug!(rows, unique = names.len(), "Read catalog batch");
    }

    info!(path = %path.display(), column, rows, unique = names.len(), "Loaded compound names");
    Ok(names)
}

fn is_string_like(data_type: &DataType) -> bool {
    match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => true,
        DataType::Dictionary(_, values) => is_string_like(values),
        _ => false,
    }
}
