use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{LaunchDataset, LaunchRecord, Outcome};
use crate::error::DataError;

// Column names of the launch table.
pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";

const REQUIRED_COLUMNS: [&str; 4] = [COL_LAUNCH_SITE, COL_PAYLOAD, COL_CLASS, COL_BOOSTER_CATEGORY];

// Arrow columns are cast to Utf8 / Float64 before their cells are read.
const TEXT_COLUMNS: [&str; 3] = [COL_LAUNCH_SITE, COL_BOOSTER_CATEGORY, COL_BOOSTER_VERSION];
const NUMERIC_COLUMNS: [&str; 3] = [COL_PAYLOAD, COL_CLASS, COL_FLIGHT_NUMBER];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one launch per line (the dashboard's input)
/// * `.json`    – `[{ "Launch Site": ..., "class": 1, ... }, ...]`
/// * `.parquet` – same column names as the CSV
///
/// Any missing column or malformed row fails the whole load.
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading launch records from {}", path.display()))?;

    log::info!(
        "Loaded {} launches from {} ({} sites, {} booster categories)",
        dataset.len(),
        path.display(),
        dataset.sites.len(),
        dataset.booster_categories.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell – a single loosely-typed table value
// ---------------------------------------------------------------------------

/// A table cell as read from any of the supported formats, before it is
/// validated into a [`LaunchRecord`] field.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Integer(i) => Some(*i as f64),
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Null | Cell::Bool(_) => None,
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            Cell::Text(s) if !s.is_empty() => Some(s),
            Cell::Text(_) | Cell::Null => None,
            Cell::Integer(i) => Some(i.to_string()),
            Cell::Float(v) => Some(v.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    fn as_outcome(&self) -> Option<Outcome> {
        match self {
            Cell::Integer(i) => Outcome::from_class(*i),
            Cell::Bool(b) => Some(if *b { Outcome::Success } else { Outcome::Failure }),
            Cell::Float(_) | Cell::Text(_) => {
                let v = self.as_f64()?;
                if v == 0.0 {
                    Some(Outcome::Failure)
                } else if v == 1.0 {
                    Some(Outcome::Success)
                } else {
                    None
                }
            }
            Cell::Null => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("<null>"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Validate one row. `cell(name)` returns the row's value for a column
/// (`Cell::Null` when the column is absent). `row` is 1-based.
fn record_from_cells(
    row: usize,
    mut cell: impl FnMut(&str) -> Cell,
) -> std::result::Result<LaunchRecord, DataError> {
    let text = |column: &str, value: Cell| {
        value.into_text().ok_or_else(|| DataError::EmptyField {
            row,
            column: column.to_string(),
        })
    };

    let launch_site = text(COL_LAUNCH_SITE, cell(COL_LAUNCH_SITE))?;
    let booster_category = text(COL_BOOSTER_CATEGORY, cell(COL_BOOSTER_CATEGORY))?;

    let payload = cell(COL_PAYLOAD);
    let payload_mass_kg = payload
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::InvalidPayload {
            row,
            value: payload.to_string(),
        })?;

    let class = cell(COL_CLASS);
    let outcome = class.as_outcome().ok_or_else(|| DataError::InvalidOutcome {
        row,
        value: class.to_string(),
    })?;

    // Optional columns are informational only; unreadable values are dropped.
    let flight_number = cell(COL_FLIGHT_NUMBER)
        .as_f64()
        .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32);
    let booster_version = cell(COL_BOOSTER_VERSION).into_text();

    Ok(LaunchRecord {
        flight_number,
        launch_site,
        payload_mass_kg,
        outcome,
        booster_version,
        booster_category,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, extra columns (including an
/// unnamed pandas index column) are ignored.
fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DataError::MissingColumn(required.to_string()).into());
        }
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result.with_context(|| format!("CSV row {row}"))?;

        let rec = record_from_cells(row, |column| {
            headers
                .iter()
                .position(|h| h == column)
                .and_then(|idx| record.get(idx))
                .map(guess_cell_type)
                .unwrap_or(Cell::Null)
        })?;
        records.push(rec);
    }

    Ok(LaunchDataset::from_records(records))
}

fn guess_cell_type(s: &str) -> Cell {
    let s = s.trim();
    if s.is_empty() {
        return Cell::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Cell::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Cell::Float(f);
    }
    if s == "true" || s == "false" {
        return Cell::Bool(s == "true");
    }
    Cell::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Launch Site": "CCAFS LC-40", "Payload Mass (kg)": 0.0,
///     "class": 0, "Booster Version Category": "v1.0" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;

        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !obj.contains_key(**c)) {
            return Err(DataError::MissingColumn(missing.to_string()))
                .with_context(|| format!("Row {row}"));
        }

        let rec = record_from_cells(row, |column| {
            obj.get(column).map(json_to_cell).unwrap_or(Cell::Null)
        })?;
        records.push(rec);
    }

    Ok(LaunchDataset::from_records(records))
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the launch table.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): dictionary-encoded (categorical),
/// view and narrow numeric columns are cast to `Utf8` / `Float64` first. A
/// column that cannot be cast fails the load.
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    for required in REQUIRED_COLUMNS {
        if schema.index_of(required).is_err() {
            return Err(DataError::MissingColumn(required.to_string()).into());
        }
    }

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let batch_schema = batch.schema();

        let mut columns: Vec<(&str, ArrayRef)> = Vec::new();
        for name in TEXT_COLUMNS.into_iter().chain(NUMERIC_COLUMNS) {
            if let Ok(idx) = batch_schema.index_of(name) {
                columns.push((name, normalise_column(name, batch.column(idx))?));
            }
        }

        for batch_row in 0..batch.num_rows() {
            let row = records.len() + 1;
            let rec = record_from_cells(row, |column| {
                columns
                    .iter()
                    .find(|(name, _)| *name == column)
                    .map_or(Cell::Null, |(_, col)| extract_cell(col, batch_row))
            })?;
            records.push(rec);
        }
    }

    Ok(LaunchDataset::from_records(records))
}

/// Cast a launch-table column to `Utf8` (text columns) or `Float64`
/// (numeric columns).
fn normalise_column(name: &str, col: &ArrayRef) -> std::result::Result<ArrayRef, DataError> {
    let target = if TEXT_COLUMNS.contains(&name) {
        DataType::Utf8
    } else {
        DataType::Float64
    };
    if col.data_type() == &target {
        return Ok(col.clone());
    }
    cast(col, &target).map_err(|_| DataError::UnsupportedColumnType {
        column: name.to_string(),
        data_type: format!("{:?}", col.data_type()),
    })
}

/// Extract a single cell from a normalised (`Utf8` / `Float64`) column.
fn extract_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map_or(Cell::Null, |arr| Cell::Float(arr.value(row))),
        _ => Cell::Null,
    }
}
