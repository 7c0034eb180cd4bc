use crate::error::PipelineError;
use crate::types::{
    CoercionWarning, CountryRecord, ANDROID_COLUMN, COUNTRY_COLUMN, IOS_COLUMN,
};
use anyhow::{Context, Result, anyhow};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::path::Path;

/// Parsed CSV: the header row plus every data row, in file order.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

/// Positions of the three columns the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub country: usize,
    pub ios: usize,
    pub android: usize,
}

impl ColumnIndex {
    /// Returns the names of the absent columns on failure.
    pub fn locate(headers: &StringRecord) -> std::result::Result<Self, Vec<&'static str>> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        match (find(COUNTRY_COLUMN), find(IOS_COLUMN), find(ANDROID_COLUMN)) {
            (Some(country), Some(ios), Some(android)) => Ok(ColumnIndex { country, ios, android }),
            (country, ios, android) => {
                let missing = [
                    (COUNTRY_COLUMN, country),
                    (IOS_COLUMN, ios),
                    (ANDROID_COLUMN, android),
                ]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name)
                .collect();
                Err(missing)
            }
        }
    }
}

/// Loads the bundled dataset for the static builder. The file is trusted, so a missing
/// column is a startup failure rather than a user-facing message.
pub fn load_csv_file(path: &Path) -> Result<Vec<CountryRecord>> {
    tracing::info!("Loading data from {:?}...", path);

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    let table = parse_table(&text)
        .with_context(|| format!("Failed to parse CSV file: {:?}", path))?;
    let columns = ColumnIndex::locate(&table.headers)
        .map_err(|missing| anyhow!("Columns {:?} not found in CSV {:?}", missing, path))?;

    let (records, warnings) = coerce_records(&table, columns);
    log_coercion_warnings(&path.display().to_string(), &warnings);
    tracing::info!("Loaded CSV data for {} countries", records.len());

    Ok(records)
}

/// Splits a `data:<mime>;base64,<payload>` string on its first comma and decodes the
/// payload to UTF-8 text.
pub fn decode_data_url(contents: &str) -> std::result::Result<String, PipelineError> {
    let (_descriptor, payload) = contents
        .split_once(',')
        .ok_or_else(|| PipelineError::parse("upload is not a data URL (no ',' separator)"))?;

    let bytes = STANDARD.decode(payload.trim()).map_err(PipelineError::parse)?;
    String::from_utf8(bytes).map_err(|e| PipelineError::parse(e.utf8_error()))
}

pub fn parse_table(text: &str) -> std::result::Result<Table, PipelineError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());

    let headers = rdr.headers().map_err(PipelineError::parse)?.clone();
    if headers.is_empty() {
        return Err(PipelineError::parse("no columns to parse from file"));
    }

    // Short rows are padded with missing cells later; long rows cannot be attributed to a column.
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(PipelineError::parse)?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(PipelineError::parse(format!(
                "Error tokenizing data. Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            )));
        }
        rows.push(record);
    }

    Ok(Table { headers, rows })
}

pub fn validate_schema(table: &Table) -> std::result::Result<ColumnIndex, PipelineError> {
    ColumnIndex::locate(&table.headers).map_err(PipelineError::schema)
}

/// Builds typed records in row order. Rows with an empty country are dropped; percentage
/// cells that are not numbers become `None` and are reported as warnings.
pub fn coerce_records(table: &Table, columns: ColumnIndex) -> (Vec<CountryRecord>, Vec<CoercionWarning>) {
    let mut records = Vec::with_capacity(table.rows.len());
    let mut warnings = Vec::new();

    for (row_idx, row) in table.rows.iter().enumerate() {
        let country = row.get(columns.country).unwrap_or("").trim();
        if country.is_empty() {
            tracing::debug!(row = row_idx, "skipping row without a country");
            continue;
        }

        let mut coerce = |column: &'static str, idx: usize| {
            let raw = row.get(idx).unwrap_or("");
            let value = coerce_percentage(raw);
            if value.is_none() && !raw.trim().is_empty() {
                warnings.push(CoercionWarning {
                    row: row_idx,
                    column,
                    value: raw.to_string(),
                });
            }
            value
        };

        let ios_percentage = coerce(IOS_COLUMN, columns.ios);
        let android_percentage = coerce(ANDROID_COLUMN, columns.android);

        records.push(CountryRecord {
            country: country.to_string(),
            ios_percentage,
            android_percentage,
        });
    }

    (records, warnings)
}

pub fn log_coercion_warnings(source: &str, warnings: &[CoercionWarning]) {
    if warnings.is_empty() {
        return;
    }
    tracing::warn!(source, cells = warnings.len(), "non-numeric percentage cells treated as missing");
    for warning in warnings {
        tracing::debug!(
            source,
            row = warning.row,
            column = warning.column,
            value = %warning.value,
            "coerced to missing"
        );
    }
}

pub fn coerce_percentage(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
