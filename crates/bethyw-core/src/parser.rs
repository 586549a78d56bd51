//! Parsers for the three source layouts
//!
//! Every parser reads its header, applies the import filters before
//! building any region or measure, and merges what passes into the
//! collection. A malformed row fails the whole call.

use crate::columns::{ColumnMapping, SourceColumn};
use crate::error::{Error, Result};
use crate::filter::ImportFilters;
use crate::measure::Measure;
use crate::region::{Region, LANG_CYM, LANG_ENG};
use crate::regions::RegionCollection;
use serde_json::Value;
use std::io::Read;
use tracing::{debug, trace};

/// Minimum fields in a reference table row: code, English name, Welsh name
const REFERENCE_FIELDS: usize = 3;

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Field counts are checked per row
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Position of a mapped column in the header, or `default` when the mapping
/// or the header lacks it
fn column_index(
    headers: &csv::StringRecord,
    cols: &ColumnMapping,
    column: SourceColumn,
    default: usize,
) -> usize {
    cols.get(column)
        .and_then(|name| headers.iter().position(|h| h == name))
        .unwrap_or(default)
}

fn parse_year(token: &str, record: usize) -> Result<u32> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::malformed(record, format!("invalid year '{}'", token)))
}

/// Parse a reading. `NaN` and infinities are rejected along with non-numbers.
fn parse_value(token: &str, record: usize) -> Result<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::malformed(record, format!("invalid value '{}'", token)))
}

/// Text of a JSON field, accepting strings and numbers. Null and missing
/// fields give `None`.
fn json_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_year(value: Option<&Value>, record: usize) -> Result<u32> {
    match value {
        // Whole-valued floats such as 2015.0 are accepted
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|y| y.is_finite() && y.fract() == 0.0 && *y >= 0.0)
                    .map(|y| y as u64)
            })
            .and_then(|y| u32::try_from(y).ok())
            .ok_or_else(|| Error::malformed(record, format!("invalid year {}", n))),
        Some(Value::String(s)) => parse_year(s, record),
        _ => Err(Error::malformed(record, "missing year")),
    }
}

fn json_value(value: Option<&Value>, record: usize) -> Result<f64> {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| Error::malformed(record, format!("invalid value {}", n))),
        Some(Value::String(s)) => parse_value(s, record),
        _ => Err(Error::malformed(record, "missing value")),
    }
}

impl RegionCollection {
    /// Import the authority code reference table.
    ///
    /// Each row is `code, English name, Welsh name`. Regions are created
    /// when new, otherwise both names are set on the existing region.
    pub fn populate_from_authority_code_csv<R: Read>(
        &mut self,
        reader: R,
        cols: &ColumnMapping,
        filters: &ImportFilters,
    ) -> Result<()> {
        let mut csv_reader = csv_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let code_idx = column_index(&headers, cols, SourceColumn::AuthCode, 0);
        let eng_idx = column_index(&headers, cols, SourceColumn::AuthNameEng, 1);
        let cym_idx = column_index(&headers, cols, SourceColumn::AuthNameCym, 2);

        let mut imported = 0;
        for (row_idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let number = row_idx + 1;

            if record.len() < REFERENCE_FIELDS {
                return Err(Error::malformed(
                    number,
                    format!(
                        "expected {} fields, found {}",
                        REFERENCE_FIELDS,
                        record.len()
                    ),
                ));
            }

            let field = |idx: usize| {
                record.get(idx).ok_or_else(|| {
                    Error::malformed(number, format!("no field at column {}", idx + 1))
                })
            };
            let code = field(code_idx)?;
            let name_eng = field(eng_idx)?;
            let name_cym = field(cym_idx)?;

            if !filters.accepts_area(code) {
                trace!(code, "skipping area outside filter");
                continue;
            }

            let region = self
                .regions
                .entry(code.to_string())
                .or_insert_with(|| Region::new(code));
            region.set_name(LANG_ENG, name_eng);
            region.set_name(LANG_CYM, name_cym);
            imported += 1;
        }

        debug!(imported, "parsed authority code table");
        Ok(())
    }

    /// Import a StatsWales JSON export.
    ///
    /// The document is either an array of records or an object whose
    /// `value` member is that array. Records without their own measure code
    /// use the mapping's single-measure code and name. Filters apply in
    /// order: area, measure (on the lowercased code), year.
    pub fn populate_from_welsh_stats_json<R: Read>(
        &mut self,
        reader: R,
        cols: &ColumnMapping,
        filters: &ImportFilters,
    ) -> Result<()> {
        let document: Value = serde_json::from_reader(reader)?;
        let records = match &document {
            Value::Array(items) => items,
            Value::Object(map) => map.get("value").and_then(Value::as_array).ok_or_else(|| {
                Error::malformed(0, "expected an object with a \"value\" array")
            })?,
            _ => return Err(Error::malformed(0, "expected a JSON array of records")),
        };

        let code_key = cols.require(SourceColumn::AuthCode)?;
        let year_key = cols.require(SourceColumn::Year)?;
        let value_key = cols.require(SourceColumn::Value)?;

        let mut imported = 0;
        for (row_idx, item) in records.iter().enumerate() {
            let number = row_idx + 1;
            let record = item
                .as_object()
                .ok_or_else(|| Error::malformed(number, "record is not an object"))?;
            let field = |column: SourceColumn| {
                cols.get(column).and_then(|key| json_text(record.get(key)))
            };

            let code = json_text(record.get(code_key))
                .ok_or_else(|| Error::malformed(number, "missing authority code"))?;
            if !filters.accepts_area(&code) {
                trace!(%code, "skipping area outside filter");
                continue;
            }

            let (measure_code, measure_label) = match field(SourceColumn::MeasureCode) {
                Some(measure_code) => {
                    let label = field(SourceColumn::MeasureName)
                        .unwrap_or_else(|| measure_code.clone());
                    (measure_code, label)
                }
                None => (
                    cols.require(SourceColumn::SingleMeasureCode)?.to_string(),
                    cols.require(SourceColumn::SingleMeasureName)?.to_string(),
                ),
            };
            let measure_code = measure_code.to_lowercase();
            let measure_label = measure_label.to_lowercase();
            if !filters.accepts_measure(&measure_code) {
                trace!(%code, %measure_code, "skipping measure outside filter");
                continue;
            }

            let year = json_year(record.get(year_key), number)?;
            if !filters.accepts_year(year) {
                continue;
            }
            let value = json_value(record.get(value_key), number)?;

            let region = self
                .regions
                .entry(code.clone())
                .or_insert_with(|| Region::new(code));
            if !region.has_name(LANG_ENG) {
                if let Some(name) = field(SourceColumn::AuthNameEng) {
                    region.set_name(LANG_ENG, name);
                }
            }

            let mut measure = Measure::new(&measure_code, measure_label);
            measure.set_value(year, value);
            region.set_measure(&measure_code, measure);
            imported += 1;
        }

        debug!(records = records.len(), imported, "parsed StatsWales JSON");
        Ok(())
    }

    /// Import a wide table with one column per year.
    ///
    /// The header is the authority code column followed by years. Every
    /// row's region must already be in the collection (normally from the
    /// reference table); an unknown code fails with `AreaNotFound`.
    pub fn populate_from_authority_by_year_csv<R: Read>(
        &mut self,
        reader: R,
        cols: &ColumnMapping,
        filters: &ImportFilters,
    ) -> Result<()> {
        let (measure_code, measure_label) = self.catalogue.single_measure_for(cols)?;

        let mut csv_reader = csv_reader(reader);
        let headers = csv_reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(Error::malformed(0, "header has no year columns"));
        }
        let years = headers
            .iter()
            .skip(1)
            .map(|token| parse_year(token, 0))
            .collect::<Result<Vec<u32>>>()?;

        if !filters.accepts_measure(&measure_code) {
            debug!(%measure_code, "measure outside filter, skipping file");
            return Ok(());
        }

        let mut imported = 0;
        for (row_idx, result) in csv_reader.records().enumerate() {
            let record = result?;
            let number = row_idx + 1;

            if record.len() != headers.len() {
                return Err(Error::malformed(
                    number,
                    format!("expected {} fields, found {}", headers.len(), record.len()),
                ));
            }

            let code = &record[0];
            if !filters.accepts_area(code) {
                trace!(code, "skipping area outside filter");
                continue;
            }

            let region = self
                .regions
                .get_mut(code)
                .ok_or_else(|| Error::AreaNotFound(code.to_string()))?;

            let mut measure = Measure::new(&measure_code, measure_label.as_str());
            for (&year, token) in years.iter().zip(record.iter().skip(1)) {
                if !filters.accepts_year(year) {
                    continue;
                }
                measure.set_value(year, parse_value(token, number)?);
            }
            region.set_measure(&measure_code, measure);
            imported += 1;
        }

        debug!(%measure_code, imported, "parsed authority-by-year table");
        Ok(())
    }
}
