//! Interpretation of the dataset, area, measure and year arguments

use bethyw_core::{DatasetCatalogue, Error, InputFileSource, Result, YearRange};
use std::collections::BTreeSet;

/// True when any value is `all` (any case)
fn is_all(values: &[String]) -> bool {
    values.iter().any(|v| v.eq_ignore_ascii_case("all"))
}

/// Datasets to import. No values or `all` selects every dataset; unknown
/// codes are an error.
pub fn parse_datasets_arg<'a>(
    values: &[String],
    catalogue: &'a DatasetCatalogue,
) -> Result<Vec<&'a InputFileSource>> {
    if values.is_empty() || is_all(values) {
        return Ok(catalogue.datasets.iter().collect());
    }

    values.iter().map(|code| catalogue.find(code)).collect()
}

/// Authority codes to import; empty means every area
pub fn parse_areas_arg(values: &[String]) -> BTreeSet<String> {
    if is_all(values) {
        return BTreeSet::new();
    }
    values.iter().cloned().collect()
}

/// Measure codes to import, lowercased; empty means every measure
pub fn parse_measures_arg(values: &[String]) -> BTreeSet<String> {
    if is_all(values) {
        return BTreeSet::new();
    }
    values.iter().map(|v| v.to_lowercase()).collect()
}

fn parse_four_digit_year(token: &str) -> Option<u32> {
    if token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

/// Parse `YYYY` or `YYYY-ZZZZ` into an inclusive range. `0` selects every
/// year.
pub fn parse_years_arg(value: &str) -> Result<YearRange> {
    let value = value.trim();
    if value == "0" || value == "0-0" {
        return Ok(YearRange::all());
    }

    let invalid = || Error::InvalidArgument("Invalid input for years argument".to_string());

    let (start, end) = match value.split_once('-') {
        Some((start, end)) => (
            parse_four_digit_year(start).ok_or_else(invalid)?,
            parse_four_digit_year(end).ok_or_else(invalid)?,
        ),
        None => {
            let year = parse_four_digit_year(value).ok_or_else(invalid)?;
            (year, year)
        }
    };

    if start > end {
        return Err(invalid());
    }
    Ok(YearRange::new(start, end))
}
