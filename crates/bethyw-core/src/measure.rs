//! A single statistical measure tracked across years

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Width of the year/value table printed for a measure
const TABLE_WIDTH: usize = 23;

/// A named time series of yearly values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    code: String,
    label: String,
    series: BTreeMap<u32, f64>,
}

impl Measure {
    /// Create an empty measure. The code is stored lowercase.
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into().to_lowercase(),
            label: label.into(),
            series: BTreeMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Get the value stored for a year
    pub fn get_value(&self, year: u32) -> Result<f64> {
        self.series
            .get(&year)
            .copied()
            .ok_or(Error::YearNotFound(year))
    }

    /// Insert or overwrite the value for a year
    pub fn set_value(&mut self, year: u32, value: f64) {
        self.series.insert(year, value);
    }

    /// Copy every point of `other` into this series, overwriting shared years.
    /// Code and label are left alone.
    pub fn combine(&mut self, other: &Measure) {
        for (&year, &value) in &other.series {
            self.series.insert(year, value);
        }
    }

    /// Number of years with a value
    pub fn size(&self) -> usize {
        self.series.len()
    }

    /// Year/value pairs in ascending year order
    pub fn years(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.series.iter().map(|(&year, &value)| (year, value))
    }

    /// Mean of all values, or 0 for an empty series
    pub fn average(&self) -> f64 {
        if self.series.is_empty() {
            return 0.0;
        }
        self.series.values().sum::<f64>() / self.series.len() as f64
    }

    /// Last year's value minus the first year's, or 0 with fewer than two years
    pub fn difference(&self) -> f64 {
        match (self.first_value(), self.last_value()) {
            (Some(first), Some(last)) if self.series.len() > 1 => last - first,
            _ => 0.0,
        }
    }

    /// Difference relative to the first year's value, as a percentage.
    /// Returns 0 when the series is empty or starts at 0.
    pub fn difference_as_percentage(&self) -> f64 {
        match self.first_value() {
            Some(first) if first != 0.0 => self.difference() / first * 100.0,
            _ => 0.0,
        }
    }

    fn first_value(&self) -> Option<f64> {
        self.series.first_key_value().map(|(_, &v)| v)
    }

    fn last_value(&self) -> Option<f64> {
        self.series.last_key_value().map(|(_, &v)| v)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.label, self.code)?;

        if self.series.is_empty() {
            return writeln!(f, "<no data>");
        }

        writeln!(f, "{:>8}{:>15}", "Year", "Value")?;
        writeln!(f, "{}", "-".repeat(TABLE_WIDTH))?;
        for (year, value) in &self.series {
            writeln!(f, "{:>8}{:>15.6}", year, value)?;
        }
        writeln!(f, "{}", "-".repeat(TABLE_WIDTH))?;
        writeln!(f, "{:<8}{:>15.6}", "Average", self.average())?;
        writeln!(f, "{:<8}{:>15.6}", "Diff.", self.difference())?;
        writeln!(f, "{:<8}{:>15.6}", "% Diff.", self.difference_as_percentage())
    }
}
