//! Column mappings from logical fields to the headers used by a source file

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A logical field that a source file provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceColumn {
    AuthCode,
    AuthNameEng,
    AuthNameCym,
    MeasureCode,
    MeasureName,
    /// Fixed measure code for datasets that hold one measure only
    SingleMeasureCode,
    /// Fixed measure name for datasets that hold one measure only
    SingleMeasureName,
    Year,
    Value,
}

impl fmt::Display for SourceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceColumn::AuthCode => "auth_code",
            SourceColumn::AuthNameEng => "auth_name_eng",
            SourceColumn::AuthNameCym => "auth_name_cym",
            SourceColumn::MeasureCode => "measure_code",
            SourceColumn::MeasureName => "measure_name",
            SourceColumn::SingleMeasureCode => "single_measure_code",
            SourceColumn::SingleMeasureName => "single_measure_name",
            SourceColumn::Year => "year",
            SourceColumn::Value => "value",
        };
        f.write_str(name)
    }
}

/// Per-dataset table of logical field to literal header or JSON key.
///
/// For `SingleMeasureCode`/`SingleMeasureName` the value is the measure
/// code or label itself rather than a header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<SourceColumn, String>);

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: SourceColumn, header: impl Into<String>) -> Self {
        self.0.insert(column, header.into());
        self
    }

    pub fn get(&self, column: SourceColumn) -> Option<&str> {
        self.0.get(&column).map(String::as_str)
    }

    /// Like `get`, but a missing entry is an error
    pub fn require(&self, column: SourceColumn) -> Result<&str> {
        self.get(column).ok_or(Error::ColumnNotMapped(column))
    }
}
