//! Dataset descriptors and the built-in catalogue
//!
//! Each descriptor names a source file, the parser that understands its
//! layout, and the column mapping for its headers. Catalogues can be loaded
//! from and saved to JSON to describe datasets beyond the built-in set.

use crate::columns::{ColumnMapping, SourceColumn};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// The layout of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SourceDataType {
    /// `code,name_eng,name_cym` reference table
    AuthorityCodeCsv,
    /// StatsWales JSON export: an array of flat records
    WelshStatsJson,
    /// One row per authority, one column per year
    AuthorityByYearCsv,
}

impl SourceDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceDataType::AuthorityCodeCsv => "authority_code_csv",
            SourceDataType::WelshStatsJson => "welsh_stats_json",
            SourceDataType::AuthorityByYearCsv => "authority_by_year_csv",
        }
    }
}

impl fmt::Display for SourceDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceDataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "authority_code_csv" => Ok(SourceDataType::AuthorityCodeCsv),
            "welsh_stats_json" => Ok(SourceDataType::WelshStatsJson),
            "authority_by_year_csv" => Ok(SourceDataType::AuthorityByYearCsv),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for SourceDataType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SourceDataType> for String {
    fn from(value: SourceDataType) -> Self {
        value.as_str().to_string()
    }
}

/// A dataset the program knows how to import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFileSource {
    /// Short code used on the command line (e.g., "popden")
    pub code: String,
    /// Human-readable dataset name
    pub name: String,
    /// File name inside the data directory
    pub file: String,
    pub parser: SourceDataType,
    pub cols: ColumnMapping,
}

impl InputFileSource {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        file: impl Into<String>,
        parser: SourceDataType,
        cols: ColumnMapping,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            file: file.into(),
            parser,
            cols,
        }
    }
}

/// The reference table plus the statistical datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetCatalogue {
    pub areas: InputFileSource,
    pub datasets: Vec<InputFileSource>,
}

impl DatasetCatalogue {
    /// Load a catalogue from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the catalogue to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Find a dataset by its code
    pub fn find(&self, code: &str) -> Result<&InputFileSource> {
        self.datasets
            .iter()
            .find(|d| d.code == code)
            .ok_or_else(|| Error::DatasetNotFound(code.to_string()))
    }

    /// Resolve the measure code and label for a single-measure wide file.
    ///
    /// The mapping's declared measure name is looked up among the wide-format
    /// descriptors; when one matches, its code and name are used. Otherwise
    /// the mapping's own single-measure entries apply.
    pub fn single_measure_for(&self, cols: &ColumnMapping) -> Result<(String, String)> {
        let declared = cols.require(SourceColumn::SingleMeasureName)?;

        let known = self.datasets.iter().find(|d| {
            d.parser == SourceDataType::AuthorityByYearCsv
                && d.cols.get(SourceColumn::SingleMeasureName) == Some(declared)
        });

        let source = known.map(|d| &d.cols).unwrap_or(cols);
        let code = source.require(SourceColumn::SingleMeasureCode)?;
        let name = source.require(SourceColumn::SingleMeasureName)?;
        Ok((code.to_string(), name.to_string()))
    }
}

impl Default for DatasetCatalogue {
    fn default() -> Self {
        builtin()
    }
}

/// The datasets published with the program
pub fn builtin() -> DatasetCatalogue {
    use SourceColumn::{
        AuthCode, AuthNameCym, AuthNameEng, MeasureCode, MeasureName, SingleMeasureCode,
        SingleMeasureName, Value, Year,
    };
    use SourceDataType::{AuthorityByYearCsv, AuthorityCodeCsv, WelshStatsJson};

    let areas = InputFileSource::new(
        "areas",
        "Areas",
        "areas.csv",
        AuthorityCodeCsv,
        ColumnMapping::new()
            .with(AuthCode, "Local authority code")
            .with(AuthNameEng, "Name (eng)")
            .with(AuthNameCym, "Name (cym)"),
    );

    let wide = |code: &str, name: &str, file: &str, measure: &str, label: &str| {
        InputFileSource::new(
            code,
            name,
            file,
            AuthorityByYearCsv,
            ColumnMapping::new()
                .with(AuthCode, "AuthorityCode")
                .with(SingleMeasureCode, measure)
                .with(SingleMeasureName, label),
        )
    };

    let datasets = vec![
        InputFileSource::new(
            "popden",
            "Population density",
            "popu1009.json",
            WelshStatsJson,
            ColumnMapping::new()
                .with(AuthCode, "Localauthority_Code")
                .with(AuthNameEng, "Localauthority_ItemName_ENG")
                .with(MeasureCode, "Measure_Code")
                .with(MeasureName, "Measure_ItemName_ENG")
                .with(Year, "Year_Code")
                .with(Value, "Data"),
        ),
        InputFileSource::new(
            "biz",
            "Active Businesses",
            "econ0080.json",
            WelshStatsJson,
            ColumnMapping::new()
                .with(AuthCode, "Area_Code")
                .with(AuthNameEng, "Area_ItemName_ENG")
                .with(MeasureCode, "Variable_Code")
                .with(MeasureName, "Variable_ItemName_ENG")
                .with(Year, "Year_Code")
                .with(Value, "Data"),
        ),
        InputFileSource::new(
            "aqi",
            "Air Quality Indicators",
            "envi0201.json",
            WelshStatsJson,
            ColumnMapping::new()
                .with(AuthCode, "Area_Code")
                .with(AuthNameEng, "Area_ItemName_ENG")
                .with(MeasureCode, "Pollutant_ItemName_ENG")
                .with(MeasureName, "Pollutant_ItemName_ENG")
                .with(Year, "Year_Code")
                .with(Value, "Data"),
        ),
        InputFileSource::new(
            "trains",
            "Rail passenger journeys",
            "tran0152.json",
            WelshStatsJson,
            ColumnMapping::new()
                .with(AuthCode, "LocalAuthority_Code")
                .with(AuthNameEng, "LocalAuthority_ItemName_ENG")
                .with(Year, "Year_Code")
                .with(Value, "Data")
                .with(SingleMeasureCode, "rail")
                .with(SingleMeasureName, "Rail passenger journeys"),
        ),
        wide(
            "complete-popden",
            "Population density",
            "complete-popu1009-popden.csv",
            "dens",
            "Population density",
        ),
        wide(
            "complete-pop",
            "Population",
            "complete-popu1009-pop.csv",
            "pop",
            "Population",
        ),
        wide(
            "complete-area",
            "Land area",
            "complete-popu1009-area.csv",
            "area",
            "Land area",
        ),
    ];

    DatasetCatalogue { areas, datasets }
}
