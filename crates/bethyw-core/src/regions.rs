//! The collection of all imported regions
//!
//! This is the top of the data model. It owns every [`Region`] keyed by
//! authority code, dispatches input streams to the parser for their layout,
//! and renders the whole collection as tables or JSON.
//!
//! Two merge policies coexist on purpose:
//! - [`RegionCollection::set_area`] replaces a stored region wholesale.
//! - The parsers merge into an existing region: names are overwritten per
//!   language and measures are combined year by year.

use crate::columns::ColumnMapping;
use crate::datasets::{DatasetCatalogue, SourceDataType};
use crate::error::{Error, Result};
use crate::filter::ImportFilters;
use crate::region::{Region, LANG_CYM, LANG_ENG};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;
use tracing::debug;

/// Field width for the year/value rows in the collection's table output
const COLUMN_WIDTH: usize = 11;

/// All regions, keyed and ordered by authority code
#[derive(Debug, Clone, Default)]
pub struct RegionCollection {
    pub(crate) regions: BTreeMap<String, Region>,
    pub(crate) catalogue: DatasetCatalogue,
}

impl RegionCollection {
    /// Create an empty collection using the built-in dataset catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection that resolves single-measure files against
    /// `catalogue`
    pub fn with_catalogue(catalogue: DatasetCatalogue) -> Self {
        Self {
            regions: BTreeMap::new(),
            catalogue,
        }
    }

    /// Store a region under `authority_code`, replacing any region already
    /// there. A region without a code takes this one.
    pub fn set_area(&mut self, authority_code: impl Into<String>, mut region: Region) {
        let authority_code = authority_code.into();
        region.assign_code(&authority_code);
        self.regions.insert(authority_code, region);
    }

    pub fn get_area(&self, authority_code: &str) -> Result<&Region> {
        self.regions
            .get(authority_code)
            .ok_or_else(|| Error::AreaNotFound(authority_code.to_string()))
    }

    pub fn contains(&self, authority_code: &str) -> bool {
        self.regions.contains_key(authority_code)
    }

    /// Number of regions held
    pub fn size(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Regions in ascending authority code order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Region)> {
        self.regions.iter().map(|(code, region)| (code.as_str(), region))
    }

    /// Import a dataset from `reader`, dispatching on its layout.
    ///
    /// The stream must be readable and non-empty. Rows merged before a
    /// parse error are kept.
    pub fn populate<R: BufRead>(
        &mut self,
        mut reader: R,
        data_type: SourceDataType,
        cols: &ColumnMapping,
        filters: &ImportFilters,
    ) -> Result<()> {
        let buffered = reader
            .fill_buf()
            .map_err(|e| Error::InvalidStream(e.to_string()))?;
        if buffered.is_empty() {
            return Err(Error::InvalidStream("input stream is empty".to_string()));
        }

        let before = self.regions.len();
        match data_type {
            SourceDataType::AuthorityCodeCsv => {
                self.populate_from_authority_code_csv(reader, cols, filters)?
            }
            SourceDataType::WelshStatsJson => {
                self.populate_from_welsh_stats_json(reader, cols, filters)?
            }
            SourceDataType::AuthorityByYearCsv => {
                self.populate_from_authority_by_year_csv(reader, cols, filters)?
            }
        }

        debug!(
            %data_type,
            regions = self.regions.len(),
            added = self.regions.len() - before,
            "populated regions"
        );
        Ok(())
    }

    /// [`populate`](Self::populate) with filters that accept everything
    pub fn populate_unfiltered<R: BufRead>(
        &mut self,
        reader: R,
        data_type: SourceDataType,
        cols: &ColumnMapping,
    ) -> Result<()> {
        self.populate(reader, data_type, cols, &ImportFilters::default())
    }

    /// Build the JSON document for the whole collection.
    ///
    /// Each region maps to `{"names": {...}, "measures": {...}}`. Only the
    /// English and Welsh names are written, and years become string keys.
    pub fn to_json_value(&self) -> Value {
        let mut root = Map::new();

        for (code, region) in self.iter() {
            let mut names = Map::new();
            for lang in [LANG_ENG, LANG_CYM] {
                if let Ok(name) = region.get_name(lang) {
                    names.insert(lang.to_string(), Value::from(name));
                }
            }

            let mut measures = Map::new();
            for measure in region.measures().values() {
                let years: Map<String, Value> = measure
                    .years()
                    .map(|(year, value)| (year.to_string(), Value::from(value)))
                    .collect();
                measures.insert(measure.code().to_string(), Value::Object(years));
            }

            let mut entry = Map::new();
            entry.insert("names".to_string(), Value::Object(names));
            entry.insert("measures".to_string(), Value::Object(measures));
            root.insert(code.to_string(), Value::Object(entry));
        }

        Value::Object(root)
    }

    /// Compact JSON text; `{}` for an empty collection
    pub fn to_json(&self) -> String {
        self.to_json_value().to_string()
    }
}

impl fmt::Display for RegionCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (code, region) in self.iter() {
            writeln!(f, "{} ({})", region.display_name(), code)?;

            if region.measures().is_empty() {
                writeln!(f, "<no measures>")?;
                writeln!(f)?;
                continue;
            }

            for measure in region.measures().values() {
                writeln!(f, "{} ({})", measure.label(), measure.code())?;

                for (year, _) in measure.years() {
                    write!(f, "{:>w$}", year, w = COLUMN_WIDTH)?;
                }
                writeln!(
                    f,
                    "{:>w$}{:>w$}{:>w$}",
                    "Average",
                    "Diff.",
                    "% Diff.",
                    w = COLUMN_WIDTH
                )?;

                for (_, value) in measure.years() {
                    write!(f, "{:>w$.6}", value, w = COLUMN_WIDTH)?;
                }
                writeln!(
                    f,
                    "{:>w$.6}{:>w$.6}{:>w$.6}",
                    measure.average(),
                    measure.difference(),
                    measure.difference_as_percentage(),
                    w = COLUMN_WIDTH
                )?;
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
