//! bethyw-core: Core library for importing and merging Welsh Government statistics
//!
//! This library provides functionality to:
//! - Parse the authority code reference table, StatsWales JSON exports and
//!   wide year-per-column CSV tables
//! - Merge every source into one model of regions, measures and yearly values
//! - Filter imports by area, measure and year range
//! - Render the merged data as text tables or JSON

pub mod columns;
pub mod datasets;
pub mod error;
pub mod filter;
pub mod input;
pub mod measure;
pub mod parser;
pub mod region;
pub mod regions;
pub mod scanner;

pub use columns::{ColumnMapping, SourceColumn};
pub use datasets::{builtin, DatasetCatalogue, InputFileSource, SourceDataType};
pub use error::{Error, Result};
pub use filter::{ImportFilters, YearRange};
pub use input::InputFile;
pub use measure::Measure;
pub use region::{Region, LANG_CYM, LANG_ENG};
pub use regions::RegionCollection;
pub use scanner::{scan_directory, ScanResult};
