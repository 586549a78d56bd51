//! Beth Yw? CLI
//!
//! Command-line tool for importing Welsh Government statistics and printing
//! them as tables or JSON.

mod args;
mod logging;

use bethyw_core::{
    builtin, scan_directory, DatasetCatalogue, ImportFilters, InputFile, InputFileSource,
    RegionCollection, ScanResult,
};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bethyw")]
#[command(about = "Parse official Welsh Government statistics data files", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding the data files
    #[arg(long, default_value = "datasets")]
    dir: PathBuf,

    /// Datasets to import as comma-separated codes, or 'all'
    #[arg(short, long, value_delimiter = ',')]
    datasets: Vec<String>,

    /// Areas to import as comma-separated authority codes, or 'all'
    #[arg(short, long, value_delimiter = ',')]
    areas: Vec<String>,

    /// Measures to import as comma-separated codes, or 'all'
    #[arg(short, long, value_delimiter = ',')]
    measures: Vec<String>,

    /// A single year (YYYY) or inclusive range (YYYY-ZZZZ); 0 for all years
    #[arg(short, long, default_value = "0")]
    years: String,

    /// Print the output as JSON instead of tables
    #[arg(short, long)]
    json: bool,

    /// Indent JSON output
    #[arg(long, requires = "json")]
    pretty: bool,

    /// JSON file describing the datasets, replacing the built-in list
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// List the known datasets and where they were found, then exit
    #[arg(long)]
    list_datasets: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> bethyw_core::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let catalogue = match &cli.catalogue {
        Some(path) => DatasetCatalogue::load(path)?,
        None => builtin(),
    };
    let scan = scan_directory(&cli.dir, &catalogue)?;

    if cli.list_datasets {
        cmd_list_datasets(&catalogue, &scan);
        return Ok(());
    }

    let datasets = args::parse_datasets_arg(&cli.datasets, &catalogue)?;
    let filters = ImportFilters {
        areas: args::parse_areas_arg(&cli.areas),
        measures: args::parse_measures_arg(&cli.measures),
        years: args::parse_years_arg(&cli.years)?,
    };

    let mut regions = RegionCollection::with_catalogue(catalogue.clone());
    load_areas(&mut regions, &scan, &catalogue.areas, &filters)?;
    load_datasets(&mut regions, &scan, &datasets, &filters);

    if cli.json {
        let json = if cli.pretty {
            serde_json::to_string_pretty(&regions.to_json_value())?
        } else {
            regions.to_json()
        };
        println!("{}", json);
    } else {
        print!("{}", regions);
    }

    Ok(())
}

fn cmd_list_datasets(catalogue: &DatasetCatalogue, scan: &ScanResult) {
    println!("Datasets in {}:", scan.root.display());
    for source in std::iter::once(&catalogue.areas).chain(catalogue.datasets.iter()) {
        let location = match scan.path_for(source) {
            Some(path) => path.display().to_string(),
            None => "<missing>".to_string(),
        };
        println!(
            "  {:<16} {:<26} [{}] {}",
            source.code, source.name, source.parser, location
        );
    }
}

/// Load the reference table. Only the area filter applies, and failure is
/// fatal because the wide tables depend on it.
fn load_areas(
    regions: &mut RegionCollection,
    scan: &ScanResult,
    areas: &InputFileSource,
    filters: &ImportFilters,
) -> bethyw_core::Result<()> {
    let path = scan.resolve(areas);
    let reader = InputFile::new(&path).open()?;
    let area_filter = ImportFilters {
        areas: filters.areas.clone(),
        ..ImportFilters::default()
    };

    regions.populate(reader, areas.parser, &areas.cols, &area_filter)?;
    info!(path = %path.display(), regions = regions.size(), "loaded areas");
    Ok(())
}

/// Import each dataset in turn; a failing dataset is reported and skipped
fn load_datasets(
    regions: &mut RegionCollection,
    scan: &ScanResult,
    datasets: &[&InputFileSource],
    filters: &ImportFilters,
) {
    for dataset in datasets {
        let path = scan.resolve(dataset);
        let result = InputFile::new(&path)
            .open()
            .and_then(|reader| regions.populate(reader, dataset.parser, &dataset.cols, filters));

        match result {
            Ok(()) => info!(dataset = %dataset.code, path = %path.display(), "imported dataset"),
            Err(e) if e.is_not_found() => {
                warn!(dataset = %dataset.code, "key not found while importing: {}", e)
            }
            Err(e) => warn!(dataset = %dataset.code, "error importing dataset: {}", e),
        }
    }
}
