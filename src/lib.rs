//! # ESG Site Sheet Engine
//!
//! Extracts environmental KPIs from per-site spreadsheet reports and rolls
//! them up into a portfolio summary.
//!
//! ## Features
//!
//! - **Self-contained reading**: `.xlsx`/`.xlsm` and `.ods` workbooks parsed from
//!   bytes, format detected from content
//! - **Template tolerant**: the data sheet is picked from an ordered preference
//!   list, rows are classified by keywords, months are read by position
//! - **Lenient or strict coercion**: unit-annotated text such as `"8500 Litre"`
//!   is read as a number; strict mode reports every lossy cell
//! - **Configurable emission factors**: all factors in tCO2e per base unit
//! - **Parallel batches**: one bad file is skipped without stopping the others
//! - **Exports**: CSV tables and a two-sheet XLSX workbook
//!
//! ## Usage
//!
//! ```no_run
//! use esg_sheet::EngineConfig;
//! use esg_sheet::SiteExtractor;
//! use esg_sheet::load_sources;
//!
//! let config = EngineConfig::load("esg.json")?;
//! let extractor = SiteExtractor::from_config(&config)?;
//! let report = extractor.process_batch(&load_sources("reports/*.xlsx")?);
//! for warning in report.warnings() {
//!     eprintln!("{}", warning);
//! }
//! let summary = report.summary()?;
//! println!("{} sites, {:.2} tCO2e", summary.site_count, summary.ghg_total);
//! # Ok::<(), anyhow::Error>(())
//! ```
mod config;
pub mod engine;
mod error;
pub mod export;
mod helpers;
pub mod spreadsheet;

pub use config::EngineConfig;
pub use engine::batch::load_sources;
pub use engine::batch::BatchReport;
pub use engine::batch::FileOutcome;
pub use engine::batch::SourceFile;
pub use engine::classify::ResourceCategory;
pub use engine::classify::RowClassifier;
pub use engine::coerce::CellCoercer;
pub use engine::coerce::CoercionMode;
pub use engine::coerce::CoercionWarning;
pub use engine::coerce::DigitPattern;
pub use engine::emission::EmissionFactors;
pub use engine::emission::Emissions;
pub use engine::metadata::FilenameMetadataParser;
pub use engine::metadata::SiteMetadata;
pub use engine::metadata::Technology;
pub use engine::portfolio::PortfolioAggregator;
pub use engine::portfolio::PortfolioSummary;
pub use engine::portfolio::RegionSummary;
pub use engine::select::SheetSelector;
pub use engine::series::MonthlySeries;
pub use engine::series::MonthlySeriesExtractor;
pub use engine::site::SiteExtractor;
pub use engine::site::SiteRecord;
pub use error::EsgSheetError;
pub use error::ExtractionError;
pub use spreadsheet::read_workbook;
pub use spreadsheet::CellValue;
pub use spreadsheet::RawWorkbook;
