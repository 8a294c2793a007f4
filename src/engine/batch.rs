use crate::engine::portfolio::PortfolioAggregator;
use crate::engine::portfolio::PortfolioSummary;
use crate::engine::site::SiteExtractor;
use crate::engine::site::SiteRecord;
use crate::error::EsgSheetError;
use crate::error::ExtractionError;
use anyhow::Context;
use anyhow::Result;
use log::info;
use log::warn;
use rayon::prelude::*;
use std::path::Path;

/// An uploaded workbook: its verbatim file name and content.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_owned(),
            bytes,
        }
    }

    /// Reads a file from disk, naming it by its final path component.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("Read '{}' failed", path.display()))?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// Loads every file matching a glob pattern, sorted by path.
pub fn load_sources(pattern: &str) -> Result<Vec<SourceFile>> {
    let mut paths = glob::glob(pattern)
        .with_context(|| format!("Invalid file pattern '{}'", pattern))?
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    paths.iter().map(SourceFile::from_path).collect()
}

/// What became of one source file.
#[derive(Debug)]
pub enum FileOutcome {
    Extracted(SiteRecord),
    Skipped(ExtractionError),
}

impl FileOutcome {
    pub fn record(&self) -> Option<&SiteRecord> {
        match self {
            FileOutcome::Extracted(record) => Some(record),
            FileOutcome::Skipped(_) => None,
        }
    }

    pub fn warning(&self) -> Option<&ExtractionError> {
        match self {
            FileOutcome::Extracted(_) => None,
            FileOutcome::Skipped(error) => Some(error),
        }
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug)]
pub struct BatchReport {
    outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    /// Extracted sites in input order.
    pub fn records(&self) -> Vec<SiteRecord> {
        self.outcomes.iter().filter_map(FileOutcome::record).cloned().collect()
    }

    /// Files that were skipped, in input order.
    pub fn warnings(&self) -> Vec<&ExtractionError> {
        self.outcomes.iter().filter_map(FileOutcome::warning).collect()
    }

    /// Aggregates the extracted sites.
    ///
    /// A batch without a single extracted site is an error, not an empty
    /// portfolio.
    pub fn summary(&self) -> Result<PortfolioSummary, EsgSheetError> {
        let records = self.records();
        if records.is_empty() {
            return Err(EsgSheetError::NoDataExtracted(self.outcomes.len()));
        }
        Ok(PortfolioAggregator::aggregate(&records))
    }
}

impl SiteExtractor {
    /// Extracts every source in parallel. One failing file never stops the
    /// others; it is reported as a skipped outcome.
    pub fn process_batch(&self, sources: &[SourceFile]) -> BatchReport {
        let outcomes: Vec<FileOutcome> = sources
            .par_iter()
            .map(|source| match self.extract_file(&source.bytes, &source.name) {
                Ok(record) => FileOutcome::Extracted(record),
                Err(error) => {
                    warn!("Skip '{}': {}", source.name, error);
                    FileOutcome::Skipped(error)
                }
            })
            .collect();
        let extracted = outcomes.iter().filter(|outcome| outcome.record().is_some()).count();
        info!("Extracted {} of {} file(s)", extracted, outcomes.len());
        BatchReport { outcomes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::fixtures;
    use std::fs;

    fn site_file(name: &str, description: &str, january: f64) -> SourceFile {
        let bytes = fixtures::xlsx(&[("Project 1", vec![fixtures::resource_row(description, &[january])])]);
        SourceFile::new(name, bytes)
    }

    #[test]
    fn keeps_input_order_and_skips_bad_files() {
        let sources = vec![
            site_file("100MW-Solar-Solapur.xlsx", "Diesel consumption", 3000.0),
            SourceFile::new("broken.xlsx", b"not a workbook".to_vec()),
            site_file("augasi_50MWp.xlsx", "Water", 10.0),
        ];
        let report = SiteExtractor::default().process_batch(&sources);
        assert_eq!(report.outcomes().len(), 3);
        let names: Vec<String> = report.records().into_iter().map(|record| record.site_name).collect();
        assert_eq!(names, vec!["100MW-Solar-Solapur", "augasi_50MWp"]);
        let warnings = report.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].site, "broken");

        let summary = report.summary().unwrap();
        assert_eq!(summary.site_count, 2);
        assert_eq!(summary.capacity_mw, 150);
        assert!((summary.ghg_total - 8.04).abs() < 1e-9);
    }

    #[test]
    fn nothing_extracted() {
        let sources = vec![SourceFile::new("a.xlsx", Vec::new()), SourceFile::new("b.xlsx", vec![1, 2, 3])];
        let report = SiteExtractor::default().process_batch(&sources);
        let error = report.summary().unwrap_err();
        assert!(matches!(error, EsgSheetError::NoDataExtracted(2)));

        let empty = SiteExtractor::default().process_batch(&[]);
        assert!(matches!(empty.summary(), Err(EsgSheetError::NoDataExtracted(0))));
    }

    #[test]
    fn load_sources_from_disk() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path();
        fs::write(dir.join("b_site.xlsx"), site_file("b_site.xlsx", "Water", 1.0).bytes).unwrap();
        fs::write(dir.join("a_site.xlsx"), site_file("a_site.xlsx", "Water", 2.0).bytes).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let pattern = format!("{}/*.xlsx", dir.display());
        let sources = load_sources(&pattern).unwrap();
        let names: Vec<&str> = sources.iter().map(|source| source.name.as_str()).collect();
        assert_eq!(names, vec!["a_site.xlsx", "b_site.xlsx"]);

        let report = SiteExtractor::default().process_batch(&sources);
        assert_eq!(report.summary().unwrap().water_total, 3.0);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        assert!(load_sources("[unclosed").is_err());
        assert!(SourceFile::from_path("/definitely/missing/site.xlsx").is_err());
    }
}
