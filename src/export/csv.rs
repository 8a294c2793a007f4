use crate::engine::portfolio::PortfolioSummary;
use crate::engine::site::SiteRecord;
use crate::error::EsgSheetError;
use crate::export::ExecutiveSummaryRow;
use crate::export::RegionRow;
use crate::export::SiteRow;
use serde::Serialize;

/// Serializes rows; an empty input still carries the header line.
fn write_rows<T: Serialize, I: IntoIterator<Item = T>>(headers: &[&str], rows: I) -> Result<Vec<u8>, EsgSheetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut rows = rows.into_iter().peekable();
    if rows.peek().is_none() {
        writer.write_record(headers)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| EsgSheetError::IoError(e.into_error()))
}

/// One row per site with every scalar KPI.
pub fn sites_to_csv(sites: &[SiteRecord]) -> Result<Vec<u8>, EsgSheetError> {
    write_rows(&SiteRow::HEADERS, sites.iter().map(SiteRow::from))
}

/// One row per region.
pub fn regions_to_csv(summary: &PortfolioSummary) -> Result<Vec<u8>, EsgSheetError> {
    write_rows(&RegionRow::HEADERS, summary.regions.iter().map(RegionRow::from))
}

/// Portfolio totals: sites, capacity, water, diesel and GHG.
pub fn executive_summary_to_csv(summary: &PortfolioSummary) -> Result<Vec<u8>, EsgSheetError> {
    write_rows(&[], [ExecutiveSummaryRow::from(summary)])
}
