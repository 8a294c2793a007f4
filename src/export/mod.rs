//! # Export
//!
//! Flat encodings of site records and portfolio summaries for download:
//! delimited text through [`csv`] and a two-sheet workbook through [`xlsx`].
//! Both encodings share the row shapes defined here so column names stay
//! identical across formats.
use crate::engine::metadata::Technology;
use crate::engine::portfolio::PortfolioSummary;
use crate::engine::portfolio::RegionSummary;
use crate::engine::site::SiteRecord;
use serde::Serialize;

pub mod csv;
pub mod xlsx;

/// One exported cell.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ExportValue<'a> {
    Text(&'a str),
    Number(f64),
}

/// Scalar fields of a site record.
#[derive(Debug, Serialize)]
pub struct SiteRow<'a> {
    #[serde(rename = "Site")]
    pub site: &'a str,
    #[serde(rename = "Region")]
    pub region: &'a str,
    #[serde(rename = "Technology")]
    pub technology: Technology,
    #[serde(rename = "Capacity_MW")]
    pub capacity_mw: u32,
    #[serde(rename = "Sheet")]
    pub sheet: &'a str,
    #[serde(rename = "Water_Total")]
    pub water_total: f64,
    #[serde(rename = "Diesel_Total")]
    pub diesel_total: f64,
    #[serde(rename = "Electricity_Total")]
    pub electricity_total: f64,
    #[serde(rename = "Cement_Total")]
    pub cement_total: f64,
    #[serde(rename = "Steel_Total")]
    pub steel_total: f64,
    #[serde(rename = "Scope1_Emissions")]
    pub scope1: f64,
    #[serde(rename = "Scope2_Emissions")]
    pub scope2: f64,
    #[serde(rename = "Scope3_Emissions")]
    pub scope3: f64,
    #[serde(rename = "Total_Emissions")]
    pub total_emissions: f64,
    #[serde(rename = "Intensity")]
    pub intensity: f64,
    #[serde(rename = "Water_Intensity")]
    pub water_intensity: f64,
    #[serde(rename = "Fuel_Intensity")]
    pub fuel_intensity: f64,
    #[serde(rename = "Classified_Rows")]
    pub classified_rows: usize,
    #[serde(rename = "Coercion_Warnings")]
    pub coercion_warnings: usize,
}

impl<'a> SiteRow<'a> {
    pub(crate) const HEADERS: [&'static str; 19] = [
        "Site",
        "Region",
        "Technology",
        "Capacity_MW",
        "Sheet",
        "Water_Total",
        "Diesel_Total",
        "Electricity_Total",
        "Cement_Total",
        "Steel_Total",
        "Scope1_Emissions",
        "Scope2_Emissions",
        "Scope3_Emissions",
        "Total_Emissions",
        "Intensity",
        "Water_Intensity",
        "Fuel_Intensity",
        "Classified_Rows",
        "Coercion_Warnings",
    ];

    pub(crate) fn values(&self) -> Vec<ExportValue<'_>> {
        vec![
            ExportValue::Text(self.site),
            ExportValue::Text(self.region),
            ExportValue::Text(self.technology.as_str()),
            ExportValue::Number(f64::from(self.capacity_mw)),
            ExportValue::Text(self.sheet),
            ExportValue::Number(self.water_total),
            ExportValue::Number(self.diesel_total),
            ExportValue::Number(self.electricity_total),
            ExportValue::Number(self.cement_total),
            ExportValue::Number(self.steel_total),
            ExportValue::Number(self.scope1),
            ExportValue::Number(self.scope2),
            ExportValue::Number(self.scope3),
            ExportValue::Number(self.total_emissions),
            ExportValue::Number(self.intensity),
            ExportValue::Number(self.water_intensity),
            ExportValue::Number(self.fuel_intensity),
            ExportValue::Number(self.classified_rows as f64),
            ExportValue::Number(self.coercion_warnings as f64),
        ]
    }
}

impl<'a> From<&'a SiteRecord> for SiteRow<'a> {
    fn from(record: &'a SiteRecord) -> Self {
        Self {
            site: &record.site_name,
            region: &record.region,
            technology: record.technology,
            capacity_mw: record.capacity_mw,
            sheet: &record.sheet_name,
            water_total: record.water_total,
            diesel_total: record.diesel_total,
            electricity_total: record.electricity_total,
            cement_total: record.cement_total,
            steel_total: record.steel_total,
            scope1: record.emissions.scope1,
            scope2: record.emissions.scope2,
            scope3: record.emissions.scope3,
            total_emissions: record.emissions.total,
            intensity: record.intensity,
            water_intensity: record.water_intensity,
            fuel_intensity: record.fuel_intensity,
            classified_rows: record.classified_rows,
            coercion_warnings: record.warnings.len(),
        }
    }
}

/// One region of the portfolio.
#[derive(Debug, Serialize)]
pub struct RegionRow<'a> {
    #[serde(rename = "Region")]
    pub region: &'a str,
    #[serde(rename = "Capacity_MW")]
    pub capacity_mw: u64,
    #[serde(rename = "Water_Total")]
    pub water_total: f64,
    #[serde(rename = "Diesel_Total")]
    pub diesel_total: f64,
    #[serde(rename = "GHG_Total")]
    pub ghg_total: f64,
    #[serde(rename = "Num_Sites")]
    pub site_count: usize,
}

impl<'a> RegionRow<'a> {
    pub(crate) const HEADERS: [&'static str; 6] = ["Region", "Capacity_MW", "Water_Total", "Diesel_Total", "GHG_Total", "Num_Sites"];

    pub(crate) fn values(&self) -> Vec<ExportValue<'_>> {
        vec![
            ExportValue::Text(self.region),
            ExportValue::Number(self.capacity_mw as f64),
            ExportValue::Number(self.water_total),
            ExportValue::Number(self.diesel_total),
            ExportValue::Number(self.ghg_total),
            ExportValue::Number(self.site_count as f64),
        ]
    }
}

impl<'a> From<&'a RegionSummary> for RegionRow<'a> {
    fn from(region: &'a RegionSummary) -> Self {
        Self {
            region: &region.region,
            capacity_mw: region.capacity_mw,
            water_total: region.water_total,
            diesel_total: region.diesel_total,
            ghg_total: region.ghg_total,
            site_count: region.site_count,
        }
    }
}

/// Portfolio totals on a single row.
#[derive(Debug, Serialize)]
pub struct ExecutiveSummaryRow {
    #[serde(rename = "Portfolio Sites")]
    pub sites: usize,
    #[serde(rename = "Total Capacity (MW)")]
    pub capacity_mw: u64,
    #[serde(rename = "Total Water (Litres)")]
    pub water_total: f64,
    #[serde(rename = "Total Diesel (Litres)")]
    pub diesel_total: f64,
    #[serde(rename = "Total GHG Emissions (tCO2e)")]
    pub ghg_total: f64,
}

impl From<&PortfolioSummary> for ExecutiveSummaryRow {
    fn from(summary: &PortfolioSummary) -> Self {
        Self {
            sites: summary.site_count,
            capacity_mw: summary.capacity_mw,
            water_total: summary.water_total,
            diesel_total: summary.diesel_total,
            ghg_total: summary.ghg_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::portfolio::tests::site;

    #[test]
    fn values_follow_headers() {
        let record = site("Solapur", "Maharashtra", 100, 5.0, 3000.0, 8.04);
        let row = SiteRow::from(&record);
        let values = row.values();
        assert_eq!(values.len(), SiteRow::HEADERS.len());
        assert_eq!(values[0], ExportValue::Text("Solapur"));
        assert_eq!(values[2], ExportValue::Text("Solar"));
        assert_eq!(values[3], ExportValue::Number(100.0));
        assert_eq!(values[6], ExportValue::Number(3000.0));
        assert_eq!(values[13], ExportValue::Number(8.04));

        let region = RegionSummary {
            region: "Maharashtra".to_owned(),
            site_count: 1,
            capacity_mw: 100,
            water_total: 5.0,
            diesel_total: 3000.0,
            ghg_total: 8.04,
        };
        let region_row = RegionRow::from(&region);
        let values = region_row.values();
        assert_eq!(values.len(), RegionRow::HEADERS.len());
        assert_eq!(values[5], ExportValue::Number(1.0));
    }
}
