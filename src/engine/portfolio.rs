use crate::engine::site::SiteRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rollup of the sites in one region.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RegionSummary {
    pub region: String,
    pub site_count: usize,
    pub capacity_mw: u64,
    pub water_total: f64,
    pub diesel_total: f64,
    pub ghg_total: f64,
}

impl RegionSummary {
    fn new(region: &str) -> Self {
        Self {
            region: region.to_owned(),
            ..Self::default()
        }
    }

    fn add(&mut self, site: &SiteRecord) {
        self.site_count += 1;
        self.capacity_mw += u64::from(site.capacity_mw);
        self.water_total += site.water_total;
        self.diesel_total += site.diesel_total;
        self.ghg_total += site.ghg_total();
    }
}

/// Sums and means over a sequence of site records.
///
/// Every field is zero and `regions` is empty when there are no sites.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub site_count: usize,
    pub capacity_mw: u64,
    pub water_total: f64,
    pub diesel_total: f64,
    pub electricity_total: f64,
    pub cement_total: f64,
    pub steel_total: f64,
    pub scope1_total: f64,
    pub scope2_total: f64,
    pub scope3_total: f64,
    pub ghg_total: f64,
    /// Mean GHG emissions per site
    pub ghg_mean: f64,
    /// Mean of the per-site emission intensities
    pub intensity_mean: f64,
    pub water_intensity_mean: f64,
    pub fuel_intensity_mean: f64,
    /// Portfolio emissions per MW of portfolio capacity
    pub portfolio_intensity: f64,
    /// One entry per region, ordered by region name
    pub regions: Vec<RegionSummary>,
}

/// Reduces site records to a [`PortfolioSummary`].
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    pub fn aggregate(sites: &[SiteRecord]) -> PortfolioSummary {
        let mut summary = PortfolioSummary::default();
        let mut regions: BTreeMap<&str, RegionSummary> = BTreeMap::new();
        let mut intensity_sum = 0.0;
        let mut water_intensity_sum = 0.0;
        let mut fuel_intensity_sum = 0.0;

        for site in sites {
            summary.site_count += 1;
            summary.capacity_mw += u64::from(site.capacity_mw);
            summary.water_total += site.water_total;
            summary.diesel_total += site.diesel_total;
            summary.electricity_total += site.electricity_total;
            summary.cement_total += site.cement_total;
            summary.steel_total += site.steel_total;
            summary.scope1_total += site.emissions.scope1;
            summary.scope2_total += site.emissions.scope2;
            summary.scope3_total += site.emissions.scope3;
            summary.ghg_total += site.ghg_total();
            intensity_sum += site.intensity;
            water_intensity_sum += site.water_intensity;
            fuel_intensity_sum += site.fuel_intensity;

            regions
                .entry(site.region.as_str())
                .or_insert_with(|| RegionSummary::new(&site.region))
                .add(site);
        }

        if summary.site_count > 0 {
            let count = summary.site_count as f64;
            summary.ghg_mean = summary.ghg_total / count;
            summary.intensity_mean = intensity_sum / count;
            summary.water_intensity_mean = water_intensity_sum / count;
            summary.fuel_intensity_mean = fuel_intensity_sum / count;
        }
        if summary.capacity_mw > 0 {
            summary.portfolio_intensity = summary.ghg_total / summary.capacity_mw as f64;
        }
        summary.regions = regions.into_values().collect();
        summary
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::emission::Emissions;
    use crate::engine::metadata::Technology;
    use crate::engine::series::MonthlySeries;
    use crate::engine::site::ResourceSeries;

    /// A site record with only the aggregated fields set.
    pub(crate) fn site(name: &str, region: &str, capacity_mw: u32, water: f64, diesel: f64, ghg: f64) -> SiteRecord {
        let capacity = f64::from(capacity_mw.max(1));
        SiteRecord {
            site_name: name.to_owned(),
            region: region.to_owned(),
            technology: Technology::Solar,
            capacity_mw,
            sheet_name: "Data".to_owned(),
            water_total: water,
            diesel_total: diesel,
            electricity_total: 0.0,
            cement_total: 0.0,
            steel_total: 0.0,
            series: ResourceSeries::default(),
            scope1_series: MonthlySeries::default(),
            emissions: Emissions {
                scope1: ghg,
                scope2: 0.0,
                scope3: 0.0,
                total: ghg,
            },
            intensity: ghg / capacity,
            water_intensity: water / capacity,
            fuel_intensity: diesel / capacity,
            classified_rows: 1,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn empty_portfolio_is_zero() {
        let summary = PortfolioAggregator::aggregate(&[]);
        assert_eq!(summary, PortfolioSummary::default());
        assert_eq!(summary.site_count, 0);
        assert_eq!(summary.ghg_total, 0.0);
        assert!(summary.regions.is_empty());
    }

    #[test]
    fn sums_capacity_and_ghg() {
        let sites = [
            site("A", "Maharashtra", 100, 10.0, 3000.0, 8.04),
            site("B", "Uttar Pradesh", 50, 20.0, 0.0, 4.0),
        ];
        let summary = PortfolioAggregator::aggregate(&sites);
        assert_eq!(summary.site_count, 2);
        assert_eq!(summary.capacity_mw, 150);
        assert!((summary.ghg_total - 12.04).abs() < 1e-9);
        assert!((summary.ghg_mean - 6.02).abs() < 1e-9);
        assert_eq!(summary.water_total, 30.0);
        assert!((summary.portfolio_intensity - 12.04 / 150.0).abs() < 1e-12);
        assert!((summary.intensity_mean - (0.0804 + 0.08) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn group_by_region() {
        let sites = [
            site("Panwari", "Uttar Pradesh", 30, 1.0, 10.0, 1.0),
            site("Solapur", "Maharashtra", 100, 2.0, 20.0, 2.0),
            site("Augasi", "Uttar Pradesh", 20, 3.0, 30.0, 3.0),
        ];
        let summary = PortfolioAggregator::aggregate(&sites);
        let names: Vec<&str> = summary.regions.iter().map(|region| region.region.as_str()).collect();
        assert_eq!(names, vec!["Maharashtra", "Uttar Pradesh"]);
        let uttar_pradesh = &summary.regions[1];
        assert_eq!(uttar_pradesh.site_count, 2);
        assert_eq!(uttar_pradesh.capacity_mw, 50);
        assert_eq!(uttar_pradesh.water_total, 4.0);
        assert_eq!(uttar_pradesh.diesel_total, 40.0);
        assert_eq!(uttar_pradesh.ghg_total, 4.0);
    }
}
