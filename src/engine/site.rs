use crate::config::EngineConfig;
use crate::engine::classify::ResourceCategory;
use crate::engine::classify::RowClassifier;
use crate::engine::coerce::CellCoercer;
use crate::engine::coerce::CoercionWarning;
use crate::engine::emission::Consumption;
use crate::engine::emission::EmissionFactors;
use crate::engine::emission::Emissions;
use crate::engine::metadata::site_name;
use crate::engine::metadata::FilenameMetadataParser;
use crate::engine::metadata::SiteMetadata;
use crate::engine::metadata::Technology;
use crate::engine::select::SheetSelector;
use crate::engine::series::MonthlySeries;
use crate::engine::series::MonthlySeriesExtractor;
use crate::error::EsgSheetError;
use crate::error::ExtractionError;
use crate::spreadsheet::open_spreadsheet;
use crate::spreadsheet::Criteria;
use crate::spreadsheet::RawWorkbook;
use crate::spreadsheet::SpreadsheetError;
use crate::spreadsheet::Table;
use log::debug;
use log::info;
use log::warn;

/// Monthly series of every tracked resource.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResourceSeries([MonthlySeries; 5]);

impl ResourceSeries {
    fn slot(category: ResourceCategory) -> Option<usize> {
        ResourceCategory::TRACKED.iter().position(|tracked| *tracked == category)
    }

    /// Series of `category`; unclassified rows have none.
    pub fn get(&self, category: ResourceCategory) -> Option<&MonthlySeries> {
        Self::slot(category).map(|slot| &self.0[slot])
    }

    /// Adds a row's series to its category.
    pub fn add(&mut self, category: ResourceCategory, series: &MonthlySeries) {
        if let Some(slot) = Self::slot(category) {
            self.0[slot] += series;
        }
    }

    pub fn total(&self, category: ResourceCategory) -> f64 {
        self.get(category).map(MonthlySeries::total).unwrap_or(0.0)
    }
}

/// KPIs of one site.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteRecord {
    /// File name without extension
    pub site_name: String,
    pub region: String,
    pub technology: Technology,
    /// Rated capacity in MW as parsed from the file name
    pub capacity_mw: u32,
    /// Sheet the figures were read from
    pub sheet_name: String,
    pub water_total: f64,
    pub diesel_total: f64,
    pub electricity_total: f64,
    pub cement_total: f64,
    pub steel_total: f64,
    pub series: ResourceSeries,
    /// Diesel series converted to tCO2e
    pub scope1_series: MonthlySeries,
    pub emissions: Emissions,
    /// tCO2e per MW
    pub intensity: f64,
    /// Water per MW
    pub water_intensity: f64,
    /// Diesel per MW
    pub fuel_intensity: f64,
    /// Rows assigned to a tracked category
    pub classified_rows: usize,
    /// Lossy cells, only collected in strict mode
    pub warnings: Vec<CoercionWarning>,
}

impl SiteRecord {
    pub fn ghg_total(&self) -> f64 {
        self.emissions.total
    }

    pub fn total(&self, category: ResourceCategory) -> f64 {
        self.series.total(category)
    }
}

/// Turns one workbook into a [`SiteRecord`].
#[derive(Clone, Debug, Default)]
pub struct SiteExtractor {
    selector: SheetSelector,
    classifier: RowClassifier,
    series: MonthlySeriesExtractor,
    metadata: FilenameMetadataParser,
    factors: EmissionFactors,
    header_rows: usize,
}

impl SiteExtractor {
    pub fn from_config(config: &EngineConfig) -> Result<Self, EsgSheetError> {
        let coercer = CellCoercer::new(config.digit_pattern, config.coercion_mode);
        Ok(Self {
            selector: SheetSelector::new(config.sheet_preferences.as_slice())?,
            classifier: RowClassifier::new(config.description_column, config.min_row_width),
            series: MonthlySeriesExtractor::new(config.first_month_column, coercer),
            metadata: FilenameMetadataParser::new(config.default_capacity),
            factors: config.emission_factors,
            header_rows: config.header_rows,
        })
    }

    /// Reads a workbook held in memory; only the selected sheet is parsed.
    pub fn extract_file(&self, bytes: &[u8], file_name: &str) -> Result<SiteRecord, ExtractionError> {
        let site = site_name(file_name);
        let workbook = self.read_selected_sheet(bytes, file_name).map_err(|e| ExtractionError::new(&site, e))?;
        self.extract_site(&workbook, &site)
    }

    fn read_selected_sheet(&self, bytes: &[u8], file_name: &str) -> Result<RawWorkbook, EsgSheetError> {
        let mut spreadsheet = open_spreadsheet(bytes, file_name)?;
        let names = spreadsheet.sheet_names();
        let name = self
            .selector
            .select_name(names.as_slice())
            .ok_or_else(|| SpreadsheetError::EmptyWorkbook(file_name.to_owned()))?;
        let tables = spreadsheet.read_sheets(&Criteria::only(name))?;
        Ok(RawWorkbook::from_tables(file_name, tables))
    }

    /// Computes the KPIs of a parsed workbook.
    ///
    /// Region, technology and capacity come from the workbook's file name.
    pub fn extract_site(&self, workbook: &RawWorkbook, site_name: &str) -> Result<SiteRecord, ExtractionError> {
        let table = self.selector.select(workbook).map_err(|e| ExtractionError::new(site_name, e))?;
        let metadata = SiteMetadata {
            site_name: site_name.to_owned(),
            ..self.metadata.parse(workbook.file_name())
        };
        let record = self.accumulate(table, metadata);
        if !record.warnings.is_empty() {
            warn!("Site '{}' has {} malformed cell(s) in sheet '{}'", record.site_name, record.warnings.len(), record.sheet_name);
        }
        info!(
            "Extract site '{}': {} classified row(s), {:.3} tCO2e",
            record.site_name,
            record.classified_rows,
            record.ghg_total()
        );
        Ok(record)
    }

    fn accumulate(&self, table: &Table, metadata: SiteMetadata) -> SiteRecord {
        let mut series = ResourceSeries::default();
        let mut warnings = Vec::new();
        let mut classified_rows = 0;
        for (row_index, row) in table.rows().iter().enumerate().skip(self.header_rows) {
            let category = self.classifier.classify(row, table.width());
            if category == ResourceCategory::Unclassified {
                continue;
            }
            let row_series = self.series.extract_at(row, table.name(), row_index, &mut warnings);
            series.add(category, &row_series);
            classified_rows += 1;
        }
        debug!("Classified {} of {} row(s) in sheet '{}'", classified_rows, table.height(), table.name());

        let consumption = Consumption {
            diesel: series.total(ResourceCategory::Diesel),
            electricity: series.total(ResourceCategory::Electricity),
            cement: series.total(ResourceCategory::Cement),
            steel: series.total(ResourceCategory::Steel),
        };
        let emissions = self.factors.emissions(&consumption);
        let capacity = f64::from(metadata.capacity_mw.max(1));
        let water_total = series.total(ResourceCategory::Water);
        let scope1_series = series
            .get(ResourceCategory::Diesel)
            .map(|diesel| diesel.scaled(self.factors.diesel))
            .unwrap_or_default();

        SiteRecord {
            site_name: metadata.site_name,
            region: metadata.region,
            technology: metadata.technology,
            capacity_mw: metadata.capacity_mw,
            sheet_name: table.name().to_owned(),
            water_total,
            diesel_total: consumption.diesel,
            electricity_total: consumption.electricity,
            cement_total: consumption.cement,
            steel_total: consumption.steel,
            series,
            scope1_series,
            emissions,
            intensity: emissions.total / capacity,
            water_intensity: water_total / capacity,
            fuel_intensity: consumption.diesel / capacity,
            classified_rows,
            warnings,
        }
    }
}
