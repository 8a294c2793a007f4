use crate::engine::portfolio::PortfolioSummary;
use crate::engine::site::SiteRecord;
use crate::error::EsgSheetError;
use crate::export::ExportValue;
use crate::export::RegionRow;
use crate::export::SiteRow;
use rust_xlsxwriter::Format;
use rust_xlsxwriter::Workbook;
use rust_xlsxwriter::Worksheet;

pub const SITES_SHEET: &str = "Portfolio_KPIs";
pub const REGIONS_SHEET: &str = "Region_Summary";

fn write_table(worksheet: &mut Worksheet, headers: &[&str], rows: &[Vec<ExportValue>]) -> Result<(), EsgSheetError> {
    let header_format = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (index, values) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, value) in values.iter().enumerate() {
            match value {
                ExportValue::Text(text) => worksheet.write_string(row, col as u16, *text)?,
                ExportValue::Number(number) => worksheet.write_number(row, col as u16, *number)?,
            };
        }
    }
    Ok(())
}

/// Workbook with one sheet of site KPIs and one of region rollups.
pub fn portfolio_to_xlsx(sites: &[SiteRecord], summary: &PortfolioSummary) -> Result<Vec<u8>, EsgSheetError> {
    let mut workbook = Workbook::new();

    let site_rows: Vec<SiteRow> = sites.iter().map(SiteRow::from).collect();
    let site_values: Vec<Vec<ExportValue>> = site_rows.iter().map(SiteRow::values).collect();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SITES_SHEET)?;
    write_table(worksheet, &SiteRow::HEADERS, &site_values)?;

    let region_rows: Vec<RegionRow> = summary.regions.iter().map(RegionRow::from).collect();
    let region_values: Vec<Vec<ExportValue>> = region_rows.iter().map(RegionRow::values).collect();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(REGIONS_SHEET)?;
    write_table(worksheet, &RegionRow::HEADERS, &region_values)?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::portfolio::tests::site;
    use crate::engine::portfolio::PortfolioAggregator;
    use crate::engine::site::SiteExtractor;
    use crate::spreadsheet::read_workbook;
    use crate::spreadsheet::CellValue;

    #[test]
    fn read_back_both_sheets() {
        let sites = [site("Solapur", "Maharashtra", 100, 5.0, 3000.0, 8.04), site("Augasi", "Uttar Pradesh", 20, 1.5, 0.0, 0.0)];
        let summary = PortfolioAggregator::aggregate(&sites);
        let bytes = portfolio_to_xlsx(&sites, &summary).unwrap();

        let workbook = read_workbook(&bytes, "export.xlsx").unwrap();
        assert_eq!(workbook.sheet_names(), vec![SITES_SHEET, REGIONS_SHEET]);

        let kpis = workbook.sheet(SITES_SHEET).unwrap();
        assert_eq!(kpis.height(), 3);
        assert_eq!(kpis.width(), SiteRow::HEADERS.len());
        assert_eq!(kpis.cell(0, 0), Some(&CellValue::Text("Site".to_owned())));
        assert_eq!(kpis.cell(1, 0), Some(&CellValue::Text("Solapur".to_owned())));
        assert_eq!(kpis.cell(1, 3), Some(&CellValue::Number(100.0)));
        assert_eq!(kpis.cell(2, 1), Some(&CellValue::Text("Uttar Pradesh".to_owned())));

        let regions = workbook.sheet(REGIONS_SHEET).unwrap();
        assert_eq!(regions.height(), 3);
        assert_eq!(regions.cell(0, 5), Some(&CellValue::Text("Num_Sites".to_owned())));
        assert_eq!(regions.cell(1, 0), Some(&CellValue::Text("Maharashtra".to_owned())));
        assert_eq!(regions.cell(2, 1), Some(&CellValue::Number(20.0)));
    }

    #[test]
    fn empty_portfolio_keeps_headers() {
        let bytes = portfolio_to_xlsx(&[], &PortfolioAggregator::aggregate(&[])).unwrap();
        let workbook = read_workbook(&bytes, "empty.xlsx").unwrap();
        assert_eq!(workbook.sheet(SITES_SHEET).unwrap().height(), 1);
        assert_eq!(workbook.sheet(REGIONS_SHEET).unwrap().height(), 1);
    }

    #[test]
    fn exported_kpis_are_not_site_data() {
        let sites = [site("Solapur", "Maharashtra", 100, 5.0, 3000.0, 8.04)];
        let bytes = portfolio_to_xlsx(&sites, &PortfolioAggregator::aggregate(&sites)).unwrap();
        let record = SiteExtractor::default().extract_file(&bytes, "export.xlsx").unwrap();
        assert_eq!(record.sheet_name, SITES_SHEET);
        assert_eq!(record.classified_rows, 0);
    }
}
