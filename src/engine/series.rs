use crate::engine::coerce::CellCoercer;
use crate::engine::coerce::CoercionWarning;
use crate::spreadsheet::CellValue;
use serde::Serialize;
use std::ops::AddAssign;
use std::ops::Index;

/// Month labels, January first.
pub const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Twelve non-negative monthly quantities, January at index 0.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct MonthlySeries([f64; 12]);

impl MonthlySeries {
    pub fn new(values: [f64; 12]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; 12] {
        &self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Every month multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self(self.0.map(|value| value * factor))
    }

    /// `(label, value)` pairs in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        MONTHS.iter().copied().zip(self.0.iter().copied())
    }
}

impl AddAssign<&MonthlySeries> for MonthlySeries {
    fn add_assign(&mut self, other: &MonthlySeries) {
        for (value, other) in self.0.iter_mut().zip(other.0.iter()) {
            *value += other;
        }
    }
}

impl Index<usize> for MonthlySeries {
    type Output = f64;

    fn index(&self, month: usize) -> &f64 {
        &self.0[month]
    }
}

/// Reads twelve consecutive columns of a row as a monthly series.
///
/// Columns are taken by position; cells past the end of the row count as zero.
#[derive(Copy, Clone, Debug)]
pub struct MonthlySeriesExtractor {
    first_column: usize,
    coercer: CellCoercer,
}

impl Default for MonthlySeriesExtractor {
    fn default() -> Self {
        Self::new(5, CellCoercer::default())
    }
}

impl MonthlySeriesExtractor {
    pub fn new(first_column: usize, coercer: CellCoercer) -> Self {
        Self { first_column, coercer }
    }

    pub fn extract(&self, row: &[CellValue]) -> MonthlySeries {
        let mut values = [0.0; 12];
        for (month, value) in values.iter_mut().enumerate() {
            if let Some(cell) = row.get(self.first_column + month) {
                *value = self.coercer.coerce(cell);
            }
        }
        MonthlySeries(values)
    }

    /// Extracts row `row_index` of sheet `sheet`, collecting strict-mode warnings.
    pub fn extract_at(&self, row: &[CellValue], sheet: &str, row_index: usize, warnings: &mut Vec<CoercionWarning>) -> MonthlySeries {
        let mut values = [0.0; 12];
        for (month, value) in values.iter_mut().enumerate() {
            let col = self.first_column + month;
            if let Some(cell) = row.get(col) {
                *value = self.coercer.coerce_at(cell, sheet, row_index, col, warnings);
            }
        }
        MonthlySeries(values)
    }
}
