use serde::Deserialize;
use serde::Serialize;

/// Emission factors in tCO2e per base physical unit.
///
/// | factor        | unit  | default  |
/// |---------------|-------|----------|
/// | `diesel`      | litre | 0.00268  |
/// | `electricity` | kWh   | 0.00082  |
/// | `cement`      | unit  | 0.00052  |
/// | `steel`       | unit  | 0.0      |
///
/// Steel is tracked but only contributes to Scope 3 when its factor is set.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionFactors {
    pub diesel: f64,
    pub electricity: f64,
    pub cement: f64,
    pub steel: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            diesel: 0.00268,
            electricity: 0.82 / 1000.0,
            cement: 0.52 / 1000.0,
            steel: 0.0,
        }
    }
}

/// Quantities the emission scopes are computed from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Consumption {
    pub diesel: f64,
    pub electricity: f64,
    pub cement: f64,
    pub steel: f64,
}

/// Emissions of one site in tCO2e.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Emissions {
    /// Direct emissions from diesel
    pub scope1: f64,
    /// Purchased electricity
    pub scope2: f64,
    /// Construction materials
    pub scope3: f64,
    /// Always `scope1 + scope2 + scope3`
    pub total: f64,
}

impl EmissionFactors {
    pub fn emissions(&self, consumption: &Consumption) -> Emissions {
        let scope1 = consumption.diesel * self.diesel;
        let scope2 = consumption.electricity * self.electricity;
        let scope3 = consumption.cement * self.cement + consumption.steel * self.steel;
        Emissions {
            scope1,
            scope2,
            scope3,
            total: scope1 + scope2 + scope3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_factors() {
        let factors = EmissionFactors::default();
        let emissions = factors.emissions(&Consumption {
            diesel: 3000.0,
            electricity: 1000.0,
            cement: 1000.0,
            steel: 500.0,
        });
        assert!((emissions.scope1 - 8.04).abs() < 1e-9);
        assert!((emissions.scope2 - 0.82).abs() < 1e-9);
        assert!((emissions.scope3 - 0.52).abs() < 1e-9);
        assert_eq!(emissions.total, emissions.scope1 + emissions.scope2 + emissions.scope3);
    }

    #[test]
    fn steel_factor_feeds_scope3() {
        let factors = EmissionFactors {
            steel: 2.3,
            ..EmissionFactors::default()
        };
        let emissions = factors.emissions(&Consumption {
            steel: 2.0,
            ..Consumption::default()
        });
        assert!((emissions.scope3 - 4.6).abs() < 1e-9);
        assert_eq!(emissions.total, emissions.scope3);
    }

    #[test]
    fn deserialize_partial_table() {
        let factors: EmissionFactors = serde_json::from_str(r#"{"steel": 2.3}"#).unwrap();
        assert_eq!(factors.steel, 2.3);
        assert_eq!(factors.diesel, 0.00268);
    }
}
