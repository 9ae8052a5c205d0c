use super::*;
use crate::test_fixtures::{base_content, base_indicators, base_state, state_with};


// --- Shared test helpers ------------------------------------------------

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn test_state() -> FarmState {
    base_state(&base_content())
}

fn indicators_with_soil(soil_moisture: f64) -> IndicatorState {
    IndicatorState {
        soil_moisture,
        ..base_indicators()
    }
}

fn zone_id(id: &str) -> ZoneId {
    ZoneId(id.to_string())
}
