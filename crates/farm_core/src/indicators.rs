use crate::{ActionKind, ExternalReading, IndicatorState};

pub const SOIL_MOISTURE_MAX: f64 = 100.0;
pub const CROP_VIGOR_MAX: f64 = 1.0;
pub const LIVESTOCK_HEALTH_MAX: f64 = 100.0;

pub const IRRIGATE_SOIL_DELTA: f64 = 20.0;
pub const IRRIGATE_VIGOR_DELTA: f64 = 0.1;
pub const FERTILIZE_VIGOR_DELTA: f64 = 0.15;
pub const FEED_HEALTH_DELTA: f64 = 15.0;

/// Soil moisture above this, checked before irrigating, draws the warning.
pub const OVER_IRRIGATION_THRESHOLD: f64 = 70.0;

pub const MSG_OVER_IRRIGATION: &str =
    "Too much irrigation! Soil moisture is high (simulated from SMAP).";
pub const MSG_IRRIGATED: &str = "Irrigation successful. Crop health improved (NDVI up).";
pub const MSG_FERTILIZED: &str = "Fertilizer applied. NDVI (crop vigor) increased.";
pub const MSG_FED: &str = "Livestock fed. Health improved.";

impl IndicatorState {
    /// Pins every field into its range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            soil_moisture: self.soil_moisture.clamp(0.0, SOIL_MOISTURE_MAX),
            rainfall: self.rainfall.max(0.0),
            crop_vigor_index: self.crop_vigor_index.clamp(0.0, CROP_VIGOR_MAX),
            livestock_health: self.livestock_health.clamp(0.0, LIVESTOCK_HEALTH_MAX),
        }
    }

    /// Seeds rainfall and crop vigor from an external reading. Soil moisture
    /// and livestock health are kept.
    #[must_use]
    pub fn with_reading(self, reading: &ExternalReading) -> Self {
        Self {
            rainfall: reading.precipitation,
            crop_vigor_index: reading.vegetation_or_default(),
            ..self
        }
        .clamped()
    }

    /// Every field is finite and inside its range.
    pub fn is_in_range(&self) -> bool {
        (0.0..=SOIL_MOISTURE_MAX).contains(&self.soil_moisture)
            && self.rainfall >= 0.0
            && (0.0..=CROP_VIGOR_MAX).contains(&self.crop_vigor_index)
            && (0.0..=LIVESTOCK_HEALTH_MAX).contains(&self.livestock_health)
    }
}

/// Applies `action` to `state`, returning the next indicators and the
/// feedback message.
///
/// The irrigation warning looks at soil moisture *before* the delta is
/// added, so irrigating at 75 warns even though the result is clamped to
/// 100, and irrigating at 60 succeeds and lands on 80.
pub fn apply(state: &IndicatorState, action: ActionKind) -> (IndicatorState, &'static str) {
    let (next, message) = match action {
        ActionKind::Irrigate => {
            let message = if state.soil_moisture > OVER_IRRIGATION_THRESHOLD {
                MSG_OVER_IRRIGATION
            } else {
                MSG_IRRIGATED
            };
            let next = IndicatorState {
                soil_moisture: (state.soil_moisture + IRRIGATE_SOIL_DELTA).min(SOIL_MOISTURE_MAX),
                crop_vigor_index: (state.crop_vigor_index + IRRIGATE_VIGOR_DELTA)
                    .min(CROP_VIGOR_MAX),
                ..*state
            };
            (next, message)
        }
        ActionKind::Fertilize => {
            let next = IndicatorState {
                crop_vigor_index: (state.crop_vigor_index + FERTILIZE_VIGOR_DELTA)
                    .min(CROP_VIGOR_MAX),
                ..*state
            };
            (next, MSG_FERTILIZED)
        }
        ActionKind::Feed => {
            let next = IndicatorState {
                livestock_health: (state.livestock_health + FEED_HEALTH_DELTA)
                    .min(LIVESTOCK_HEALTH_MAX),
                ..*state
            };
            (next, MSG_FED)
        }
    };
    (next.clamped(), message)
}
