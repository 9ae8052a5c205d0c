//! Shared test fixtures for farm_core and downstream crates.
//!
//! `base_content()` mirrors the shipped Mwea Tebere content: two crop
//! fields, one livestock pen, indicators 40 / 10 / 0.5 / 70.

use crate::{
    Counters, FarmContent, FarmState, GatewayDef, IndicatorState, MapDef, MapPoint, MetaState,
    ReadingVariant, SiteDef, Zone, ZoneDef, ZoneId, ZoneKind, ZoneStatus,
};
use chrono::NaiveDate;

pub const CROP_ZONE: &str = "zone1";
pub const SECOND_CROP_ZONE: &str = "zone2";
pub const LIVESTOCK_ZONE: &str = "zone3";

pub fn base_indicators() -> IndicatorState {
    IndicatorState {
        soil_moisture: 40.0,
        rainfall: 10.0,
        crop_vigor_index: 0.5,
        livestock_health: 70.0,
    }
}

pub fn base_content() -> FarmContent {
    FarmContent {
        content_version: "test".to_string(),
        initial_indicators: base_indicators(),
        zones: vec![
            ZoneDef {
                id: CROP_ZONE.to_string(),
                kind: ZoneKind::Crop,
                label: "Crop Field 1".to_string(),
                marker: None,
            },
            ZoneDef {
                id: SECOND_CROP_ZONE.to_string(),
                kind: ZoneKind::Crop,
                label: "Crop Field 2".to_string(),
                marker: None,
            },
            ZoneDef {
                id: LIVESTOCK_ZONE.to_string(),
                kind: ZoneKind::Livestock,
                label: "Livestock Pen".to_string(),
                marker: None,
            },
        ],
        site: SiteDef {
            name: "Test Site".to_string(),
            latitude: -0.6167,
            longitude: 37.3833,
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        },
        gateway: GatewayDef {
            endpoint: "http://127.0.0.1:9/api/temporal/daily/point".to_string(),
            variant: ReadingVariant::WithVegetation,
            timeout_secs: None,
        },
        map: MapDef {
            center: MapPoint {
                latitude: -0.6167,
                longitude: 37.3833,
            },
            zoom: 13,
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: None,
            overlay: None,
        },
    }
}

pub fn base_state(content: &FarmContent) -> FarmState {
    FarmState {
        meta: MetaState {
            schema_version: 1,
            content_version: content.content_version.clone(),
        },
        indicators: content.initial_indicators,
        zones: content
            .zones
            .iter()
            .map(|def| Zone {
                id: ZoneId(def.id.clone()),
                kind: def.kind,
                label: def.label.clone(),
                status: ZoneStatus::Normal,
                marker: def.marker,
            })
            .collect(),
        counters: Counters::default(),
    }
}

/// State with the given indicators and the base zones.
pub fn state_with(indicators: IndicatorState) -> FarmState {
    let mut state = base_state(&base_content());
    state.indicators = indicators;
    state
}
