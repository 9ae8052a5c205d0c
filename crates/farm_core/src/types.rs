//! Type definitions for `farm_core`.
//!
//! All public types, structs, enums, and ID newtypes used by the simulation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ID newtypes
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(ZoneId);
string_id!(EventId);

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Crop,
    Livestock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
    Normal,
    Irrigated,
    Fertilized,
    Fed,
}

/// The three things a player can do to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Irrigate,
    Fertilize,
    Feed,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Irrigate, ActionKind::Fertilize, ActionKind::Feed];

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Irrigate => "irrigate",
            ActionKind::Fertilize => "fertilize",
            ActionKind::Feed => "feed",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|action| action.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown action '{s}' (expected irrigate, fertilize or feed)"))
    }
}

/// Which parameter set the external reading asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingVariant {
    /// `PRECTOT` only; the vegetation index falls back to a fixed value.
    PrecipitationOnly,
    /// `NDVI,PRECTOT`.
    #[default]
    WithVegetation,
}

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

/// Simulated farm indicators. Every field stays inside its range after any
/// update; see [`IndicatorState::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorState {
    /// Percent, `[0, 100]`.
    pub soil_moisture: f64,
    /// Millimetres, `>= 0`.
    pub rainfall: f64,
    /// NDVI proxy, `[0, 1]`.
    pub crop_vigor_index: f64,
    /// Percent, `[0, 100]`.
    pub livestock_health: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub kind: ZoneKind,
    pub label: String,
    pub status: ZoneStatus,
    /// Presentation only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<MapPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A value pulled from the climate API. Either complete or not produced at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalReading {
    pub precipitation: f64,
    pub vegetation_index: Option<f64>,
}

impl ExternalReading {
    /// Substituted by callers when the fetch fails.
    pub const FALLBACK: ExternalReading = ExternalReading {
        precipitation: 10.0,
        vegetation_index: Some(DEFAULT_VEGETATION_INDEX),
    };

    pub fn vegetation_or_default(&self) -> f64 {
        self.vegetation_index.unwrap_or(DEFAULT_VEGETATION_INDEX)
    }
}

pub const DEFAULT_VEGETATION_INDEX: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmState {
    pub meta: MetaState,
    pub indicators: IndicatorState,
    /// Seed order is display order.
    pub zones: Vec<Zone>,
    pub counters: Counters,
}

impl FarmState {
    pub fn zone(&self, zone_id: &ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|zone| &zone.id == zone_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaState {
    pub schema_version: u32,
    pub content_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    pub next_event_id: u64,
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: EventId,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ZoneActionApplied {
        zone_id: ZoneId,
        action: ActionKind,
        status: ZoneStatus,
        message: String,
        indicators: IndicatorState,
    },
    ReadingApplied {
        reading: ExternalReading,
        indicators: IndicatorState,
    },
    ReadingFailed {
        reason: String,
        indicators: IndicatorState,
    },
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmContent {
    pub content_version: String,
    pub initial_indicators: IndicatorState,
    pub zones: Vec<ZoneDef>,
    pub site: SiteDef,
    pub gateway: GatewayDef,
    pub map: MapDef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDef {
    pub id: String,
    pub kind: ZoneKind,
    pub label: String,
    #[serde(default)]
    pub marker: Option<MapPoint>,
}

/// Location and date window for the startup reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDef {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayDef {
    pub endpoint: String,
    #[serde(default)]
    pub variant: ReadingVariant,
    /// Unset means no request timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDef {
    pub center: MapPoint,
    pub zoom: u8,
    pub tile_url: String,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub overlay: Option<WmsOverlayDef>,
}

/// Vegetation anomaly WMS layer drawn over the base tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WmsOverlayDef {
    pub url: String,
    pub layer: String,
    #[serde(default = "default_overlay_opacity")]
    pub opacity: f64,
}

fn default_overlay_opacity() -> f64 {
    0.6
}
