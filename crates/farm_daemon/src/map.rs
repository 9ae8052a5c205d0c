use farm_core::{FarmContent, MapPoint, ZoneKind};
use serde::Serialize;

/// Everything a client needs to draw the farm map. Tile and overlay URLs
/// are passed through untouched; the daemon never fetches them.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: MapPoint,
    pub zoom: u8,
    pub tiles: TileLayer,
    pub overlay: Option<WmsOverlay>,
    pub markers: Vec<ZoneMarker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WmsOverlay {
    pub url: String,
    pub layers: String,
    pub format: &'static str,
    pub transparent: bool,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneMarker {
    pub zone_id: String,
    pub label: String,
    pub kind: ZoneKind,
    pub position: MapPoint,
}

impl MapView {
    pub fn from_content(content: &FarmContent) -> Self {
        let map = &content.map;
        Self {
            center: map.center,
            zoom: map.zoom,
            tiles: TileLayer {
                url: map.tile_url.clone(),
                attribution: map.attribution.clone(),
            },
            overlay: map.overlay.as_ref().map(|overlay| WmsOverlay {
                url: overlay.url.clone(),
                layers: overlay.layer.clone(),
                format: "image/png",
                transparent: true,
                opacity: overlay.opacity,
            }),
            // Zones without a marker are listed on the dashboard only.
            markers: content
                .zones
                .iter()
                .filter_map(|zone| {
                    zone.marker.map(|position| ZoneMarker {
                        zone_id: zone.id.clone(),
                        label: zone.label.clone(),
                        kind: zone.kind,
                        position,
                    })
                })
                .collect(),
        }
    }
}
