use crate::{ActionKind, Zone, ZoneId, ZoneKind, ZoneStatus};

impl ActionKind {
    /// Status a zone shows after this action.
    pub fn resulting_status(self) -> ZoneStatus {
        match self {
            ActionKind::Irrigate => ZoneStatus::Irrigated,
            ActionKind::Fertilize => ZoneStatus::Fertilized,
            ActionKind::Feed => ZoneStatus::Fed,
        }
    }
}

impl ZoneKind {
    /// Action triggered by clicking a zone on the map.
    pub fn default_action(self) -> ActionKind {
        match self {
            ZoneKind::Crop => ActionKind::Irrigate,
            ZoneKind::Livestock => ActionKind::Feed,
        }
    }
}

/// Returns `zones` with the zone matching `zone_id` set to the status for
/// `action`. Every other zone is copied through unchanged. An unknown id
/// returns the zones as they were.
pub fn set_zone_status(zones: &[Zone], zone_id: &ZoneId, action: ActionKind) -> Vec<Zone> {
    zones
        .iter()
        .map(|zone| {
            if &zone.id == zone_id {
                Zone {
                    status: action.resulting_status(),
                    ..zone.clone()
                }
            } else {
                zone.clone()
            }
        })
        .collect()
}
