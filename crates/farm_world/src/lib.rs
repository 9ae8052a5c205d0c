//! Content loading and initial farm state shared between farm_cli and farm_daemon.

use anyhow::{Context, Result};
use farm_core::{
    Counters, FarmContent, FarmState, MetaState, Zone, ZoneId, ZoneStatus,
};
use std::collections::HashSet;
use std::path::Path;

pub const CONTENT_FILE: &str = "farm.json";
const SCHEMA_VERSION: u32 = 1;

/// Validates loaded content, panicking on any authoring error.
///
/// Catches mistakes like: two zones sharing an id, starting indicators
/// outside their ranges, or a site date window that runs backwards.
pub fn validate_content(content: &FarmContent) {
    let mut seen: HashSet<&str> = HashSet::new();
    for zone in &content.zones {
        assert!(!zone.id.is_empty(), "zone '{}' has an empty id", zone.label);
        assert!(
            seen.insert(zone.id.as_str()),
            "zone id '{}' is declared more than once",
            zone.id,
        );
    }

    assert!(
        content.initial_indicators.is_in_range(),
        "initial indicators out of range: {:?}",
        content.initial_indicators,
    );

    let site = &content.site;
    assert!(
        (-90.0..=90.0).contains(&site.latitude),
        "site '{}' latitude {} outside [-90, 90]",
        site.name,
        site.latitude,
    );
    assert!(
        (-180.0..=180.0).contains(&site.longitude),
        "site '{}' longitude {} outside [-180, 180]",
        site.name,
        site.longitude,
    );
    assert!(
        site.start <= site.end,
        "site '{}' start {} is after end {}",
        site.name,
        site.start,
        site.end,
    );

    assert!(
        !content.gateway.endpoint.is_empty(),
        "gateway endpoint is empty"
    );
}

pub fn load_content(content_dir: &str) -> Result<FarmContent> {
    let path = Path::new(content_dir).join(CONTENT_FILE);
    let content: FarmContent = serde_json::from_str(
        &std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
    )
    .with_context(|| format!("parsing {}", path.display()))?;
    validate_content(&content);
    Ok(content)
}

/// Fresh farm: every zone `Normal`, indicators as authored.
pub fn build_initial_state(content: &FarmContent) -> FarmState {
    FarmState {
        meta: MetaState {
            schema_version: SCHEMA_VERSION,
            content_version: content.content_version.clone(),
        },
        indicators: content.initial_indicators.clamped(),
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
