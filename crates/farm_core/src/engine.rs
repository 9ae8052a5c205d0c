use crate::indicators::apply;
use crate::zones::set_zone_status;
use crate::{ActionKind, Event, EventEnvelope, ExternalReading, FarmState, ZoneId};

/// Apply `action` to the zone `zone_id`.
///
/// Order of operations:
/// 1. Look up the zone; an unknown id leaves `state` untouched and returns
///    no events.
/// 2. Update the zone's status.
/// 3. Run the indicator engine.
///
/// Returns the single `ZoneActionApplied` event on success.
pub fn apply_zone_action(
    state: &mut FarmState,
    zone_id: &ZoneId,
    action: ActionKind,
) -> Vec<EventEnvelope> {
    if state.zone(zone_id).is_none() {
        return Vec::new();
    }

    state.zones = set_zone_status(&state.zones, zone_id, action);
    let (indicators, message) = apply(&state.indicators, action);
    state.indicators = indicators;

    vec![crate::emit(
        &mut state.counters,
        Event::ZoneActionApplied {
            zone_id: zone_id.clone(),
            action,
            status: action.resulting_status(),
            message: message.to_string(),
            indicators,
        },
    )]
}

/// Seed rainfall and crop vigor from a successful reading.
pub fn apply_reading(state: &mut FarmState, reading: &ExternalReading) -> EventEnvelope {
    state.indicators = state.indicators.with_reading(reading);
    crate::emit(
        &mut state.counters,
        Event::ReadingApplied {
            reading: *reading,
            indicators: state.indicators,
        },
    )
}

/// Record a failed fetch. Indicators are left as they are: the initial
/// state already carries the fallback values, and any actions taken while
/// the fetch was in flight are kept.
pub fn record_reading_failure(state: &mut FarmState, reason: &str) -> EventEnvelope {
    crate::emit(
        &mut state.counters,
        Event::ReadingFailed {
            reason: reason.to_string(),
            indicators: state.indicators,
        },
    )
}
