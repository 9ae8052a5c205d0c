//! `farm_core`: deterministic farm indicator simulation.
//!
//! No IO, no network, no randomness.

mod engine;
pub mod indicators;
#[cfg(any(test, feature = "test-support"))]
pub mod test_fixtures;
mod types;
mod zones;

pub use engine::{apply_reading, apply_zone_action, record_reading_failure};
pub use indicators::apply;
pub use types::*;
pub use zones::set_zone_status;

pub(crate) fn emit(counters: &mut Counters, event: Event) -> EventEnvelope {
    let id = EventId(format!("evt_{:06}", counters.next_event_id));
    counters.next_event_id += 1;
    EventEnvelope { id, event }
}

#[cfg(test)]
mod tests;
