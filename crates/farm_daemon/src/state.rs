use crate::map::MapView;
use farm_control::Session;
use farm_core::EventEnvelope;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub type SharedSession = Arc<Mutex<Session>>;
pub type EventTx = broadcast::Sender<Vec<EventEnvelope>>;

#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    pub event_tx: EventTx,
    pub map: Arc<MapView>,
}

impl AppState {
    pub fn new(session: Session, map: MapView) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            session: Arc::new(Mutex::new(session)),
            event_tx,
            map: Arc::new(map),
        }
    }

    /// Broadcast a batch to stream subscribers. No subscribers is fine.
    pub fn publish(&self, events: Vec<EventEnvelope>) {
        if !events.is_empty() {
            let _ = self.event_tx.send(events);
        }
    }
}
