mod step;

use farm_core::{
    apply_reading, apply_zone_action, record_reading_failure, ActionKind, Event, EventEnvelope,
    ExternalReading, FarmState, IndicatorState, Zone, ZoneId,
};
use serde::Serialize;

pub use step::PlayerStep;

pub const WELCOME_MESSAGE: &str = "Welcome to Kilimotek! Select a zone and take an action.";
pub const FETCH_FAILED_WARNING: &str = "Failed to fetch NASA data.";
pub const CONTROL_PROMPT: &str = "Select a zone to manage.";

/// Progress of the one startup fetch. `Loading` resolves exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DataStatus {
    Loading,
    Ready { reading: ExternalReading },
    Failed { reason: String },
}

/// Owns everything a front end shows: farm state, selection, feedback text
/// and the fetch status. Front ends read it through [`Session::view`] and
/// change it only through the methods below.
#[derive(Debug, Clone)]
pub struct Session {
    state: FarmState,
    selected: Option<ZoneId>,
    feedback: String,
    status: DataStatus,
    pending: Vec<EventEnvelope>,
}

/// Read-only projection handed to renderers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub content_version: String,
    pub data: DataStatus,
    /// Non-fatal warning shown above the dashboard.
    pub warning: Option<String>,
    /// Hidden while the startup fetch is in flight.
    pub dashboard: Option<IndicatorState>,
    pub zones: Vec<Zone>,
    pub selected_zone: Option<ZoneId>,
    pub controls: ControlsView,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlsView {
    pub enabled: bool,
    pub prompt: Option<String>,
    pub actions: [ActionKind; 3],
}

impl Session {
    pub fn new(state: FarmState) -> Self {
        Self {
            state,
            selected: None,
            feedback: WELCOME_MESSAGE.to_string(),
            status: DataStatus::Loading,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &FarmState {
        &self.state
    }

    pub fn status(&self) -> &DataStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, DataStatus::Loading)
    }

    pub fn selected_zone(&self) -> Option<&ZoneId> {
        self.selected.as_ref()
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// Resolve the startup fetch with a reading. Ignored once resolved.
    pub fn load_reading(&mut self, reading: ExternalReading) -> bool {
        if !self.is_loading() {
            tracing::warn!("reading arrived after data status resolved; ignoring");
            return false;
        }
        let event = apply_reading(&mut self.state, &reading);
        self.pending.push(event);
        self.status = DataStatus::Ready { reading };
        true
    }

    /// Resolve the startup fetch as failed. Indicators keep their current
    /// values and the session stays fully usable.
    pub fn fail_reading(&mut self, reason: impl Into<String>) -> bool {
        if !self.is_loading() {
            tracing::warn!("fetch failure reported after data status resolved; ignoring");
            return false;
        }
        let reason = reason.into();
        let event = record_reading_failure(&mut self.state, &reason);
        self.pending.push(event);
        self.status = DataStatus::Failed { reason };
        true
    }

    pub fn select_zone(&mut self, zone_id: &ZoneId) -> bool {
        if self.state.zone(zone_id).is_none() {
            tracing::debug!(%zone_id, "select ignored: unknown zone");
            return false;
        }
        self.selected = Some(zone_id.clone());
        true
    }

    /// Map click: crops get irrigated, livestock gets fed.
    pub fn click_zone(&mut self, zone_id: &ZoneId) -> bool {
        let Some(action) = self.state.zone(zone_id).map(|z| z.kind.default_action()) else {
            tracing::debug!(%zone_id, "click ignored: unknown zone");
            return false;
        };
        self.act_on_zone(zone_id, action)
    }

    /// Select `zone_id` and apply `action` to it. Unknown zones are a silent
    /// no-op: nothing changes, including the selection.
    pub fn act_on_zone(&mut self, zone_id: &ZoneId, action: ActionKind) -> bool {
        let events = apply_zone_action(&mut self.state, zone_id, action);
        let Some(message) = events.iter().find_map(|e| match &e.event {
            Event::ZoneActionApplied { message, .. } => Some(message.clone()),
            _ => None,
        }) else {
            tracing::debug!(%zone_id, %action, "action ignored: unknown zone");
            return false;
        };
        tracing::debug!(%zone_id, %action, "action applied");
        self.selected = Some(zone_id.clone());
        self.feedback = message;
        self.pending.extend(events);
        true
    }

    /// Control-panel button: applies to the selected zone, if any.
    pub fn control_action(&mut self, action: ActionKind) -> bool {
        let Some(zone_id) = self.selected.clone() else {
            return false;
        };
        self.act_on_zone(&zone_id, action)
    }

    pub fn perform(&mut self, step: &PlayerStep) -> bool {
        match step {
            PlayerStep::Click(zone_id) => self.click_zone(zone_id),
            PlayerStep::Act(zone_id, action) => self.act_on_zone(zone_id, *action),
            PlayerStep::Control(action) => self.control_action(*action),
            PlayerStep::Select(zone_id) => self.select_zone(zone_id),
        }
    }

    /// Events produced since the previous drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<EventEnvelope> {
        std::mem::take(&mut self.pending)
    }

    pub fn view(&self) -> SessionView {
        let warning = match &self.status {
            DataStatus::Failed { .. } => Some(FETCH_FAILED_WARNING.to_string()),
            DataStatus::Loading | DataStatus::Ready { .. } => None,
        };
        let enabled = self.selected.is_some();
        SessionView {
            content_version: self.state.meta.content_version.clone(),
            data: self.status.clone(),
            warning,
            dashboard: (!self.is_loading()).then_some(self.state.indicators),
            zones: self.state.zones.clone(),
            selected_zone: self.selected.clone(),
            controls: ControlsView {
                enabled,
                prompt: (!enabled).then(|| CONTROL_PROMPT.to_string()),
                actions: ActionKind::ALL,
            },
            feedback: self.feedback.clone(),
        }
    }
}
