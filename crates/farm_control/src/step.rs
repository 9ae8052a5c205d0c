use farm_core::{ActionKind, ZoneId};

/// One user interaction, as typed on the command line.
///
/// `zone1` clicks the zone on the map, `zone1:feed` applies an action to
/// it, `:fertilize` presses a control-panel button for the current
/// selection, and `select:zone2` only changes the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerStep {
    Click(ZoneId),
    Act(ZoneId, ActionKind),
    Control(ActionKind),
    Select(ZoneId),
}

impl std::str::FromStr for PlayerStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            None if s.is_empty() => Err("empty step".to_string()),
            None => Ok(PlayerStep::Click(ZoneId::from(s))),
            Some(("select", zone)) if !zone.is_empty() => Ok(PlayerStep::Select(ZoneId::from(zone))),
            Some(("", action)) => Ok(PlayerStep::Control(action.parse()?)),
            Some((zone, action)) => Ok(PlayerStep::Act(ZoneId::from(zone), action.parse()?)),
        }
    }
}

impl std::fmt::Display for PlayerStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerStep::Click(zone) => write!(f, "{zone}"),
            PlayerStep::Act(zone, action) => write!(f, "{zone}:{action}"),
            PlayerStep::Control(action) => write!(f, ":{action}"),
            PlayerStep::Select(zone) => write!(f, "select:{zone}"),
        }
    }
}
