//! End-to-end session flows over the shipped content: startup fetch
//! resolution followed by a run of player interactions.

use farm_control::{DataStatus, PlayerStep, Session, FETCH_FAILED_WARNING};
use farm_core::indicators::{MSG_FERTILIZED, MSG_OVER_IRRIGATION};
use farm_core::{ActionKind, ExternalReading, ZoneId, ZoneStatus};
use farm_world::{build_initial_state, load_content};

fn content_dir() -> String {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    format!("{manifest}/../../content")
}

fn production_session() -> Session {
    let content = load_content(&content_dir()).expect("shipped content loads");
    Session::new(build_initial_state(&content))
}

fn run(session: &mut Session, steps: &[&str]) {
    for raw in steps {
        let step: PlayerStep = raw.parse().unwrap();
        session.perform(&step);
    }
}

#[test]
fn failed_fetch_falls_back_and_stays_interactive() {
    let mut session = production_session();
    session.fail_reading("climate API returned HTTP 500");

    let view = session.view();
    assert_eq!(view.warning.as_deref(), Some(FETCH_FAILED_WARNING));
    let dashboard = view.dashboard.expect("dashboard shown after failure");
    assert!((dashboard.rainfall - 10.0).abs() < 1e-9);
    assert!((dashboard.crop_vigor_index - 0.5).abs() < 1e-9);

    assert!(session.act_on_zone(&ZoneId::from("zone1"), ActionKind::Fertilize));
    assert_eq!(session.feedback(), MSG_FERTILIZED);
    assert!((session.state().indicators.crop_vigor_index - 0.65).abs() < 1e-9);
}

#[test]
fn failure_after_actions_keeps_progress() {
    let mut session = production_session();
    run(&mut session, &["zone1:fertilize", "zone1:fertilize"]);
    assert!((session.state().indicators.crop_vigor_index - 0.8).abs() < 1e-9);

    assert!(session.fail_reading("climate API returned HTTP 503"));

    let dashboard = session.view().dashboard.expect("dashboard shown after failure");
    assert!((dashboard.crop_vigor_index - 0.8).abs() < 1e-9);
    assert!((dashboard.rainfall - 10.0).abs() < 1e-9);
    assert_eq!(session.feedback(), MSG_FERTILIZED);
}

#[test]
fn successful_fetch_seeds_dashboard() {
    let mut session = production_session();
    session.load_reading(ExternalReading {
        precipitation: 0.37,
        vegetation_index: Some(0.71),
    });

    let view = session.view();
    assert!(view.warning.is_none());
    assert!(matches!(view.data, DataStatus::Ready { .. }));
    let dashboard = view.dashboard.unwrap();
    assert!((dashboard.rainfall - 0.37).abs() < 1e-9);
    assert!((dashboard.crop_vigor_index - 0.71).abs() < 1e-9);
}

#[test]
fn repeated_irrigation_warns_once_soil_is_wet() {
    let mut session = production_session();
    session.load_reading(ExternalReading::FALLBACK);

    // 40 -> 60 -> 80: the third click sees 80 before adding and warns.
    run(&mut session, &["zone1", "zone1"]);
    assert!((session.state().indicators.soil_moisture - 80.0).abs() < 1e-9);
    run(&mut session, &["zone1"]);
    assert_eq!(session.feedback(), MSG_OVER_IRRIGATION);
    assert!((session.state().indicators.soil_moisture - 100.0).abs() < 1e-9);
    assert!((session.state().indicators.crop_vigor_index - 0.8).abs() < 1e-9);
}

#[test]
fn actions_work_while_still_loading() {
    let mut session = production_session();
    run(&mut session, &["zone3", ":feed"]);
    assert!(session.is_loading());
    assert!((session.state().indicators.livestock_health - 100.0).abs() < 1e-9);
    assert!(session.view().dashboard.is_none());
}

#[test]
fn mixed_script_leaves_expected_statuses() {
    let mut session = production_session();
    session.load_reading(ExternalReading::FALLBACK);
    run(
        &mut session,
        &["select:zone2", ":fertilize", "zone3", "unknown-id:feed", "zone1:irrigate"],
    );

    let statuses: Vec<ZoneStatus> = session.state().zones.iter().map(|z| z.status).collect();
    assert_eq!(
        statuses,
        [ZoneStatus::Irrigated, ZoneStatus::Fertilized, ZoneStatus::Fed]
    );
    assert_eq!(session.selected_zone(), Some(&ZoneId::from("zone1")));

    // reading + three applied actions; the unknown zone emits nothing
    assert_eq!(session.drain_events().len(), 4);
}
