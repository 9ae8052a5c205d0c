use crate::state::AppState;
use farm_core::ExternalReading;
use farm_gateway::{GatewayError, PowerClient, ReadingQuery};

/// The one outbound call. Runs in its own task so the server answers while
/// it is in flight; no timeout unless the content configures one.
pub async fn run_startup_fetch(app_state: AppState, client: PowerClient, query: ReadingQuery) {
    let result = client.fetch_reading(&query).await;
    resolve_startup_fetch(&app_state, result);
}

/// Settle the session's data status and broadcast the resulting event.
pub fn resolve_startup_fetch(
    app_state: &AppState,
    result: Result<ExternalReading, GatewayError>,
) {
    let events = {
        let mut session = app_state.session.lock();
        match result {
            Ok(reading) => {
                session.load_reading(reading);
            }
            Err(err) => {
                tracing::warn!(
                    kind = err.kind(),
                    error = %err,
                    "climate fetch failed; using fallback reading"
                );
                session.fail_reading(err.to_string());
            }
        }
        session.drain_events()
    };
    app_state.publish(events);
}
