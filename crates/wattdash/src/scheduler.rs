//! Wall-clock-aligned tick loop driving full and partial redraws.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, Local, Utc};
use tracing::{debug, info};
use wattdash_api::ApiClient;

use crate::cancel::Cancel;
use crate::render;
use crate::state::DashboardState;

/// Seconds between full data refreshes, anchored to the end of the
/// last observation window.
pub const REFRESH_INTERVAL_SECS: i64 = 180;

/// Lifecycle of the tick loop. Transitions only move forward:
/// `Running -> Cancelling` when the signal fires, `Cancelling ->
/// Stopped` once the in-flight tick or wait has wound down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Cancelling,
    Stopped,
}

/// Delay until the next integral wall-clock second.
///
/// A flat one-second sleep would accumulate per-tick processing time
/// as drift; each tick instead targets the next whole second.
pub fn delay_to_next_second() -> Duration {
    let subsec = u64::from(Utc::now().timestamp_subsec_millis());
    Duration::from_millis(1_000 - subsec.min(999))
}

/// Seconds remaining until `last_update_end + REFRESH_INTERVAL_SECS`.
pub fn seconds_until_refresh(last_update_end: &DateTime<FixedOffset>, now: DateTime<Utc>) -> i64 {
    let due = *last_update_end + chrono::Duration::seconds(REFRESH_INTERVAL_SECS);
    (due.with_timezone(&Utc) - now).num_seconds()
}

fn parse_end_time(raw: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("unparseable observation end time {raw:?}"))
}

/// Run the dashboard until the cancellation signal fires.
///
/// One tick per wall-clock second; a tick performs a full redraw when
/// the countdown has run out (or nothing has been drawn yet) and a
/// partial redraw otherwise. Accessor failures propagate out; an
/// interrupted wait is a normal cancellation, not an error.
pub async fn run(client: &ApiClient, cancel: &Cancel, out: &mut impl Write) -> Result<()> {
    info!("querying historical window for the reference maximum");
    let max_power = client
        .historical_max()
        .await
        .context("historical window query failed")?;
    info!(max_power, "reference maximum established");

    let mut state = DashboardState::new(max_power);
    let mut loop_state = LoopState::Running;

    while loop_state == LoopState::Running {
        if cancel.is_fired() {
            loop_state = LoopState::Cancelling;
            break;
        }

        if state.layout.is_none() || state.next_update_in <= 0 {
            full_redraw(client, &mut state, out).await?;
        } else {
            partial_redraw(&mut state, out)?;
        }

        tokio::select! {
            _ = cancel.wait() => {
                loop_state = LoopState::Cancelling;
            }
            _ = tokio::time::sleep(delay_to_next_second()) => {}
        }
    }

    if loop_state == LoopState::Cancelling {
        loop_state = LoopState::Stopped;
    }
    debug!(?loop_state, "tick loop finished");
    Ok(())
}

/// Fetch the latest reading and rebuild the whole table.
async fn full_redraw(
    client: &ApiClient,
    state: &mut DashboardState,
    out: &mut impl Write,
) -> Result<()> {
    let reading = client
        .latest_reading()
        .await
        .context("latest-reading query failed")?;
    state.observe(reading.value);
    state.last_update_end = reading.end_time;

    let observed = parse_end_time(&state.last_update_end)?;
    state.next_update_in = seconds_until_refresh(&observed, Utc::now());

    let clock = Local::now().format("%H:%M:%S").to_string();
    let table = render::build_table(
        reading.value,
        state.max_power,
        &observed,
        &clock,
        state.next_update_in,
    );
    render::draw_full(out, &table, state.layout.is_some()).context("terminal write failed")?;
    state.layout = Some(table.layout);
    debug!(
        value = reading.value,
        max_power = state.max_power,
        next_update_in = state.next_update_in,
        "full redraw"
    );
    Ok(())
}

/// Recompute the countdown and rewrite only the trailing rows.
///
/// Requires a prior full redraw: the cached layout and observation end
/// are the only geometry available here.
fn partial_redraw(state: &mut DashboardState, out: &mut impl Write) -> Result<()> {
    if state.last_update_end.is_empty() {
        bail!("partial redraw with no observation on record");
    }
    let observed = parse_end_time(&state.last_update_end)?;
    state.next_update_in = seconds_until_refresh(&observed, Utc::now());

    let Some(layout) = state.layout.as_ref() else {
        bail!("partial redraw before any full redraw");
    };
    let clock = Local::now().format("%H:%M:%S").to_string();
    let countdown = render::format_countdown(state.next_update_in);
    render::draw_partial(out, layout, &clock, &countdown).context("terminal write failed")?;
    Ok(())
}
