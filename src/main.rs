//! Headless replay player: loads a timeline file and plays it back at the
//! configured tick rate, logging window summaries as the clock advances.

use anyhow::{Context, Result};
use loopscope::config::PlayerConfig;
use loopscope::core::game_time;
use loopscope::input;
use loopscope::playback::ClockAction;
use loopscope::session::ReplaySession;
use loopscope::similar::{RequestTag, SimilarPoint, SimilaritySearch, SimilarQuery, StaticSearch};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Headless viewport: narrow profile
const VIEWPORT_WIDTH: f64 = 1280.0;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: loopscope <timeline-file>")?;

    let config = PlayerConfig::load();
    let loaded = input::load_file(&path)?;

    info!(
        game = %loaded.meta.game_id,
        map = %loaded.meta.map_name,
        matchup = %loaded.meta.matchup(),
        duration = %game_time::format_elapsed(loaded.meta.total_loops as f64),
        "replay loaded"
    );

    let tick_interval = Duration::from_secs_f64(1.0 / config.tick_hz);
    let mut session = ReplaySession::new(loaded.meta, loaded.player_one, loaded.player_two, config);

    // similarity responses come back over a channel; stale ones are dropped
    // by tag inside the session
    let search: Arc<dyn SimilaritySearch> = Arc::new(StaticSearch::empty());
    let (response_tx, mut response_rx) = mpsc::unbounded_channel();

    if let Some(request) = session.dispatch(ClockAction::Start) {
        issue_search(&search, &response_tx, request);
    }

    let mut ticker = tokio::time::interval(tick_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(request) = session.dispatch(ClockAction::Tick) {
                    issue_search(&search, &response_tx, request);
                }

                let clock = session.clock();
                // one status line per game second
                if clock.query_loop() % 16 == 0 {
                    log_status(&session);
                }

                if !clock.running {
                    info!(
                        elapsed = %game_time::format_elapsed(clock.loop_pos),
                        "end of replay"
                    );
                    break;
                }
            }
            Some((tag, points)) = response_rx.recv() => {
                if session.resolve_similar(&tag, points) {
                    info!(overlays = session.overlay_positions().len(), "overlays updated");
                }
            }
        }
    }

    Ok(())
}

fn issue_search(
    search: &Arc<dyn SimilaritySearch>,
    response_tx: &mpsc::UnboundedSender<(RequestTag, Vec<SimilarPoint>)>,
    (tag, query): (RequestTag, SimilarQuery),
) {
    let search = Arc::clone(search);
    let response_tx = response_tx.clone();

    tokio::spawn(async move {
        match search.find_similar(&query).await {
            Ok(points) => {
                let _ = response_tx.send((tag, points));
            }
            Err(err) => warn!(error = %err, "similarity search failed"),
        }
    });
}

fn log_status(session: &ReplaySession) {
    let clock = session.clock();
    let window = session.window(VIEWPORT_WIDTH);

    let recent: Vec<String> = window
        .buckets
        .iter()
        .rev()
        .take(3)
        .flat_map(|bucket| bucket.top.iter().chain(&bucket.bottom))
        .map(|entry| format!("{}{:+}", entry.kind, entry.net))
        .collect();

    match session.current_stats() {
        Some(stats) => info!(
            elapsed = %game_time::format_elapsed(clock.loop_pos),
            player = %clock.active_player,
            minerals = stats.minerals_current,
            vespene = stats.vespene_current,
            supply = %format!("{}/{}", stats.supply_used(), stats.supply_made()),
            recent = %recent.join(" "),
            "playback"
        ),
        None => info!(
            elapsed = %game_time::format_elapsed(clock.loop_pos),
            player = %clock.active_player,
            recent = %recent.join(" "),
            "playback"
        ),
    }
}
