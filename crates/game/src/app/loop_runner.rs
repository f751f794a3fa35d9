use std::process::ExitCode;

use engine::run_headless;
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        loop_config,
        mut session,
        frames,
    } = app;

    match run_headless(&loop_config, &mut session, frames) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                ticks = summary.ticks,
                game_seconds = summary.game_seconds,
                dropped_backlog_ms = summary.dropped_backlog.as_millis() as u64,
                stopped_early = summary.stopped_early,
                player_health = session.player().health(),
                enemies_alive = session.enemies().iter().filter(|enemy| !enemy.is_dead()).count(),
                game_over = session.game_over(),
                "session_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, tick = session.tick_count(), "simulation_failed");
            ExitCode::FAILURE
        }
    }
}
