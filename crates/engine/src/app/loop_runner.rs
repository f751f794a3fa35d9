use std::env;
use std::time::Duration;

use tracing::{info, warn};

use super::clock::GameClock;
use super::input::{InputSnapshot, KeyEvent, Keyboard};
use super::metrics::{LoopMetricsSnapshot, MetricsAccumulator};

pub const SLOW_FRAME_ENV_VAR: &str = "SIDESCROLLER_SLOW_FRAME_MS";

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Anything the loop can advance by one fixed step of game time.
pub trait Simulation {
    type Error;

    fn tick(&mut self, dt_seconds: f32, input: &InputSnapshot)
        -> Result<TickControl, Self::Error>;
}

/// One host frame: how much real time passed and which key events arrived during it.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub real_dt: Duration,
    pub key_events: Vec<KeyEvent>,
}

impl Frame {
    pub fn idle(real_dt: Duration) -> Self {
        Self {
            real_dt,
            key_events: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoopSummary {
    pub frames: u64,
    pub ticks: u64,
    pub dropped_backlog: Duration,
    pub game_seconds: f64,
    pub stopped_early: bool,
    pub last_metrics: Option<LoopMetricsSnapshot>,
}

/// Fixed-timestep driver: turns variable frames into whole ticks of game time.
#[derive(Debug)]
pub struct FixedStepper {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    slow_frame_delay: Duration,
    accumulator: Duration,
    loop_time: Duration,
    clock: GameClock,
    keyboard: Keyboard,
    metrics: MetricsAccumulator,
    summary: LoopSummary,
}

impl FixedStepper {
    pub fn new(config: &LoopConfig) -> Self {
        let target_tps = config.target_tps.max(1);
        let max_frame_delta =
            normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
        let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
        let metrics_log_interval =
            normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
        let fixed_dt = Duration::from_secs_f64(1.0 / f64::from(target_tps));
        let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);

        info!(
            target_tps,
            max_frame_delta_ms = max_frame_delta.as_millis() as u64,
            max_ticks_per_frame,
            metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
            slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
            "loop_config"
        );

        Self {
            fixed_dt,
            max_frame_delta,
            max_ticks_per_frame,
            slow_frame_delay,
            accumulator: Duration::ZERO,
            loop_time: Duration::ZERO,
            clock: GameClock::default(),
            keyboard: Keyboard::default(),
            metrics: MetricsAccumulator::new(metrics_log_interval),
            summary: LoopSummary::default(),
        }
    }

    pub fn fixed_dt_seconds(&self) -> f32 {
        self.fixed_dt.as_secs_f32()
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut GameClock {
        &mut self.clock
    }

    pub fn summary(&self) -> &LoopSummary {
        &self.summary
    }

    pub fn run_frame<S: Simulation>(
        &mut self,
        frame: &Frame,
        simulation: &mut S,
    ) -> Result<TickControl, S::Error> {
        for event in &frame.key_events {
            self.keyboard.handle_event(*event);
        }

        let real_dt = clamp_frame_delta(
            frame.real_dt.saturating_add(self.slow_frame_delay),
            self.max_frame_delta,
        );
        let game_dt = self.clock.advance(real_dt);
        self.accumulator = self.accumulator.saturating_add(game_dt);

        let plan = plan_sim_steps(self.accumulator, self.fixed_dt, self.max_ticks_per_frame);
        self.accumulator = plan.remaining_accumulator;
        if !plan.dropped_backlog.is_zero() {
            warn!(
                dropped_ms = plan.dropped_backlog.as_millis() as u64,
                ticks = plan.ticks_to_run,
                "tick_backlog_dropped"
            );
            self.metrics.record_dropped_backlog(plan.dropped_backlog);
            self.summary.dropped_backlog =
                self.summary.dropped_backlog.saturating_add(plan.dropped_backlog);
        }

        let mut control = TickControl::Continue;
        let dt_seconds = self.fixed_dt_seconds();
        for _ in 0..plan.ticks_to_run {
            let input = self.keyboard.snapshot_for_tick();
            if input.quit_requested() {
                info!(reason = "escape_key", "shutdown_requested");
                control = TickControl::Stop;
                break;
            }
            control = simulation.tick(dt_seconds, &input)?;
            self.metrics.record_tick();
            self.summary.ticks = self.summary.ticks.saturating_add(1);
            if control == TickControl::Stop {
                break;
            }
        }

        self.loop_time = self.loop_time.saturating_add(real_dt);
        self.metrics.record_frame(real_dt);
        self.summary.frames = self.summary.frames.saturating_add(1);
        self.summary.game_seconds = self.clock.total_game_seconds();
        if let Some(snapshot) = self.metrics.maybe_snapshot(self.loop_time) {
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                dropped_backlog_ms = snapshot.dropped_backlog_ms,
                "loop_metrics"
            );
            self.summary.last_metrics = Some(snapshot);
        }
        if control == TickControl::Stop {
            self.summary.stopped_early = true;
        }

        Ok(control)
    }
}

/// Runs scripted frames to completion or until the simulation asks to stop.
pub fn run_headless<S, I>(
    config: &LoopConfig,
    simulation: &mut S,
    frames: I,
) -> Result<LoopSummary, S::Error>
where
    S: Simulation,
    I: IntoIterator<Item = Frame>,
{
    let mut stepper = FixedStepper::new(config);
    for frame in frames {
        if stepper.run_frame(&frame, simulation)? == TickControl::Stop {
            break;
        }
    }
    Ok(stepper.summary().clone())
}

struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => match value.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = value.as_str(),
                    "invalid slow-frame env var value; falling back to config"
                );
                Duration::from_millis(config_slow_frame_ms)
            }
        },
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::app::input::KeyCode;

    #[derive(Default)]
    struct CountingSimulation {
        ticks: u32,
        key_downs_seen: Vec<Vec<KeyCode>>,
        stop_after: Option<u32>,
    }

    impl Simulation for CountingSimulation {
        type Error = Infallible;

        fn tick(
            &mut self,
            _dt_seconds: f32,
            input: &InputSnapshot,
        ) -> Result<TickControl, Self::Error> {
            self.ticks += 1;
            self.key_downs_seen.push(input.key_downs().to_vec());
            if self.stop_after == Some(self.ticks) {
                return Ok(TickControl::Stop);
            }
            Ok(TickControl::Continue)
        }
    }

    fn config_50_tps() -> LoopConfig {
        LoopConfig {
            target_tps: 50,
            ..LoopConfig::default()
        }
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        let raw_frame_dt = Duration::from_millis(600);

        assert_eq!(
            clamp_frame_delta(raw_frame_dt, max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_runs_expected_ticks_without_drop() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(48), fixed_dt, 5);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(120), fixed_dt, 3);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn normalize_non_zero_duration_uses_fallback_for_zero() {
        let fallback = Duration::from_secs(1);
        assert_eq!(normalize_non_zero_duration(Duration::ZERO, fallback), fallback);
        assert_eq!(
            normalize_non_zero_duration(Duration::from_millis(5), fallback),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn frames_turn_into_whole_ticks() {
        let mut simulation = CountingSimulation::default();
        let frames = vec![
            Frame::idle(Duration::from_millis(40)),
            Frame::idle(Duration::from_millis(10)),
            Frame::idle(Duration::from_millis(10)),
        ];

        let summary =
            run_headless(&config_50_tps(), &mut simulation, frames).expect("infallible");

        assert_eq!(simulation.ticks, 3);
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.frames, 3);
        assert!(!summary.stopped_early);
        assert!((summary.game_seconds - 0.06).abs() < 1e-9);
    }

    #[test]
    fn key_downs_reach_only_the_first_tick_of_a_frame() {
        let mut simulation = CountingSimulation::default();
        let frames = vec![Frame {
            real_dt: Duration::from_millis(40),
            key_events: vec![KeyEvent::pressed(KeyCode::Space)],
        }];

        run_headless(&config_50_tps(), &mut simulation, frames).expect("infallible");

        assert_eq!(
            simulation.key_downs_seen,
            vec![vec![KeyCode::Space], Vec::new()]
        );
    }

    #[test]
    fn key_downs_wait_for_the_next_tick() {
        let mut simulation = CountingSimulation::default();
        let frames = vec![
            Frame {
                real_dt: Duration::from_millis(5),
                key_events: vec![KeyEvent::pressed(KeyCode::W)],
            },
            Frame::idle(Duration::from_millis(20)),
        ];

        run_headless(&config_50_tps(), &mut simulation, frames).expect("infallible");

        assert_eq!(simulation.key_downs_seen, vec![vec![KeyCode::W]]);
    }

    #[test]
    fn paused_clock_runs_no_ticks() {
        let mut simulation = CountingSimulation::default();
        let mut stepper = FixedStepper::new(&config_50_tps());
        stepper.clock_mut().pause();

        stepper
            .run_frame(&Frame::idle(Duration::from_millis(100)), &mut simulation)
            .expect("infallible");

        assert_eq!(simulation.ticks, 0);
        assert_eq!(stepper.summary().frames, 1);
    }

    #[test]
    fn simulation_stop_ends_run() {
        let mut simulation = CountingSimulation {
            stop_after: Some(2),
            ..CountingSimulation::default()
        };
        let frames = vec![Frame::idle(Duration::from_millis(100)); 4];

        let summary =
            run_headless(&config_50_tps(), &mut simulation, frames).expect("infallible");

        assert_eq!(simulation.ticks, 2);
        assert!(summary.stopped_early);
        assert_eq!(summary.frames, 1);
    }

    #[test]
    fn escape_stops_before_ticking() {
        let mut simulation = CountingSimulation::default();
        let frames = vec![Frame {
            real_dt: Duration::from_millis(40),
            key_events: vec![KeyEvent::pressed(KeyCode::Escape)],
        }];

        let summary =
            run_headless(&config_50_tps(), &mut simulation, frames).expect("infallible");

        assert_eq!(simulation.ticks, 0);
        assert!(summary.stopped_early);
    }
}
