use std::time::Duration;

const TIME_SCALE_DEFAULT: f32 = 1.0;
const TIME_SCALE_MAX: f32 = 8.0;

/// Pausable, scalable game clock. Simulation code reads game time from here and never
/// from the wall clock, so pausing or slowing the game pauses or slows every timer.
#[derive(Debug, Clone)]
pub struct GameClock {
    paused: bool,
    time_scale: f32,
    frame_game_time: Duration,
    total_game_time: Duration,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            paused: false,
            time_scale: TIME_SCALE_DEFAULT,
            frame_game_time: Duration::ZERO,
            total_game_time: Duration::ZERO,
        }
    }
}

impl GameClock {
    /// Advances by one frame of real time and returns the game time that elapsed.
    pub fn advance(&mut self, real_dt: Duration) -> Duration {
        self.frame_game_time = if self.paused {
            Duration::ZERO
        } else if self.time_scale == TIME_SCALE_DEFAULT {
            real_dt
        } else {
            real_dt.mul_f64(f64::from(self.time_scale))
        };
        self.total_game_time = self.total_game_time.saturating_add(self.frame_game_time);
        self.frame_game_time
    }

    pub fn elapsed_game_seconds(&self) -> f32 {
        self.frame_game_time.as_secs_f32()
    }

    pub fn total_game_seconds(&self) -> f64 {
        self.total_game_time.as_secs_f64()
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = clamp_time_scale(time_scale);
    }
}

fn clamp_time_scale(time_scale: f32) -> f32 {
    if !time_scale.is_finite() {
        return TIME_SCALE_DEFAULT;
    }
    time_scale.clamp(0.0, TIME_SCALE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_reports_scaled_game_time() {
        let mut clock = GameClock::default();
        clock.set_time_scale(0.5);

        let elapsed = clock.advance(Duration::from_millis(200));
        assert_eq!(elapsed, Duration::from_millis(100));
        assert!((clock.elapsed_game_seconds() - 0.1).abs() < 1e-6);
        assert!((clock.total_game_seconds() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn unscaled_clock_passes_real_time_through_exactly() {
        let mut clock = GameClock::default();
        let frame = Duration::from_nanos(16_666_667);
        assert_eq!(clock.advance(frame), frame);
    }

    #[test]
    fn paused_clock_does_not_advance() {
        let mut clock = GameClock::default();
        clock.advance(Duration::from_millis(500));
        clock.pause();

        assert_eq!(clock.advance(Duration::from_secs(1)), Duration::ZERO);
        assert_eq!(clock.elapsed_game_seconds(), 0.0);
        assert!((clock.total_game_seconds() - 0.5).abs() < 1e-9);

        clock.resume();
        assert_eq!(
            clock.advance(Duration::from_millis(250)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn invalid_time_scale_falls_back_to_default() {
        let mut clock = GameClock::default();
        clock.set_time_scale(f32::NAN);
        assert_eq!(clock.time_scale(), TIME_SCALE_DEFAULT);

        clock.set_time_scale(100.0);
        assert_eq!(clock.time_scale(), TIME_SCALE_MAX);

        clock.set_time_scale(-2.0);
        assert_eq!(clock.time_scale(), 0.0);
    }
}
