/// One-shot countdown in game seconds. Expiry is reported exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Countdown {
    remaining: Option<f64>,
}

impl Countdown {
    pub(crate) fn start(&mut self, seconds: f64) {
        self.remaining = Some(seconds.max(0.0));
    }

    pub(crate) fn cancel(&mut self) {
        self.remaining = None;
    }

    pub(crate) fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Returns `true` on the advance that takes the countdown to zero.
    pub(crate) fn advance(&mut self, dt_seconds: f64) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        let remaining = remaining - dt_seconds;
        if remaining <= 0.0 {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(remaining);
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PeriodicToggle {
    period: f64,
    elapsed: f64,
    state: bool,
    active: bool,
}

impl PeriodicToggle {
    pub(crate) fn new(period_seconds: f64, initial: bool) -> Self {
        Self {
            period: period_seconds,
            elapsed: 0.0,
            state: initial,
            active: period_seconds > 0.0,
        }
    }

    pub(crate) fn state(&self) -> bool {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn cancel(&mut self) {
        self.active = false;
    }

    /// Advances the toggle and returns how many times it flipped.
    pub(crate) fn advance(&mut self, dt_seconds: f64) -> u64 {
        if !self.active {
            return 0;
        }
        self.elapsed += dt_seconds;
        if self.elapsed < self.period {
            return 0;
        }
        let flips = (self.elapsed / self.period).floor() as u64;
        self.elapsed = self.elapsed.rem_euclid(self.period);
        if flips % 2 == 1 {
            self.state = !self.state;
        }
        flips
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_expires_once() {
        let mut countdown = Countdown::default();
        countdown.start(0.5);

        assert!(!countdown.advance(0.3));
        assert!(countdown.advance(0.3));
        assert!(!countdown.is_running());
        assert!(!countdown.advance(1.0));
    }

    #[test]
    fn cancelled_countdown_never_fires() {
        let mut countdown = Countdown::default();
        countdown.start(0.1);
        countdown.cancel();
        assert!(!countdown.advance(1.0));
    }

    #[test]
    fn toggle_flips_every_period() {
        let mut toggle = PeriodicToggle::new(2.0, false);
        assert_eq!(toggle.advance(1.5), 0);
        assert!(!toggle.state());
        assert_eq!(toggle.advance(1.0), 1);
        assert!(toggle.state());
        assert_eq!(toggle.advance(4.0), 2);
        assert!(toggle.state());
    }

    #[test]
    fn toggle_counts_many_periods_in_one_advance() {
        let mut toggle = PeriodicToggle::new(0.25, false);
        assert_eq!(toggle.advance(1.0), 4);
        assert!(!toggle.state());
        assert_eq!(toggle.advance(0.3), 1);
        assert!(toggle.state());
        assert_eq!(toggle.advance(0.1), 0);
        assert_eq!(toggle.advance(0.2), 1);
        assert!(!toggle.state());
    }

    #[test]
    fn tiny_period_settles_in_one_step() {
        let mut toggle = PeriodicToggle::new(1e-10, false);
        let flips = toggle.advance(1.0 / 60.0);
        assert!(flips > 100_000_000, "flips = {flips}");
        assert_eq!(toggle.state(), flips % 2 == 1);
    }

    #[test]
    fn cancelled_toggle_holds_state() {
        let mut toggle = PeriodicToggle::new(1.0, true);
        toggle.cancel();
        assert!(!toggle.is_active());
        assert_eq!(toggle.advance(10.0), 0);
        assert!(toggle.state());
    }

    #[test]
    fn non_positive_period_is_inactive() {
        let mut toggle = PeriodicToggle::new(0.0, false);
        assert!(!toggle.is_active());
        assert_eq!(toggle.advance(1.0), 0);
    }
}
