//! Leading + trailing throttle for persisting a fast-changing value
//!
//! The caller owns the clock and the timer; [`Throttle`] only decides.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleDecision {
    /// Act now
    Fire,
    /// Act once after this many milliseconds
    Schedule(f64),
    /// A trailing run is already scheduled and will see the latest value
    Coalesce,
}

#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last_fired_ms: Option<f64>,
    trailing_scheduled: bool,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
            trailing_scheduled: false,
        }
    }

    /// Report a change of the throttled value at `now_ms`
    pub fn on_change(&mut self, now_ms: f64) -> ThrottleDecision {
        if self.trailing_scheduled {
            return ThrottleDecision::Coalesce;
        }

        // A clock that stepped backwards counts as "just fired"
        let elapsed = self
            .last_fired_ms
            .map(|last| (now_ms - last).clamp(0.0, self.interval_ms));

        match elapsed {
            Some(elapsed) if elapsed < self.interval_ms => {
                self.trailing_scheduled = true;
                ThrottleDecision::Schedule(self.interval_ms - elapsed)
            }
            _ => {
                self.last_fired_ms = Some(now_ms);
                ThrottleDecision::Fire
            }
        }
    }

    /// Report that the scheduled trailing run happened at `now_ms`
    pub fn on_trailing_fired(&mut self, now_ms: f64) {
        self.trailing_scheduled = false;
        self.last_fired_ms = Some(now_ms);
    }

    /// Forget timing state, e.g. after switching conversations
    pub fn reset(&mut self) {
        self.last_fired_ms = None;
        self.trailing_scheduled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_change_fires_immediately() {
        let mut throttle = Throttle::new(500.0);
        assert_eq!(throttle.on_change(1_000.0), ThrottleDecision::Fire);
    }

    #[test]
    fn burst_schedules_one_trailing_run() {
        let mut throttle = Throttle::new(500.0);
        assert_eq!(throttle.on_change(0.0), ThrottleDecision::Fire);
        assert_eq!(throttle.on_change(100.0), ThrottleDecision::Schedule(400.0));
        assert_eq!(throttle.on_change(200.0), ThrottleDecision::Coalesce);
        assert_eq!(throttle.on_change(450.0), ThrottleDecision::Coalesce);

        throttle.on_trailing_fired(500.0);
        assert_eq!(throttle.on_change(700.0), ThrottleDecision::Schedule(300.0));
    }

    #[test]
    fn quiet_period_allows_leading_fire_again() {
        let mut throttle = Throttle::new(500.0);
        assert_eq!(throttle.on_change(0.0), ThrottleDecision::Fire);
        assert_eq!(throttle.on_change(600.0), ThrottleDecision::Fire);
    }

    #[test]
    fn clock_stepping_back_never_delays_past_one_interval() {
        let mut throttle = Throttle::new(500.0);
        assert_eq!(throttle.on_change(10_000_000.0), ThrottleDecision::Fire);
        assert_eq!(throttle.on_change(6_400_000.0), ThrottleDecision::Schedule(500.0));

        throttle.on_trailing_fired(6_400_500.0);
        assert_eq!(throttle.on_change(6_401_500.0), ThrottleDecision::Fire);
    }

    #[test]
    fn reset_clears_pending_state() {
        let mut throttle = Throttle::new(500.0);
        throttle.on_change(0.0);
        throttle.on_change(10.0);
        throttle.reset();
        assert_eq!(throttle.on_change(20.0), ThrottleDecision::Fire);
    }
}
