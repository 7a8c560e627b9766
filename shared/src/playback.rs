use std::time::{Duration, Instant};

/// Repeated acceleration must never reach a zero or negative delay.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Stopped/Running tick scheduler. The event loop polls `tick`; there is no
/// ambient timer, so a `stop` always takes effect before the next tick fires.
#[derive(Debug)]
pub struct Playback {
    interval: Duration,
    next_tick: Option<Instant>,
    generation: u64,
}

impl Playback {
    pub fn new(interval: Duration) -> Self {
        Playback {
            interval: interval.max(MIN_INTERVAL),
            next_tick: None,
            generation: 0,
        }
    }

    /// Stopped -> Running. The first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        self.next_tick = Some(now);
    }

    /// Running -> Stopped; the pending tick is abandoned.
    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Returns true at most once per call, when the scheduled deadline has
    /// passed, and reschedules the next deadline relative to `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(due) if due <= now => {
                self.next_tick = Some(now + self.interval);
                self.generation += 1;
                true
            }
            _ => false,
        }
    }

    /// interval <- floor(interval * 0.9), floored at `MIN_INTERVAL`.
    pub fn accelerate(&mut self) {
        let ms = self.interval.as_millis() as u64 * 9 / 10;
        self.interval = Duration::from_millis(ms).max(MIN_INTERVAL);
    }

    /// interval <- floor(interval * 1.1), growing by at least a millisecond
    /// so the interval can always climb back from the floor.
    pub fn slow(&mut self) {
        let ms = self.interval.as_millis() as u64;
        self.interval = Duration::from_millis((ms * 11 / 10).max(ms + 1));
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Generations applied so far (ticks that returned true).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Time left until the pending tick; `None` while stopped.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.next_tick.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn starts_stopped() {
        let mut playback = Playback::new(INTERVAL);
        assert!(!playback.is_running());
        assert!(!playback.tick(Instant::now()));
        assert_eq!(playback.generation(), 0);
    }

    #[test]
    fn stop_before_first_tick_applies_no_generation() {
        let mut playback = Playback::new(INTERVAL);
        let t0 = Instant::now();
        playback.start(t0);
        playback.stop();
        assert!(!playback.tick(t0));
        assert!(!playback.tick(t0 + INTERVAL * 10));
        assert_eq!(playback.generation(), 0);
    }

    #[test]
    fn first_tick_fires_immediately_then_waits_out_the_interval() {
        let mut playback = Playback::new(INTERVAL);
        let t0 = Instant::now();
        playback.start(t0);

        assert!(playback.tick(t0));
        assert!(!playback.tick(t0));
        assert!(!playback.tick(t0 + INTERVAL / 2));
        assert!(playback.tick(t0 + INTERVAL));
        assert_eq!(playback.generation(), 2);
    }

    #[test]
    fn one_generation_per_poll_even_after_a_stall() {
        let mut playback = Playback::new(INTERVAL);
        let t0 = Instant::now();
        playback.start(t0);
        assert!(playback.tick(t0));

        // A long stall still yields a single step, rescheduled from `now`.
        let late = t0 + INTERVAL * 7;
        assert!(playback.tick(late));
        assert!(!playback.tick(late + INTERVAL / 2));
        assert!(playback.tick(late + INTERVAL));
    }

    #[test]
    fn accelerate_floors_each_scaling_step() {
        let mut playback = Playback::new(INTERVAL);
        playback.accelerate();
        assert_eq!(playback.interval(), Duration::from_millis(90));
        playback.accelerate();
        assert_eq!(playback.interval(), Duration::from_millis(81));
    }

    #[test]
    fn accelerate_clamps_at_one_millisecond() {
        let mut playback = Playback::new(Duration::from_millis(2));
        for _ in 0..10 {
            playback.accelerate();
        }
        assert_eq!(playback.interval(), MIN_INTERVAL);
    }

    #[test]
    fn slow_scales_up_and_escapes_the_floor() {
        let mut playback = Playback::new(INTERVAL);
        playback.slow();
        assert_eq!(playback.interval(), Duration::from_millis(110));

        let mut floored = Playback::new(MIN_INTERVAL);
        floored.slow();
        assert_eq!(floored.interval(), Duration::from_millis(2));
    }

    #[test]
    fn time_until_tick_tracks_the_deadline() {
        let mut playback = Playback::new(INTERVAL);
        let t0 = Instant::now();
        assert_eq!(playback.time_until_tick(t0), None);

        playback.start(t0);
        assert_eq!(playback.time_until_tick(t0), Some(Duration::ZERO));
        assert!(playback.tick(t0));
        assert_eq!(playback.time_until_tick(t0), Some(INTERVAL));
    }
}
