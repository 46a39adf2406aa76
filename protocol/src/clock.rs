//! Mapping from wall-clock time to the rotation counter, and the rotation
//! guard that keeps A from transmitting across a boundary.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// `counter(t) = floor((t - T0 - offset) / I)`, evaluated separately for A
/// (with its small negative `sender_offset_secs`) and B (offset always 0).
#[derive(Debug, Clone, Copy)]
pub struct RotationClock {
    base_time: i64,
    interval_secs: u64,
    sender_offset_secs: f64,
    guard_window_secs: f64,
}

impl RotationClock {
    pub fn new(
        base_time: i64,
        interval_secs: u64,
        sender_offset_secs: f64,
        guard_window_secs: f64,
    ) -> Self {
        Self {
            base_time,
            interval_secs,
            sender_offset_secs,
            guard_window_secs,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn guard_window_secs(&self) -> f64 {
        self.guard_window_secs
    }

    /// A's counter at real time `now`, adjusted by `sender_offset_secs`. The
    /// offset is subtracted, not added: with `sender_offset_secs` negative,
    /// this pushes A's effective clock ahead of its own wall clock, so A
    /// rotates to the next counter slightly before B does. That lead is what
    /// compensates for one-way transit latency — by the time a keystroke
    /// scrambled under the new counter reaches B, B's real clock has caught
    /// up to the same boundary.
    pub fn sender_counter_at(&self, now: f64) -> u64 {
        self.counter_from_elapsed(now - self.sender_offset_secs)
    }

    /// B's counter at real time `now` (no offset).
    pub fn endpoint_counter_at(&self, now: f64) -> u64 {
        self.counter_from_elapsed(now)
    }

    /// Convenience wrapper using the system wall clock.
    pub fn sender_counter_now(&self) -> u64 {
        self.sender_counter_at(unix_seconds_now())
    }

    /// Convenience wrapper using the system wall clock.
    pub fn endpoint_counter_now(&self) -> u64 {
        self.endpoint_counter_at(unix_seconds_now())
    }

    fn counter_from_elapsed(&self, adjusted_now: f64) -> u64 {
        let elapsed = adjusted_now - self.base_time as f64;
        (elapsed / self.interval_secs as f64).floor().max(0.0) as u64
    }

    /// Seconds remaining until A's next rotation boundary, at real time `now`.
    pub fn seconds_until_next_rotation_at(&self, now: f64) -> f64 {
        let adjusted = now - self.sender_offset_secs - self.base_time as f64;
        let interval = self.interval_secs as f64;
        let into_interval = adjusted.rem_euclid(interval);
        interval - into_interval
    }

    /// If A is within the guard window of a rotation boundary at `now`,
    /// return how long to sleep (the remaining time plus a grace period so
    /// the sleep lands safely past the boundary).
    pub fn guard_sleep_at(&self, now: f64) -> Option<Duration> {
        let remaining = self.seconds_until_next_rotation_at(now);
        if remaining < self.guard_window_secs {
            Some(Duration::from_secs_f64(remaining + self.guard_window_secs))
        } else {
            None
        }
    }

    /// Convenience wrapper using the system wall clock.
    pub fn guard_sleep_now(&self) -> Option<Duration> {
        self.guard_sleep_at(unix_seconds_now())
    }
}

fn unix_seconds_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> RotationClock {
        RotationClock::new(1_000, 10, -0.4, 0.4)
    }

    #[test]
    fn sender_and_endpoint_agree_away_from_boundaries() {
        let c = clock();
        // At t = 1005, A's adjusted elapsed is 1005 - (-0.4) - 1000 = 5.4 -> counter 0.
        // B's elapsed is 5.0 -> counter 0. Still agree mid-interval.
        assert_eq!(c.sender_counter_at(1005.0), 0);
        assert_eq!(c.endpoint_counter_at(1005.0), 0);
    }

    #[test]
    fn sender_leads_endpoint_near_boundary() {
        let c = clock();
        // t = 1009.7: A's adjusted elapsed = 1009.7 - (-0.4) - 1000 = 10.1 -> counter 1.
        // B's elapsed = 1009.7 - 1000 = 9.7 -> counter 0. A has already rotated; B hasn't yet.
        assert_eq!(c.sender_counter_at(1009.7), 1);
        assert_eq!(c.endpoint_counter_at(1009.7), 0);
    }

    #[test]
    fn guard_scenario_from_spec_is_not_guarded_because_the_lead_already_compensates() {
        // I = 10, W = 0.4, offset = -0.4, T0 = 1000. A's own rotation boundary sits at
        // T0 + 9.6 (I - |offset| early), so by T0 + 9.8 A has already rotated to counter 1
        // and the next boundary is nowhere near: none of these three captures are guarded,
        // and all three are scrambled under the post-rotation counter.
        let c = clock();

        for t in [1009.8, 1010.1, 1010.5] {
            assert_eq!(c.sender_counter_at(t), 1, "t = {t}");
            assert!(c.guard_sleep_at(t).is_none(), "t = {t}");
        }
    }

    #[test]
    fn guard_fires_just_before_sender_rotation_boundary() {
        // I = 10, W = 0.4, offset = -0.4, T0 = 1000. A's boundary after counter 1 sits at
        // T0 + 19.6. A capture 0.1s before that boundary must be guarded.
        let c = clock();
        let remaining = c.seconds_until_next_rotation_at(1019.5);
        assert!((remaining - 0.1).abs() < 1e-9);
        assert_eq!(c.sender_counter_at(1019.5), 1);
        assert!(c.guard_sleep_at(1019.5).is_some());
    }

    #[test]
    fn counter_never_goes_negative_before_base_time() {
        let c = clock();
        assert_eq!(c.endpoint_counter_at(0.0), 0);
    }
}
