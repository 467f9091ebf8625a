use std::time::{Duration, Instant};

/// Frame clock for the demo loop.
///
/// Every call to [`next`](Time::next) measures the delta since the previous frame and adds it to
/// an accumulator. The loop then consumes the accumulator in whole fixed steps with
/// [`has_fixed`](Time::has_fixed) / [`increment_fixed`](Time::increment_fixed), so time-sensitive
/// work like movement advances by the same amount regardless of frame rate.
#[derive(Debug, Copy, Clone)]
pub struct Time {
    // The instant the current frame started
    instant: Instant,
    /// The fixed simulation step
    pub fixed_time_step: Duration,
    /// The time delta since the last frame
    pub delta: Duration,
    /// The total elapsed time since the first frame
    pub time: Duration,
    /// The total elapsed time consumed in fixed steps
    pub fixed_time: Duration,
    accumulator: Duration,
}

impl Time {
    /// Construct a clock with delta and time set to zero.
    pub fn new(fixed_time_step: Duration) -> Self {
        Self {
            fixed_time_step,
            instant: Instant::now(),
            delta: Duration::ZERO,
            time: Duration::ZERO,
            fixed_time: Duration::ZERO,
            accumulator: Duration::ZERO,
        }
    }

    /// Create the next frame, capturing the delta from the last one.
    pub fn next(self) -> Self {
        self.advance(self.instant.elapsed())
    }

    /// Create the next frame as if `delta` had passed.
    pub fn advance(self, delta: Duration) -> Self {
        Self {
            instant: Instant::now(),
            delta,
            time: self.time + delta,
            accumulator: self.accumulator + delta,
            ..self
        }
    }

    /// Whether enough time has accumulated for another fixed step. A zero step never fires.
    pub fn has_fixed(&self) -> bool {
        !self.fixed_time_step.is_zero() && self.accumulator >= self.fixed_time_step
    }

    /// Consume one fixed step from the accumulator.
    pub fn increment_fixed(&mut self) {
        self.fixed_time += self.fixed_time_step;
        self.accumulator = self.accumulator.saturating_sub(self.fixed_time_step);
    }

    /// The delta of the last frame in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// The fixed step in seconds.
    pub fn fixed_secs(&self) -> f32 {
        self.fixed_time_step.as_secs_f32()
    }
}
