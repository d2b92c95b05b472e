//! Decay curves for flings.
//!
//! A decay animation has no target. It starts from a velocity and slows
//! down until it comes to rest; the resting value follows from the velocity.

/// Friction applied by [`ExponentialDecaySpec`] with a multiplier of 1.
const EXPONENTIAL_DECAY_FRICTION: f32 = -4.2;

const NANOS_PER_MILLI: f32 = 1_000_000.0;

pub trait FloatDecayAnimationSpec {
    /// Speed below which the animation is considered finished.
    fn abs_velocity_threshold(&self) -> f32;

    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32;

    fn get_duration_nanos(&self, initial_value: f32, initial_velocity: f32) -> i64;

    /// Value at which the animation comes to rest.
    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32;
}

/// Velocity decays exponentially over time.
///
/// Same curve as Jetpack Compose's `exponentialDecay()`: a larger friction
/// multiplier stops the fling sooner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecaySpec {
    friction: f32,
    abs_velocity_threshold: f32,
}

impl ExponentialDecaySpec {
    pub fn new(friction_multiplier: f32, abs_velocity_threshold: f32) -> Self {
        Self {
            friction: EXPONENTIAL_DECAY_FRICTION * friction_multiplier.max(0.0001),
            abs_velocity_threshold: abs_velocity_threshold.abs().max(0.000_000_1),
        }
    }

    fn play_time_seconds(play_time_nanos: i64) -> f32 {
        play_time_nanos as f32 / NANOS_PER_MILLI / 1000.0
    }
}

impl Default for ExponentialDecaySpec {
    fn default() -> Self {
        Self::new(1.0, 0.1)
    }
}

impl FloatDecayAnimationSpec for ExponentialDecaySpec {
    fn abs_velocity_threshold(&self) -> f32 {
        self.abs_velocity_threshold
    }

    fn get_value_from_nanos(
        &self,
        play_time_nanos: i64,
        initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = Self::play_time_seconds(play_time_nanos);
        let travel = initial_velocity / self.friction;
        initial_value - travel + travel * (self.friction * seconds).exp()
    }

    fn get_velocity_from_nanos(
        &self,
        play_time_nanos: i64,
        _initial_value: f32,
        initial_velocity: f32,
    ) -> f32 {
        let seconds = Self::play_time_seconds(play_time_nanos);
        initial_velocity * (self.friction * seconds).exp()
    }

    fn get_duration_nanos(&self, _initial_value: f32, initial_velocity: f32) -> i64 {
        if initial_velocity.abs() <= self.abs_velocity_threshold {
            return 0;
        }
        let millis = 1000.0 * (self.abs_velocity_threshold / initial_velocity.abs()).ln()
            / self.friction;
        millis as i64 * 1_000_000
    }

    fn get_target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        if initial_velocity.abs() <= self.abs_velocity_threshold {
            return initial_value;
        }
        let duration = self.get_duration_nanos(initial_value, initial_velocity);
        self.get_value_from_nanos(duration, initial_value, initial_velocity)
    }
}
