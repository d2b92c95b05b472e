//! Release velocity estimation for flings.
//!
//! Uses the impulse strategy of Jetpack Compose's `VelocityTracker1D`: the
//! samples are treated as pushes on a unit mass and the velocity is derived
//! from the kinetic energy they impart.

use zoomable_ui_graphics::Point;

const HISTORY_SIZE: usize = 20;

/// Samples older than this, relative to the newest, are ignored.
const HORIZON_MS: i64 = 100;

/// A sample this much older than the newest one means the pointer had
/// stopped before the newest sample arrived.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: i64,
    value: f32,
}

/// Velocity of one coordinate, from absolute positions.
#[derive(Clone, Debug)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    newest: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            newest: 0,
        }
    }

    pub fn add_data_point(&mut self, time_ms: i64, value: f32) {
        self.newest = (self.newest + 1) % HISTORY_SIZE;
        self.samples[self.newest] = Some(Sample { time_ms, value });
    }

    /// Units per second; zero without at least two recent samples.
    pub fn calculate_velocity(&self) -> f32 {
        let Some(newest) = self.samples[self.newest] else {
            return 0.0;
        };

        // Walk backwards from the newest sample, collecting (age, value).
        let mut values = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut count = 0;
        let mut index = self.newest;
        while let Some(sample) = self.samples[index] {
            // Positions are absolute, so the stop gap is taken from the newest
            // sample rather than from its neighbour.
            let age = newest.time_ms - sample.time_ms;
            if age > HORIZON_MS || age.abs() > ASSUME_STOPPED_MS {
                break;
            }
            values[count] = sample.value;
            times[count] = -(age as f32);
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            index = (index + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if count < 2 {
            return 0.0;
        }
        impulse_velocity(&values[..count], &times[..count]) * 1000.0
    }

    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.calculate_velocity();
        if velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.newest = 0;
    }
}

/// `values` and `times` run from newest to oldest; times are non-positive
/// milliseconds. Returns units per millisecond.
fn impulse_velocity(values: &[f32], times: &[f32]) -> f32 {
    let oldest = values.len() - 1;
    let mut work = 0.0f32;
    for i in (1..=oldest).rev() {
        let dt = times[i - 1] - times[i];
        if dt == 0.0 {
            continue;
        }
        let v_current = (values[i - 1] - values[i]) / dt;
        let v_previous = energy_to_velocity(work);
        work += (v_current - v_previous) * v_current.abs();
        if i == oldest {
            work *= 0.5;
        }
    }
    energy_to_velocity(work)
}

fn energy_to_velocity(energy: f32) -> f32 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

/// Two-axis tracker fed with pointer positions.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    x: VelocityTracker1D,
    y: VelocityTracker1D,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_position(&mut self, time_ms: u64, position: Point) {
        let time_ms = time_ms as i64;
        self.x.add_data_point(time_ms, position.x);
        self.y.add_data_point(time_ms, position.y);
    }

    /// Pixels per second on each axis.
    pub fn calculate_velocity(&self) -> Point {
        Point::new(self.x.calculate_velocity(), self.y.calculate_velocity())
    }

    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> Point {
        Point::new(
            self.x.calculate_velocity_with_max(max_velocity),
            self.y.calculate_velocity_with_max(max_velocity),
        )
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}
