//! Easing curves and the specs that shape a target-based animation.

/// Easing curves matching the Jetpack Compose constants of the same name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    LinearEasing,
    /// Material standard curve.
    FastOutSlowInEasing,
    /// Material deceleration curve, for elements entering at rest.
    LinearOutSlowInEasing,
    /// Material acceleration curve, for elements leaving.
    FastOutLinearInEasing,
}

impl Easing {
    /// Maps a linear fraction in `[0, 1]` onto the curve.
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction.clamp(0.0, 1.0),
            Easing::FastOutSlowInEasing => CubicBezier::new(0.4, 0.0, 0.2, 1.0).transform(fraction),
            Easing::LinearOutSlowInEasing => {
                CubicBezier::new(0.0, 0.0, 0.2, 1.0).transform(fraction)
            }
            Easing::FastOutLinearInEasing => {
                CubicBezier::new(0.4, 0.0, 1.0, 1.0).transform(fraction)
            }
        }
    }
}

/// Cubic bezier through (0, 0) and (1, 1) with two control points.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CubicBezier {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
}

impl CubicBezier {
    const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    fn evaluate(p1: f32, p2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn transform(&self, fraction: f32) -> f32 {
        if fraction <= 0.0 {
            return 0.0;
        }
        if fraction >= 1.0 {
            return 1.0;
        }
        // x(t) is monotonic for control points in [0, 1]; bisect for t.
        let mut low = 0.0f32;
        let mut high = 1.0f32;
        let mut t = fraction;
        for _ in 0..24 {
            let x = Self::evaluate(self.a, self.c, t);
            if (x - fraction).abs() < 1e-6 {
                break;
            }
            if x < fraction {
                low = t;
            } else {
                high = t;
            }
            t = 0.5 * (low + high);
        }
        Self::evaluate(self.b, self.d, t)
    }
}

/// Duration-based animation: interpolates from the current value to the
/// target along an easing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub duration_millis: u64,
    pub easing: Easing,
}

impl TweenSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowInEasing)
    }
}

/// Physics-based animation toward a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 is critically damped, below 1.0 overshoots.
    pub damping_ratio: f32,
    pub stiffness: f32,
    /// Distance from the target, in value units, treated as arrived.
    pub position_threshold: f32,
    /// Speed, in value units per second, treated as at rest.
    pub velocity_threshold: f32,
}

impl SpringSpec {
    pub const DAMPING_RATIO_NO_BOUNCY: f32 = 1.0;
    pub const DAMPING_RATIO_MEDIUM_BOUNCY: f32 = 0.5;
    pub const STIFFNESS_MEDIUM: f32 = 1500.0;

    pub fn new(damping_ratio: f32, stiffness: f32) -> Self {
        Self {
            damping_ratio,
            stiffness,
            ..Self::default_spring()
        }
    }

    pub fn default_spring() -> Self {
        Self {
            damping_ratio: Self::DAMPING_RATIO_NO_BOUNCY,
            stiffness: Self::STIFFNESS_MEDIUM,
            position_threshold: 0.01,
            velocity_threshold: 1.0,
        }
    }

    /// Advances `(position, velocity)` toward `target` by `dt` seconds.
    pub(crate) fn step(&self, position: f32, velocity: f32, target: f32, dt: f32) -> (f32, f32) {
        const MAX_STEP: f32 = 0.004;
        let damping = 2.0 * self.damping_ratio * self.stiffness.sqrt();
        let mut position = position;
        let mut velocity = velocity;
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP);
            let acceleration = -self.stiffness * (position - target) - damping * velocity;
            velocity += acceleration * h;
            position += velocity * h;
            remaining -= h;
        }
        (position, velocity)
    }

    pub(crate) fn is_at_rest(&self, position: f32, velocity: f32, target: f32) -> bool {
        (position - target).abs() < self.position_threshold
            && velocity.abs() < self.velocity_threshold
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// How a target-based animation moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    Tween(TweenSpec),
    Spring(SpringSpec),
}

impl Default for AnimationType {
    fn default() -> Self {
        AnimationType::Spring(SpringSpec::default())
    }
}

impl From<TweenSpec> for AnimationType {
    fn from(spec: TweenSpec) -> Self {
        AnimationType::Tween(spec)
    }
}

impl From<SpringSpec> for AnimationType {
    fn from(spec: SpringSpec) -> Self {
        AnimationType::Spring(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [
            Easing::LinearEasing,
            Easing::FastOutSlowInEasing,
            Easing::LinearOutSlowInEasing,
            Easing::FastOutLinearInEasing,
        ] {
            assert_eq!(easing.transform(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.transform(1.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn easing_curves_are_monotonic() {
        for easing in [Easing::FastOutSlowInEasing, Easing::FastOutLinearInEasing] {
            let mut previous = 0.0;
            for i in 1..=50 {
                let value = easing.transform(i as f32 / 50.0);
                assert!(value + 1e-4 >= previous, "{easing:?} at {i}");
                previous = value;
            }
        }
    }

    #[test]
    fn fast_out_slow_in_leads_linear_at_midpoint() {
        assert!(Easing::FastOutSlowInEasing.transform(0.5) > 0.5);
        assert!(Easing::FastOutLinearInEasing.transform(0.5) < 0.5);
    }

    #[test]
    fn critically_damped_spring_settles_without_overshoot() {
        let spec = SpringSpec::default();
        let (mut x, mut v) = (0.0f32, 0.0f32);
        for _ in 0..60 {
            let (nx, nv) = spec.step(x, v, 1.0, 0.016);
            assert!(nx <= 1.0 + 1e-3);
            x = nx;
            v = nv;
        }
        assert!(spec.is_at_rest(x, v, 1.0));
    }
}
