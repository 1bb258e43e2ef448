//! Exponential ramps between two positive values.

/// Smallest value an exponential ramp may start or end at.
const MIN_LEVEL: f64 = 1e-9;

/// An exponential transition from `from` to `to` over `duration` seconds.
///
/// The value at `t` seconds into the ramp is
/// `from * (to / from)^(t / duration)`, so each equal slice of time multiplies
/// the value by the same factor. Before the ramp the value is `from`, after
/// it the value holds at `to`.
///
/// Both endpoints must be positive; smaller values are raised to a tiny positive
/// floor.
///
/// # Examples
///
/// ```
/// use clave::envelopes::ExponentialRamp;
///
/// let decay = ExponentialRamp::new(1.0, 0.001, 0.1);
/// assert_eq!(decay.value_at(0.0), 1.0);
/// assert!((decay.value_at(0.05) - 0.001f64.sqrt()).abs() < 1e-12);
/// assert_eq!(decay.value_at(0.1), 0.001);
/// assert_eq!(decay.value_at(5.0), 0.001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialRamp {
    from: f64,
    to: f64,
    duration: f64,
}

impl ExponentialRamp {
    /// Creates a ramp from `from` to `to` lasting `duration` seconds.
    pub fn new(from: f64, to: f64, duration: f64) -> Self {
        Self {
            from: from.max(MIN_LEVEL),
            to: to.max(MIN_LEVEL),
            duration: duration.max(0.0),
        }
    }

    /// A ramp that stays at `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(value, value, 0.0)
    }

    /// Value at the start of the ramp.
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Value the ramp ends on and holds afterwards.
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Length of the ramp in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Value `elapsed` seconds after the ramp starts.
    pub fn value_at(&self, elapsed: f64) -> f64 {
        if elapsed <= 0.0 {
            self.from
        } else if elapsed >= self.duration {
            self.to
        } else {
            self.from * (self.to / self.from).powf(elapsed / self.duration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_endpoints() {
        let ramp = ExponentialRamp::new(0.1, 0.001, 0.05);
        assert_eq!(ramp.value_at(0.0), 0.1);
        assert_eq!(ramp.value_at(0.05), 0.001);
    }

    #[test]
    fn test_holds_outside_ramp() {
        let ramp = ExponentialRamp::new(1000.0, 800.0, 0.05);
        assert_eq!(ramp.value_at(-1.0), 1000.0);
        assert_eq!(ramp.value_at(0.08), 800.0);
    }

    #[test]
    fn test_midpoint_is_geometric_mean() {
        let ramp = ExponentialRamp::new(800.0, 600.0, 0.05);
        assert!(approx_eq(ramp.value_at(0.025), (800.0f64 * 600.0).sqrt()));
    }

    #[test]
    fn test_constant_factor_per_step() {
        let ramp = ExponentialRamp::new(1.0, 0.001, 0.1);
        let step = 0.01;
        let ratio = ramp.value_at(step) / ramp.value_at(0.0);
        for i in 1..9 {
            let t = i as f64 * step;
            let r = ramp.value_at(t + step) / ramp.value_at(t);
            assert!((r - ratio).abs() < 1e-9);
        }
    }

    #[test]
    fn test_monotonic_decay() {
        let ramp = ExponentialRamp::new(1.0, 0.001, 0.01);
        let mut previous = ramp.value_at(0.0);
        for i in 1..=100 {
            let value = ramp.value_at(i as f64 * 0.0001);
            assert!(value <= previous);
            previous = value;
        }
    }

    #[test]
    fn test_non_positive_endpoints_are_floored() {
        let ramp = ExponentialRamp::new(0.0, -1.0, 0.1);
        assert!(ramp.from() > 0.0);
        assert!(ramp.to() > 0.0);
        assert!(ramp.value_at(0.05).is_finite());
    }

    #[test]
    fn test_constant() {
        let ramp = ExponentialRamp::constant(440.0);
        assert_eq!(ramp.duration(), 0.0);
        assert_eq!(ramp.value_at(0.0), 440.0);
        assert_eq!(ramp.value_at(1.0), 440.0);
    }
}
