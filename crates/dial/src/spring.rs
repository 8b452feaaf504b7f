//! Damped spring used to ease the dial towards externally supplied selections.
//!
//! The spring has unit mass and is advanced with the closed-form solution of the damped
//! harmonic oscillator, so the result does not depend on how the caller slices time.

use std::time::Duration;

pub const DEFAULT_STIFFNESS: f64 = 200.0;
pub const DEFAULT_DAMPING_RATIO: f64 = 1.0;
pub const DEFAULT_THRESHOLD: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    pub stiffness: f64,
    pub damping_ratio: f64,
    /// Displacement and velocity below which the spring counts as settled.
    pub threshold: f64,
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            damping_ratio: DEFAULT_DAMPING_RATIO,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SpringSpec {
    /// Displacement and velocity after `t` seconds, starting from displacement `d0` and
    /// velocity `v0` relative to the rest position.
    fn evolve(&self, d0: f64, v0: f64, t: f64) -> (f64, f64) {
        let omega = self.stiffness.sqrt();
        let zeta = self.damping_ratio;

        if zeta > 1.0 {
            let root = (zeta * zeta - 1.0).sqrt();
            let gamma_plus = (-zeta + root) * omega;
            let gamma_minus = (-zeta - root) * omega;
            let b = (gamma_minus * d0 - v0) / (gamma_minus - gamma_plus);
            let a = d0 - b;
            let (ea, eb) = ((gamma_minus * t).exp(), (gamma_plus * t).exp());
            (a * ea + b * eb, a * gamma_minus * ea + b * gamma_plus * eb)
        } else if zeta == 1.0 {
            let a = d0;
            let b = v0 + omega * d0;
            let decay = (-omega * t).exp();
            let d = (a + b * t) * decay;
            (d, b * decay - omega * d)
        } else {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let cos_c = d0;
            let sin_c = (zeta * omega * d0 + v0) / damped;
            let decay = (-zeta * omega * t).exp();
            let (s, c) = (damped * t).sin_cos();
            let d = decay * (cos_c * c + sin_c * s);
            let v = -zeta * omega * d + decay * damped * (sin_c * c - cos_c * s);
            (d, v)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spring {
    spec: SpringSpec,
    value: f64,
    velocity: f64,
    target: f64,
    running: bool,
}

impl Spring {
    pub fn new(value: f64, spec: SpringSpec) -> Self {
        Self {
            spec,
            value,
            velocity: 0.0,
            target: value,
            running: false,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Jumps to `value` and stops any motion.
    pub fn snap_to(&mut self, value: f64) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
        self.running = false;
    }

    /// Moves the rest position, keeping the current value and velocity.
    pub fn retarget(&mut self, target: f64) {
        self.target = target;
        self.running = !self.is_settled();
        if !self.running {
            self.snap_to(target);
        }
    }

    /// Advances the spring by `dt`. Returns whether it is still moving.
    pub fn step(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }

        let (d, v) = self
            .spec
            .evolve(self.value - self.target, self.velocity, dt.as_secs_f64());
        self.value = self.target + d;
        self.velocity = v;

        if self.is_settled() {
            self.snap_to(self.target);
        }
        self.running
    }

    fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.spec.threshold
            && self.velocity.abs() < self.spec.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn run_to_rest(spring: &mut Spring) -> (usize, Vec<f64>) {
        let mut trace = Vec::new();
        let mut frames = 0;
        while spring.step(FRAME) {
            trace.push(spring.value());
            frames += 1;
            assert!(frames < 1_000, "spring never settled");
        }
        trace.push(spring.value());
        (frames, trace)
    }

    #[test]
    fn test_retarget_to_current_value_does_not_start() {
        let mut spring = Spring::new(0.4, SpringSpec::default());
        spring.retarget(0.4);
        assert!(!spring.is_running());
        assert!(!spring.step(FRAME));
    }

    #[test]
    fn test_critically_damped_spring_settles_without_overshoot() {
        let mut spring = Spring::new(0.0, SpringSpec::default());
        spring.retarget(1.0);
        assert!(spring.is_running());

        let (frames, trace) = run_to_rest(&mut spring);
        assert!(frames > 5, "spring should take several frames, took {frames}");
        assert!(trace.windows(2).all(|w| w[0] <= w[1]));
        assert!(trace.iter().all(|v| *v <= 1.0));
        assert_eq!(spring.value(), 1.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_underdamped_spring_overshoots_then_settles() {
        let spec = SpringSpec {
            damping_ratio: 0.3,
            ..SpringSpec::default()
        };
        let mut spring = Spring::new(0.0, spec);
        spring.retarget(1.0);

        let (_, trace) = run_to_rest(&mut spring);
        assert!(trace.iter().any(|v| *v > 1.0));
        assert_eq!(spring.value(), 1.0);
    }

    #[test]
    fn test_overdamped_spring_reaches_target() {
        let spec = SpringSpec {
            damping_ratio: 2.0,
            ..SpringSpec::default()
        };
        let mut spring = Spring::new(1.0, spec);
        spring.retarget(0.25);

        run_to_rest(&mut spring);
        assert_eq!(spring.value(), 0.25);
    }

    #[test]
    fn test_retarget_mid_flight_keeps_velocity() {
        let mut spring = Spring::new(0.0, SpringSpec::default());
        spring.retarget(1.0);
        spring.step(FRAME);
        spring.step(FRAME);
        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        spring.retarget(0.5);
        assert_eq!(spring.velocity(), velocity);
        assert!(spring.is_running());
    }
}
