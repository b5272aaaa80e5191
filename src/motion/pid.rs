//! PID feedback controller.
//!
//! One controller implementation is shared by every axis the robot closes a
//! loop on: the drive routine feeds it encoder-degree error, the turn
//! routine feeds it yaw-degree error. The controller is a plain step
//! function with no notion of time or sleeping; an outer routine (or a test
//! harness) calls [`Pid::step`] once per tick and decides what to do with
//! the produced power.
//!
//! # How PID works
//!
//! Output is computed from three terms per step:
//!
//! - **P (Proportional)**: proportional to the current error.
//! - **I (Integral)**: proportional to the error accumulated over steps.
//! - **D (Derivative)**: proportional to the change in error since the
//!   previous step.
//!
//! The formula is `output = kp*error + ki*integral + kd*derivative`.
//!
//! # Tuning
//!
//! Start with `kp` and increase it until the robot reaches the target.
//! Add `kd` to reduce overshoot. Only add `ki` if the robot consistently
//! undershoots, and pair it with [`IntegralPolicy::ResetAbove`] so the
//! accumulator cannot wind up while the error is still large.

use heapless::Vec;

/// Proportional, integral and derivative gains for one axis.
///
/// Gains are tuned for the fixed control tick the routines run at; the
/// integral and derivative terms accumulate and difference per step, not
/// per second.
#[derive(Debug, Clone, Copy)]
pub struct Gains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
}

impl Gains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// How the integral accumulator behaves while the error is large.
#[derive(Debug, Clone, Copy)]
pub enum IntegralPolicy {
    /// Accumulate every step, unconditionally.
    Accumulate,
    /// Clear the accumulator whenever `|error|` is at or above the
    /// threshold, so the integral term only builds up close to the target.
    ResetAbove(f64),
}

/// One staged output band: while `|error|` is below `error_band`, output
/// magnitude is held at or below `cap`.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub error_band: f64,
    pub cap: f64,
}

/// Magnitude limit on the controller output.
///
/// An optional overall cap plus up to four stages that tighten the cap as
/// the error shrinks. Staging the cap down near the target suppresses
/// overshoot without limiting power far from it.
#[derive(Debug, Clone, Default)]
pub struct OutputLimit {
    /// Cap applied regardless of error, if any.
    pub max: Option<f64>,
    /// Tighter caps inside shrinking error bands.
    pub stages: Vec<Stage, 4>,
}

impl OutputLimit {
    /// No limiting at all.
    pub const fn none() -> Self {
        Self {
            max: None,
            stages: Vec::new(),
        }
    }

    /// A flat magnitude cap.
    pub const fn fixed(max: f64) -> Self {
        Self {
            max: Some(max),
            stages: Vec::new(),
        }
    }

    /// Adds a staged band. Stages beyond the fixed capacity are ignored.
    #[must_use]
    pub fn stage(mut self, error_band: f64, cap: f64) -> Self {
        let _ = self.stages.push(Stage { error_band, cap });
        self
    }

    /// The tightest cap that applies at the given error magnitude.
    fn cap_for(&self, error_abs: f64) -> Option<f64> {
        let mut cap = self.max;
        for stage in &self.stages {
            if error_abs < stage.error_band && cap.is_none_or(|c| stage.cap < c) {
                cap = Some(stage.cap);
            }
        }
        cap
    }

    fn apply(&self, output: f64, error_abs: f64) -> f64 {
        match self.cap_for(error_abs) {
            Some(cap) => output.clamp(-cap.abs(), cap.abs()),
            None => output,
        }
    }
}

/// When a movement counts as settled.
#[derive(Debug, Clone, Copy)]
pub struct Tolerances {
    /// Error magnitude below which the target is considered reached.
    pub error: f64,
    /// If set, the per-step error change must also be below this value,
    /// so a fast pass through the target band does not end the movement.
    pub velocity: Option<f64>,
}

impl Tolerances {
    pub const fn error(error: f64) -> Self {
        Self {
            error,
            velocity: None,
        }
    }

    #[must_use]
    pub const fn velocity(mut self, velocity: f64) -> Self {
        self.velocity = Some(velocity);
        self
    }

    fn settled(&self, error: f64, derivative: f64) -> bool {
        error.abs() < self.error && self.velocity.is_none_or(|v| derivative.abs() < v)
    }
}

/// Full configuration for one feedback axis.
#[derive(Debug, Clone)]
pub struct PidConfig {
    pub gains: Gains,
    pub integral: IntegralPolicy,
    pub limit: OutputLimit,
    pub tolerances: Tolerances,
}

/// Result of one controller step.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// Power to command this tick, already magnitude-limited.
    pub power: f64,
    /// Whether the tolerance predicate holds this tick.
    pub settled: bool,
}

/// PID controller state for a single movement.
///
/// Construct one at the start of a movement and drop it at the end; the
/// integral accumulator and previous error live only as long as the
/// movement does, so nothing leaks between successive calls.
#[derive(Debug, Clone)]
pub struct Pid {
    config: PidConfig,
    integral: f64,
    prev_error: f64,
}

impl Pid {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    /// Advances the controller by one tick of measured error, producing the
    /// power to command and whether the movement has settled.
    pub fn step(&mut self, error: f64) -> Step {
        match self.config.integral {
            IntegralPolicy::Accumulate => self.integral += error,
            IntegralPolicy::ResetAbove(threshold) => {
                if error.abs() >= threshold {
                    self.integral = 0.0;
                } else {
                    self.integral += error;
                }
            }
        }

        let derivative = error - self.prev_error;
        self.prev_error = error;

        let gains = self.config.gains;
        let raw = gains.kp * error + gains.ki * self.integral + gains.kd * derivative;

        Step {
            power: self.config.limit.apply(raw, error.abs()),
            settled: self.config.tolerances.settled(error, derivative),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(gains: Gains) -> PidConfig {
        PidConfig {
            gains,
            integral: IntegralPolicy::Accumulate,
            limit: OutputLimit::none(),
            tolerances: Tolerances::error(5.0),
        }
    }

    #[test]
    fn proportional_only() {
        let mut pid = Pid::new(config(Gains::new(0.02, 0.0, 0.0)));
        let step = pid.step(100.0);
        assert!((step.power - 2.0).abs() < 1e-12);
        assert!(!step.settled);
    }

    #[test]
    fn settles_on_first_step_inside_tolerance() {
        let mut pid = Pid::new(config(Gains::new(0.02, 0.0, 0.0)));
        assert!(pid.step(4.9).settled);
        assert!(!pid.step(5.1).settled);
    }

    #[test]
    fn velocity_tolerance_blocks_fast_passes() {
        let mut cfg = config(Gains::new(0.02, 0.0, 0.0));
        cfg.tolerances = Tolerances::error(5.0).velocity(1.0);
        let mut pid = Pid::new(cfg);
        // First step: derivative equals the error itself, still moving.
        assert!(!pid.step(3.0).settled);
        // Error nearly unchanged: settled.
        assert!(pid.step(3.5).settled);
    }

    #[test]
    fn integral_accumulates_unconditionally_by_default() {
        let mut pid = Pid::new(config(Gains::new(0.0, 1.0, 0.0)));
        pid.step(200.0);
        let step = pid.step(200.0);
        assert!((step.power - 400.0).abs() < 1e-12);
    }

    #[test]
    fn integral_resets_at_windup_threshold() {
        let mut cfg = config(Gains::new(0.0, 1.0, 0.0));
        cfg.integral = IntegralPolicy::ResetAbove(50.0);
        let mut pid = Pid::new(cfg);
        assert_eq!(pid.step(60.0).power, 0.0);
        assert_eq!(pid.step(50.0).power, 0.0);
        // Below the threshold the accumulator builds again.
        assert!((pid.step(10.0).power - 10.0).abs() < 1e-12);
        assert!((pid.step(10.0).power - 20.0).abs() < 1e-12);
        // Back above the threshold, it is cleared outright.
        assert_eq!(pid.step(80.0).power, 0.0);
    }

    #[test]
    fn derivative_tracks_error_change() {
        let mut pid = Pid::new(config(Gains::new(0.0, 0.0, 2.0)));
        assert!((pid.step(10.0).power - 20.0).abs() < 1e-12);
        assert!((pid.step(7.0).power - -6.0).abs() < 1e-12);
    }

    #[test]
    fn staged_limit_bounds_output() {
        let limit = OutputLimit::fixed(12.0).stage(150.0, 8.0).stage(60.0, 5.0);
        let mut cfg = config(Gains::new(1.0, 0.0, 0.0));
        cfg.limit = limit;
        let mut pid = Pid::new(cfg);
        assert_eq!(pid.step(400.0).power, 12.0);
        assert_eq!(pid.step(120.0).power, 8.0);
        assert_eq!(pid.step(59.0).power, 5.0);
        assert_eq!(pid.step(-59.0).power, -5.0);
        // Raw output below every cap passes through untouched.
        assert!((pid.step(3.0).power - 3.0).abs() < 1e-12);
    }

    #[test]
    fn converges_on_simulated_plant() {
        let mut cfg = config(Gains::new(0.05, 0.0, 0.1));
        cfg.limit = OutputLimit::fixed(12.0);
        let mut pid = Pid::new(cfg);

        let target = 733.86;
        let mut position = 0.0;
        let mut settled = false;
        for _ in 0..2000 {
            let step = pid.step(target - position);
            assert!(step.power.abs() <= 12.0);
            if step.settled {
                settled = true;
                break;
            }
            // Velocity proportional to commanded power.
            position += step.power * 4.0;
        }
        assert!(settled);
        assert!((target - position).abs() < 5.0);
    }
}
