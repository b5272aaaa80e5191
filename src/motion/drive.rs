//! Drive-distance and turn-to-heading routines.
//!
//! Both routines are the same loop around the shared [`Pid`] core: measure,
//! step the controller, command the drivetrain, check the timeout, sleep
//! one tick. They differ only in where the error comes from (averaged
//! encoder degrees vs. inertial yaw degrees) and in how the output is
//! applied (symmetric for driving, opposed for turning).
//!
//! Hardware is reached through the [`Chassis`] and [`Gyro`] seams so the
//! per-tick logic can run against simulated devices in tests.

use std::time::Duration;

use log::{info, warn};
use vexide::{
    prelude::InertialSensor,
    time::{sleep, user_uptime},
};

use crate::motion::pid::{Pid, PidConfig, Step};

/// Fixed control tick for the autonomous routines.
pub const TICK: Duration = Duration::from_millis(20);

/// A drivetrain the routines can measure and command.
pub trait Chassis {
    /// Zeroes the position reference for a new movement.
    fn reset_position(&mut self);
    /// Averaged displacement of both sides, in encoder degrees.
    fn position(&mut self) -> f64;
    /// Commands the two sides with voltages.
    fn drive_tank(&mut self, left: f64, right: f64);
    /// Actively brakes both sides.
    fn hold(&mut self);
}

/// A yaw reference the turn routine can zero and read.
pub trait Gyro {
    /// Makes the current orientation the zero reference.
    fn zero(&mut self);
    /// Yaw relative to the zero reference, in degrees.
    fn yaw(&mut self) -> f64;
}

/// [`Gyro`] backed by a V5 inertial sensor.
///
/// Zeroing is an offset captured from the sensor's unbounded rotation
/// accumulator, so a movement's target heading is always relative to the
/// robot's orientation when the routine was called.
pub struct ImuHeading {
    imu: InertialSensor,
    offset: f64,
}

impl ImuHeading {
    pub const fn new(imu: InertialSensor) -> Self {
        Self { imu, offset: 0.0 }
    }

    /// Calibrates the underlying sensor. A calibration failure is logged
    /// and the sensor is used as-is, best effort.
    pub async fn calibrate(&mut self) {
        if let Err(e) = self.imu.calibrate().await {
            warn!("IMU Calibration Error: {}", e);
        }
    }

    fn rotation(&self) -> f64 {
        self.imu
            .rotation()
            .map(|angle| angle.as_degrees())
            .unwrap_or_else(|e| {
                warn!("IMU Rotation Error: {}", e);
                self.offset
            })
    }
}

impl Gyro for ImuHeading {
    fn zero(&mut self) {
        self.offset = self.rotation();
    }

    fn yaw(&mut self) -> f64 {
        self.rotation() - self.offset
    }
}

/// Wheel and gearing constants used to convert a linear target into a
/// rotational one.
#[derive(Debug, Clone, Copy)]
pub struct DriveGeometry {
    /// Drive wheel diameter, in inches.
    pub wheel_diameter: f64,
    /// External gear ratio between motor and wheel.
    pub gear_ratio: f64,
}

impl DriveGeometry {
    pub const fn new(wheel_diameter: f64, gear_ratio: f64) -> Self {
        Self {
            wheel_diameter,
            gear_ratio,
        }
    }

    /// Encoder degrees equivalent to a linear distance in inches.
    pub fn inches_to_degrees(&self, inches: f64) -> f64 {
        let circumference = self.wheel_diameter * std::f64::consts::PI;
        inches / circumference * 360.0 / self.gear_ratio
    }
}

/// Autonomous movement routines for a differential drivetrain.
///
/// Holds the per-axis PID configurations and the drive geometry; each
/// movement constructs a fresh [`Pid`] so no controller state carries over
/// from one call to the next.
pub struct DriveController {
    pub geometry: DriveGeometry,
    /// Configuration for straight-line movement, error in encoder degrees.
    pub linear: PidConfig,
    /// Configuration for turning in place, error in yaw degrees.
    pub angular: PidConfig,
}

impl DriveController {
    /// Drives straight for a signed distance in inches, then brakes.
    ///
    /// Best effort: if the tolerance is not reached before `timeout`
    /// elapses, the movement ends anyway and the drivetrain is braked.
    pub async fn drive_distance<C: Chassis>(
        &self,
        chassis: &mut C,
        inches: f64,
        timeout: Duration,
    ) {
        let target = self.geometry.inches_to_degrees(inches);
        info!("drive_distance: {} in -> {:.1} deg", inches, target);

        chassis.reset_position();
        let mut pid = Pid::new(self.linear.clone());
        let start = user_uptime();

        loop {
            if drive_tick(&mut pid, chassis, target) {
                info!("drive_distance: settled");
                break;
            }
            if user_uptime().saturating_sub(start) > timeout {
                warn!("drive_distance: timed out after {:?}", timeout);
                break;
            }
            sleep(TICK).await;
        }

        chassis.hold();
    }

    /// Turns in place by a signed heading change in degrees, then brakes.
    ///
    /// The yaw reference is zeroed at entry, so the target is relative to
    /// the robot's orientation at call time.
    pub async fn turn_heading<C: Chassis, G: Gyro>(
        &self,
        chassis: &mut C,
        gyro: &mut G,
        degrees: f64,
        timeout: Duration,
    ) {
        info!("turn_heading: {} deg", degrees);

        gyro.zero();
        let mut pid = Pid::new(self.angular.clone());
        let start = user_uptime();

        loop {
            if turn_tick(&mut pid, chassis, gyro, degrees) {
                info!("turn_heading: settled");
                break;
            }
            if user_uptime().saturating_sub(start) > timeout {
                warn!("turn_heading: timed out after {:?}", timeout);
                break;
            }
            sleep(TICK).await;
        }

        chassis.hold();
    }
}

/// One tick of the straight-line loop: both sides get the same power.
/// Returns whether the movement settled this tick.
fn drive_tick<C: Chassis>(pid: &mut Pid, chassis: &mut C, target: f64) -> bool {
    let error = target - chassis.position();
    let Step { power, settled } = pid.step(error);
    chassis.drive_tank(power, power);
    settled
}

/// One tick of the turning loop: the sides get equal and opposite power.
fn turn_tick<C: Chassis, G: Gyro>(
    pid: &mut Pid,
    chassis: &mut C,
    gyro: &mut G,
    target: f64,
) -> bool {
    let error = target - gyro.yaw();
    let Step { power, settled } = pid.step(error);
    chassis.drive_tank(power, -power);
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::pid::{Gains, IntegralPolicy, OutputLimit, Tolerances};

    struct SimChassis {
        position: f64,
        commands: Vec<(f64, f64)>,
        holds: u32,
    }

    impl SimChassis {
        fn new() -> Self {
            Self {
                position: 0.0,
                commands: Vec::new(),
                holds: 0,
            }
        }
    }

    impl Chassis for SimChassis {
        fn reset_position(&mut self) {
            self.position = 0.0;
        }

        fn position(&mut self) -> f64 {
            self.position
        }

        fn drive_tank(&mut self, left: f64, right: f64) {
            self.commands.push((left, right));
            // Symmetric commands translate, opposed commands do not.
            self.position += (left + right) * 2.0;
        }

        fn hold(&mut self) {
            self.holds += 1;
        }
    }

    struct SimGyro {
        rotation: f64,
        offset: f64,
    }

    impl Gyro for SimGyro {
        fn zero(&mut self) {
            self.offset = self.rotation;
        }

        fn yaw(&mut self) -> f64 {
            self.rotation - self.offset
        }
    }

    fn linear_config() -> PidConfig {
        PidConfig {
            gains: Gains::new(0.05, 0.0, 0.0),
            integral: IntegralPolicy::Accumulate,
            limit: OutputLimit::fixed(12.0),
            tolerances: Tolerances::error(5.0),
        }
    }

    #[test]
    fn inches_to_degrees_matches_wheel_math() {
        let geometry = DriveGeometry::new(3.75, 1.0);
        let degrees = geometry.inches_to_degrees(24.0);
        assert!((degrees - 733.86).abs() < 0.1);
    }

    #[test]
    fn inches_to_degrees_is_linear_and_sign_preserving() {
        let geometry = DriveGeometry::new(3.25, 1.75);
        let one = geometry.inches_to_degrees(1.0);
        assert!((geometry.inches_to_degrees(10.0) - 10.0 * one).abs() < 1e-9);
        assert!((geometry.inches_to_degrees(-10.0) + 10.0 * one).abs() < 1e-9);
    }

    #[test]
    fn gear_ratio_scales_target_rotation() {
        let direct = DriveGeometry::new(3.75, 1.0);
        let geared = DriveGeometry::new(3.75, 2.0);
        let d = geared.inches_to_degrees(24.0);
        assert!((d - direct.inches_to_degrees(24.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn drive_settles_within_one_tick_when_already_at_target() {
        let mut chassis = SimChassis::new();
        let mut pid = Pid::new(linear_config());
        assert!(drive_tick(&mut pid, &mut chassis, 3.0));
        assert_eq!(chassis.commands.len(), 1);
    }

    #[test]
    fn drive_ticks_converge_on_simulated_chassis() {
        let mut chassis = SimChassis::new();
        chassis.reset_position();
        let mut pid = Pid::new(linear_config());
        let target = 733.86;

        let mut settled = false;
        for _ in 0..1000 {
            if drive_tick(&mut pid, &mut chassis, target) {
                settled = true;
                break;
            }
        }
        assert!(settled);
        assert!((chassis.position - target).abs() < 15.0);

        // Both sides always commanded symmetrically, inside the cap.
        for (left, right) in &chassis.commands {
            assert_eq!(left, right);
            assert!(left.abs() <= 12.0);
        }

        // Braking belongs to the routine's single exit path, never to a tick.
        assert_eq!(chassis.holds, 0);
    }

    #[test]
    fn turn_ticks_command_opposed_sides() {
        let mut chassis = SimChassis::new();
        let mut gyro = SimGyro {
            rotation: 14.0,
            offset: 0.0,
        };
        gyro.zero();

        let mut pid = Pid::new(PidConfig {
            gains: Gains::new(0.13, 0.0, 0.0),
            integral: IntegralPolicy::Accumulate,
            limit: OutputLimit::none(),
            tolerances: Tolerances::error(2.0),
        });

        let mut settled = turn_tick(&mut pid, &mut chassis, &mut gyro, 90.0);
        assert!(!settled);
        // Chassis does not translate while turning in place.
        assert_eq!(chassis.position, 0.0);

        gyro.rotation += 75.0;
        settled = turn_tick(&mut pid, &mut chassis, &mut gyro, 90.0);
        assert!(!settled);

        gyro.rotation += 14.5;
        settled = turn_tick(&mut pid, &mut chassis, &mut gyro, 90.0);
        assert!(settled);

        for (left, right) in &chassis.commands {
            assert!((left + right).abs() < 1e-12);
        }
    }
}
