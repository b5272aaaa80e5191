//! Differential drivetrain control.
//!
//! This module provides the [`Differential`] struct for robots with
//! separate left and right motor groups ("tank drive"). It exposes
//! value-based tank and arcade voltage mixing so the same drivetrain works
//! from a controller loop, an autonomous routine, or a test harness.
//!
//! # Example
//!
//! ```ignore
//! use talos::drivetrain::Differential;
//! use vexide::prelude::*;
//!
//! let mut drivetrain = Differential::new(
//!     [
//!         Motor::new(peripherals.port_2, Gearset::Green, Direction::Forward),
//!         Motor::new(peripherals.port_4, Gearset::Green, Direction::Reverse),
//!     ],
//!     [
//!         Motor::new(peripherals.port_1, Gearset::Green, Direction::Reverse),
//!         Motor::new(peripherals.port_3, Gearset::Green, Direction::Forward),
//!     ],
//! );
//!
//! // In the driver control loop:
//! let state = controller.state().unwrap_or_default();
//! drivetrain.drive_arcade(state.left_stick.y(), state.right_stick.x());
//! ```

use std::{cell::RefCell, rc::Rc};

use log::warn;
use vexide::{prelude::Motor, smart::motor::BrakeMode};

use crate::motion::drive::Chassis;

/// Mixes arcade inputs into left/right outputs.
///
/// `throttle` drives both sides equally; `steer` adds to the left side and
/// subtracts from the right, so a positive steer turns clockwise. The
/// result is in the same units as the inputs and is not clamped.
pub fn arcade_mix(throttle: f64, steer: f64) -> (f64, f64) {
    (throttle + steer, throttle - steer)
}

/// A differential drivetrain.
///
/// Motors are stored in reference-counted cells so the same groups can be
/// shared between the driver-control loop and autonomous routines. All
/// motors in a group are commanded identically; configure per-motor
/// directions at construction so positive voltage moves the robot forward.
#[derive(Clone)]
pub struct Differential {
    left: Rc<RefCell<dyn AsMut<[Motor]>>>,
    right: Rc<RefCell<dyn AsMut<[Motor]>>>,
}

impl Differential {
    /// Creates a drivetrain that takes ownership of its motor groups.
    pub fn new<L: AsMut<[Motor]> + 'static, R: AsMut<[Motor]> + 'static>(
        left: L,
        right: R,
    ) -> Self {
        Self {
            left: Rc::new(RefCell::new(left)),
            right: Rc::new(RefCell::new(right)),
        }
    }

    /// Creates a drivetrain from already-shared motor groups.
    pub fn from_shared<L: AsMut<[Motor]> + 'static, R: AsMut<[Motor]> + 'static>(
        left: Rc<RefCell<L>>,
        right: Rc<RefCell<R>>,
    ) -> Self {
        Self { left, right }
    }

    /// Commands the two sides with voltages directly.
    pub fn drive_tank(&self, left_voltage: f64, right_voltage: f64) {
        command_group(&self.left, left_voltage);
        command_group(&self.right, right_voltage);
    }

    /// Commands the drivetrain with arcade-mixed voltages.
    ///
    /// Inputs are expected in `[-1.0, 1.0]` (stick range) and are scaled to
    /// motor voltage.
    pub fn drive_arcade(&self, throttle: f64, steer: f64) {
        let (left, right) = arcade_mix(throttle, steer);
        self.drive_tank(left * Motor::V5_MAX_VOLTAGE, right * Motor::V5_MAX_VOLTAGE);
    }

    /// Stops every motor in the drivetrain with the given brake mode.
    ///
    /// - [`BrakeMode::Coast`]: spin freely.
    /// - [`BrakeMode::Brake`]: actively resist rotation.
    /// - [`BrakeMode::Hold`]: actively return to the stopped position.
    pub fn brake(&self, mode: BrakeMode) {
        for group in [&self.left, &self.right] {
            if let Ok(mut motors) = group.try_borrow_mut() {
                for motor in motors.as_mut() {
                    motor.brake(mode).unwrap_or_else(|e| {
                        warn!("Motor Brake Error: {}", e);
                    });
                }
            } else {
                warn!("Drivetrain motors already borrowed");
            }
        }
    }

    /// Averaged encoder position of all drivetrain motors, in degrees.
    ///
    /// Motors whose encoder cannot be read are excluded from the average
    /// and a warning is logged.
    pub fn position_degrees(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0.0;
        for group in [&self.left, &self.right] {
            if let Ok(mut motors) = group.try_borrow_mut() {
                for motor in motors.as_mut() {
                    match motor.position() {
                        Ok(angle) => {
                            sum += angle.as_degrees();
                            count += 1.0;
                        }
                        Err(e) => warn!("Motor Encoder Error: {}", e),
                    }
                }
            } else {
                warn!("Drivetrain motors already borrowed");
            }
        }
        if count == 0.0 { 0.0 } else { sum / count }
    }

    /// Zeroes every motor encoder.
    pub fn reset_positions(&self) {
        for group in [&self.left, &self.right] {
            if let Ok(mut motors) = group.try_borrow_mut() {
                for motor in motors.as_mut() {
                    motor.reset_position().unwrap_or_else(|e| {
                        warn!("Motor Encoder Reset Error: {}", e);
                    });
                }
            } else {
                warn!("Drivetrain motors already borrowed");
            }
        }
    }
}

impl Chassis for Differential {
    fn reset_position(&mut self) {
        self.reset_positions();
    }

    fn position(&mut self) -> f64 {
        self.position_degrees()
    }

    fn drive_tank(&mut self, left: f64, right: f64) {
        Differential::drive_tank(self, left, right);
    }

    fn hold(&mut self) {
        self.brake(BrakeMode::Brake);
    }
}

fn command_group(group: &Rc<RefCell<dyn AsMut<[Motor]>>>, voltage: f64) {
    if let Ok(mut motors) = group.try_borrow_mut() {
        for motor in motors.as_mut() {
            motor.set_voltage(voltage).unwrap_or_else(|e| {
                warn!("Motor Set Voltage Error: {}", e);
            });
        }
    } else {
        warn!("Drivetrain motors already borrowed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arcade_mix_straight_ahead() {
        assert_eq!(arcade_mix(50.0, 0.0), (50.0, 50.0));
    }

    #[test]
    fn arcade_mix_turn_in_place() {
        assert_eq!(arcade_mix(0.0, 50.0), (50.0, -50.0));
    }

    #[test]
    fn arcade_mix_combines_axes() {
        let (left, right) = arcade_mix(0.6, -0.2);
        assert!((left - 0.4).abs() < 1e-12);
        assert!((right - 0.8).abs() < 1e-12);
    }
}
