//! Skills program.
//!
//! Runs the scoring routine directly after calibration, with no
//! competition phase gating, then drops into the manual control loop.
//! This program uses the guarded PID configuration: the integral
//! accumulator is cleared while the error is still large, the output is
//! staged down as the target approaches, and settling additionally
//! requires the error to have stopped moving.

use std::time::Duration;

use log::{LevelFilter, info, warn};
use talos::{
    drivetrain::Differential,
    fs::logger,
    motion::{
        drive::{DriveController, DriveGeometry, ImuHeading, TICK},
        pid::{Gains, IntegralPolicy, OutputLimit, PidConfig, Tolerances},
    },
    opcontrol::controller::{apply_bank, bank_command, follow_button},
};
use vexide::{controller::ControllerState, prelude::*};

const GEOMETRY: DriveGeometry = DriveGeometry::new(3.75, 1.0);
const DRIVE_GAINS: Gains = Gains::new(0.04, 0.002, 0.25);
const TURN_GAINS: Gains = Gains::new(0.2, 0.004, 0.8);
/// Integral only accumulates inside this error band.
const WINDUP_BAND: f64 = 50.0;
const DRIVE_TIMEOUT: Duration = Duration::from_millis(3000);
const TURN_TIMEOUT: Duration = Duration::from_millis(2000);
const SETTLE_DELAY: Duration = Duration::from_millis(300);

fn drive_controller() -> DriveController {
    DriveController {
        geometry: GEOMETRY,
        linear: PidConfig {
            gains: DRIVE_GAINS,
            integral: IntegralPolicy::ResetAbove(WINDUP_BAND),
            // Full power far out, stepped down inside 150 and 60 degrees
            // of the target to keep the chassis from coasting through.
            limit: OutputLimit::fixed(Motor::V5_MAX_VOLTAGE)
                .stage(150.0, 8.0)
                .stage(60.0, 5.0),
            tolerances: Tolerances::error(5.0).velocity(1.0),
        },
        angular: PidConfig {
            gains: TURN_GAINS,
            integral: IntegralPolicy::ResetAbove(WINDUP_BAND),
            limit: OutputLimit::fixed(Motor::V5_MAX_VOLTAGE),
            tolerances: Tolerances::error(2.0).velocity(1.0),
        },
    }
}

struct Robot {
    controller: Controller,
    drivetrain: Differential,
    heading: ImuHeading,
    optical: OpticalSensor,
    claw: AdiDigitalOut,
    intake: [Motor; 5],
}

impl Robot {
    async fn routine(&mut self) {
        info!("Skills routine started");
        let auton = drive_controller();

        auton
            .drive_distance(&mut self.drivetrain, 24.0, DRIVE_TIMEOUT)
            .await;
        sleep(SETTLE_DELAY).await;
        auton
            .turn_heading(&mut self.drivetrain, &mut self.heading, 90.0, TURN_TIMEOUT)
            .await;
        sleep(SETTLE_DELAY).await;
        auton
            .drive_distance(&mut self.drivetrain, -12.0, DRIVE_TIMEOUT)
            .await;

        info!("Skills routine finished");
    }

    async fn manual(&mut self) {
        info!("Manual control started");
        loop {
            let state = self.controller.state().unwrap_or_else(|e| {
                warn!("Controller State Error: {}", e);
                ControllerState::default()
            });

            self.drivetrain
                .drive_arcade(state.left_stick.y(), state.right_stick.x());

            self.optical.set_led_brightness(100.0).unwrap_or_else(|e| {
                warn!("Optical LED Error: {}", e);
            });

            let command = bank_command(
                state.button_l1.is_pressed(),
                state.button_l2.is_pressed(),
            );
            apply_bank(command, &mut self.intake, Motor::V5_MAX_VOLTAGE);

            follow_button(state.button_a.is_pressed(), &mut self.claw);

            sleep(TICK).await;
        }
    }
}

#[vexide::main]
async fn main(peripherals: Peripherals) {
    logger::init(LevelFilter::Info).unwrap_or_else(|e| {
        println!("Logger init failed: {}", e);
    });

    let mut robot = Robot {
        controller: peripherals.primary_controller,
        drivetrain: Differential::new(
            [
                Motor::new(peripherals.port_2, Gearset::Green, Direction::Forward),
                Motor::new(peripherals.port_4, Gearset::Green, Direction::Reverse),
            ],
            [
                Motor::new(peripherals.port_1, Gearset::Green, Direction::Reverse),
                Motor::new(peripherals.port_3, Gearset::Green, Direction::Forward),
            ],
        ),
        heading: ImuHeading::new(InertialSensor::new(peripherals.port_5)),
        optical: OpticalSensor::new(peripherals.port_6),
        claw: AdiDigitalOut::new(peripherals.adi_a),
        intake: [
            Motor::new(peripherals.port_7, Gearset::Green, Direction::Forward),
            Motor::new(peripherals.port_8, Gearset::Green, Direction::Forward),
            Motor::new(peripherals.port_9, Gearset::Green, Direction::Forward),
            Motor::new(peripherals.port_10, Gearset::Green, Direction::Forward),
            Motor::new(peripherals.port_11, Gearset::Green, Direction::Forward),
        ],
    };

    robot.heading.calibrate().await;

    robot.routine().await;
    robot.manual().await;
}
