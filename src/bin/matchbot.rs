//! Match program.
//!
//! Competition-gated robot: the autonomous phase drives forward 24 inches
//! and turns 90 degrees using the plain PID configuration (unconditional
//! integral accumulation, no output staging); the driver phase runs the
//! arcade drive-and-intake loop. The inertial sensor is calibrated before
//! the competition phases begin.

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
const DRIVE_GAINS: Gains = Gains::new(0.02, 0.0, 0.0);
const TURN_GAINS: Gains = Gains::new(0.13, 0.0, 0.0);
const DRIVE_TIMEOUT: Duration = Duration::from_millis(3000);
const TURN_TIMEOUT: Duration = Duration::from_millis(2000);
const SETTLE_DELAY: Duration = Duration::from_millis(300);

fn drive_controller() -> DriveController {
    DriveController {
        geometry: GEOMETRY,
        linear: PidConfig {
            gains: DRIVE_GAINS,
            integral: IntegralPolicy::Accumulate,
            limit: OutputLimit::none(),
            tolerances: Tolerances::error(5.0),
        },
        angular: PidConfig {
            gains: TURN_GAINS,
            integral: IntegralPolicy::Accumulate,
            limit: OutputLimit::none(),
            tolerances: Tolerances::error(2.0),
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

impl Compete for Robot {
    async fn autonomous(&mut self) {
        info!("Autonomous started");
        let auton = drive_controller();

        auton
            .drive_distance(&mut self.drivetrain, 24.0, DRIVE_TIMEOUT)
            .await;
        sleep(SETTLE_DELAY).await;
        auton
            .turn_heading(&mut self.drivetrain, &mut self.heading, 90.0, TURN_TIMEOUT)
            .await;

        info!("Autonomous finished");
    }

    async fn driver(&mut self) {
        info!("Driver control started");
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

    // Calibrate before the field controller hands us a phase.
    robot.heading.calibrate().await;

    robot.compete().await;
}
