//! # Talos
//!
//! Talos is a small control library for VEX V5 competition robots built on
//! top of [Vexide](https://vexide.dev). It provides:
//!
//! - **Drivetrain Control**: A differential drivetrain with tank and arcade
//!   voltage mixing and brake-mode management.
//! - **Motion Control**: A single PID feedback core shared by the linear
//!   (drive-distance) and angular (turn-to-heading) autonomous routines,
//!   with configurable anti-windup and staged output limits.
//! - **Operator Control**: Helpers for mapping controller buttons to motor
//!   banks and pneumatic outputs during driver control.
//! - **Logging**: A file-based logger for debugging and telemetry.
//!
//! The two competition programs that use this library live in `src/bin/`:
//! `matchbot` (competition-gated) and `skills` (directly-run routine).
//!
//! ## Quick Start
//!
//! ```ignore
//! use talos::drivetrain::Differential;
//! use vexide::prelude::*;
//!
//! #[vexide::main]
//! async fn main(peripherals: Peripherals) {
//!     let mut drivetrain = Differential::new(
//!         [
//!             Motor::new(peripherals.port_2, Gearset::Green, Direction::Forward),
//!             Motor::new(peripherals.port_4, Gearset::Green, Direction::Reverse),
//!         ],
//!         [
//!             Motor::new(peripherals.port_1, Gearset::Green, Direction::Reverse),
//!             Motor::new(peripherals.port_3, Gearset::Green, Direction::Forward),
//!         ],
//!     );
//!
//!     let controller = Controller::new(ControllerId::Primary);
//!     loop {
//!         let state = controller.state().unwrap_or_default();
//!         drivetrain.drive_arcade(state.left_stick.y(), state.right_stick.x());
//!     }
//! }
//! ```

/// Differential drivetrain control.
///
/// Provides the [`Differential`](drivetrain::Differential) struct for
/// controlling robots with left and right motor groups, with tank and
/// arcade voltage mixing.
pub mod drivetrain;

/// Filesystem utilities.
///
/// Contains the file/console logger used for recording robot telemetry
/// and debug information on the V5 Brain's SD card.
pub mod fs;

/// Autonomous motion control.
///
/// PID feedback control for precise movement during autonomous periods:
/// a reusable step-function controller plus drive-distance and
/// turn-to-heading routines built on it.
pub mod motion;

/// Operator control utilities.
///
/// Maps controller buttons to motor banks and ADI digital outputs during
/// the driver control period.
pub mod opcontrol;
