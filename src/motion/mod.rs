//! Autonomous motion control.
//!
//! The motion system is one PID feedback core shared by every closed-loop
//! axis, plus the drive-distance and turn-to-heading routines built on it.
//! The controller itself is a pure step function; the routines own the
//! fixed 20 ms tick and the timeout clock, so the algorithm can be
//! exercised in tests without real time passing.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use talos::motion::drive::{DriveController, DriveGeometry};
//! use talos::motion::pid::{Gains, IntegralPolicy, OutputLimit, PidConfig, Tolerances};
//!
//! let auton = DriveController {
//!     geometry: DriveGeometry::new(3.75, 1.0),
//!     linear: PidConfig {
//!         gains: Gains::new(0.02, 0.0, 0.0),
//!         integral: IntegralPolicy::Accumulate,
//!         limit: OutputLimit::none(),
//!         tolerances: Tolerances::error(5.0),
//!     },
//!     angular: PidConfig {
//!         gains: Gains::new(0.13, 0.0, 0.0),
//!         integral: IntegralPolicy::Accumulate,
//!         limit: OutputLimit::none(),
//!         tolerances: Tolerances::error(2.0),
//!     },
//! };
//!
//! auton.drive_distance(&mut drivetrain, 24.0, Duration::from_millis(3000)).await;
//! auton.turn_heading(&mut drivetrain, &mut heading, 90.0, Duration::from_millis(2000)).await;
//! ```

/// Drive-distance and turn-to-heading routines over the PID core.
pub mod drive;

/// The PID step-function controller and its configuration types.
pub mod pid;
