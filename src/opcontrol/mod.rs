//! Operator control utilities for driver control periods.
//!
//! This module maps controller inputs to robot actions during the
//! driver-controlled portion of a match:
//!
//! - **Motor banks**: two buttons select forward / reverse / coast for a
//!   bank of identical motors (e.g. an intake).
//! - **Pneumatics**: a digital output follows a button's pressed state.
//!
//! # Example
//!
//! ```ignore
//! use talos::opcontrol::controller::{apply_bank, bank_command, follow_button};
//!
//! let state = controller.state().unwrap_or_default();
//!
//! // L1 runs the intake forward, L2 in reverse, neither coasts it.
//! let command = bank_command(
//!     state.button_l1.is_pressed(),
//!     state.button_l2.is_pressed(),
//! );
//! apply_bank(command, &mut intake, 12.0);
//!
//! // The claw piston is open exactly while A is held.
//! follow_button(state.button_a.is_pressed(), &mut claw);
//! ```

/// Button-to-motor-bank and button-to-pneumatic mapping.
pub mod controller;
