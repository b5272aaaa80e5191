//! Filesystem utilities for the V5 Brain.
//!
//! The `logger` submodule implements the [`log`] crate's facade, writing
//! to both the console and a file on the Brain's SD card. Useful for
//! debugging issues that only occur on the robot.
//!
//! # Example
//!
//! ```ignore
//! use log::{LevelFilter, info};
//! use talos::fs::logger;
//!
//! logger::init(LevelFilter::Debug).expect("Failed to initialize logger");
//! info!("Robot initialized");
//! ```

/// File-based logging for the V5 Brain.
pub mod logger;
