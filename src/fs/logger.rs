//! File-based logger implementation for the V5 Brain.
//!
//! Implements the [`log`] crate's facade, mirroring every record to the
//! console and to `log.txt` in the root of the SD card. Each entry carries
//! the level, the uptime since program start, the module path and the
//! message:
//!
//! ```text
//! INFO [2m 5s 123ms] talos::motion::drive - drive_distance: 24 in -> 733.9 deg
//! WARN [2m 5s 456ms] talos::drivetrain - Controller State Error: Disconnected
//! ```

use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    sync::{Mutex, OnceLock},
    time::Duration,
};

use humantime::{FormattedDuration, format_duration};
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use vexide::time::user_uptime;

/// Dual console/file logger.
///
/// The file writer is `None` when `log.txt` could not be opened (for
/// example with no SD card inserted); console output still works then.
pub struct RobotLogger {
    file: Mutex<Option<BufWriter<std::fs::File>>>,
}

impl RobotLogger {
    fn new() -> Self {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open("log.txt")
            .ok()
            .map(BufWriter::new);

        Self { file: Mutex::new(file) }
    }
}

impl log::Log for RobotLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!(
            "{} [{}] {} - {}\n",
            record.level(),
            uptime(),
            record.target(),
            record.args()
        );

        print!("{}", line);

        if let Ok(mut writer) = self.file.lock() {
            if let Some(ref mut writer) = *writer {
                let _ = writer.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.file.lock() {
            if let Some(ref mut writer) = *writer {
                let _ = writer.flush();
            }
        }
    }
}

static LOGGER: OnceLock<RobotLogger> = OnceLock::new();

/// Initializes the global logger.
///
/// Call once at program start, before any logging macros run. Records
/// below `level` are discarded.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(RobotLogger::new);
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

/// Formatted duration since the user program started.
///
/// On VexOS this is the real uptime; on other platforms (host tests) a
/// placeholder value is used.
fn uptime() -> FormattedDuration {
    let dur = if cfg!(target_os = "vexos") {
        user_uptime()
    } else {
        Duration::from_millis(123_432)
    };
    format_duration(dur)
}

#[cfg(test)]
mod tests {
    use log::{LevelFilter, debug, error, info, trace, warn};

    #[test]
    #[ignore = "filesystem access needed (file write)"]
    fn log_full_test() {
        super::init(LevelFilter::Trace).expect("Failed to initialize logger");

        trace!("This is a trace message");
        debug!("This is a debug message");
        info!("This is an info message");
        warn!("This is a warning message");
        error!("This is an error message");

        log::logger().flush();

        assert!(
            log::logger().enabled(
                &log::Metadata::builder()
                    .level(log::Level::Error)
                    .target("test")
                    .build()
            )
        );
    }
}
