//! Controller input mapping for operator control.
//!
//! The selection logic is split from the actuation so it can be tested
//! without hardware: [`bank_command`] decides what a motor bank should do
//! from two button states, [`apply_bank`] carries the decision out, and
//! [`follow_button`] drives a pneumatic output from a held button.

use log::warn;
use vexide::{
    prelude::{AdiDigitalOut, Motor},
    smart::motor::BrakeMode,
};

/// What a bank of identical motors should do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankCommand {
    /// Run at full power forward.
    Forward,
    /// Run at full power in reverse.
    Reverse,
    /// Stop and spin freely.
    Coast,
}

/// Selects a bank command from two momentary buttons.
///
/// The forward button wins if both are held, matching the order the
/// driver-control loop checks them in.
pub fn bank_command(forward_pressed: bool, reverse_pressed: bool) -> BankCommand {
    if forward_pressed {
        BankCommand::Forward
    } else if reverse_pressed {
        BankCommand::Reverse
    } else {
        BankCommand::Coast
    }
}

/// Applies a bank command to every motor in the bank.
///
/// `voltage` is the magnitude used for both directions. Motor faults are
/// logged and skipped; the remaining motors are still commanded.
pub fn apply_bank(command: BankCommand, motors: &mut [Motor], voltage: f64) {
    for motor in motors.iter_mut() {
        let result = match command {
            BankCommand::Forward => motor.set_voltage(voltage),
            BankCommand::Reverse => motor.set_voltage(-voltage),
            BankCommand::Coast => motor.brake(BrakeMode::Coast),
        };
        result.unwrap_or_else(|e| {
            warn!("Motor Bank Error: {}", e);
        });
    }
}

/// Drives a digital output from a button's pressed state: high while held,
/// low otherwise.
pub fn follow_button(pressed: bool, output: &mut AdiDigitalOut) {
    let result = if pressed {
        output.set_high()
    } else {
        output.set_low()
    };
    result.unwrap_or_else(|e| {
        warn!("ADI Output Error: {}", e);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_command_selects_three_states() {
        assert_eq!(bank_command(true, false), BankCommand::Forward);
        assert_eq!(bank_command(false, true), BankCommand::Reverse);
        assert_eq!(bank_command(false, false), BankCommand::Coast);
    }

    #[test]
    fn bank_command_forward_wins_when_both_held() {
        assert_eq!(bank_command(true, true), BankCommand::Forward);
    }
}
