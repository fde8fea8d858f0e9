//! Host-side stand-ins for pins, timers and delays used by the unit tests.

use crate::timer::TickTimer;
use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use std::vec::Vec;

/// Output pin that records every level written to it.
#[derive(Debug, Default)]
pub(crate) struct RecordingPin {
    pub(crate) levels: Vec<bool>,
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Timer that counts how often it was armed and disarmed.
#[derive(Debug, Default)]
pub(crate) struct CountingTimer {
    pub(crate) inits: u32,
    pub(crate) starts: u32,
    pub(crate) stops: u32,
    pub(crate) running: bool,
}

impl TickTimer for CountingTimer {
    fn init(&mut self) {
        self.inits += 1;
    }

    fn start(&mut self) {
        self.starts += 1;
        self.running = true;
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.running = false;
    }
}

/// Delay that only adds up the requested time.
#[derive(Debug, Default)]
pub(crate) struct CountingDelay {
    pub(crate) total_ns: u64,
    pub(crate) calls: u32,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
        self.calls += 1;
    }
}
