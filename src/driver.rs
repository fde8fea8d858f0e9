//! OOK transmit driver for MICRF112/MICRF114 style RF transmitters.
//!
//! This module provides the [`MicrfDriver`] struct, which turns a byte payload
//! into a timed sequence of levels on the transmitter's data line: a training
//! sequence, a preamble and the Manchester-encoded payload. One line bit is
//! driven per call to [`tick()`](MicrfDriver::tick), which the platform calls
//! from a periodic timer interrupt.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use micrf114::config::TxConfig;
//! use micrf114::driver::MicrfDriver;
//!
//! # let data = Pin::new(&[PinTransaction::set(PinState::High), PinTransaction::set(PinState::Low)]);
//! # let enable = Pin::new(&[PinTransaction::set(PinState::High), PinTransaction::set(PinState::Low)]);
//! let mut driver = MicrfDriver::new(data, enable, (), TxConfig::default());
//! driver.transmit(b"hi").unwrap();
//! assert!(!driver.is_idle());
//! # driver.data.done();
//! # driver.enable.done();
//! ```
//!
//! ## Pin contract
//!
//! | State        | Enable line | Data line |
//! |--------------|-------------|-----------|
//! | Idle         | high        | high      |
//! | Transmitting | low         | line bits |
//!
//! Leaving a frame always goes data low, enable high, then data high. The
//! transmitter expects exactly this order to settle into its off state.
//!
//! ## Timing
//!
//! The level driven on a tick is computed during the previous tick, so the
//! first thing `tick()` does is the pin write. Nothing is logged on that path.
//!
//! For timer and tick scheduling helpers, see [`crate::timer`].

use crate::config::TxConfig;
use crate::consts::{CALIBRATION_PAUSE_US, MAX_PAYLOAD_LEN, MIN_PAYLOAD_LEN};
use crate::error::TxError;
use crate::session::{Phase, TxSession};
use crate::timer::TickTimer;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use core::convert::Infallible;
use heapless::Vec;

/// Enable line level while a frame is on air.
const ENABLE_TX_LEVEL: bool = false;
/// Enable line level between frames.
const ENABLE_IDLE_LEVEL: bool = true;

/// Interrupt-driven OOK transmitter.
///
/// ## Type Parameters
///
/// - `DATA`: [`OutputPin`] feeding the transmitter's data input
/// - `EN`: [`OutputPin`] driving the transmitter's enable input
/// - `TMR`: [`TickTimer`] whose interrupt calls [`tick()`](Self::tick)
///
/// ## Notes
///
/// - One transmission at a time. [`transmit()`](Self::transmit) reports a
///   busy transmitter as `WouldBlock`.
/// - When `tick()` runs from an interrupt, keep the driver in a
///   `critical_section::Mutex` (see [`crate::timer`]) so caller context never
///   observes a half-updated session.
#[derive(Debug)]
pub struct MicrfDriver<DATA, EN, TMR>
where
    DATA: OutputPin,
    EN: OutputPin,
    TMR: TickTimer,
{
    /// Data pin
    pub data: DATA,
    /// Enable pin
    pub enable: EN,
    /// Bit timer
    pub timer: TMR,
    config: TxConfig,
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
    session: TxSession,
    aborting: bool,

    /// Counter of frames sent in full.
    pub tx_good: u16,

    /// Counter of frames cut short by [`cancel()`](Self::cancel) or by an
    /// inconsistent session.
    pub tx_aborted: u16,
}

impl<DATA, EN, TMR> MicrfDriver<DATA, EN, TMR>
where
    DATA: OutputPin,
    EN: OutputPin,
    TMR: TickTimer,
{
    /// Creates a new driver and puts the transmitter into its idle state.
    ///
    /// # Arguments
    /// - `data`: The output pin feeding the transmitter's data input.
    /// - `enable`: The output pin driving the transmitter's enable input.
    /// - `timer`: The periodic timer that calls [`tick()`](Self::tick).
    /// - `config`: Line polarity and symbol order, see [`TxConfig`].
    ///
    /// # Notes
    /// Enable is driven high, then data high, and the timer is stopped.
    pub fn new(data: DATA, enable: EN, timer: TMR, config: TxConfig) -> Self {
        let mut driver = Self {
            data,
            enable,
            timer,
            config,
            payload: Vec::new(),
            session: TxSession::idle(),
            aborting: false,
            tx_good: 0,
            tx_aborted: 0,
        };
        driver.write_enable(ENABLE_IDLE_LEVEL);
        driver.write_data(true);
        driver.timer.stop();
        driver
    }

    /// The configuration this driver was built with.
    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    fn write_data(&mut self, level: bool) {
        let _ = self.data.set_state(level.into());
    }

    fn write_enable(&mut self, level: bool) {
        let level = level != self.config.enable_inverted;
        let _ = self.enable.set_state(level.into());
    }

    /// Returns `true` when no transmission is in flight.
    ///
    /// A plain read with no side effects; safe to poll at any time.
    pub fn is_idle(&self) -> bool {
        self.session.is_complete()
    }

    /// Completion signal for use with `nb::block!`.
    pub fn wait_tx_idle(&self) -> nb::Result<(), Infallible> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Phase of the frame currently on air, or `None` when idle.
    pub fn phase(&self) -> Option<Phase> {
        if self.is_idle() {
            None
        } else {
            Some(self.session.phase())
        }
    }

    fn check_request(&self, payload: &[u8]) -> nb::Result<(), TxError> {
        if !(MIN_PAYLOAD_LEN..=MAX_PAYLOAD_LEN).contains(&payload.len()) {
            return Err(nb::Error::Other(TxError::InvalidLength));
        }
        if !self.is_idle() {
            return Err(nb::Error::WouldBlock);
        }
        Ok(())
    }

    /// Starts sending `payload` and returns immediately.
    ///
    /// The payload is copied, so the caller's buffer is free as soon as this
    /// returns. The data line goes low before the enable line is switched to
    /// its transmit level, then the timer is armed. The first tick drives the
    /// first training bit.
    ///
    /// # Errors
    /// - [`TxError::InvalidLength`] if `payload` is empty or longer than
    ///   [`MAX_PAYLOAD_LEN`]. Nothing is touched.
    /// - `WouldBlock` while a previous frame is still on air. Nothing is
    ///   touched; retry once [`is_idle()`](Self::is_idle) holds.
    pub fn transmit(&mut self, payload: &[u8]) -> nb::Result<(), TxError> {
        self.check_request(payload)?;

        self.payload.clear();
        self.payload
            .extend_from_slice(payload)
            .map_err(|_| nb::Error::Other(TxError::InvalidLength))?;

        self.write_data(false);
        self.write_enable(ENABLE_TX_LEVEL);

        self.session = TxSession::begin(payload.len() as u8);
        self.aborting = false;
        debug!("tx start, {} payload bytes", payload.len());

        // No session writes from here on; the tick handler owns it.
        self.timer.init();
        self.timer.start();
        Ok(())
    }

    /// Runs the transmitter's calibration pulses, then starts sending
    /// `payload` like [`transmit()`](Self::transmit).
    ///
    /// Blocks for the calibration sequence only (five pauses of
    /// [`CALIBRATION_PAUSE_US`]), never for the frame itself.
    ///
    /// # Errors
    /// Same as [`transmit()`](Self::transmit), checked before any pin moves.
    pub fn transmit_with_calibration<D: DelayNs>(
        &mut self,
        payload: &[u8],
        delay: &mut D,
    ) -> nb::Result<(), TxError> {
        self.check_request(payload)?;
        self.calibrate(delay);
        self.transmit(payload)
    }

    fn calibrate<D: DelayNs>(&mut self, delay: &mut D) {
        trace!("calibration start");
        self.write_data(false);
        self.write_enable(ENABLE_TX_LEVEL);
        delay.delay_us(CALIBRATION_PAUSE_US);

        self.write_data(true);
        self.write_enable(ENABLE_IDLE_LEVEL);
        delay.delay_us(CALIBRATION_PAUSE_US);
        self.write_enable(ENABLE_TX_LEVEL);
        delay.delay_us(CALIBRATION_PAUSE_US);

        self.write_data(false);
        self.write_enable(ENABLE_IDLE_LEVEL);
        delay.delay_us(CALIBRATION_PAUSE_US);
        self.write_enable(ENABLE_TX_LEVEL);
        delay.delay_us(CALIBRATION_PAUSE_US);
        trace!("calibration done");
    }

    /// Cuts the current frame short. The next tick shuts the transmitter down
    /// instead of driving another bit.
    ///
    /// Call with the tick interrupt masked, e.g. through
    /// `global_tx_cancel`. Does nothing when idle.
    pub fn cancel(&mut self) {
        if self.is_idle() || self.session.stop_requested() {
            return;
        }
        warn!("tx cancelled");
        self.session.request_stop();
        self.aborting = true;
    }

    /// Advances the transmit state machine by one line bit.
    ///
    /// Call once per bit period from the timer interrupt. The pin write comes
    /// first; the level was computed on the previous tick. The tick after the
    /// last payload bit performs shutdown and stops the timer.
    ///
    /// Ticks arriving while idle are ignored.
    pub fn tick(&mut self) {
        if self.session.is_complete() {
            return;
        }
        if self.session.stop_requested() {
            self.shutdown();
            return;
        }

        self.write_data(self.session.next_bit());

        if self
            .session
            .advance(&self.payload, self.config.symbol_order)
            .is_err()
        {
            warn!("tx session fault, forcing shutdown");
            self.aborting = true;
            self.shutdown();
        }
    }

    fn shutdown(&mut self) {
        self.session.finish();
        self.write_data(false);
        self.write_enable(ENABLE_IDLE_LEVEL);
        self.write_data(true);
        self.timer.stop();

        if self.aborting {
            self.tx_aborted = self.tx_aborted.wrapping_add(1);
            self.aborting = false;
        } else {
            self.tx_good = self.tx_good.wrapping_add(1);
            debug!("tx complete");
        }
    }
}
