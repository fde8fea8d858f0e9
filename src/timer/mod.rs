//! Timer and tick-loop utilities for the MICRF transmit driver.
//!
//! The driver needs one tick per line bit. Two ways to get there: an interrupt
//! service routine calling `tick()` through a `critical_section` protected
//! global (`timer-isr` feature), or a blocking delay loop (`delay-loop`
//! feature).
//!
//! Contains:
//! - [`TickTimer`]: the start/stop handle the driver uses to arm and disarm the
//!   periodic interrupt
//! - `compute_period_counts`: runtime timer compare value calculator
//! - `const_period_counts`: compile-time timer compare value calculator
//! - `run_tx_tick_loop`: blocking tick loop for `DelayNs` (feature `delay-loop`)
//! - `global_tx_timer_tick` and `tick_tx_timer!()`: interrupt-based tick
//!   callback wrappers (feature `timer-isr`)
//!
//! Common settings for a 2000 line bits/s link (500 µs per tick):
//!
//! | TIMER CLOCK | PRESCALER | PERIOD COUNTS |
//! |-------------|-----------|---------------|
//! |      16 MHz |        64 |           125 |
//! |      48 MHz |        64 |           375 |
//! |      64 MHz |       256 |           125 |

use libm::round;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// Handle on the periodic timer whose interrupt calls
/// [`MicrfDriver::tick`](crate::driver::MicrfDriver::tick).
///
/// Registering the interrupt handler is left to the platform: its ISR calls
/// `tick()` (see [`tick_tx_timer!`](crate::tick_tx_timer)). The driver only
/// arms the timer when a session starts and disarms it on shutdown.
pub trait TickTimer {
    /// Prepares the timer for a new session. Called right before
    /// [`start`](Self::start).
    fn init(&mut self) {}

    /// Starts periodic interrupts.
    fn start(&mut self);

    /// Stops periodic interrupts.
    fn stop(&mut self);
}

/// No-op timer for setups where something else paces `tick()`, such as
/// `run_tx_tick_loop`.
impl TickTimer for () {
    fn start(&mut self) {}

    fn stop(&mut self) {}
}

/// 1,000,000 microseconds = 1 second
pub const MICROSECONDS_PER_SECOND: u32 = 1_000_000;

/// Computes the compare value for a periodic timer ticking at `line_rate`.
///
/// # Arguments
/// - `f_timer`: timer input clock in Hz
/// - `prescaler`: timer prescaler (e.g., 8, 64, 256)
/// - `line_rate`: line bits per second (one tick per line bit)
///
/// # Returns
/// - Timer counts per tick, rounded to the nearest integer
/// - Actual tick period in microseconds after rounding
///
/// `None` if `prescaler` or `line_rate` is zero, or if the clock is too slow
/// for even one count per tick.
pub fn compute_period_counts(f_timer: u32, prescaler: u32, line_rate: u32) -> Option<(u32, f32)> {
    if prescaler == 0 || line_rate == 0 {
        return None;
    }
    let counts_per_second = f_timer as f64 / prescaler as f64;
    let counts = round(counts_per_second / line_rate as f64);
    if counts < 1.0 {
        return None;
    }
    let tick_us = counts * MICROSECONDS_PER_SECOND as f64 / counts_per_second;
    Some((counts as u32, tick_us as f32))
}

/// Compile-time timer compare value calculator.
///
/// Integer arithmetic only, rounding to the nearest count. `None` in the same
/// cases as [`compute_period_counts`].
///
/// ```rust
/// const COUNTS: Option<u32> = micrf114::timer::const_period_counts(16_000_000, 64, 2_000);
/// assert_eq!(COUNTS, Some(125));
/// assert_eq!(micrf114::timer::const_period_counts(16_000_000, 64, 0), None);
/// ```
pub const fn const_period_counts(f_timer: u32, prescaler: u32, line_rate: u32) -> Option<u32> {
    let divisor = prescaler as u64 * line_rate as u64;
    if divisor == 0 {
        return None;
    }
    // Never above f_timer, so the narrowing is lossless.
    match ((f_timer as u64 + divisor / 2) / divisor) as u32 {
        0 => None,
        counts => Some(counts),
    }
}

/// Relative timing error of a rounded period, in parts per million.
///
/// Receivers typically tolerate a few percent; anything above that calls for a
/// different prescaler. `None` where [`compute_period_counts`] has no answer.
pub fn period_error_ppm(f_timer: u32, prescaler: u32, line_rate: u32) -> Option<i32> {
    let (_, tick_us) = compute_period_counts(f_timer, prescaler, line_rate)?;
    let ideal_us = MICROSECONDS_PER_SECOND as f64 / line_rate as f64;
    Some(round((tick_us as f64 - ideal_us) / ideal_us * 1e6) as i32)
}
