//! # micrf114
//!
//! A portable, no_std Rust driver for On-Off Keying (OOK) transmitters such as
//! the Microchip MICRF112 and MICRF114.
//!
//! The driver turns a byte payload into a bit-timed sequence of levels on the
//! transmitter's data line:
//!
//! ```text
//! [0xAA 0xAA 0xAA 0xAA] [0x3A] [Manchester(payload[0])] ... [Manchester(payload[n-1])]
//!       training        preamble     16 line bits per payload byte, MSB first
//! ```
//!
//! It is built on:
//! - `embedded-hal` traits for the data and enable lines and for delays
//! - a [`TickTimer`](timer::TickTimer) handle the driver arms and disarms per frame
//! - interrupt-safe driver access with `critical-section`
//! - `nb` for non-blocking start and completion polling
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support |
//! | `delay-loop`          | Adds `run_tx_tick_loop`, driving `tick()` from `embedded_hal::delay::DelayNs` |
//! | `timer-isr` (default) | Adds `critical_section` based global driver helpers and macros |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use micrf114::config::TxConfig;
//!
//! micrf114::init_tx_driver!(DataPin, EnablePin, Tc0);
//!
//! #[interrupt]
//! fn TC0() {
//!     micrf114::tick_tx_timer!();
//! }
//!
//! fn main() {
//!     micrf114::setup_tx_driver!(data, enable, tc0, TxConfig::default());
//!     nb::block!(micrf114::timer::global_tx_transmit(&MICRF_DRIVER, b"hello")).unwrap();
//!     while !micrf114::timer::global_tx_is_idle(&MICRF_DRIVER) {}
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - One timer interrupt per line bit; the timer period is set with
//!   [`timer::compute_period_counts`] or [`timer::const_period_counts`]
//! - `transmit()` never waits for the frame; poll `is_idle()` or block on
//!   `wait_tx_idle()`
//! - One transmission in flight per driver
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(all(test, not(feature = "std")))]
extern crate std;

#[cfg(feature = "timer-isr")]
pub use critical_section;

// Must go first so the other modules see its macros.
mod fmt;

pub mod config;
pub mod consts;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;
pub mod timer;
