/// Declares a static global `MICRF_DRIVER` instance protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `MICRF_DRIVER` suitable for use in
/// interrupt-based environments, where both the main thread and the timer ISR
/// need access to the shared driver state.
///
/// # Arguments
/// - `$data`: The concrete type of the data pin (must implement `OutputPin`)
/// - `$en`: The concrete type of the enable pin (must implement `OutputPin`)
/// - `$tmr`: The concrete type of the bit timer (must implement `TickTimer`)
///
/// # Example
/// ```rust,ignore
/// init_tx_driver!(MyDataPin, MyEnablePin, MyTimer);
/// ```
#[macro_export]
macro_rules! init_tx_driver {
    ( $data:ty, $en:ty, $tmr:ty ) => {
        /// Transmit driver shared with the bit timer interrupt.
        pub static MICRF_DRIVER: $crate::timer::GlobalTxDriver<$data, $en, $tmr> =
            $crate::timer::global_tx_driver_init();
    };
}

/// Initializes the global `MICRF_DRIVER` singleton with a new driver instance.
///
/// # Arguments
/// - `$data`: The data pin
/// - `$en`: The enable pin
/// - `$tmr`: The bit timer
/// - `$config`: Optional [`TxConfig`](crate::config::TxConfig), defaults to
///   `TxConfig::default()`
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     setup_tx_driver!(data, enable, tc0);
/// }
/// ```
///
/// # Notes
/// - Requires `init_tx_driver!` to have been used earlier in the same scope.
#[macro_export]
macro_rules! setup_tx_driver {
    ( $data:expr, $en:expr, $tmr:expr ) => {
        $crate::setup_tx_driver!($data, $en, $tmr, $crate::config::TxConfig::default())
    };
    ( $data:expr, $en:expr, $tmr:expr, $config:expr ) => {
        $crate::timer::global_tx_driver_setup(&MICRF_DRIVER, $data, $en, $tmr, $config)
    };
}

/// Calls `tick()` on the global `MICRF_DRIVER` if it has been initialized.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TC0() {
///     tick_tx_timer!();
/// }
/// ```
///
/// # Notes
/// - Safe to call before `setup_tx_driver!`; it does nothing until then.
#[macro_export]
macro_rules! tick_tx_timer {
    () => {
        $crate::timer::global_tx_timer_tick(&MICRF_DRIVER)
    };
}

#[cfg(test)]
mod tests {
    use crate::testing::{CountingTimer, RecordingPin};
    use crate::timer::{global_tx_is_idle, global_tx_transmit};

    init_tx_driver!(RecordingPin, RecordingPin, CountingTimer);

    #[test]
    fn test_macros_drive_global_driver() {
        tick_tx_timer!();
        setup_tx_driver!(
            RecordingPin::default(),
            RecordingPin::default(),
            CountingTimer::default()
        );
        global_tx_transmit(&MICRF_DRIVER, &[0xC3]).unwrap();
        for _ in 0..crate::consts::frame_line_bits(1) {
            tick_tx_timer!();
        }
        assert!(!global_tx_is_idle(&MICRF_DRIVER));
        tick_tx_timer!();
        assert!(global_tx_is_idle(&MICRF_DRIVER));
    }
}
