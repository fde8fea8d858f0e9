use crate::config::TxConfig;
use crate::driver::MicrfDriver;
use crate::error::TxError;
use crate::timer::TickTimer;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

/// A `MicrfDriver` shared between caller context and the timer interrupt.
pub type GlobalTxDriver<DATA, EN, TMR> = Mutex<RefCell<Option<MicrfDriver<DATA, EN, TMR>>>>;

/// Used to initialize the global static `MicrfDriver` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use micrf114::timer::{GlobalTxDriver, global_tx_driver_init};
/// use some_hal::{PA4, PA5, Tc0};
///
/// static MICRF_DRIVER: GlobalTxDriver<PA4, PA5, Tc0> = global_tx_driver_init();
/// ```
pub const fn global_tx_driver_init<DATA: OutputPin, EN: OutputPin, TMR: TickTimer>()
-> GlobalTxDriver<DATA, EN, TMR> {
    Mutex::new(RefCell::new(None))
}

/// Builds the driver (pins to idle, timer stopped) and stores it in the global.
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     global_tx_driver_setup(&MICRF_DRIVER, data, enable, tc0, TxConfig::default());
/// }
/// ```
pub fn global_tx_driver_setup<DATA: OutputPin, EN: OutputPin, TMR: TickTimer>(
    global_driver: &'static GlobalTxDriver<DATA, EN, TMR>,
    data: DATA,
    enable: EN,
    timer: TMR,
    config: TxConfig,
) {
    critical_section::with(|cs| {
        let _ = global_driver
            .borrow(cs)
            .replace(Some(MicrfDriver::new(data, enable, timer, config)));
    });
}

/// Runs the tick at each interrupt.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TC0() {
///     global_tx_timer_tick(&MICRF_DRIVER);
/// }
/// ```
pub fn global_tx_timer_tick<DATA: OutputPin, EN: OutputPin, TMR: TickTimer>(
    global_driver: &'static GlobalTxDriver<DATA, EN, TMR>,
) {
    critical_section::with(|cs| {
        if let Some(driver) = global_driver.borrow(cs).borrow_mut().as_mut() {
            driver.tick();
        }
    });
}

/// Starts a transmission on the global driver.
///
/// Returns `WouldBlock` while a frame is on air or before
/// [`global_tx_driver_setup`] ran, so waiting happens outside the critical
/// section:
///
/// ```rust,ignore
/// nb::block!(global_tx_transmit(&MICRF_DRIVER, b"hello"))?;
/// ```
pub fn global_tx_transmit<DATA: OutputPin, EN: OutputPin, TMR: TickTimer>(
    global_driver: &'static GlobalTxDriver<DATA, EN, TMR>,
    payload: &[u8],
) -> nb::Result<(), TxError> {
    critical_section::with(|cs| match global_driver.borrow(cs).borrow_mut().as_mut() {
        Some(driver) => driver.transmit(payload),
        None => Err(nb::Error::WouldBlock),
    })
}

/// Returns `true` when the global driver has no frame on air.
///
/// A driver that was never set up counts as idle.
pub fn global_tx_is_idle<DATA: OutputPin, EN: OutputPin, TMR: TickTimer>(
    global_driver: &'static GlobalTxDriver<DATA, EN, TMR>,
) -> bool {
    critical_section::with(|cs| {
        global_driver
            .borrow(cs)
            .borrow()
            .as_ref()
            .is_none_or(|driver| driver.is_idle())
    })
}

/// Cuts the current frame short with the tick interrupt masked.
pub fn global_tx_cancel<DATA: OutputPin, EN: OutputPin, TMR: TickTimer>(
    global_driver: &'static GlobalTxDriver<DATA, EN, TMR>,
) {
    critical_section::with(|cs| {
        if let Some(driver) = global_driver.borrow(cs).borrow_mut().as_mut() {
            driver.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::frame_line_bits;
    use crate::testing::{CountingTimer, RecordingPin};

    static DRIVER: GlobalTxDriver<RecordingPin, RecordingPin, CountingTimer> =
        global_tx_driver_init();

    fn timer_running() -> bool {
        critical_section::with(|cs| {
            DRIVER
                .borrow(cs)
                .borrow()
                .as_ref()
                .is_some_and(|driver| driver.timer.running)
        })
    }

    #[test]
    fn test_global_driver_lifecycle() {
        assert!(global_tx_is_idle(&DRIVER));
        assert_eq!(
            global_tx_transmit(&DRIVER, b"x"),
            Err(nb::Error::WouldBlock)
        );
        global_tx_timer_tick(&DRIVER);

        global_tx_driver_setup(
            &DRIVER,
            RecordingPin::default(),
            RecordingPin::default(),
            CountingTimer::default(),
            TxConfig::default(),
        );
        assert!(global_tx_is_idle(&DRIVER));
        assert_eq!(
            global_tx_transmit(&DRIVER, &[]),
            Err(nb::Error::Other(TxError::InvalidLength))
        );

        nb::block!(global_tx_transmit(&DRIVER, b"hi")).unwrap();
        assert!(!global_tx_is_idle(&DRIVER));
        assert_eq!(
            global_tx_transmit(&DRIVER, b"again"),
            Err(nb::Error::WouldBlock)
        );

        let mut ticks = 0;
        while timer_running() {
            global_tx_timer_tick(&DRIVER);
            ticks += 1;
        }
        assert_eq!(ticks, frame_line_bits(2) + 1);
        assert!(global_tx_is_idle(&DRIVER));

        global_tx_transmit(&DRIVER, b"again").unwrap();
        global_tx_timer_tick(&DRIVER);
        global_tx_cancel(&DRIVER);
        global_tx_timer_tick(&DRIVER);
        assert!(global_tx_is_idle(&DRIVER));

        critical_section::with(|cs| {
            let cell = DRIVER.borrow(cs).borrow();
            let driver = cell.as_ref().unwrap();
            assert_eq!(driver.tx_good, 1);
            assert_eq!(driver.tx_aborted, 1);
            assert_eq!(driver.timer.stops, 3);
        });
    }
}
