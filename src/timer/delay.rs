use crate::driver::MicrfDriver;
use crate::timer::TickTimer;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// Drives the current transmission to completion with a blocking delay loop.
///
/// For targets without a spare timer interrupt. Each iteration calls `tick()`
/// then waits `tick_us`, so the effective bit period is `tick_us` plus the
/// cost of one tick; calibrate `tick_us` on the target.
///
/// # Arguments
/// - `driver`: A driver with a transmission started via `transmit()`.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `tick_us`: Delay between ticks in microseconds (e.g. 500 for 2000 line bits/s).
///
/// # Returns
/// The number of ticks issued, including the shutdown tick. Returns at once
/// with 0 if the driver is idle.
///
/// # Example
/// ```rust,ignore
/// let mut driver = MicrfDriver::new(data, enable, (), TxConfig::default());
/// driver.transmit(b"hello")?;
/// micrf114::timer::run_tx_tick_loop(&mut driver, &mut delay, 500);
/// ```
pub fn run_tx_tick_loop<D: DelayNs, DATA, EN, TMR>(
    driver: &mut MicrfDriver<DATA, EN, TMR>,
    delay: &mut D,
    tick_us: u32,
) -> u32
where
    DATA: OutputPin,
    EN: OutputPin,
    TMR: TickTimer,
{
    let mut ticks = 0;
    while !driver.is_idle() {
        driver.tick();
        delay.delay_us(tick_us);
        ticks += 1;
    }
    ticks
}

/// [`run_tx_tick_loop`] paced by the driver's own
/// [`TxConfig::line_rate`](crate::config::TxConfig::line_rate).
///
/// # Returns
/// The number of ticks issued, or `None` without ticking when the configured
/// line rate has no whole-microsecond tick (see
/// [`TxConfig::tick_us`](crate::config::TxConfig::tick_us)).
pub fn run_tx_tick_loop_at_line_rate<D: DelayNs, DATA, EN, TMR>(
    driver: &mut MicrfDriver<DATA, EN, TMR>,
    delay: &mut D,
) -> Option<u32>
where
    DATA: OutputPin,
    EN: OutputPin,
    TMR: TickTimer,
{
    let tick_us = driver.config().tick_us()?;
    Some(run_tx_tick_loop(driver, delay, tick_us))
}
