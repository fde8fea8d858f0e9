//! Runtime configuration for [`MicrfDriver`](crate::driver::MicrfDriver).

use crate::consts::DEFAULT_LINE_RATE;
use crate::timer::{MICROSECONDS_PER_SECOND, const_period_counts};

/// Order in which the two bytes of a 16-bit Manchester symbol go out on air.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum SymbolOrder {
    /// High byte first, so the line bit stream is MSB first end to end.
    #[default]
    HighByteFirst,
    /// Low byte first. Matches firmware that walks the symbol through a
    /// byte pointer on a little-endian MCU.
    LowByteFirst,
}

/// Transmitter settings.
///
/// ```rust
/// use micrf114::config::{SymbolOrder, TxConfig};
///
/// let config = TxConfig::default()
///     .with_enable_inverted(true)
///     .with_symbol_order(SymbolOrder::LowByteFirst);
/// assert_eq!(config.line_rate, 2_000);
/// assert_eq!(config.tick_us(), Some(500));
/// ```
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TxConfig {
    /// Whether the enable line is wired through an inverter.
    pub enable_inverted: bool,
    /// Byte order of each Manchester symbol on air.
    pub symbol_order: SymbolOrder,
    /// Line bits per second. One tick emits one line bit, so this is also the
    /// tick rate. `run_tx_tick_loop_at_line_rate` paces itself from it; a
    /// hardware timer is set up with
    /// [`compute_period_counts`](crate::timer::compute_period_counts).
    pub line_rate: u32,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            enable_inverted: false,
            symbol_order: SymbolOrder::HighByteFirst,
            line_rate: DEFAULT_LINE_RATE,
        }
    }
}

impl TxConfig {
    /// Sets the enable line polarity.
    pub fn with_enable_inverted(mut self, inverted: bool) -> Self {
        self.enable_inverted = inverted;
        self
    }

    /// Sets the on-air byte order of Manchester symbols.
    pub fn with_symbol_order(mut self, order: SymbolOrder) -> Self {
        self.symbol_order = order;
        self
    }

    /// Sets the line rate in line bits per second.
    pub fn with_line_rate(mut self, line_rate: u32) -> Self {
        self.line_rate = line_rate;
        self
    }

    /// Duration of one tick in whole microseconds, rounded to nearest.
    ///
    /// `None` when `line_rate` is zero or above 2 million line bits/s.
    pub const fn tick_us(&self) -> Option<u32> {
        const_period_counts(MICROSECONDS_PER_SECOND, 1, self.line_rate)
    }
}
