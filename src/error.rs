//! Errors reported to callers of the transmit API.

use thiserror::Error;

/// Reasons a transmission request is rejected.
///
/// A rejected request leaves the driver and the hardware untouched. A busy
/// transmitter is not an error: [`transmit`](crate::driver::MicrfDriver::transmit)
/// reports it as [`nb::Error::WouldBlock`].
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum TxError {
    /// The payload is empty or longer than
    /// [`MAX_PAYLOAD_LEN`](crate::consts::MAX_PAYLOAD_LEN).
    #[error("payload length must be between 1 and 255 bytes")]
    InvalidLength,
}
