use thiserror::Error;

use crate::rig::Vfo;

pub type Result<T> = std::result::Result<T, CatError>;

#[derive(Debug, Error)]
pub enum CatError {
    #[cfg(feature = "serial")]
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rig rejected command (ack byte {0:#04x})")]
    Rejected(u8),

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("rig cannot target {0}; only the current VFO is addressable")]
    VfoNotTargetable(Vfo),

    #[error("driver bug: {0}")]
    Internal(&'static str),

    #[error("invalid BCD data: {0:#04x}")]
    InvalidBcd(u8),

    #[error("value {value} does not fit in {digits} BCD digits")]
    BcdOverflow { value: u64, digits: u32 },

    #[error("frequency out of range: {0} Hz")]
    FrequencyOutOfRange(u64),
}
