use std::fmt;

/// Operating mode of the rig.
///
/// `FmNarrow` can be commanded (the native set has a dedicated sequence)
/// but is never reported back; status replies show narrow FM as plain FM.
/// Wideband FM is the opposite: reported on the broadcast band but not
/// commandable, the rig selects it from the band itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Lsb,
    Usb,
    Cw,
    Cwr,
    Am,
    Wfm,
    Fm,
    FmNarrow,
    Rtty,
    PktFm,
}

/// Receive passband width reported alongside the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bandwidth {
    Normal,
    Narrow,
}

/// Mode byte values of the frequency+mode status reply.
const MODE_LSB: u8 = 0x00;
const MODE_USB: u8 = 0x01;
const MODE_CW: u8 = 0x02;
const MODE_CWR: u8 = 0x03;
const MODE_AM: u8 = 0x04;
const MODE_WFM: u8 = 0x06;
const MODE_FM: u8 = 0x08;
const MODE_RTTY: u8 = 0x0A;
const MODE_PKTFM: u8 = 0x0C;

/// Narrow-filter variants, not documented in the manual.
const MODE_CW_NARROW: u8 = 0x82;
const MODE_CWR_NARROW: u8 = 0x83;
const MODE_RTTY_NARROW: u8 = 0x8A;

impl Mode {
    /// Decode the mode byte of a frequency+mode status reply.
    ///
    /// Byte values the rig is not known to produce decode as `None` with
    /// a normal passband; they are not an error.
    pub fn from_status_byte(byte: u8) -> (Option<Mode>, Bandwidth) {
        match byte {
            MODE_LSB => (Some(Mode::Lsb), Bandwidth::Normal),
            MODE_USB => (Some(Mode::Usb), Bandwidth::Normal),
            MODE_CW => (Some(Mode::Cw), Bandwidth::Normal),
            MODE_CWR => (Some(Mode::Cwr), Bandwidth::Normal),
            MODE_AM => (Some(Mode::Am), Bandwidth::Normal),
            MODE_WFM => (Some(Mode::Wfm), Bandwidth::Normal),
            MODE_FM => (Some(Mode::Fm), Bandwidth::Normal),
            MODE_RTTY => (Some(Mode::Rtty), Bandwidth::Normal),
            MODE_PKTFM => (Some(Mode::PktFm), Bandwidth::Normal),
            MODE_CW_NARROW => (Some(Mode::Cw), Bandwidth::Narrow),
            MODE_CWR_NARROW => (Some(Mode::Cwr), Bandwidth::Narrow),
            MODE_RTTY_NARROW => (Some(Mode::Rtty), Bandwidth::Narrow),
            _ => (None, Bandwidth::Normal),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lsb => write!(f, "LSB"),
            Self::Usb => write!(f, "USB"),
            Self::Cw => write!(f, "CW"),
            Self::Cwr => write!(f, "CW-R"),
            Self::Am => write!(f, "AM"),
            Self::Wfm => write!(f, "WFM"),
            Self::Fm => write!(f, "FM"),
            Self::FmNarrow => write!(f, "FM-N"),
            Self::Rtty => write!(f, "RTTY"),
            Self::PktFm => write!(f, "PKT"),
        }
    }
}
