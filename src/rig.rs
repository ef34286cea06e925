use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use crate::bcd;
use crate::command::{CMD_LENGTH, CmdIndex, CmdSeq, NATIVE_CMD_COUNT, NATIVE_CMD_SET};
use crate::error::{CatError, Result};
use crate::frequency::Frequency;
use crate::mode::{Bandwidth, Mode};
use crate::status::{CacheSlot, RxStatus, StatusKind, TxStatus};
use crate::transport::Transport;

/// Largest clarifier offset the rig accepts, in Hz.
pub const MAX_RIT_HZ: i32 = 9_990;

/// A VFO selector.
///
/// The command set cannot address a specific VFO; every operation acts on
/// whichever VFO is currently selected. `A` and `B` exist so a caller can
/// state its intent, but any operation handed one of them fails with
/// [`CatError::VfoNotTargetable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vfo {
    Current,
    A,
    B,
}

impl fmt::Display for Vfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current VFO"),
            Self::A => write!(f, "VFO A"),
            Self::B => write!(f, "VFO B"),
        }
    }
}

/// Repeater shift direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeaterShift {
    Simplex,
    Minus,
    Plus,
}

/// Power state requested through [`Rig::set_power`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
    /// Accepted by the API for completeness; the hardware has no standby.
    Standby,
}

/// Configuration for a rig session.
#[derive(Debug, Clone)]
pub struct RigConfig {
    /// Read and check the one-byte acknowledgment after each command.
    ///
    /// Depending on firmware, the rig either answers every command with
    /// an ack byte or accepts it silently after a settling delay. The two
    /// behaviors are mutually exclusive: enable this (and zero
    /// `post_write_delay`) for firmware that acks.
    pub read_ack: bool,
    /// How long a cached status reply stays fresh.
    pub cache_timeout: Duration,
    /// Delay between individual frame bytes, for slow CAT interfaces
    /// that drop back-to-back bytes. Zero writes the frame in one block.
    pub write_delay: Duration,
    /// Settling delay after each complete frame.
    pub post_write_delay: Duration,
    /// Overall timeout for reading a reply.
    pub timeout: Duration,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            read_ack: false,
            cache_timeout: Duration::from_millis(500),
            write_delay: Duration::ZERO,
            post_write_delay: Duration::from_millis(300),
            timeout: Duration::from_millis(3000),
        }
    }
}

/// A session with the rig over its CAT interface.
///
/// Owns the byte channel, a private working copy of the native command
/// set, and the three status caches. One instance per attached rig;
/// operations are strictly sequential, so a multi-threaded embedding must
/// wrap the session in its own mutual exclusion.
pub struct Rig {
    transport: Box<dyn Transport>,
    config: RigConfig,
    /// Working copy of [`NATIVE_CMD_SET`]; the canonical table is never
    /// mutated.
    pcs: [CmdSeq; NATIVE_CMD_COUNT],
    fm_status: CacheSlot<CMD_LENGTH>,
    rx_status: CacheSlot<1>,
    tx_status: CacheSlot<1>,
}

impl Rig {
    /// Create a session over an already-opened transport.
    pub fn new(transport: Box<dyn Transport>, config: RigConfig) -> Self {
        Self {
            transport,
            config,
            pcs: NATIVE_CMD_SET,
            fm_status: CacheSlot::new(),
            rx_status: CacheSlot::new(),
            tx_status: CacheSlot::new(),
        }
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    fn ensure_current(vfo: Vfo) -> Result<()> {
        match vfo {
            Vfo::Current => Ok(()),
            other => Err(CatError::VfoNotTargetable(other)),
        }
    }

    // --- Dispatcher ---

    /// Write one frame, honoring the configured byte and frame delays.
    fn write_frame(&mut self, frame: &[u8; CMD_LENGTH]) -> Result<()> {
        trace!("TX: {:02X?}", frame);
        if self.config.write_delay.is_zero() {
            self.transport.write_all(frame)?;
        } else {
            for byte in frame {
                self.transport.write_all(std::slice::from_ref(byte))?;
                std::thread::sleep(self.config.write_delay);
            }
        }
        self.transport.flush()?;
        if !self.config.post_write_delay.is_zero() {
            std::thread::sleep(self.config.post_write_delay);
        }
        Ok(())
    }

    /// Read and check the one-byte acknowledgment, when configured.
    fn read_ack(&mut self) -> Result<()> {
        if !self.config.read_ack {
            return Ok(());
        }
        let mut ack = [0u8; 1];
        self.read_exact(&mut ack)?;
        debug!("ack received ({:#04x})", ack[0]);
        if ack[0] != 0 {
            return Err(CatError::Rejected(ack[0]));
        }
        Ok(())
    }

    /// Send a complete command sequence and handle its acknowledgment.
    fn send_cmd(&mut self, index: CmdIndex) -> Result<()> {
        let cmd = self.pcs[index as usize];
        if !cmd.complete {
            return Err(CatError::Internal("incomplete sequence sent as complete"));
        }
        self.write_frame(&cmd.seq)?;
        self.read_ack()
    }

    /// Complete an incomplete command sequence with parameter bytes and
    /// send it. The template's opcode byte is preserved; the parameter
    /// bytes replace the rest of the frame.
    fn send_icmd(&mut self, index: CmdIndex, data: [u8; CMD_LENGTH - 1]) -> Result<()> {
        let cmd = self.pcs[index as usize];
        if cmd.complete {
            return Err(CatError::Internal("complete sequence sent as incomplete"));
        }
        let mut frame = [0u8; CMD_LENGTH];
        frame[..CMD_LENGTH - 1].copy_from_slice(&data);
        frame[CMD_LENGTH - 1] = cmd.seq[CMD_LENGTH - 1];
        self.write_frame(&frame)?;
        self.read_ack()
    }

    /// Read exactly `buf.len()` bytes within the configured timeout.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let deadline = Instant::now() + self.config.timeout;
        let mut filled = 0;

        while filled < buf.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(CatError::Io(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("short reply: {filled} of {} bytes", buf.len()),
                )));
            }
            self.transport
                .set_read_timeout(remaining.min(Duration::from_millis(100)))?;

            match self.transport.read(&mut buf[filled..]) {
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(e) => return Err(CatError::Io(e)),
            }
        }

        trace!("RX: {:02X?}", &buf[..filled]);
        Ok(())
    }

    // --- Status cache ---

    fn slot_is_stale(&self, kind: StatusKind) -> bool {
        let max_age = self.config.cache_timeout;
        match kind {
            StatusKind::FreqMode => self.fm_status.is_stale(max_age),
            StatusKind::Rx => self.rx_status.is_stale(max_age),
            StatusKind::Tx => self.tx_status.is_stale(max_age),
        }
    }

    /// Query one status from the rig and refresh its cache slot.
    ///
    /// The inbound buffer is discarded first so stale bytes cannot be
    /// taken for the reply. The slot is only overwritten on a fully
    /// successful round-trip; on failure the previous reading survives.
    fn refresh_status(&mut self, kind: StatusKind) -> Result<()> {
        let cmd = self.pcs[kind.query() as usize];

        self.transport.discard_input()?;
        self.write_frame(&cmd.seq)?;

        let len = kind.reply_len();
        let mut reply = [0u8; CMD_LENGTH];
        self.read_exact(&mut reply[..len])?;

        match kind {
            StatusKind::FreqMode => self.fm_status.fill(reply),
            StatusKind::Rx => self.rx_status.fill([reply[0]]),
            StatusKind::Tx => self.tx_status.fill([reply[0]]),
        }
        Ok(())
    }

    /// Ensure `kind`'s cache slot is fresh, querying the rig if needed.
    fn get_status(&mut self, kind: StatusKind) -> Result<()> {
        if self.slot_is_stale(kind) {
            debug!("{kind:?} cache stale, refreshing");
            self.refresh_status(kind)
        } else {
            debug!("{kind:?} cache fresh");
            Ok(())
        }
    }

    // --- Read operations ---

    /// Read the operating frequency of the current VFO.
    pub fn get_frequency(&mut self, vfo: Vfo) -> Result<Frequency> {
        Self::ensure_current(vfo)?;
        self.get_status(StatusKind::FreqMode)?;

        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.fm_status.data[..4]);
        Frequency::from_cat_bytes(raw)
    }

    /// Read the operating mode and passband width of the current VFO.
    ///
    /// Mode bytes the rig is not known to produce decode as `None`
    /// rather than an error.
    pub fn get_mode(&mut self, vfo: Vfo) -> Result<(Option<Mode>, Bandwidth)> {
        Self::ensure_current(vfo)?;
        self.get_status(StatusKind::FreqMode)?;
        Ok(Mode::from_status_byte(self.fm_status.data[4]))
    }

    /// Read whether the transmitter is keyed.
    pub fn get_ptt(&mut self, vfo: Vfo) -> Result<bool> {
        Self::ensure_current(vfo)?;
        self.get_status(StatusKind::Tx)?;
        Ok(TxStatus(self.tx_status.data[0]).ptt_on())
    }

    /// Read the carrier-detect (squelch open) state.
    pub fn get_dcd(&mut self, vfo: Vfo) -> Result<bool> {
        Self::ensure_current(vfo)?;
        self.get_status(StatusKind::Rx)?;
        Ok(RxStatus(self.rx_status.data[0]).squelch_open())
    }

    /// Read the S-meter as signal strength in dB relative to S9.
    ///
    /// The meter counts 6 dB per S-unit below S9 and 10 dB per step
    /// above it.
    pub fn get_signal_strength(&mut self, vfo: Vfo) -> Result<i32> {
        Self::ensure_current(vfo)?;
        self.get_status(StatusKind::Rx)?;

        let n = i32::from(RxStatus(self.rx_status.data[0]).s_meter_raw()) - 9;
        Ok(n * if n > 0 { 10 } else { 6 })
    }

    /// Read the raw S-meter value (0–15).
    pub fn get_raw_signal_strength(&mut self, vfo: Vfo) -> Result<u8> {
        Self::ensure_current(vfo)?;
        self.get_status(StatusKind::Rx)?;
        Ok(RxStatus(self.rx_status.data[0]).s_meter_raw())
    }

    /// Read the relative power meter as a fraction (0.0–1.0).
    ///
    /// Only meaningful while transmitting; reads 0.0 when PTT is off.
    pub fn get_power_meter(&mut self, vfo: Vfo) -> Result<f32> {
        Self::ensure_current(vfo)?;
        self.get_status(StatusKind::Tx)?;

        let tx = TxStatus(self.tx_status.data[0]);
        if tx.ptt_on() {
            Ok(f32::from(tx.power_meter_raw()) / 15.0)
        } else {
            Ok(0.0)
        }
    }

    // --- Set operations ---

    /// Tune the current VFO. The rig's step is 10 Hz; the value is
    /// rounded to the nearest step.
    pub fn set_frequency(&mut self, vfo: Vfo, freq: Frequency) -> Result<()> {
        Self::ensure_current(vfo)?;
        debug!("set frequency {freq}");
        self.send_icmd(CmdIndex::SetFreq, freq.to_cat_bytes()?)
    }

    /// Set the operating mode of the current VFO.
    ///
    /// Wideband FM cannot be commanded, the rig selects it from the
    /// band. The width argument is accepted for symmetry with
    /// [`Rig::get_mode`], but the hardware couples the passband to the
    /// mode command itself (`FmNarrow` is the one narrow mode with its
    /// own sequence).
    pub fn set_mode(&mut self, vfo: Vfo, mode: Mode, _width: Bandwidth) -> Result<()> {
        Self::ensure_current(vfo)?;
        let index = match mode {
            Mode::Lsb => CmdIndex::SetModeLsb,
            Mode::Usb => CmdIndex::SetModeUsb,
            Mode::Cw => CmdIndex::SetModeCw,
            Mode::Cwr => CmdIndex::SetModeCwr,
            Mode::Am => CmdIndex::SetModeAm,
            Mode::Fm => CmdIndex::SetModeFm,
            Mode::FmNarrow => CmdIndex::SetModeFmNarrow,
            Mode::Rtty => CmdIndex::SetModeDig,
            Mode::PktFm => CmdIndex::SetModePkt,
            Mode::Wfm => {
                return Err(CatError::InvalidArgument(
                    "wideband FM is selected by band, not by command",
                ));
            }
        };
        self.send_cmd(index)
    }

    /// Key or unkey the transmitter.
    ///
    /// Some firmware revisions reject a redundant PTT command; that
    /// rejection is not an error.
    pub fn set_ptt(&mut self, vfo: Vfo, ptt: bool) -> Result<()> {
        Self::ensure_current(vfo)?;
        let index = if ptt { CmdIndex::PttOn } else { CmdIndex::PttOff };
        match self.send_cmd(index) {
            Err(CatError::Rejected(ack)) => {
                warn!("rig rejected redundant PTT command (ack {ack:#04x})");
                Ok(())
            }
            other => other,
        }
    }

    /// Lock or unlock the front panel and dial.
    pub fn set_lock(&mut self, vfo: Vfo, on: bool) -> Result<()> {
        Self::ensure_current(vfo)?;
        self.send_cmd(if on { CmdIndex::LockOn } else { CmdIndex::LockOff })
    }

    /// Switch the CTCSS encoder on or off without touching the tone.
    pub fn set_tone_encoder(&mut self, vfo: Vfo, on: bool) -> Result<()> {
        Self::ensure_current(vfo)?;
        self.send_cmd(if on {
            CmdIndex::CtcssEncOn
        } else {
            CmdIndex::CtcssDcsOff
        })
    }

    /// Switch CTCSS tone squelch on or off without touching the tone.
    pub fn set_tone_squelch(&mut self, vfo: Vfo, on: bool) -> Result<()> {
        Self::ensure_current(vfo)?;
        self.send_cmd(if on {
            CmdIndex::CtcssOn
        } else {
            CmdIndex::CtcssDcsOff
        })
    }

    /// Encode a tone or code value into the dual-field parameter layout.
    ///
    /// The rig has no independent encoder and decoder values, so the
    /// same four BCD digits fill both halves.
    fn tone_data(value: u16) -> Result<[u8; 4]> {
        let mut data = [0u8; 4];
        bcd::encode_bcd_be_into(&mut data[..2], u64::from(value), 4)?;
        bcd::encode_bcd_be_into(&mut data[2..], u64::from(value), 4)?;
        Ok(data)
    }

    /// Set the CTCSS encoder tone, in tenths of a hertz (885 = 88.5 Hz)
    /// and switch the encoder on. A tone of zero switches CTCSS/DCS off.
    pub fn set_ctcss_tone(&mut self, vfo: Vfo, tone: u16) -> Result<()> {
        Self::ensure_current(vfo)?;
        debug!("set CTCSS tone ({:.1} Hz)", f64::from(tone) / 10.0);

        if tone == 0 {
            return self.send_cmd(CmdIndex::CtcssDcsOff);
        }
        self.send_icmd(CmdIndex::SetCtcssTone, Self::tone_data(tone)?)?;
        self.send_cmd(CmdIndex::CtcssEncOn)
    }

    /// Set the CTCSS squelch tone, in tenths of a hertz, and switch tone
    /// squelch on. A tone of zero switches CTCSS/DCS off.
    pub fn set_ctcss_sql(&mut self, vfo: Vfo, tone: u16) -> Result<()> {
        Self::ensure_current(vfo)?;
        debug!("set CTCSS squelch ({:.1} Hz)", f64::from(tone) / 10.0);

        if tone == 0 {
            return self.send_cmd(CmdIndex::CtcssDcsOff);
        }
        self.send_icmd(CmdIndex::SetCtcssTone, Self::tone_data(tone)?)?;
        self.send_cmd(CmdIndex::CtcssOn)
    }

    /// Set the DCS code for the encoder. A code of zero switches
    /// CTCSS/DCS off.
    ///
    /// The rig has no separate DCS-encoder-enable command; writing the
    /// code is all the protocol offers.
    pub fn set_dcs_code(&mut self, vfo: Vfo, code: u16) -> Result<()> {
        Self::ensure_current(vfo)?;
        debug!("set DCS code ({code})");

        if code == 0 {
            return self.send_cmd(CmdIndex::CtcssDcsOff);
        }
        self.send_icmd(CmdIndex::SetDcsCode, Self::tone_data(code)?)
    }

    /// Set the DCS squelch code and switch DCS on. A code of zero
    /// switches CTCSS/DCS off.
    pub fn set_dcs_sql(&mut self, vfo: Vfo, code: u16) -> Result<()> {
        Self::ensure_current(vfo)?;
        debug!("set DCS squelch ({code})");

        if code == 0 {
            return self.send_cmd(CmdIndex::CtcssDcsOff);
        }
        self.send_icmd(CmdIndex::SetDcsCode, Self::tone_data(code)?)?;
        self.send_cmd(CmdIndex::DcsOn)
    }

    /// Set the repeater shift direction.
    ///
    /// Takes effect only in FM mode, though the rig accepts the command
    /// in any mode.
    pub fn set_rptr_shift(&mut self, vfo: Vfo, shift: RepeaterShift) -> Result<()> {
        Self::ensure_current(vfo)?;
        let index = match shift {
            RepeaterShift::Simplex => CmdIndex::RptShiftSimplex,
            RepeaterShift::Minus => CmdIndex::RptShiftMinus,
            RepeaterShift::Plus => CmdIndex::RptShiftPlus,
        };
        self.send_cmd(index)
    }

    /// Set the repeater offset, in Hz (10 Hz resolution).
    pub fn set_rptr_offset(&mut self, vfo: Vfo, offset_hz: u64) -> Result<()> {
        Self::ensure_current(vfo)?;
        debug!("set repeater offset {offset_hz} Hz");

        let mut data = [0u8; 4];
        bcd::encode_bcd_be_into(&mut data, offset_hz / 10, 8)?;
        self.send_icmd(CmdIndex::SetRptOffset, data)
    }

    /// Set the clarifier (RIT) offset, in Hz. Range ±[`MAX_RIT_HZ`],
    /// 10 Hz steps.
    ///
    /// Writing the offset also switches the clarifier on (off for zero).
    /// The rig rejects a repeated on/off command, so that half is
    /// best-effort; only the offset write itself reports errors.
    pub fn set_rit(&mut self, vfo: Vfo, rit_hz: i32) -> Result<()> {
        Self::ensure_current(vfo)?;
        debug!("set clarifier {rit_hz} Hz");

        if rit_hz.abs() > MAX_RIT_HZ {
            return Err(CatError::InvalidArgument(
                "clarifier offset beyond +/-9990 Hz",
            ));
        }

        let mut data = [0u8; 4];
        data[0] = if rit_hz < 0 { 0xFF } else { 0x00 };
        data[1] = 0x00;
        bcd::encode_bcd_be_into(&mut data[2..], u64::from(rit_hz.unsigned_abs()) / 10, 4)?;
        self.send_icmd(CmdIndex::SetClarFreq, data)?;

        let housekeeping = if rit_hz == 0 {
            CmdIndex::ClarOff
        } else {
            CmdIndex::ClarOn
        };
        if let Err(e) = self.send_cmd(housekeeping) {
            warn!("clarifier on/off ignored: {e}");
        }
        Ok(())
    }

    /// Switch split operation on or off.
    ///
    /// `tx_vfo` records the caller's intent only; the command set has no
    /// addressable split target, so it is ignored. A rejected command
    /// (split already in the requested state) is not an error.
    pub fn set_split(&mut self, split: bool, _tx_vfo: Vfo) -> Result<()> {
        let index = if split {
            CmdIndex::SplitOn
        } else {
            CmdIndex::SplitOff
        };
        match self.send_cmd(index) {
            Err(CatError::Rejected(ack)) => {
                warn!("rig rejected split command (ack {ack:#04x})");
                Ok(())
            }
            other => other,
        }
    }

    /// Switch the rig on or off. The hardware has no standby state.
    ///
    /// Power-on is preceded by the wake sequence; a rig that is already
    /// awake ignores it, so its outcome is not reported.
    pub fn set_power(&mut self, state: PowerState) -> Result<()> {
        match state {
            PowerState::On => {
                if let Err(e) = self.send_cmd(CmdIndex::PwrWakeup) {
                    debug!("wake sequence ignored: {e}");
                }
                self.send_cmd(CmdIndex::PwrOn)
            }
            PowerState::Off => self.send_cmd(CmdIndex::PwrOff),
            PowerState::Standby => {
                Err(CatError::InvalidArgument("rig has no standby state"))
            }
        }
    }

    /// Swap between VFO A and B.
    pub fn toggle_vfo(&mut self) -> Result<()> {
        self.send_cmd(CmdIndex::ToggleVfo)
    }
}
