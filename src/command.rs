/// Length in bytes of every CAT command frame and of the frequency+mode
/// status reply.
pub const CMD_LENGTH: usize = 5;

/// Number of entries in the native command set.
pub const NATIVE_CMD_COUNT: usize = 36;

/// One native command template.
///
/// Complete sequences can be written to the rig as-is. Incomplete
/// sequences carry only the opcode in their final byte; the first four
/// bytes must be overwritten with parameter data before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmdSeq {
    pub complete: bool,
    pub seq: [u8; CMD_LENGTH],
}

const fn complete(seq: [u8; CMD_LENGTH]) -> CmdSeq {
    CmdSeq { complete: true, seq }
}

const fn incomplete(seq: [u8; CMD_LENGTH]) -> CmdSeq {
    CmdSeq { complete: false, seq }
}

/// Index into the native command set.
///
/// The discriminants are positions in [`NATIVE_CMD_SET`]; the two must
/// stay in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum CmdIndex {
    LockOn = 0,
    LockOff,
    PttOn,
    PttOff,
    SetFreq,
    SetModeLsb,
    SetModeUsb,
    SetModeCw,
    SetModeCwr,
    SetModeAm,
    SetModeFm,
    SetModeFmNarrow,
    SetModeDig,
    SetModePkt,
    ClarOn,
    ClarOff,
    SetClarFreq,
    ToggleVfo,
    SplitOn,
    SplitOff,
    RptShiftMinus,
    RptShiftPlus,
    RptShiftSimplex,
    SetRptOffset,
    DcsOn,
    CtcssOn,
    CtcssEncOn,
    CtcssDcsOff,
    SetCtcssTone,
    SetDcsCode,
    GetRxStatus,
    GetTxStatus,
    GetFreqModeStatus,
    PwrWakeup,
    PwrOn,
    PwrOff,
}

/// The rig's native command set.
///
/// Read-only; each [`Rig`](crate::rig::Rig) takes a private working copy
/// at construction so the canonical table is never mutated. Byte 4 of
/// every sequence is the opcode.
pub static NATIVE_CMD_SET: [CmdSeq; NATIVE_CMD_COUNT] = [
    complete([0x00, 0x00, 0x00, 0x00, 0x00]),   // lock on
    complete([0x00, 0x00, 0x00, 0x00, 0x80]),   // lock off
    complete([0x00, 0x00, 0x00, 0x00, 0x08]),   // ptt on
    complete([0x00, 0x00, 0x00, 0x01, 0x88]),   // ptt off
    incomplete([0x00, 0x00, 0x00, 0x00, 0x01]), // set freq
    complete([0x00, 0x00, 0x00, 0x00, 0x07]),   // mode set LSB
    complete([0x01, 0x00, 0x00, 0x00, 0x07]),   // mode set USB
    complete([0x02, 0x00, 0x00, 0x00, 0x07]),   // mode set CW
    complete([0x03, 0x00, 0x00, 0x00, 0x07]),   // mode set CWR
    complete([0x04, 0x00, 0x00, 0x00, 0x07]),   // mode set AM
    complete([0x08, 0x00, 0x00, 0x00, 0x07]),   // mode set FM
    complete([0x88, 0x00, 0x00, 0x00, 0x07]),   // mode set FM-N
    complete([0x0A, 0x00, 0x00, 0x00, 0x07]),   // mode set DIG
    complete([0x0C, 0x00, 0x00, 0x00, 0x07]),   // mode set PKT
    complete([0x00, 0x00, 0x00, 0x00, 0x05]),   // clar on
    complete([0x00, 0x00, 0x00, 0x00, 0x85]),   // clar off
    incomplete([0x00, 0x00, 0x00, 0x00, 0xF5]), // set clar freq
    complete([0x00, 0x00, 0x00, 0x00, 0x81]),   // toggle VFO A/B
    complete([0x00, 0x00, 0x00, 0x00, 0x02]),   // split on
    complete([0x00, 0x00, 0x00, 0x00, 0x82]),   // split off
    complete([0x09, 0x00, 0x00, 0x00, 0x09]),   // repeater shift minus
    complete([0x49, 0x00, 0x00, 0x00, 0x09]),   // repeater shift plus
    complete([0x89, 0x00, 0x00, 0x00, 0x09]),   // repeater shift simplex
    incomplete([0x00, 0x00, 0x00, 0x00, 0xF9]), // set repeater offset
    complete([0x0A, 0x00, 0x00, 0x00, 0x0A]),   // DCS on
    complete([0x2A, 0x00, 0x00, 0x00, 0x0A]),   // CTCSS on
    complete([0x4A, 0x00, 0x00, 0x00, 0x0A]),   // CTCSS encoder on
    complete([0x8A, 0x00, 0x00, 0x00, 0x0A]),   // CTCSS/DCS off
    incomplete([0x00, 0x00, 0x00, 0x00, 0x0B]), // set CTCSS tone
    incomplete([0x00, 0x00, 0x00, 0x00, 0x0C]), // set DCS code
    complete([0x00, 0x00, 0x00, 0x00, 0xE7]),   // get RX status
    complete([0x00, 0x00, 0x00, 0x00, 0xF7]),   // get TX status
    complete([0x00, 0x00, 0x00, 0x00, 0x03]),   // get freq and mode status
    complete([0x00, 0x00, 0x00, 0x00, 0x00]),   // power-on wake sequence
    complete([0x00, 0x00, 0x00, 0x00, 0x0F]),   // power on
    complete([0x00, 0x00, 0x00, 0x00, 0x8F]),   // power off
];
