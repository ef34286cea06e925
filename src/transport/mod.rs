use std::io;
use std::time::Duration;

#[cfg(feature = "serial")]
pub mod serial;

/// A byte-oriented channel to the rig.
///
/// Implementors provide synchronous, blocking access to a serial-like
/// connection. The driver issues at most one command at a time and reads
/// its reply to completion before the next call, so no internal buffering
/// of replies is required.
pub trait Transport: Send {
    /// Write all bytes to the channel.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Flush any buffered output.
    fn flush(&mut self) -> io::Result<()>;

    /// Discard any unread inbound bytes.
    ///
    /// Called before a status query so stale or unsolicited data cannot
    /// be mistaken for the reply.
    fn discard_input(&mut self) -> io::Result<()>;

    /// Read bytes into the buffer. Returns the number of bytes read.
    /// Should return `Ok(0)` or `Err(TimedOut)` on timeout, not block forever.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Set the read timeout for subsequent `read()` calls.
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;
}
