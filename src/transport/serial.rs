use std::io;
use std::time::Duration;

use log::info;

use crate::error::{CatError, Result};

use super::Transport;

/// CAT serial line settings: 8 data bits, 2 stop bits, no parity.
const DATA_BITS: serialport::DataBits = serialport::DataBits::Eight;
const STOP_BITS: serialport::StopBits = serialport::StopBits::Two;
const PARITY: serialport::Parity = serialport::Parity::None;

/// Lowest CAT baud rate the rig supports.
pub const SERIAL_RATE_MIN: u32 = 4_800;
/// Highest CAT baud rate the rig supports.
pub const SERIAL_RATE_MAX: u32 = 38_400;

/// A CAT transport backed by a native serial port.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    pub fn new(port: Box<dyn serialport::SerialPort>) -> Self {
        Self { port }
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        io::Write::write_all(&mut self.port, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::Write::flush(&mut self.port)
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.port, buf)
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port
            .set_timeout(timeout)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// Open a serial port with CAT line settings (8N2) at the given baud rate.
///
/// The rate must lie inside the rig's supported window
/// ([`SERIAL_RATE_MIN`]–[`SERIAL_RATE_MAX`]); the rig's menu offers 4800,
/// 9600 and 38400.
pub fn open_port(port_name: &str, baud_rate: u32) -> Result<SerialTransport> {
    if !(SERIAL_RATE_MIN..=SERIAL_RATE_MAX).contains(&baud_rate) {
        return Err(CatError::InvalidArgument(
            "baud rate outside the rig's 4800-38400 window",
        ));
    }

    let port = serialport::new(port_name, baud_rate)
        .data_bits(DATA_BITS)
        .stop_bits(STOP_BITS)
        .parity(PARITY)
        .timeout(Duration::from_millis(500))
        .open()
        .map_err(CatError::Serial)?;

    info!("opened {} at {} baud", port_name, baud_rate);
    Ok(SerialTransport::new(port))
}
