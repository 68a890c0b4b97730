//! Wireless serial link abstractions
//!
//! The companion app talks to the wall over a BLE serial link. These traits
//! cover what the firmware needs from it: a byte source, a byte sink for
//! module configuration, and the connection state.

/// Errors from link operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Writing to the link failed
    Write,
    /// Reading from the link failed (framing, overrun, ...)
    Read,
    /// No reply arrived in time
    Timeout,
    /// The module answered, but not with an acknowledgement
    Rejected,
}

/// Link receiver
///
/// Async trait for pulling inbound bytes off the link.
pub trait LinkRx {
    /// Read the bytes that are currently available
    ///
    /// Waits until at least one byte is available, then returns as many as
    /// fit in `buf` without waiting further.
    fn read(&mut self, buf: &mut [u8]) -> impl core::future::Future<Output = Result<usize, LinkError>>;
}

/// Link transmitter
///
/// Only used for module configuration; the problem protocol is inbound only.
pub trait LinkTx {
    /// Write all of `data` to the link
    fn write_all(&mut self, data: &[u8]) -> impl core::future::Future<Output = Result<(), LinkError>>;
}

/// Connection state of the link
pub trait LinkStatus {
    /// Check if a central (the app) is currently connected
    fn is_connected(&self) -> bool;
}

/// Longest name the BLE module accepts
pub const MAX_NAME_LEN: usize = 20;

/// Room for `AT+NAME`, the longest name and the line ending
pub type NameCommand = heapless::String<32>;

/// Link configuration
#[derive(Debug, Clone, Copy)]
pub struct LinkConfig {
    /// Baud rate between the MCU and the BLE module
    pub baudrate: u32,
    /// Name the module advertises
    pub device_name: &'static str,
}

impl LinkConfig {
    /// AT command that sets the advertised name
    ///
    /// Returns [`LinkError::Rejected`] for names the module would refuse:
    /// empty, longer than [`MAX_NAME_LEN`], or with non-printable characters.
    pub fn name_command(&self) -> Result<NameCommand, LinkError> {
        use core::fmt::Write as _;

        let name = self.device_name;
        if name.is_empty()
            || name.len() > MAX_NAME_LEN
            || !name.bytes().all(|b| b == b' ' || b.is_ascii_graphic())
        {
            return Err(LinkError::Rejected);
        }

        let mut command = NameCommand::new();
        write!(command, "AT+NAME{}\r\n", name).map_err(|_| LinkError::Write)?;
        Ok(command)
    }
}
