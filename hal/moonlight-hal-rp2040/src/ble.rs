//! BLE serial module on a buffered UART
//!
//! The module (HM-10 style) bridges a BLE UART service to the RP2040's UART
//! and raises its STATE pin while a central is connected. It is configured
//! with AT commands before a connection exists (see
//! `moonlight_core::set_device_name`); after that every byte on the UART is
//! application data.

use embassy_rp::gpio::Input;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use moonlight_hal::{LinkError, LinkRx, LinkStatus, LinkTx};

/// BLE serial module wired to a buffered UART and a STATE input
pub struct BleUart<'d> {
    rx: BufferedUartRx,
    tx: BufferedUartTx,
    state: Input<'d>,
}

impl<'d> BleUart<'d> {
    /// Wrap the UART halves and the STATE pin
    ///
    /// The UART must already run at the module's baud rate.
    pub fn new(rx: BufferedUartRx, tx: BufferedUartTx, state: Input<'d>) -> Self {
        Self { rx, tx, state }
    }

    /// Wait until a central connects
    ///
    /// Returns immediately if one is already connected.
    pub async fn wait_connected(&mut self) {
        self.state.wait_for_high().await;
    }
}

impl<'d> LinkRx for BleUart<'d> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        self.rx.read(buf).await.map_err(|_| LinkError::Read)
    }
}

impl<'d> LinkTx for BleUart<'d> {
    async fn write_all(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.tx.write_all(data).await.map_err(|_| LinkError::Write)?;
        self.tx.flush().await.map_err(|_| LinkError::Write)
    }
}

impl<'d> LinkStatus for BleUart<'d> {
    fn is_connected(&self) -> bool {
        self.state.is_high()
    }
}
