//! BLE module setup
//!
//! The serial BLE module is configured with AT commands before the app can
//! find the wall. Only the advertised name is set. The module answers with
//! `OK` (HM-10 style modules append `+Set:<name>`) or `ERROR`.
//!
//! Everything the module says is drained before returning, so no part of
//! the reply is left in the receive buffer for the problem parser.

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;
use moonlight_hal::{LinkConfig, LinkError, LinkRx, LinkTx};

/// How long the module may take to start answering
pub const REPLY_TIMEOUT_MS: u32 = 500;

/// Quiet time after which the reply is considered complete
pub const REPLY_IDLE_MS: u32 = 50;

const REPLY_CAPACITY: usize = 32;

/// Set the name the module advertises
///
/// Sends the name command from `config`, waits for the acknowledgement and
/// then discards whatever else the module sends until the link goes quiet
/// for [`REPLY_IDLE_MS`].
pub async fn set_device_name<L, D>(link: &mut L, delay: &mut D, config: &LinkConfig) -> Result<(), LinkError>
where
    L: LinkRx + LinkTx,
    D: DelayNs,
{
    let command = config.name_command()?;
    link.write_all(command.as_bytes()).await?;

    match select(read_ack(link), delay.delay_ms(REPLY_TIMEOUT_MS)).await {
        Either::First(result) => result?,
        Either::Second(()) => return Err(LinkError::Timeout),
    }

    drain(link, delay).await
}

/// Read until the reply contains `OK` or `ERROR`
async fn read_ack<L: LinkRx>(link: &mut L) -> Result<(), LinkError> {
    let mut reply: Vec<u8, REPLY_CAPACITY> = Vec::new();
    let mut buf = [0u8; REPLY_CAPACITY];

    loop {
        let n = link.read(&mut buf).await?;
        if reply.extend_from_slice(&buf[..n]).is_err() {
            return Err(LinkError::Rejected);
        }
        if contains(&reply, b"OK") {
            return Ok(());
        }
        if contains(&reply, b"ERR") {
            return Err(LinkError::Rejected);
        }
    }
}

async fn drain<L: LinkRx, D: DelayNs>(link: &mut L, delay: &mut D) -> Result<(), LinkError> {
    let mut buf = [0u8; REPLY_CAPACITY];
    loop {
        match select(link.read(&mut buf), delay.delay_ms(REPLY_IDLE_MS)).await {
            Either::First(result) => {
                result?;
            }
            Either::Second(()) => return Ok(()),
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
