//! BLE link task
//!
//! Owns the session for the app connection: reads whatever the module has
//! buffered, feeds it through the parser and renders each problem before
//! looking at the next byte.

use defmt::*;

use moonlight_core::{HoldRegistry, Session, SessionError};
use moonlight_hal::LinkStatus;
use moonlight_hal_rp2040::BleUart;

use crate::channels::{RenderStatus, RENDER_STATUS};
use crate::observer::LogObserver;
use crate::wall::WallStrip;

/// Link task - parses problems from the app and lights them
#[embassy_executor::task]
pub async fn link_task(
    mut link: BleUart<'static>,
    mut strip: WallStrip,
    registry: &'static HoldRegistry<'static>,
) {
    info!("Link task started");

    let mut session = Session::new(registry);
    let mut observer = LogObserver;
    let mut connected = link.is_connected();

    loop {
        let before = session.rendered();

        match session.poll(&mut link, &mut strip, &mut observer).await {
            Ok(n) => trace!("Rendered {} problems from chunk", n),
            Err(SessionError::Link(e)) => warn!("Link read error: {:?}", e),
            Err(SessionError::Strip(e)) => warn!("Strip flush error: {:?}", e),
        }

        // The module keeps the UART open across reconnects; STATE is only logged
        if link.is_connected() != connected {
            connected = !connected;
            if connected {
                info!("App connected");
            } else {
                info!("App disconnected");
            }
        }

        if session.rendered() != before {
            RENDER_STATUS.signal(RenderStatus {
                total: session.rendered(),
                last: session.last_report(),
            });
        }
    }
}
