//! Moonlight - Climbing Wall LED Firmware
//!
//! Main firmware binary for RP2040 boards behind a MoonBoard-style wall.
//! The companion app sends the current problem over a BLE serial module;
//! every hold in it is lit in its type's color on a WS2812 strip.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::Pio;
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{with_timeout, Delay, Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use moonlight_core::{color_sweep, set_device_name, HoldRegistry, SWEEP_STEP_MS};
use moonlight_hal::LinkStatus;
use moonlight_hal_rp2040::{BleUart, PioStrip};

use crate::channels::RENDER_STATUS;
use crate::wall::{WallStrip, AUXILIARY_LED_OFFSET, PALETTE, PRIMARY_LED_INDEX};

mod channels;
mod observer;
mod tasks;
mod wall;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Lookup tables are referenced by the link task for its whole life
static REGISTRY: StaticCell<HoldRegistry<'static>> = StaticCell::new();

/// Delay between BLE setup attempts
const BLE_RETRY_SECS: u64 = 1;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Moonlight firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let registry = REGISTRY.init(unwrap!(HoldRegistry::new(
        &PRIMARY_LED_INDEX,
        &AUXILIARY_LED_OFFSET,
        PALETTE
    )));
    info!(
        "Wall layout: {} holds on {} LEDs",
        registry.hold_count(),
        wall::PIXEL_COUNT
    );

    // Setup PIO0 for the WS2812 strip on GPIO22
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let driver = PioWs2812::with_color_order(&mut common, sm0, p.DMA_CH0, p.PIN_22, &program);
    let mut strip: WallStrip = PioStrip::new(driver);
    info!("WS2812 strip initialized");

    // Power-on self test
    let colors = PALETTE.startup_colors();
    if let Err(e) = color_sweep(&mut strip, &mut Delay, &colors, SWEEP_STEP_MS).await {
        warn!("Startup sweep failed: {:?}", e);
    }

    // Setup UART for the BLE module
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = wall::LINK.baudrate;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    let state = Input::new(p.PIN_2, Pull::Down);

    let mut link = BleUart::new(rx, tx, state);
    info!("UART initialized at {} baud", wall::LINK.baudrate);

    // The app cannot find the wall without its name, so nothing runs until
    // the module accepts it
    loop {
        match set_device_name(&mut link, &mut Delay, &wall::LINK).await {
            Ok(()) => {
                info!("BLE module advertising as \"{}\"", wall::LINK.device_name);
                break;
            }
            Err(e) => {
                error!("BLE setup failed: {:?}, retrying", e);
                Timer::after_secs(BLE_RETRY_SECS).await;
            }
        }
    }

    info!("Waiting for the app to connect...");
    while !link.is_connected() {
        if with_timeout(Duration::from_secs(1), link.wait_connected())
            .await
            .is_err()
        {
            trace!("Still waiting for a connection");
        }
    }
    info!("App connected");

    spawner.spawn(tasks::link_task(link, strip, registry)).unwrap();

    info!("Link task spawned, firmware running");

    // Main task only reports progress; all work happens in the link task
    loop {
        Timer::after_secs(60).await;
        match RENDER_STATUS.try_take() {
            Some(status) => info!(
                "Heartbeat: {} problems shown, last {:?}",
                status.total, status.last
            ),
            None => trace!("Main loop heartbeat"),
        }
    }
}
