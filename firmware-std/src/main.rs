//! VESC Express — ESP-IDF std firmware
//!
//! Thread-based counterpart of the no_std Embassy firmware: runs the board
//! init hook, opens the communication UART through esp-idf-svc and writes
//! the board description plus periodic status lines as NDJSON.

use std::thread;
use std::time::{Duration, Instant};

use esp_idf_svc::hal::gpio::AnyIOPin;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{self, UartDriver};
use esp_idf_svc::hal::units::Hertz;

use vesc_express::protocol::{self, DeviceMessage, VERSION};
use vesc_express::{board, hwconf};

// Only UART0 is wired up below.
const _: () = assert!(board::UART_NUM == 0, "firmware only drives UART0");

#[cfg(feature = "devkit-c6")]
const _: () = assert!(board::UART_TX == 16 && board::UART_RX == 17);
#[cfg(all(feature = "devkit-s3", not(feature = "devkit-c6")))]
const _: () = assert!(board::UART_TX == 43 && board::UART_RX == 44);

/// Time between status lines
const STATUS_INTERVAL: Duration = Duration::from_secs(30);

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();

    // Bind the ESP-IDF logger to the `log` facade
    esp_idf_svc::log::EspLogger::initialize_default();

    let boot = Instant::now();

    log::info!(
        "VESC Express v{} starting on {} ({}, std)",
        VERSION,
        board::HW_NAME,
        board::HW_TARGET
    );

    if let Err(e) = board::ACTIVE.validate() {
        log::error!("Board config invalid: {}", e);
    }

    board::hw_init_hook();

    if let Some(can) = board::ACTIVE.can {
        log::info!("CAN pins: TX GPIO{} RX GPIO{}", can.tx, can.rx);
    }
    log::info!("{} boards known to this build", hwconf::BOARDS.len());

    if !board::HW_UART_COMM {
        log::info!("Board has no UART comm, idle");
        return Ok(());
    }

    // ── Communication UART ───────────────────────────────────────────

    let peripherals = Peripherals::take()?;

    #[cfg(feature = "devkit-c6")]
    let (uart_tx, uart_rx) = (peripherals.pins.gpio16, peripherals.pins.gpio17);
    #[cfg(all(feature = "devkit-s3", not(feature = "devkit-c6")))]
    let (uart_tx, uart_rx) = (peripherals.pins.gpio43, peripherals.pins.gpio44);

    let config = uart::config::Config::default().baudrate(Hertz(board::UART_BAUDRATE));
    let comm = UartDriver::new(
        peripherals.uart0,
        uart_tx,
        uart_rx,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &config,
    )?;

    log::info!(
        "UART{} up at {} baud (TX GPIO{}, RX GPIO{})",
        board::UART_NUM,
        board::UART_BAUDRATE,
        board::UART_TX,
        board::UART_RX
    );

    send(&comm, &DeviceMessage::hw_info(board::ACTIVE))?;

    // ── Status thread ────────────────────────────────────────────────

    let status = thread::Builder::new()
        .name("status".into())
        .stack_size(4096)
        .spawn(move || status_thread(comm, boot))?;
    log::info!("Status thread spawned");

    if status.join().is_err() {
        anyhow::bail!("status thread panicked");
    }
    Ok(())
}

fn status_thread(comm: UartDriver<'static>, boot: Instant) {
    loop {
        thread::sleep(STATUS_INTERVAL);

        let msg = DeviceMessage::Status {
            uptime: boot.elapsed().as_secs() as u32,
            board: board::HW_NAME,
            version: VERSION,
        };
        if let Err(e) = send(&comm, &msg) {
            log::error!("Status write failed: {}", e);
        }
    }
}

/// Serialize a message and write it out in full.
fn send(comm: &UartDriver<'_>, msg: &DeviceMessage) -> anyhow::Result<()> {
    let buf = protocol::to_buffer(msg)
        .ok_or_else(|| anyhow::anyhow!("message did not fit in {} bytes", protocol::MAX_MSG_LEN))?;

    let mut rest = &buf[..];
    while !rest.is_empty() {
        let n = comm.write(rest)?;
        rest = &rest[n..];
    }
    Ok(())
}
