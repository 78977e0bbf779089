//! VESC Express — ESP32 board bring-up firmware
//!
//! Boots the board selected by cargo feature, runs its init hook and
//! announces the board on the communication UART as NDJSON, followed by a
//! periodic status line.

#![no_std]
#![no_main]

use esp_backtrace as _;

esp_bootloader_esp_idf::esp_app_desc!();

use embassy_time::{Duration, Instant, Timer};
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{self, Uart};
use esp_hal::Blocking;

use vesc_express::protocol::{self, DeviceMessage, VERSION};
use vesc_express::{board, hwconf};

#[cfg(not(any(feature = "board-devkit-c6", feature = "board-devkit-s3")))]
compile_error!("No board feature selected. Enable --features devkit-c6 or devkit-s3");

// Only UART0 is wired up below.
const _: () = assert!(board::UART_NUM == 0, "firmware only drives UART0");

// The typed GPIO peripherals picked in `main` must match the board record.
#[cfg(feature = "board-devkit-c6")]
const _: () = assert!(board::UART_TX == 16 && board::UART_RX == 17);
#[cfg(all(feature = "board-devkit-s3", not(feature = "board-devkit-c6")))]
const _: () = assert!(board::UART_TX == 43 && board::UART_RX == 44);

/// Seconds between status lines
const STATUS_INTERVAL_SECS: u64 = 30;

type CommUart = Uart<'static, Blocking>;

#[esp_rtos::main]
async fn main(spawner: embassy_executor::Spawner) {
    esp_println::logger::init_logger_from_env();

    let peripherals = esp_hal::init(esp_hal::Config::default());

    // Start the RTOS — requires timer + software interrupt
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_int = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_int.software_interrupt0);

    log::info!(
        "VESC Express v{} starting on {} ({})",
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

    if !board::HW_UART_COMM {
        log::info!("Board has no UART comm, idle");
        return;
    }

    // ── Communication UART ─────────────────────────────────────────────

    #[cfg(feature = "board-devkit-c6")]
    let (uart_tx, uart_rx) = (peripherals.GPIO16, peripherals.GPIO17);
    #[cfg(all(feature = "board-devkit-s3", not(feature = "board-devkit-c6")))]
    let (uart_tx, uart_rx) = (peripherals.GPIO43, peripherals.GPIO44);

    let config = uart::Config::default().with_baudrate(board::UART_BAUDRATE);
    let mut comm = match Uart::new(peripherals.UART0, config) {
        Ok(u) => u.with_tx(uart_tx).with_rx(uart_rx),
        Err(e) => {
            log::error!("UART{} init failed: {:?}", board::UART_NUM, e);
            return;
        }
    };

    log::info!(
        "UART{} up at {} baud (TX GPIO{}, RX GPIO{})",
        board::UART_NUM,
        board::UART_BAUDRATE,
        board::UART_TX,
        board::UART_RX
    );

    send(&mut comm, &DeviceMessage::hw_info(board::ACTIVE));

    log::info!("{} boards known to this build", hwconf::BOARDS.len());

    spawner.spawn(status_task(comm)).unwrap();
}

/// Periodic status reporting task
#[embassy_executor::task]
async fn status_task(mut comm: CommUart) {
    loop {
        Timer::after(Duration::from_secs(STATUS_INTERVAL_SECS)).await;

        let msg = DeviceMessage::Status {
            uptime: Instant::now().as_secs() as u32,
            board: board::HW_NAME,
            version: VERSION,
        };
        send(&mut comm, &msg);
    }
}

/// Serialize a message and write it out in full.
fn send(comm: &mut CommUart, msg: &DeviceMessage) {
    let Some(buf) = protocol::to_buffer(msg) else {
        log::warn!("Message did not fit in {} bytes", protocol::MAX_MSG_LEN);
        return;
    };

    let mut rest = &buf[..];
    while !rest.is_empty() {
        match comm.write(rest) {
            Ok(n) => rest = &rest[n..],
            Err(e) => {
                log::error!("UART write failed: {:?}", e);
                return;
            }
        }
    }
    if let Err(e) = comm.flush() {
        log::error!("UART flush failed: {:?}", e);
    }
}
