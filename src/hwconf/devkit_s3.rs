//! Espressif ESP32-S3 DevKit. UART comm runs on the USB-UART bridge pins.

use super::{CanPins, HwConfig, Target, UartConfig};

/// CAN transceiver pins
pub const CAN: CanPins = CanPins { tx: 16, rx: 17 };

pub const CONFIG: HwConfig = HwConfig {
    name: "DevKit S3",
    target: Target::Esp32S3,
    feature: "devkit-s3",
    uart_comm: true,
    can: Some(CAN),
    uart: UartConfig {
        num: 0,
        baudrate: 115200,
        tx: 43,
        rx: 44,
    },
    init: hw_init,
};

/// Board init hook.
pub fn hw_init() {
    log::info!("{}: hardware init", CONFIG.name);
}
