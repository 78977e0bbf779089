//! Espressif ESP32-C6 DevKit with a CAN transceiver on GPIO4/5.

use super::{CanPins, HwConfig, Target, UartConfig};

/// CAN transceiver pins
pub const CAN: CanPins = CanPins { tx: 4, rx: 5 };

pub const CONFIG: HwConfig = HwConfig {
    name: "Devkit C6",
    target: Target::Esp32C6,
    feature: "devkit-c6",
    uart_comm: true,
    can: Some(CAN),
    uart: UartConfig {
        num: 0,
        baudrate: 115200,
        tx: 16,
        rx: 17,
    },
    init: hw_init,
};

/// Board init hook.
pub fn hw_init() {
    log::info!("{}: hardware init", CONFIG.name);
}
