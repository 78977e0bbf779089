/// JSON messages the firmware writes on its communication UART.
///
/// All messages are newline-delimited JSON (NDJSON).
/// Uses `heapless` types for no_std/no-alloc operation.
use heapless::Vec;
use serde::Serialize;

use crate::hwconf::{CanPins, HwConfig, Target, UartConfig};

/// Messages sent from the device to the host
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum DeviceMessage<'a> {
    /// Board description, sent once at boot
    #[serde(rename = "hw")]
    HwInfo {
        name: &'a str,
        target: Target,
        uart_comm: bool,
        /// CAN pins, omitted on boards without a transceiver
        #[serde(skip_serializing_if = "Option::is_none")]
        can: Option<CanPins>,
        uart: UartConfig,
        /// Firmware version
        version: &'static str,
    },
    /// Periodic status report
    #[serde(rename = "status")]
    Status {
        /// Uptime in seconds
        uptime: u32,
        /// Board name
        board: &'a str,
        version: &'static str,
    },
}

impl<'a> DeviceMessage<'a> {
    /// Describe a board record.
    pub fn hw_info(cfg: &'a HwConfig) -> Self {
        DeviceMessage::HwInfo {
            name: cfg.name,
            target: cfg.target,
            uart_comm: cfg.uart_comm,
            can: cfg.can,
            uart: cfg.uart,
            version: VERSION,
        }
    }
}

/// Firmware version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum size of a serialized JSON message
pub const MAX_MSG_LEN: usize = 256;

/// Buffer type for serialized JSON messages
pub type MsgBuffer = Vec<u8, MAX_MSG_LEN>;

/// Serialize a DeviceMessage to JSON bytes and write to the output buffer.
/// Returns the number of bytes written, or None if serialization failed.
pub fn serialize_message(msg: &DeviceMessage, buf: &mut [u8]) -> Option<usize> {
    match serde_json_core::to_slice(msg, buf) {
        Ok(len) => {
            // Append newline for NDJSON
            if len < buf.len() {
                buf[len] = b'\n';
                Some(len + 1)
            } else {
                Some(len)
            }
        }
        Err(_) => None,
    }
}

/// Serialize a message into a fresh [`MsgBuffer`] as one complete NDJSON line.
///
/// Returns None when the message plus its trailing newline does not fit.
pub fn to_buffer(msg: &DeviceMessage) -> Option<MsgBuffer> {
    let mut buf = MsgBuffer::new();
    buf.resize_default(MAX_MSG_LEN).ok()?;
    let len = serialize_message(msg, &mut buf)?;
    if len == 0 || buf[len - 1] != b'\n' {
        return None;
    }
    buf.truncate(len);
    Some(buf)
}
