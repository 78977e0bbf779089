//! Build-time board selection.
//!
//! Exactly one board feature picks the active [`crate::hwconf::HwConfig`]; the rest of the
//! firmware reads its values as plain constants. All board records remain
//! available through [`crate::hwconf`] regardless of the selection.

#[cfg(all(feature = "board-devkit-c6", feature = "board-devkit-s3"))]
compile_error!("Multiple boards selected. Enable only one of board-devkit-c6 or board-devkit-s3");

/// Constants every board exports, derived from its record.
///
/// CAN pins are not part of this set: boards with a transceiver declare
/// `CAN_TX_GPIO_NUM`/`CAN_RX_GPIO_NUM` next to the invocation.
#[allow(unused_macros)]
macro_rules! board_constants {
    ($active:expr) => {
        pub const ACTIVE: &$crate::hwconf::HwConfig = $active;

        pub const HW_NAME: &str = ACTIVE.name;
        pub const HW_TARGET: &str = ACTIVE.target.as_str();
        pub const HW_UART_COMM: bool = ACTIVE.uart_comm;
        pub const UART_NUM: u8 = ACTIVE.uart.num;
        pub const UART_BAUDRATE: u32 = ACTIVE.uart.baudrate;
        pub const UART_TX: u8 = ACTIVE.uart.tx;
        pub const UART_RX: u8 = ACTIVE.uart.rx;

        /// Run the active board's init routine.
        pub fn hw_init_hook() {
            ACTIVE.run_init()
        }
    };
}

#[cfg(feature = "board-devkit-c6")]
mod hw {
    use crate::hwconf::devkit_c6;

    board_constants!(&devkit_c6::CONFIG);

    pub const CAN_TX_GPIO_NUM: u8 = devkit_c6::CAN.tx;
    pub const CAN_RX_GPIO_NUM: u8 = devkit_c6::CAN.rx;
}

#[cfg(all(feature = "board-devkit-s3", not(feature = "board-devkit-c6")))]
mod hw {
    use crate::hwconf::devkit_s3;

    board_constants!(&devkit_s3::CONFIG);

    pub const CAN_TX_GPIO_NUM: u8 = devkit_s3::CAN.tx;
    pub const CAN_RX_GPIO_NUM: u8 = devkit_s3::CAN.rx;
}

#[cfg(not(any(feature = "board-devkit-c6", feature = "board-devkit-s3")))]
mod hw {
    pub const HW_NAME: &str = "unknown";
    pub const HW_TARGET: &str = "unknown";
}

pub use hw::*;
