/// Per-board hardware configuration records.
///
/// Every supported board is a `const` [`HwConfig`] describing its identity,
/// chip, UART parameters, optional CAN pins and init hook. All records are
/// compiled into every build; [`crate::board`] picks the active one via
/// feature flags.
use core::fmt;
use core::str::FromStr;

use heapless::Vec;
use serde::Serialize;

pub mod devkit_c6;
pub mod devkit_s3;

/// Board-specific initialization routine (`hw_init(void)`).
pub type InitHook = fn();

/// Maximum number of boards the registry helpers can hold.
pub const MAX_BOARDS: usize = 8;

/// Maximum number of assigned pins per board (CAN TX/RX + UART TX/RX).
pub const MAX_PINS: usize = 4;

/// Supported ESP32-family chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Esp32C6,
    Esp32S3,
}

impl Target {
    pub const ALL: &'static [Target] = &[Target::Esp32C6, Target::Esp32S3];

    /// Chip id, also the esp-hal chip feature name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Target::Esp32C6 => "esp32c6",
            Target::Esp32S3 => "esp32s3",
        }
    }

    /// Rust target triple used to build firmware for this chip.
    pub const fn rust_target(self) -> &'static str {
        match self {
            Target::Esp32C6 => "riscv32imac-unknown-none-elf",
            Target::Esp32S3 => "xtensa-esp32s3-none-elf",
        }
    }

    /// Whether `gpio` exists on this chip.
    pub const fn is_valid_gpio(self, gpio: u8) -> bool {
        match self {
            Target::Esp32C6 => gpio <= 30,
            // GPIO22..=25 are not bonded out on the S3
            Target::Esp32S3 => gpio <= 21 || (gpio >= 26 && gpio <= 48),
        }
    }

    /// Number of high-power UART peripherals.
    pub const fn uart_count(self) -> u8 {
        match self {
            Target::Esp32C6 => 2,
            Target::Esp32S3 => 3,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(ConfigError::UnknownTarget)
    }
}

// Grouping order of multi-board builds: by chip id string.
impl Ord for Target {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Target {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Target {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// UART peripheral parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UartConfig {
    /// UART peripheral index
    pub num: u8,
    #[serde(rename = "baud")]
    pub baudrate: u32,
    pub tx: u8,
    pub rx: u8,
}

/// CAN (TWAI) transceiver pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanPins {
    pub tx: u8,
    pub rx: u8,
}

/// Peripheral function a GPIO is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    CanTx,
    CanRx,
    UartTx,
    UartRx,
}

impl PinRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            PinRole::CanTx => "can_tx",
            PinRole::CanRx => "can_rx",
            PinRole::UartTx => "uart_tx",
            PinRole::UartRx => "uart_rx",
        }
    }
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Reasons a board record (or the board registry) is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board name is empty")]
    EmptyName,
    #[error("board feature name is empty")]
    EmptyFeature,
    #[error("unknown target chip")]
    UnknownTarget,
    #[error("{role} uses GPIO{gpio}, which does not exist on this chip")]
    InvalidGpio { role: PinRole, gpio: u8 },
    #[error("{first} and {second} both use GPIO{gpio}")]
    PinConflict {
        first: PinRole,
        second: PinRole,
        gpio: u8,
    },
    #[error("UART{num} does not exist on this chip")]
    InvalidUart { num: u8 },
    #[error("UART baud rate is zero")]
    ZeroBaudrate,
    #[error("board name '{0}' is defined more than once")]
    DuplicateName(&'static str),
    #[error("board feature '{0}' is defined more than once")]
    DuplicateFeature(&'static str),
}

/// Hardware configuration for one board variant.
#[derive(Debug, Clone, Copy)]
pub struct HwConfig {
    /// Human-readable board name (`HW_NAME`)
    pub name: &'static str,
    /// Target chip (`HW_TARGET`)
    pub target: Target,
    /// Cargo feature selecting this board
    pub feature: &'static str,
    /// Board exposes the UART communication interface (`HW_UART_COMM`)
    pub uart_comm: bool,
    /// CAN pins, if the board has a transceiver
    pub can: Option<CanPins>,
    pub uart: UartConfig,
    /// Board init routine (`HW_INIT_HOOK()`)
    pub init: InitHook,
}

impl HwConfig {
    /// All assigned pins: CAN first when present, then UART TX/RX.
    pub fn pins(&self) -> Vec<(PinRole, u8), MAX_PINS> {
        let mut pins = Vec::new();
        if let Some(can) = self.can {
            let _ = pins.push((PinRole::CanTx, can.tx));
            let _ = pins.push((PinRole::CanRx, can.rx));
        }
        let _ = pins.push((PinRole::UartTx, self.uart.tx));
        let _ = pins.push((PinRole::UartRx, self.uart.rx));
        pins
    }

    /// Check the record for consistency against its target chip.
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.feature.is_empty() {
            return Err(ConfigError::EmptyFeature);
        }

        let pins = self.pins();
        for (i, &(role, gpio)) in pins.iter().enumerate() {
            if !self.target.is_valid_gpio(gpio) {
                return Err(ConfigError::InvalidGpio { role, gpio });
            }
            if let Some(&(first, _)) = pins[..i].iter().find(|&&(_, g)| g == gpio) {
                return Err(ConfigError::PinConflict {
                    first,
                    second: role,
                    gpio,
                });
            }
        }

        if self.uart.num >= self.target.uart_count() {
            return Err(ConfigError::InvalidUart { num: self.uart.num });
        }
        if self.uart.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        Ok(())
    }

    /// Run the board init hook.
    pub fn run_init(&self) {
        (self.init)()
    }
}

// ── Registry ───────────────────────────────────────────────────────────

/// Every board known to this firmware.
pub const BOARDS: &[&HwConfig] = &[&devkit_c6::CONFIG, &devkit_s3::CONFIG];

const _: () = assert!(
    BOARDS.len() <= MAX_BOARDS,
    "BOARDS exceeds MAX_BOARDS; raise MAX_BOARDS"
);

/// Look up a board by its exact `HW_NAME`.
pub fn find(name: &str) -> Option<&'static HwConfig> {
    BOARDS.iter().copied().find(|b| b.name == name)
}

/// Look up a board by the cargo feature that selects it.
pub fn find_by_feature(feature: &str) -> Option<&'static HwConfig> {
    BOARDS.iter().copied().find(|b| b.feature == feature)
}

/// Boards sorted by target chip, then by name.
///
/// Groups multi-board builds by architecture so each toolchain is
/// exercised once in a row.
pub fn build_order() -> Vec<&'static HwConfig, MAX_BOARDS> {
    sorted(BOARDS)
}

fn sorted(boards: &[&'static HwConfig]) -> Vec<&'static HwConfig, MAX_BOARDS> {
    let mut order: Vec<&'static HwConfig, MAX_BOARDS> =
        boards.iter().copied().collect();
    order.sort_unstable_by(|a, b| (a.target, a.name).cmp(&(b.target, b.name)));
    order
}

/// Validate every registered board plus name/feature uniqueness.
pub fn validate_all() -> Result<(), ConfigError> {
    validate_set(BOARDS)
}

fn validate_set(boards: &[&'static HwConfig]) -> Result<(), ConfigError> {
    for (i, board) in boards.iter().enumerate() {
        board.validate()?;
        let earlier = &boards[..i];
        if earlier.iter().any(|b| b.name == board.name) {
            return Err(ConfigError::DuplicateName(board.name));
        }
        if earlier.iter().any(|b| b.feature == board.feature) {
            return Err(ConfigError::DuplicateFeature(board.feature));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() {}

    const BASE: HwConfig = HwConfig {
        name: "Test Board",
        target: Target::Esp32C6,
        feature: "test-board",
        uart_comm: true,
        can: Some(CanPins { tx: 4, rx: 5 }),
        uart: UartConfig {
            num: 0,
            baudrate: 115200,
            tx: 16,
            rx: 17,
        },
        init: noop,
    };

    // ── Target ──────────────────────────────────────────────────────

    #[test]
    fn target_parses_chip_ids() {
        assert_eq!("esp32c6".parse::<Target>(), Ok(Target::Esp32C6));
        assert_eq!("esp32s3".parse::<Target>(), Ok(Target::Esp32S3));
        assert_eq!("esp32".parse::<Target>(), Err(ConfigError::UnknownTarget));
        assert_eq!("ESP32C6".parse::<Target>(), Err(ConfigError::UnknownTarget));
    }

    #[test]
    fn target_orders_by_chip_id() {
        assert!(Target::Esp32C6 < Target::Esp32S3);
    }

    #[test]
    fn s3_has_gpio_gap() {
        assert!(Target::Esp32S3.is_valid_gpio(21));
        for gpio in 22..=25 {
            assert!(!Target::Esp32S3.is_valid_gpio(gpio), "GPIO{gpio}");
        }
        assert!(Target::Esp32S3.is_valid_gpio(26));
        assert!(Target::Esp32S3.is_valid_gpio(48));
        assert!(!Target::Esp32S3.is_valid_gpio(49));
    }

    #[test]
    fn c6_gpio_range() {
        assert!(Target::Esp32C6.is_valid_gpio(0));
        assert!(Target::Esp32C6.is_valid_gpio(30));
        assert!(!Target::Esp32C6.is_valid_gpio(31));
    }

    // ── Validation ──────────────────────────────────────────────────

    #[test]
    fn base_config_is_valid() {
        assert_eq!(BASE.validate(), Ok(()));
    }

    #[test]
    fn pins_list_can_before_uart() {
        let pins = BASE.pins();
        assert_eq!(
            pins.as_slice(),
            &[
                (PinRole::CanTx, 4),
                (PinRole::CanRx, 5),
                (PinRole::UartTx, 16),
                (PinRole::UartRx, 17),
            ]
        );
    }

    #[test]
    fn pins_without_can() {
        let cfg = HwConfig { can: None, ..BASE };
        assert_eq!(
            cfg.pins().as_slice(),
            &[(PinRole::UartTx, 16), (PinRole::UartRx, 17)]
        );
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn rejects_can_uart_overlap() {
        let cfg = HwConfig {
            can: Some(CanPins { tx: 16, rx: 5 }),
            ..BASE
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::PinConflict {
                first: PinRole::CanTx,
                second: PinRole::UartTx,
                gpio: 16,
            })
        );
    }

    #[test]
    fn rejects_tx_rx_on_same_pin() {
        let cfg = HwConfig {
            uart: UartConfig { rx: 16, ..BASE.uart },
            ..BASE
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::PinConflict {
                first: PinRole::UartTx,
                second: PinRole::UartRx,
                gpio: 16,
            })
        );
    }

    #[test]
    fn rejects_gpio_missing_on_target() {
        // S3 console pins do not exist on the C6
        let cfg = HwConfig {
            uart: UartConfig {
                tx: 43,
                rx: 44,
                ..BASE.uart
            },
            ..BASE
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidGpio {
                role: PinRole::UartTx,
                gpio: 43,
            })
        );
    }

    #[test]
    fn rejects_missing_uart() {
        let cfg = HwConfig {
            uart: UartConfig { num: 2, ..BASE.uart },
            ..BASE
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidUart { num: 2 }));

        // UART2 exists on the S3
        let s3 = HwConfig {
            target: Target::Esp32S3,
            ..cfg
        };
        assert_eq!(s3.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_baudrate() {
        let cfg = HwConfig {
            uart: UartConfig {
                baudrate: 0,
                ..BASE.uart
            },
            ..BASE
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroBaudrate));
    }

    #[test]
    fn rejects_empty_identity() {
        let cfg = HwConfig { name: "", ..BASE };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyName));
        let cfg = HwConfig { feature: "", ..BASE };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyFeature));
    }

    #[test]
    fn error_messages_name_the_pins() {
        let err = ConfigError::PinConflict {
            first: PinRole::CanRx,
            second: PinRole::UartTx,
            gpio: 5,
        };
        assert_eq!(err.to_string(), "can_rx and uart_tx both use GPIO5");
    }

    #[test]
    fn init_hook_is_called() {
        use core::sync::atomic::{AtomicU32, Ordering};
        static CALLS: AtomicU32 = AtomicU32::new(0);
        fn count() {
            CALLS.fetch_add(1, Ordering::Relaxed);
        }

        let cfg = HwConfig { init: count, ..BASE };
        cfg.run_init();
        cfg.run_init();
        assert_eq!(CALLS.load(Ordering::Relaxed), 2);
    }

    // ── Registry ────────────────────────────────────────────────────

    #[test]
    fn all_registered_boards_validate() {
        for board in BOARDS {
            assert_eq!(board.validate(), Ok(()), "{}", board.name);
        }
        assert_eq!(validate_all(), Ok(()));
    }

    #[test]
    fn every_board_has_a_uart() {
        for board in BOARDS {
            assert!(board.uart_comm, "{}", board.name);
            assert!(board.uart.baudrate > 0);
        }
    }

    #[test]
    fn find_by_name_and_feature() {
        let c6 = find("Devkit C6").unwrap();
        assert_eq!(c6.target, Target::Esp32C6);
        assert_eq!(find_by_feature("devkit-s3").unwrap().name, "DevKit S3");
        // Names are matched exactly
        assert!(find("devkit c6").is_none());
        assert!(find_by_feature("xiao").is_none());
    }

    #[test]
    fn build_order_groups_by_target_then_name() {
        const C6_B: HwConfig = HwConfig {
            name: "B Board",
            feature: "b",
            ..BASE
        };
        const C6_A: HwConfig = HwConfig {
            name: "A Board",
            feature: "a",
            ..BASE
        };
        const S3_A: HwConfig = HwConfig {
            name: "A Board S3",
            feature: "a-s3",
            target: Target::Esp32S3,
            ..BASE
        };
        let order = sorted(&[&S3_A, &C6_B, &C6_A]);
        let names: Vec<&str, 3> = order.iter().map(|b| b.name).collect();
        assert_eq!(names.as_slice(), &["A Board", "B Board", "A Board S3"]);
    }

    #[test]
    fn build_order_keeps_every_board() {
        assert!(BOARDS.len() <= MAX_BOARDS);
        let order = build_order();
        for board in BOARDS {
            assert!(order.iter().any(|b| b.name == board.name), "{}", board.name);
        }
    }

    #[test]
    fn registry_build_order() {
        let order = build_order();
        assert_eq!(order.len(), BOARDS.len());
        assert_eq!(order[0].name, "Devkit C6");
        assert_eq!(order[1].name, "DevKit S3");
    }

    #[test]
    fn rejects_duplicate_names_and_features() {
        const DUP_NAME: HwConfig = HwConfig {
            feature: "other",
            ..BASE
        };
        assert_eq!(
            validate_set(&[&BASE, &DUP_NAME]),
            Err(ConfigError::DuplicateName("Test Board"))
        );

        const DUP_FEATURE: HwConfig = HwConfig {
            name: "Other Board",
            ..BASE
        };
        assert_eq!(
            validate_set(&[&BASE, &DUP_FEATURE]),
            Err(ConfigError::DuplicateFeature("test-board"))
        );
    }
}
