//! VESC Express library — per-board hardware configuration.
//!
//! Each supported ESP32-family board is described by a `const` record
//! (`hwconf`) holding its name, target chip, UART parameters, optional CAN
//! pins and init hook. One board is picked at build time through cargo
//! features (`board`), replacing per-board header macros with typed
//! constants. `protocol` renders board descriptions and status reports as
//! NDJSON for the communication UART.
//!
//! Everything here is `no_std`, needs no allocator and is testable on any
//! host with `cargo test --lib --no-default-features --features board-devkit-c6`.
//! The firmware binaries and the `xtask` multi-board build driver are thin
//! consumers of these records.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod hwconf;
pub mod protocol;
