//! Multi-board build driver.
//!
//! Lists and validates every board record, then builds firmware for each
//! board in `(target, name)` order and collects the artifacts per board.

use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use vesc_express::hwconf;
use vesc_express::protocol::{self, DeviceMessage};

mod build;
mod utils;

use utils::TaskResult;

#[macro_use]
extern crate log;

#[derive(Parser, Debug)]
#[command(name = "xtask", about = "VESC Express project tasks")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// List all boards in build order
    List {
        /// Print each board description as NDJSON
        #[arg(long)]
        json: bool,
    },
    /// Validate every board record
    Check,
    /// Build firmware for every board and collect the artifacts
    BuildAll {
        /// Output directory for per-board artifacts
        #[arg(long, default_value = "build_output")]
        out: PathBuf,
        /// Only build the named board (HW_NAME); may be repeated
        #[arg(long = "board")]
        boards: Vec<String>,
        /// Skip flash image generation with espflash
        #[arg(long)]
        no_image: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    if let Err(e) = try_main(Cli::parse()) {
        error!("{}", e);
        exit(1);
    }
}

fn try_main(cli: Cli) -> TaskResult<()> {
    match cli.task {
        Task::List { json } => {
            list(json);
            Ok(())
        }
        Task::Check => {
            hwconf::validate_all()?;
            info!("All {} board configs are valid", hwconf::BOARDS.len());
            Ok(())
        }
        Task::BuildAll {
            out,
            boards,
            no_image,
        } => {
            hwconf::validate_all()?;
            let selected = build::select_boards(&boards)?;
            build::BuildAll::new(out, selected, !no_image).execute()
        }
    }
}

fn list(json: bool) {
    for board in hwconf::build_order() {
        if json {
            match protocol::to_buffer(&DeviceMessage::hw_info(board)) {
                Some(buf) => print!("{}", String::from_utf8_lossy(&buf)),
                None => warn!("{}: description too large", board.name),
            }
        } else {
            println!(
                "{:<12} {:<8} {:<10} {}",
                board.name,
                board.target,
                board.feature,
                board.target.rust_target()
            );
        }
    }
}
