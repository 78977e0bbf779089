use std::fs;
use std::path::{Path, PathBuf};

use vesc_express::hwconf::{self, HwConfig, Target};
use xshell::{cmd, Shell};

use crate::utils::{project_root, TaskError, TaskResult};

/// Firmware binary name, as produced by cargo
const BIN_NAME: &str = "vesc-express";
/// Artifact file stem inside each board directory
const ARTIFACT_STEM: &str = "vesc_express";

/// Resolve `--board` names against the registry, keeping build order.
///
/// An empty list selects every board.
pub fn select_boards(names: &[String]) -> TaskResult<Vec<&'static HwConfig>> {
    for name in names {
        if hwconf::find(name).is_none() {
            return Err(TaskError::UnknownBoard(name.clone()));
        }
    }
    Ok(hwconf::build_order()
        .into_iter()
        .filter(|b| names.is_empty() || names.iter().any(|n| n == b.name))
        .collect())
}

/// Per-board artifact directory
pub fn artifact_dir(out: &Path, board: &HwConfig) -> PathBuf {
    out.join(board.name)
}

/// Location of the release ELF cargo produces for `board`
pub fn elf_path(root: &Path, board: &HwConfig) -> PathBuf {
    root.join("target")
        .join(board.target.rust_target())
        .join("release")
        .join(BIN_NAME)
}

pub struct BuildAll {
    out: PathBuf,
    boards: Vec<&'static HwConfig>,
    image: bool,
}

impl BuildAll {
    pub fn new(out: PathBuf, boards: Vec<&'static HwConfig>, image: bool) -> Self {
        Self { out, boards, image }
    }

    pub fn execute(&self) -> TaskResult<()> {
        let sh = Shell::new()?;
        let root = project_root();
        sh.change_dir(&root);

        let out = root.join(&self.out);
        if !out.exists() {
            fs::create_dir_all(&out)?;
            info!("Created output directory: {}", out.display());
        }

        info!("Found {} hardware configurations.", self.boards.len());

        let mut failed = Vec::new();
        for board in &self.boards {
            if !self.build_board(&sh, &root, &out, board) {
                failed.push(board.name.to_string());
            }
        }

        let ok = self.boards.len() - failed.len();
        info!("========================================");
        info!("Build Summary: {}/{} Succeeded", ok, self.boards.len());
        info!("Artifacts: {}", out.display());

        if failed.is_empty() {
            info!("All builds successful!");
            Ok(())
        } else {
            Err(TaskError::BuildsFailed(failed))
        }
    }

    fn build_board(&self, sh: &Shell, root: &Path, out: &Path, board: &HwConfig) -> bool {
        info!("========================================");
        info!("Building: {} ({})", board.name, board.target);
        info!("Feature: {}", board.feature);
        info!("Target: {}", board.target.rust_target());
        info!("========================================");

        if let Err(e) = cargo_build(sh, board) {
            error!("FAILED: {}: {}", board.name, e);
            return false;
        }
        info!("SUCCESS: {}", board.name);

        if let Err(e) = self.collect(sh, root, out, board) {
            warn!("Failed to copy artifacts for {}: {}", board.name, e);
        }
        true
    }

    fn collect(&self, sh: &Shell, root: &Path, out: &Path, board: &HwConfig) -> TaskResult<()> {
        let dir = artifact_dir(out, board);
        fs::create_dir_all(&dir)?;

        let elf = elf_path(root, board);
        let elf_out = dir.join(format!("{ARTIFACT_STEM}.elf"));
        fs::copy(&elf, &elf_out)?;
        info!("--> Copied ELF to {}", dir.display());

        if self.image {
            let chip = board.target.as_str();
            let bin_out = dir.join(format!("{ARTIFACT_STEM}.bin"));
            cmd!(sh, "espflash save-image --chip {chip} {elf} {bin_out}").run()?;
            info!("--> Saved flash image to {}", dir.display());
        }
        Ok(())
    }
}

fn cargo_build(sh: &Shell, board: &HwConfig) -> TaskResult<()> {
    let feature = board.feature;
    let triple = board.target.rust_target();
    match board.target {
        // Xtensa needs the esp toolchain and a core built from source
        Target::Esp32S3 => cmd!(
            sh,
            "cargo +esp build --release --no-default-features --features {feature} --target {triple} -Zbuild-std=core"
        )
        .run()?,
        Target::Esp32C6 => cmd!(
            sh,
            "cargo build --release --no-default-features --features {feature} --target {triple}"
        )
        .run()?,
    }
    Ok(())
}
