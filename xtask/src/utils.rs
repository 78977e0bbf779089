use std::path::{Path, PathBuf};

use vesc_express::hwconf::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum TaskError {
    #[error("Unknown board: {0}")]
    UnknownBoard(String),
    #[error("Invalid board config: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed builds: {}", .0.join(", "))]
    BuildsFailed(Vec<String>),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("xshell: {0}")]
    Shell(#[from] xshell::Error),
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Project root directory
pub fn project_root() -> PathBuf {
    let xtask = Path::new(env!("CARGO_MANIFEST_DIR"));
    xtask.parent().unwrap_or(xtask).to_path_buf()
}
