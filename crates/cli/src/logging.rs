//! Per-run log files

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sheetload_core::config::constants::EXECUTABLE_PATH;

/// `logs/{folder}_{pid}_{timestamp}.log` next to the executable, where
/// `folder` is the name of the working directory.
pub fn get_log_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let current_dir = std::env::current_dir()?;
    let folder_name = current_dir
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("unknown"))
        .to_string_lossy();

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let pid = std::process::id();

    let logs_dir = EXECUTABLE_PATH
        .get()
        .ok_or("executable path not initialized")?
        .parent()
        .ok_or("executable has no parent directory")?
        .join("logs");

    std::fs::create_dir_all(&logs_dir)?;

    Ok(logs_dir.join(format!("{folder_name}_{pid}_{timestamp}.log")))
}

pub fn create_log_file() -> Result<(std::fs::File, PathBuf), Box<dyn std::error::Error>> {
    let log_path = get_log_file_path()?;

    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    Ok((log_file, log_path))
}
