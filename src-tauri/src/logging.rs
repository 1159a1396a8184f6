use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;

use crate::{DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES, ROOT_DIR_ENV};

pub fn default_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(ROOT_DIR_ENV) {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    home::home_dir().map(|home| home.join(".metrixsight"))
}

pub fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => env::temp_dir().join("metrixsight").join(file_name),
    }
}

pub(crate) fn format_log_line(category: &str, message: &str) -> String {
    format!(
        "[{}] [{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        category,
        message
    )
}

fn rotated_log_path(path: &Path) -> PathBuf {
    let mut rotated = path.as_os_str().to_os_string();
    rotated.push(".1");
    PathBuf::from(rotated)
}

/// Moves the log aside to `<file>.1` once it reaches `max_bytes`, replacing the previous one.
fn rotate_if_needed(path: &Path, max_bytes: u64) -> Result<bool, String> {
    let Ok(metadata) = fs::metadata(path) else {
        return Ok(false);
    };
    if metadata.len() < max_bytes {
        return Ok(false);
    }

    let rotated = rotated_log_path(path);
    fs::rename(path, &rotated).map_err(|error| {
        format!(
            "Failed to rotate log file {} to {}: {}",
            path.display(),
            rotated.display(),
            error
        )
    })?;
    Ok(true)
}

fn write_log_line(path: &Path, line: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| {
            format!("Failed to create log directory {}: {}", parent.display(), error)
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| format!("Failed to open log file {}: {}", path.display(), error))?;
    writeln!(file, "{line}")
        .map_err(|error| format!("Failed to write log file {}: {}", path.display(), error))
}

fn append_log(category: &str, message: &str) {
    let line = format_log_line(category, message);
    eprintln!("{line}");

    let path = resolve_desktop_log_path(default_root_dir(), DESKTOP_LOG_FILE);
    if let Err(error) = rotate_if_needed(&path, DESKTOP_LOG_MAX_BYTES) {
        eprintln!("{error}");
    }
    if let Err(error) = write_log_line(&path, &line) {
        eprintln!("{error}");
    }
}

pub fn append_desktop_log(message: &str) {
    append_log("desktop", message);
}

pub fn append_startup_log(message: &str) {
    append_log("startup", message);
}

pub fn append_update_log(message: &str) {
    append_log("update", message);
}
