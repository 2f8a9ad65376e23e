use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;

use crate::{runtime_paths, APP_DIR_NAME, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES};

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => env::temp_dir()
            .join(APP_DIR_NAME)
            .join("logs")
            .join(file_name),
    }
}

fn format_log_line(timestamp: &str, scope: &str, message: &str) -> String {
    format!("[{timestamp}] [{scope}] {message}\n")
}

/// Moves an oversized log aside to `<file>.1`, replacing any older copy.
fn rotate_if_oversized(path: &Path, max_bytes: u64) -> Result<(), String> {
    let Ok(metadata) = fs::metadata(path) else {
        return Ok(());
    };
    if metadata.len() < max_bytes {
        return Ok(());
    }

    let mut rotated = path.as_os_str().to_owned();
    rotated.push(".1");
    fs::rename(path, PathBuf::from(rotated))
        .map_err(|error| format!("Failed to rotate log {}: {}", path.display(), error))
}

fn write_log_line(path: &Path, line: &str, max_bytes: u64) -> Result<(), String> {
    if let Some(parent_dir) = path.parent() {
        fs::create_dir_all(parent_dir).map_err(|error| {
            format!(
                "Failed to create log directory {}: {}",
                parent_dir.display(),
                error
            )
        })?;
    }
    rotate_if_oversized(path, max_bytes)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| format!("Failed to open log {}: {}", path.display(), error))?;
    file.write_all(line.as_bytes())
        .map_err(|error| format!("Failed to write log {}: {}", path.display(), error))
}

fn append_log(scope: &str, message: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
    let line = format_log_line(&timestamp, scope, message);
    if cfg!(debug_assertions) {
        eprint!("{line}");
    }

    let path = resolve_desktop_log_path(runtime_paths::default_data_root_dir(), DESKTOP_LOG_FILE);
    if let Err(error) = write_log_line(&path, &line, DESKTOP_LOG_MAX_BYTES) {
        if cfg!(debug_assertions) {
            eprintln!("[{timestamp}] [logging] {error}");
        }
    }
}

pub(crate) fn append_desktop_log(message: &str) {
    append_log("desktop", message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_log("startup", message);
}

pub(crate) fn append_download_log(message: &str) {
    append_log("download", message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_log("shutdown", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_desktop_log_path_uses_logs_dir_under_root() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/data/leaf")), "desktop.log");
        assert_eq!(path, PathBuf::from("/data/leaf/logs/desktop.log"));
    }

    #[test]
    fn resolve_desktop_log_path_falls_back_to_temp_dir() {
        let path = resolve_desktop_log_path(None, "desktop.log");
        assert!(path.starts_with(env::temp_dir()));
        assert!(path.ends_with("leaf-class/logs/desktop.log"));
    }

    #[test]
    fn write_log_line_appends_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("logs").join("desktop.log");

        write_log_line(&path, &format_log_line("t1", "desktop", "first"), 1024)
            .expect("first write");
        write_log_line(&path, &format_log_line("t2", "download", "second"), 1024)
            .expect("second write");

        let contents = fs::read_to_string(&path).expect("log should exist");
        assert_eq!(
            contents,
            "[t1] [desktop] first\n[t2] [download] second\n"
        );
    }

    #[test]
    fn write_log_line_rotates_oversized_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("desktop.log");
        fs::write(&path, "x".repeat(64)).expect("seed log");

        write_log_line(&path, "fresh\n", 32).expect("write");

        assert_eq!(fs::read_to_string(&path).expect("log"), "fresh\n");
        let rotated = dir.path().join("desktop.log.1");
        assert_eq!(fs::read_to_string(rotated).expect("rotated log").len(), 64);
    }
}
