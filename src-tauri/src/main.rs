#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod download_bridge_commands;
mod download_engine;
mod download_presenter;
mod logging;
mod main_window;
mod menu_actions;
mod menu_handler;
mod menu_setup;
mod runtime_paths;
mod shell_overlay;
mod splash_screen;
mod theme_actions;
mod ui_dispatch;

pub(crate) use app_constants::*;
pub(crate) use app_types::{DownloadBridgeResult, DownloadState, ShellState, ThemeMenuState};
pub(crate) use logging::{
    append_desktop_log, append_download_log, append_shutdown_log, append_startup_log,
};

fn main() {
    app_runtime::run();
}
