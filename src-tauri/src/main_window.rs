use leaf_class_core::{ShellConfig, DEFAULT_HOME_URL};
use tauri::{menu::Menu, AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    download_engine, shell_overlay, theme_actions, ShellState, APP_NAME, MAIN_WINDOW_LABEL,
    MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};

pub fn window_title(url: Option<&Url>, loading: bool) -> String {
    match (url, loading) {
        (Some(url), true) => format!("{APP_NAME} | Loading {url}"),
        (Some(url), false) => format!("{APP_NAME} | {url}"),
        (None, true) => format!("{APP_NAME} | Loading..."),
        (None, false) => APP_NAME.to_string(),
    }
}

fn start_url(config: &ShellConfig) -> Result<Url, String> {
    Url::parse(&config.last_url)
        .or_else(|_| Url::parse(DEFAULT_HOME_URL))
        .map_err(|error| format!("Invalid start URL: {error}"))
}

/// Creates the hidden main window; the splash screen shows it later.
pub fn build_main_window(
    app_handle: &AppHandle,
    config: &ShellConfig,
    menu: Option<Menu<tauri::Wry>>,
) -> Result<WebviewWindow, String> {
    let url = start_url(config)?;
    let mut builder =
        WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, WebviewUrl::External(url.clone()))
            .title(window_title(Some(&url), true))
            .inner_size(f64::from(config.width), f64::from(config.height))
            .min_inner_size(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)
            .theme(Some(theme_actions::native_theme(config.theme)))
            .visible(false)
            .initialization_script(shell_overlay::initialization_script())
            .on_download(download_engine::handle_download_event);
    if let Some(menu) = menu {
        builder = builder.menu(menu);
    }

    builder
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))
}

pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("show_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

pub fn run_page_script<F>(app_handle: &AppHandle, script: &str, action: &str, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log(&format!("{action} skipped: main window not found"));
        return;
    };
    if let Err(error) = window.eval(script) {
        log(&format!("failed to {action}: {error}"));
    }
}

pub fn navigate_home<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("navigate_home skipped: main window not found");
        return;
    };
    match Url::parse(DEFAULT_HOME_URL) {
        Ok(url) => {
            if let Err(error) = window.navigate(url) {
                log(&format!("failed to navigate home: {error}"));
            }
        }
        Err(error) => log(&format!("invalid home url: {error}")),
    }
}

pub fn update_title<F>(window: &tauri::Window, url: &Url, loading: bool, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = window.set_title(&window_title(Some(url), loading)) {
        log(&format!("failed to update window title: {error}"));
    }
}

/// Records the main window size and page so the next launch restores them.
pub fn remember_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };

    let logical_size = match (window.inner_size(), window.scale_factor()) {
        (Ok(size), Ok(scale_factor)) => Some(size.to_logical::<u32>(scale_factor)),
        (Err(error), _) | (_, Err(error)) => {
            log(&format!("failed to read main window size: {error}"));
            None
        }
    };
    let (width, height) = logical_size
        .map(|size| (size.width, size.height))
        .unwrap_or((0, 0));
    let url = window.url().ok();

    let state = app_handle.state::<ShellState>();
    state.update_and_save(
        |config| config.remember_window(width, height, url.as_ref().map(Url::as_str)),
        &log,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_title_shows_committed_url() {
        let url = Url::parse("https://classroom.google.com/c/abc").expect("url");
        assert_eq!(
            window_title(Some(&url), false),
            "Leaf Class | https://classroom.google.com/c/abc"
        );
        assert_eq!(
            window_title(Some(&url), true),
            "Leaf Class | Loading https://classroom.google.com/c/abc"
        );
    }

    #[test]
    fn window_title_without_url_uses_app_name() {
        assert_eq!(window_title(None, false), "Leaf Class");
        assert_eq!(window_title(None, true), "Leaf Class | Loading...");
    }

    #[test]
    fn start_url_falls_back_to_home() {
        let config = ShellConfig {
            last_url: "not a url".to_string(),
            ..ShellConfig::default()
        };
        assert_eq!(
            start_url(&config).expect("url").as_str(),
            "https://classroom.google.com/"
        );
    }
}
