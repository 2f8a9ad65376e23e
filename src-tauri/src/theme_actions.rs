use leaf_class_core::Theme;
use tauri::{menu::CheckMenuItem, AppHandle, Manager};

use crate::{shell_overlay, ShellState, ThemeMenuState, MAIN_WINDOW_LABEL};

pub(crate) fn native_theme(theme: Theme) -> tauri::Theme {
    match theme {
        Theme::Light => tauri::Theme::Light,
        Theme::Dark => tauri::Theme::Dark,
    }
}

fn set_checked_safe<F>(item: &CheckMenuItem<tauri::Wry>, checked: bool, item_name: &str, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = item.set_checked(checked) {
        log(&format!(
            "failed to update theme menu check for {}: {}",
            item_name, error
        ));
    }
}

/// Keeps exactly one theme item checked.
pub(crate) fn sync_theme_menu<F>(app_handle: &AppHandle, theme: Theme, log: F)
where
    F: Fn(&str),
{
    let Some(menu_state) = app_handle.try_state::<ThemeMenuState>() else {
        return;
    };

    set_checked_safe(
        &menu_state.light_item,
        theme == Theme::Light,
        Theme::Light.as_str(),
        &log,
    );
    set_checked_safe(
        &menu_state.dark_item,
        theme == Theme::Dark,
        Theme::Dark.as_str(),
        &log,
    );
}

/// Applies `theme` to the native window, the current page and the menu.
pub(crate) fn apply_theme<F>(app_handle: &AppHandle, theme: Theme, log: F)
where
    F: Fn(&str),
{
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        if let Err(error) = window.set_theme(Some(native_theme(theme))) {
            log(&format!("failed to set native window theme: {error}"));
        }
        if let Err(error) = window.eval(&shell_overlay::apply_theme_script(theme)) {
            log(&format!("failed to apply page theme: {error}"));
        }
    }
    sync_theme_menu(app_handle, theme, &log);
}

pub(crate) fn change_theme<F>(app_handle: &AppHandle, theme: Theme, log: F)
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    state.update_and_save(|config| config.theme = theme, &log);
    log(&format!("theme changed to {}", theme.as_str()));
    apply_theme(app_handle, theme, &log);
}
