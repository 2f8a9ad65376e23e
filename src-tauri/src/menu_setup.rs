use leaf_class_core::Theme;
use tauri::{
    menu::{CheckMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle, Manager,
};

use crate::{append_desktop_log, menu_actions, ThemeMenuState};

fn menu_item(
    app_handle: &AppHandle,
    id: &str,
    text: &str,
    accelerator: Option<&str>,
) -> Result<MenuItem<tauri::Wry>, String> {
    MenuItem::with_id(app_handle, id, text, true, accelerator)
        .map_err(|error| format!("Failed to create menu item {id}: {error}"))
}

fn theme_item(
    app_handle: &AppHandle,
    id: &str,
    text: &str,
    checked: bool,
) -> Result<CheckMenuItem<tauri::Wry>, String> {
    CheckMenuItem::with_id(app_handle, id, text, true, checked, None::<&str>)
        .map_err(|error| format!("Failed to create theme menu item {id}: {error}"))
}

/// Builds the main window menu and registers the theme items for later updates.
pub fn build_shell_menu(app_handle: &AppHandle, theme: Theme) -> Result<Menu<tauri::Wry>, String> {
    let back_item = menu_item(app_handle, menu_actions::MENU_GO_BACK, "Back", Some("Alt+Left"))?;
    let forward_item = menu_item(
        app_handle,
        menu_actions::MENU_GO_FORWARD,
        "Forward",
        Some("Alt+Right"),
    )?;
    let home_item = menu_item(app_handle, menu_actions::MENU_GO_HOME, "Home", Some("Alt+Home"))?;
    let reload_item = menu_item(
        app_handle,
        menu_actions::MENU_RELOAD,
        "Reload",
        Some("CmdOrCtrl+R"),
    )?;
    let copy_url_item = menu_item(
        app_handle,
        menu_actions::MENU_COPY_URL,
        "Copy URL",
        Some("CmdOrCtrl+Shift+C"),
    )?;
    let separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create separator menu item: {error}"))?;

    let light_item = theme_item(
        app_handle,
        menu_actions::MENU_THEME_LIGHT,
        "Light",
        theme == Theme::Light,
    )?;
    let dark_item = theme_item(
        app_handle,
        menu_actions::MENU_THEME_DARK,
        "Dark",
        theme == Theme::Dark,
    )?;

    let shortcuts_item = menu_item(
        app_handle,
        menu_actions::MENU_SHOW_SHORTCUTS,
        "Keyboard Shortcuts",
        None,
    )?;
    let about_item = menu_item(app_handle, menu_actions::MENU_SHOW_ABOUT, "About", None)?;

    let navigate_menu = Submenu::with_items(
        app_handle,
        "Navigate",
        true,
        &[
            &back_item,
            &forward_item,
            &home_item,
            &separator,
            &reload_item,
            &copy_url_item,
        ],
    )
    .map_err(|error| format!("Failed to build navigate menu: {error}"))?;
    let themes_menu = Submenu::with_items(app_handle, "Themes", true, &[&light_item, &dark_item])
        .map_err(|error| format!("Failed to build themes menu: {error}"))?;
    let help_menu = Submenu::with_items(app_handle, "Help", true, &[&shortcuts_item, &about_item])
        .map_err(|error| format!("Failed to build help menu: {error}"))?;

    let menu = Menu::with_items(app_handle, &[&navigate_menu, &themes_menu, &help_menu])
        .map_err(|error| format!("Failed to build shell menu: {error}"))?;

    if !app_handle.manage(ThemeMenuState {
        light_item: light_item.clone(),
        dark_item: dark_item.clone(),
    }) {
        append_desktop_log("theme menu state already exists, skipping manage");
    }

    Ok(menu)
}
