use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    append_desktop_log,
    main_window,
    menu_actions::{self, ShellMenuAction},
    theme_actions, APP_NAME,
};

const SHORTCUTS_TEXT: &str = "Ctrl+R: Reload Page\n\
F5: Reload Page\n\
Alt+Left: Go Back\n\
Alt+Right: Go Forward\n\
Alt+Home: Go Home\n\
Ctrl+Shift+C: Copy URL";

const ABOUT_TEXT: &str = "Leaf Class\n\n\
A minimal Google Classroom client with a built-in download manager.";

fn show_info_dialog(app_handle: &AppHandle, title: &str, text: &str) {
    app_handle
        .dialog()
        .message(text)
        .title(title)
        .kind(MessageDialogKind::Info)
        .show(|_| {});
}

pub fn handle_menu_event(app_handle: &AppHandle, menu_id: &str) {
    let Some(action) = menu_actions::action_from_menu_id(menu_id) else {
        return;
    };

    if let Some(script) = menu_actions::page_script_for_action(action) {
        main_window::run_page_script(
            app_handle,
            script,
            &format!("run {action:?}"),
            append_desktop_log,
        );
        return;
    }

    match action {
        ShellMenuAction::GoHome => main_window::navigate_home(app_handle, append_desktop_log),
        ShellMenuAction::SetTheme(theme) => {
            theme_actions::change_theme(app_handle, theme, append_desktop_log)
        }
        ShellMenuAction::ShowShortcuts => {
            show_info_dialog(app_handle, "Keyboard Shortcuts", SHORTCUTS_TEXT)
        }
        ShellMenuAction::ShowAbout => {
            show_info_dialog(app_handle, &format!("About {APP_NAME}"), ABOUT_TEXT)
        }
        ShellMenuAction::GoBack
        | ShellMenuAction::GoForward
        | ShellMenuAction::Reload
        | ShellMenuAction::CopyUrl => {}
    }
}
