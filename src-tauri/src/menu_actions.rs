use leaf_class_core::Theme;

pub const MENU_GO_BACK: &str = "menu_go_back";
pub const MENU_GO_FORWARD: &str = "menu_go_forward";
pub const MENU_GO_HOME: &str = "menu_go_home";
pub const MENU_RELOAD: &str = "menu_reload";
pub const MENU_COPY_URL: &str = "menu_copy_url";
pub const MENU_THEME_LIGHT: &str = "menu_theme_light";
pub const MENU_THEME_DARK: &str = "menu_theme_dark";
pub const MENU_SHOW_SHORTCUTS: &str = "menu_show_shortcuts";
pub const MENU_SHOW_ABOUT: &str = "menu_show_about";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMenuAction {
    GoBack,
    GoForward,
    GoHome,
    Reload,
    CopyUrl,
    SetTheme(Theme),
    ShowShortcuts,
    ShowAbout,
}

pub fn action_from_menu_id(menu_id: &str) -> Option<ShellMenuAction> {
    match menu_id {
        MENU_GO_BACK => Some(ShellMenuAction::GoBack),
        MENU_GO_FORWARD => Some(ShellMenuAction::GoForward),
        MENU_GO_HOME => Some(ShellMenuAction::GoHome),
        MENU_RELOAD => Some(ShellMenuAction::Reload),
        MENU_COPY_URL => Some(ShellMenuAction::CopyUrl),
        MENU_THEME_LIGHT => Some(ShellMenuAction::SetTheme(Theme::Light)),
        MENU_THEME_DARK => Some(ShellMenuAction::SetTheme(Theme::Dark)),
        MENU_SHOW_SHORTCUTS => Some(ShellMenuAction::ShowShortcuts),
        MENU_SHOW_ABOUT => Some(ShellMenuAction::ShowAbout),
        _ => None,
    }
}

/// Page script run in the main window for navigation actions.
pub fn page_script_for_action(action: ShellMenuAction) -> Option<&'static str> {
    match action {
        ShellMenuAction::GoBack => Some("history.back();"),
        ShellMenuAction::GoForward => Some("history.forward();"),
        ShellMenuAction::Reload => Some("location.reload();"),
        ShellMenuAction::CopyUrl => {
            Some("navigator.clipboard && navigator.clipboard.writeText(location.href);")
        }
        _ => None,
    }
}
