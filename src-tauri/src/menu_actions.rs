pub const MENU_NEW_TRADE: &str = "menu_new_trade";
pub const MENU_EXPORT_DATA: &str = "menu_export_data";
pub const MENU_QUIT: &str = "menu_quit";
pub const MENU_RELOAD: &str = "menu_reload";
pub const MENU_TOGGLE_THEME: &str = "menu_toggle_theme";
pub const MENU_ZOOM_IN: &str = "menu_zoom_in";
pub const MENU_ZOOM_OUT: &str = "menu_zoom_out";
pub const MENU_ZOOM_RESET: &str = "menu_zoom_reset";
pub const MENU_TOGGLE_FULLSCREEN: &str = "menu_toggle_fullscreen";
pub const MENU_TOGGLE_DEVTOOLS: &str = "menu_toggle_devtools";
pub const MENU_CHECK_UPDATES: &str = "menu_check_updates";
pub const MENU_ABOUT: &str = "menu_about";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewTrade,
    ExportData,
    Quit,
    Reload,
    ToggleTheme,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ToggleFullscreen,
    ToggleDevtools,
    CheckUpdates,
    About,
}

pub fn action_from_menu_id(menu_id: &str) -> Option<MenuAction> {
    match menu_id {
        MENU_NEW_TRADE => Some(MenuAction::NewTrade),
        MENU_EXPORT_DATA => Some(MenuAction::ExportData),
        MENU_QUIT => Some(MenuAction::Quit),
        MENU_RELOAD => Some(MenuAction::Reload),
        MENU_TOGGLE_THEME => Some(MenuAction::ToggleTheme),
        MENU_ZOOM_IN => Some(MenuAction::ZoomIn),
        MENU_ZOOM_OUT => Some(MenuAction::ZoomOut),
        MENU_ZOOM_RESET => Some(MenuAction::ZoomReset),
        MENU_TOGGLE_FULLSCREEN => Some(MenuAction::ToggleFullscreen),
        MENU_TOGGLE_DEVTOOLS => Some(MenuAction::ToggleDevtools),
        MENU_CHECK_UPDATES => Some(MenuAction::CheckUpdates),
        MENU_ABOUT => Some(MenuAction::About),
        _ => None,
    }
}

impl MenuAction {
    /// Quit and update checks work without a surface; everything else targets the main window.
    pub fn requires_main_window(self) -> bool {
        !matches!(self, MenuAction::Quit | MenuAction::CheckUpdates)
    }
}
