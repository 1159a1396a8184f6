use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle,
};

use crate::{menu_actions, shell_locale, DEFAULT_SHELL_LOCALE};

fn menu_item(
    app_handle: &AppHandle,
    id: &str,
    text: &str,
    accelerator: Option<&str>,
) -> Result<MenuItem<tauri::Wry>, String> {
    MenuItem::with_id(app_handle, id, text, true, accelerator)
        .map_err(|error| format!("Failed to create menu item {id}: {error}"))
}

fn separator(app_handle: &AppHandle) -> Result<PredefinedMenuItem<tauri::Wry>, String> {
    PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create menu separator: {error}"))
}

pub fn setup_app_menu(app_handle: &AppHandle) -> Result<(), String> {
    let texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);

    let new_trade = menu_item(
        app_handle,
        menu_actions::MENU_NEW_TRADE,
        texts.menu_new_trade,
        Some("CmdOrCtrl+N"),
    )?;
    let export_data = menu_item(
        app_handle,
        menu_actions::MENU_EXPORT_DATA,
        texts.menu_export_data,
        Some("CmdOrCtrl+E"),
    )?;
    let quit = menu_item(
        app_handle,
        menu_actions::MENU_QUIT,
        texts.menu_quit,
        Some("CmdOrCtrl+Q"),
    )?;
    let app_submenu = Submenu::with_items(
        app_handle,
        texts.menu_app,
        true,
        &[
            &new_trade,
            &separator(app_handle)?,
            &export_data,
            &separator(app_handle)?,
            &quit,
        ],
    )
    .map_err(|error| format!("Failed to build app submenu: {error}"))?;

    let reload = menu_item(
        app_handle,
        menu_actions::MENU_RELOAD,
        texts.menu_reload,
        Some("CmdOrCtrl+R"),
    )?;
    let toggle_theme = menu_item(
        app_handle,
        menu_actions::MENU_TOGGLE_THEME,
        texts.menu_toggle_theme,
        Some("CmdOrCtrl+T"),
    )?;
    let zoom_in = menu_item(
        app_handle,
        menu_actions::MENU_ZOOM_IN,
        texts.menu_zoom_in,
        Some("CmdOrCtrl+Plus"),
    )?;
    let zoom_out = menu_item(
        app_handle,
        menu_actions::MENU_ZOOM_OUT,
        texts.menu_zoom_out,
        Some("CmdOrCtrl+-"),
    )?;
    let zoom_reset = menu_item(
        app_handle,
        menu_actions::MENU_ZOOM_RESET,
        texts.menu_zoom_reset,
        Some("CmdOrCtrl+0"),
    )?;
    let fullscreen = menu_item(
        app_handle,
        menu_actions::MENU_TOGGLE_FULLSCREEN,
        texts.menu_fullscreen,
        Some("F11"),
    )?;
    let view_submenu = Submenu::with_items(
        app_handle,
        texts.menu_view,
        true,
        &[
            &reload,
            &toggle_theme,
            &separator(app_handle)?,
            &zoom_in,
            &zoom_out,
            &zoom_reset,
            &separator(app_handle)?,
            &fullscreen,
        ],
    )
    .map_err(|error| format!("Failed to build view submenu: {error}"))?;

    let devtools = menu_item(
        app_handle,
        menu_actions::MENU_TOGGLE_DEVTOOLS,
        texts.menu_devtools,
        Some("F12"),
    )?;
    let tools_submenu = Submenu::with_items(app_handle, texts.menu_tools, true, &[&devtools])
        .map_err(|error| format!("Failed to build tools submenu: {error}"))?;

    let check_updates = menu_item(
        app_handle,
        menu_actions::MENU_CHECK_UPDATES,
        texts.menu_check_updates,
        None,
    )?;
    let about = menu_item(app_handle, menu_actions::MENU_ABOUT, texts.menu_about, None)?;
    let help_submenu = Submenu::with_items(
        app_handle,
        texts.menu_help,
        true,
        &[&check_updates, &separator(app_handle)?, &about],
    )
    .map_err(|error| format!("Failed to build help submenu: {error}"))?;

    let menu = Menu::with_items(
        app_handle,
        &[&app_submenu, &view_submenu, &tools_submenu, &help_submenu],
    )
    .map_err(|error| format!("Failed to build application menu: {error}"))?;

    app_handle
        .set_menu(menu)
        .map_err(|error| format!("Failed to install application menu: {error}"))?;
    Ok(())
}
