use tauri::{AppHandle, Manager, WebviewWindow};

use crate::{main_window, ZoomAction, ZoomState, MAIN_WINDOW_LABEL};

fn with_main_window<F, L>(app_handle: &AppHandle, action_name: &str, log: L, action: F)
where
    F: FnOnce(&WebviewWindow) -> Result<(), String>,
    L: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log(&format!("{action_name} skipped: main window not found"));
        return;
    };

    if let Err(error) = action(&window) {
        log(&format!("{action_name} failed: {error}"));
    }
}

/// Focuses the main window, recreating it when the surface was closed.
pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let window = match main_window::create_main_window(app_handle) {
        Ok(window) => window,
        Err(error) => {
            log(&error);
            return;
        }
    };

    if let Ok(true) = window.is_minimized() {
        if let Err(error) = window.unminimize() {
            log(&format!("failed to unminimize main window: {error}"));
        }
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

pub fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "reload_main_window", log, |window| {
        window.reload().map_err(|error| error.to_string())
    });
}

pub fn zoom_main_window<F>(app_handle: &AppHandle, action: ZoomAction, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "zoom_main_window", log, |window| {
        let factor = app_handle.state::<ZoomState>().apply(action)?;
        window.set_zoom(factor).map_err(|error| error.to_string())
    });
}

pub fn toggle_fullscreen<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "toggle_fullscreen", log, |window| {
        let fullscreen = window.is_fullscreen().map_err(|error| error.to_string())?;
        window
            .set_fullscreen(!fullscreen)
            .map_err(|error| error.to_string())
    });
}

pub fn toggle_devtools<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    with_main_window(app_handle, "toggle_devtools", log, |window| {
        if window.is_devtools_open() {
            window.close_devtools();
        } else {
            window.open_devtools();
        }
        Ok(())
    });
}
