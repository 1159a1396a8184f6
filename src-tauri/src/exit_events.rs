use tauri::{AppHandle, ExitRequestApi};

use crate::{append_desktop_log, app_updater, window_actions};

/// Whether the process should stay resident once its last window closes.
pub(crate) fn stays_resident_without_windows(target_os: &str) -> bool {
    target_os == "macos"
}

pub fn handle_exit_requested(code: Option<i32>, api: &ExitRequestApi) {
    // An explicit exit code means `exit()` was called; `None` means the last window closed.
    if code.is_none() && stays_resident_without_windows(std::env::consts::OS) {
        append_desktop_log("last window closed, staying resident");
        api.prevent_exit();
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
pub fn handle_reopen(app_handle: &AppHandle, has_visible_windows: bool) {
    if !has_visible_windows {
        window_actions::show_main_window(app_handle, append_desktop_log);
    }
}

pub fn handle_exit_event(app_handle: &AppHandle) {
    append_desktop_log("desktop process exiting");
    app_updater::install_pending_update(app_handle);
}
