use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    append_desktop_log, app_updater,
    desktop_bridge::{self, BridgeChannel, BridgeSignal},
    menu_actions::{self, MenuAction},
    shell_locale, window_actions, ZoomAction, DEFAULT_SHELL_LOCALE, MAIN_WINDOW_LABEL,
    PRODUCT_NAME,
};

fn export_data(app_handle: &AppHandle) {
    let texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);
    let dispatch_handle = app_handle.clone();
    app_handle
        .dialog()
        .file()
        .set_title(texts.export_dialog_title)
        .set_file_name(texts.export_default_file_name)
        .add_filter(texts.export_filter_json, &["json"])
        .add_filter(texts.export_filter_all, &["*"])
        .save_file(move |file_path| {
            let Some(file_path) = file_path else {
                append_desktop_log("export cancelled by user");
                return;
            };
            let path = match file_path.into_path() {
                Ok(path) => path.display().to_string(),
                Err(error) => {
                    append_desktop_log(&format!("export path is not a local file: {error}"));
                    return;
                }
            };
            desktop_bridge::dispatch_signal(
                &dispatch_handle,
                BridgeSignal::with_path(BridgeChannel::ExportData, path),
                append_desktop_log,
            );
        });
}

fn show_about(app_handle: &AppHandle) {
    let texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);
    let version = app_handle.package_info().version.to_string();
    app_handle
        .dialog()
        .message(format!(
            "{PRODUCT_NAME}\n\nVersion {version}\n\n{}",
            texts.about_detail
        ))
        .title(texts.about_title)
        .kind(MessageDialogKind::Info)
        .show(|_| {});
}

pub fn handle_menu_event(app_handle: &AppHandle, menu_id: &str) {
    let Some(action) = menu_actions::action_from_menu_id(menu_id) else {
        return;
    };
    if action.requires_main_window() && app_handle.get_webview_window(MAIN_WINDOW_LABEL).is_none()
    {
        append_desktop_log(&format!("menu action {action:?} skipped: no main window"));
        return;
    }

    match action {
        MenuAction::NewTrade => desktop_bridge::dispatch_signal(
            app_handle,
            BridgeSignal::new(BridgeChannel::NewTrade),
            append_desktop_log,
        ),
        MenuAction::ExportData => export_data(app_handle),
        MenuAction::Quit => {
            append_desktop_log("quit requested from menu");
            app_handle.exit(0);
        }
        MenuAction::Reload => window_actions::reload_main_window(app_handle, append_desktop_log),
        MenuAction::ToggleTheme => desktop_bridge::dispatch_signal(
            app_handle,
            BridgeSignal::new(BridgeChannel::ToggleTheme),
            append_desktop_log,
        ),
        MenuAction::ZoomIn => {
            window_actions::zoom_main_window(app_handle, ZoomAction::In, append_desktop_log)
        }
        MenuAction::ZoomOut => {
            window_actions::zoom_main_window(app_handle, ZoomAction::Out, append_desktop_log)
        }
        MenuAction::ZoomReset => {
            window_actions::zoom_main_window(app_handle, ZoomAction::Reset, append_desktop_log)
        }
        MenuAction::ToggleFullscreen => {
            window_actions::toggle_fullscreen(app_handle, append_desktop_log)
        }
        MenuAction::ToggleDevtools => {
            window_actions::toggle_devtools(app_handle, append_desktop_log)
        }
        MenuAction::CheckUpdates => app_updater::spawn_update_check(
            app_handle.clone(),
            app_updater::CheckOrigin::Interactive,
        ),
        MenuAction::About => show_about(app_handle),
    }
}
