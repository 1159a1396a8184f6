#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_menu;
mod app_runtime;
mod app_types;
mod app_updater;
mod asset_protocol;
mod desktop_bridge;
mod desktop_bridge_commands;
mod exit_events;
mod external_links;
mod fault_hooks;
mod load_recovery;
mod logging;
mod main_window;
mod menu_actions;
mod menu_handler;
mod origin_policy;
mod runtime_mode;
mod shell_locale;
mod ui_dispatch;
mod webui_paths;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_types::{
    AtomicFlagGuard, BridgeResult, PendingUpdate, PendingUpdateState, UpdateCheckState,
    ZoomAction, ZoomState,
};
pub(crate) use logging::{append_desktop_log, append_startup_log, append_update_log};

fn main() {
    app_runtime::run();
}
