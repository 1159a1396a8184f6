use tauri::{
    webview::NewWindowResponse, AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder,
};
use url::Url;

use crate::{
    append_desktop_log, append_startup_log,
    asset_protocol::{self, AssetServer},
    desktop_bridge, external_links,
    origin_policy::{self, NavigationDecision},
    runtime_mode,
    webui_paths::AssetRoots,
    ZoomState, DEV_SERVER_URL, MAIN_WINDOW_LABEL, PRODUCT_NAME, WINDOW_HEIGHT, WINDOW_MIN_HEIGHT,
    WINDOW_MIN_WIDTH, WINDOW_WIDTH,
};

fn resolve_start_url(app_handle: &AppHandle, dev_mode: bool) -> Result<Url, String> {
    if dev_mode {
        return Url::parse(DEV_SERVER_URL)
            .map_err(|error| format!("Invalid development URL {DEV_SERVER_URL}: {error}"));
    }

    if app_handle.try_state::<AssetServer>().is_none() {
        let server = AssetServer::from_roots(AssetRoots::resolve(app_handle), dev_mode);
        append_startup_log(&format!(
            "serving packaged front end from {}",
            server.dist_dir().display()
        ));
        app_handle.manage(server);
    }
    asset_protocol::start_url()
}

fn allow_navigation(url: &Url, dev_mode: bool) -> bool {
    match origin_policy::decide_navigation(url.as_str(), dev_mode) {
        NavigationDecision::Allow => true,
        NavigationDecision::OpenExternal(target) => {
            external_links::open_external(target.as_str(), append_desktop_log);
            false
        }
        NavigationDecision::Block => {
            append_desktop_log(&format!("blocked navigation to {url}"));
            false
        }
    }
}

pub fn create_main_window(app_handle: &AppHandle) -> Result<WebviewWindow, String> {
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        return Ok(window);
    }

    let dev_mode = runtime_mode::is_dev_mode();
    let start_url = resolve_start_url(app_handle, dev_mode)?;
    append_startup_log(&format!("loading content from {start_url} (dev_mode={dev_mode})"));

    if let Some(zoom) = app_handle.try_state::<ZoomState>() {
        zoom.reset();
    }

    let mut builder =
        WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, WebviewUrl::External(start_url))
            .title(PRODUCT_NAME)
            .inner_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .min_inner_size(WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT)
            .visible(false)
            .initialization_script(&desktop_bridge::bridge_script());
    if dev_mode {
        builder = builder.initialization_script(&origin_policy::dev_policy_script());
    }

    builder
        .on_navigation(move |url| allow_navigation(url, dev_mode))
        .on_new_window(|url, _features| {
            external_links::open_external(url.as_str(), append_desktop_log);
            NewWindowResponse::Deny
        })
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))
}

/// Shows the window the first time its content finishes loading.
pub fn show_when_ready(window: &WebviewWindow) {
    match window.is_visible() {
        Ok(true) => {}
        Ok(false) => {
            if let Err(error) = window.show() {
                append_desktop_log(&format!("failed to show main window: {error}"));
                return;
            }
            if runtime_mode::is_dev_mode() {
                window.open_devtools();
            }
        }
        Err(error) => {
            append_desktop_log(&format!("failed to read main window visibility: {error}"))
        }
    }
}
