use std::borrow::Cow;

use tauri::{webview::PageLoadEvent, Manager, RunEvent};

use crate::{
    app_menu, app_updater, append_desktop_log, append_startup_log, asset_protocol::AssetServer,
    desktop_bridge::BridgeState, exit_events, fault_hooks, main_window, menu_handler,
    runtime_mode, window_actions, PendingUpdateState, UpdateCheckState, ZoomState, ASSET_SCHEME,
    DESKTOP_LOG_FILE,
};

pub(crate) fn run() {
    fault_hooks::install_panic_logger();

    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        crate::logging::resolve_desktop_log_path(
            crate::logging::default_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));
    append_startup_log(&format!("development mode: {}", runtime_mode::is_dev_mode()));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            append_desktop_log("second instance launched, focusing main window");
            window_actions::show_main_window(app, append_desktop_log);
        }))
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .manage(UpdateCheckState::default())
        .manage(PendingUpdateState::default())
        .manage(ZoomState::default())
        .manage(BridgeState::default())
        .register_asynchronous_uri_scheme_protocol(ASSET_SCHEME, |ctx, request, responder| {
            let app_handle = ctx.app_handle().clone();
            tauri::async_runtime::spawn_blocking(move || {
                let response = match app_handle.try_state::<AssetServer>() {
                    Some(server) => server.handle(&request),
                    None => {
                        append_desktop_log(&format!(
                            "asset request before the server is ready: {}",
                            request.uri()
                        ));
                        let mut response = tauri::http::Response::new(Cow::Borrowed(&b""[..]));
                        *response.status_mut() = tauri::http::StatusCode::SERVICE_UNAVAILABLE;
                        response
                    }
                };
                responder.respond(response);
            });
        })
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::bridge_subscribe,
            crate::desktop_bridge_commands::bridge_unsubscribe,
        ])
        .on_menu_event(|app_handle, event| {
            menu_handler::handle_menu_event(app_handle, event.id().as_ref())
        })
        .on_page_load(|webview, payload| {
            let Some(window) = webview.app_handle().get_webview_window(webview.label()) else {
                return;
            };
            match payload.event() {
                PageLoadEvent::Started => {
                    append_desktop_log(&format!("page-load started: {}", payload.url()));
                }
                PageLoadEvent::Finished => {
                    append_desktop_log(&format!("page-load finished: {}", payload.url()));
                    main_window::show_when_ready(&window);
                }
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            if let Err(error) = app_menu::setup_app_menu(&app_handle) {
                append_startup_log(&format!("failed to initialize menu: {error}"));
            }
            if let Err(error) = main_window::create_main_window(&app_handle) {
                append_startup_log(&error);
            }
            app_updater::schedule_startup_check(&app_handle);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                exit_events::handle_exit_requested(code, &api);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen {
                has_visible_windows,
                ..
            } => {
                exit_events::handle_reopen(app_handle, has_visible_windows);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            _ => {}
        });
}
