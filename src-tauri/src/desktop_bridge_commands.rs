use tauri::{ipc::Channel, AppHandle, Manager};

use crate::{
    append_desktop_log,
    desktop_bridge::{BridgeChannel, BridgeSignal, BridgeState},
    BridgeResult,
};

#[tauri::command]
pub(crate) fn bridge_subscribe(
    app_handle: AppHandle,
    channel: String,
    on_signal: Channel<BridgeSignal>,
) -> BridgeResult {
    let Some(bridge_channel) = BridgeChannel::from_name(&channel) else {
        return BridgeResult::rejected(format!("Unknown bridge channel '{channel}'."));
    };

    let state = app_handle.state::<BridgeState>();
    let mut bridge = match state.bridge.lock() {
        Ok(bridge) => bridge,
        Err(_) => return BridgeResult::rejected("Bridge registry lock poisoned.".to_string()),
    };
    if bridge.subscribe(bridge_channel, on_signal) {
        append_desktop_log(&format!("replaced listener for bridge channel {channel}"));
    }
    BridgeResult::accepted()
}

#[tauri::command]
pub(crate) fn bridge_unsubscribe(app_handle: AppHandle, channel: String) -> BridgeResult {
    let state = app_handle.state::<BridgeState>();
    match state.bridge.lock() {
        Ok(mut bridge) => {
            bridge.remove_all_listeners(&channel);
            BridgeResult::accepted()
        }
        Err(_) => BridgeResult::rejected("Bridge registry lock poisoned.".to_string()),
    }
}
