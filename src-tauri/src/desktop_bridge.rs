use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, OnceLock},
};

use serde::Serialize;
use tauri::{ipc::Channel, AppHandle, Manager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BridgeChannel {
    NewTrade,
    ToggleTheme,
    ExportData,
}

impl BridgeChannel {
    pub const ALL: [BridgeChannel; 3] = [
        BridgeChannel::NewTrade,
        BridgeChannel::ToggleTheme,
        BridgeChannel::ExportData,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BridgeChannel::NewTrade => "new-trade",
            BridgeChannel::ToggleTheme => "toggle-theme",
            BridgeChannel::ExportData => "export-data",
        }
    }

    /// Resolves a channel name against the frozen allow-list.
    pub fn from_name(name: &str) -> Option<Self> {
        if !allowed_channel_names().contains(name) {
            return None;
        }
        Self::ALL.into_iter().find(|channel| channel.as_str() == name)
    }
}

fn allowed_channel_names() -> &'static HashSet<&'static str> {
    static NAMES: OnceLock<HashSet<&'static str>> = OnceLock::new();
    NAMES.get_or_init(|| BridgeChannel::ALL.iter().map(|channel| channel.as_str()).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeSignal {
    pub channel: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl BridgeSignal {
    pub fn new(channel: BridgeChannel) -> Self {
        Self {
            channel: channel.as_str(),
            path: None,
        }
    }

    pub fn with_path(channel: BridgeChannel, path: String) -> Self {
        Self {
            channel: channel.as_str(),
            path: Some(path),
        }
    }
}

/// Content-side receiver of host signals.
pub trait SignalSink {
    fn deliver(&self, signal: BridgeSignal) -> Result<(), String>;
}

impl SignalSink for Channel<BridgeSignal> {
    fn deliver(&self, signal: BridgeSignal) -> Result<(), String> {
        self.send(signal)
            .map_err(|error| format!("Failed to deliver bridge signal: {error}"))
    }
}

/// At most one sink per channel; registering again replaces the previous sink.
#[derive(Debug)]
pub struct SignalBridge<S> {
    sinks: HashMap<BridgeChannel, S>,
}

impl<S> Default for SignalBridge<S> {
    fn default() -> Self {
        Self {
            sinks: HashMap::new(),
        }
    }
}

impl<S: SignalSink> SignalBridge<S> {
    /// Returns true when an earlier sink was replaced.
    pub fn subscribe(&mut self, channel: BridgeChannel, sink: S) -> bool {
        self.sinks.insert(channel, sink).is_some()
    }

    /// Names outside the allow-list are ignored.
    pub fn remove_all_listeners(&mut self, channel_name: &str) -> bool {
        match BridgeChannel::from_name(channel_name) {
            Some(channel) => self.sinks.remove(&channel).is_some(),
            None => false,
        }
    }

    pub fn has_listener(&self, channel: BridgeChannel) -> bool {
        self.sinks.contains_key(&channel)
    }

    /// Returns Ok(false) when no sink is registered for the signal's channel.
    pub fn dispatch(&self, channel: BridgeChannel, signal: BridgeSignal) -> Result<bool, String> {
        match self.sinks.get(&channel) {
            Some(sink) => sink.deliver(signal).map(|()| true),
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct BridgeState {
    pub(crate) bridge: Mutex<SignalBridge<Channel<BridgeSignal>>>,
}

pub fn dispatch_signal<F>(app_handle: &AppHandle, signal: BridgeSignal, log: F)
where
    F: Fn(&str),
{
    let Some(channel) = BridgeChannel::from_name(signal.channel) else {
        log(&format!("dropping signal on unknown channel {}", signal.channel));
        return;
    };
    let Some(state) = app_handle.try_state::<BridgeState>() else {
        return;
    };
    let bridge = match state.bridge.lock() {
        Ok(bridge) => bridge,
        Err(_) => {
            log("bridge registry lock poisoned");
            return;
        }
    };

    match bridge.dispatch(channel, signal) {
        Ok(true) => {}
        Ok(false) => log(&format!("no listener for bridge channel {}", channel.as_str())),
        Err(error) => log(&error),
    }
}

const BRIDGE_SCRIPT_TEMPLATE: &str = r#"(() => {
  if (window.metrixDesktop) return;
  const channels = new Set(__CHANNELS__);
  const ipc = () => window.__TAURI_INTERNALS__;
  const unwrap = (payload) => {
    if (payload && typeof payload === "object" && "index" in payload) {
      return "message" in payload ? payload.message : undefined;
    }
    return payload;
  };
  const subscribe = (channel, deliver) => {
    const api = ipc();
    if (!api) return;
    const id = api.transformCallback((payload) => {
      const signal = unwrap(payload);
      if (signal !== undefined) deliver(signal);
    });
    api.invoke("bridge_subscribe", { channel, onSignal: `__CHANNEL__:${id}` }).catch(() => {});
  };
  const bridge = Object.freeze({
    isDesktop: true,
    platform: __PLATFORM__,
    onNewTrade: (callback) => subscribe("new-trade", () => callback()),
    onToggleTheme: (callback) => subscribe("toggle-theme", () => callback()),
    onExportData: (callback) => subscribe("export-data", (signal) => callback(signal.path)),
    removeAllListeners: (channel) => {
      if (!channels.has(channel)) return;
      const api = ipc();
      if (api) api.invoke("bridge_unsubscribe", { channel }).catch(() => {});
    },
  });
  Object.defineProperty(window, "metrixDesktop", {
    value: bridge,
    writable: false,
    configurable: false,
  });
})();
"#;

/// Script injected into every page before its own scripts run.
pub fn bridge_script() -> String {
    let channels: Vec<&str> = BridgeChannel::ALL.iter().map(|channel| channel.as_str()).collect();
    let channels_json = serde_json::to_string(&channels).unwrap_or_else(|_| "[]".to_string());
    let platform_json = serde_json::to_string(std::env::consts::OS)
        .unwrap_or_else(|_| "\"unknown\"".to_string());

    BRIDGE_SCRIPT_TEMPLATE
        .replace("__CHANNELS__", &channels_json)
        .replace("__PLATFORM__", &platform_json)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingSink {
        received: Rc<RefCell<Vec<BridgeSignal>>>,
    }

    impl SignalSink for RecordingSink {
        fn deliver(&self, signal: BridgeSignal) -> Result<(), String> {
            self.received.borrow_mut().push(signal);
            Ok(())
        }
    }

    #[test]
    fn from_name_accepts_only_allow_listed_channels() {
        assert_eq!(BridgeChannel::from_name("new-trade"), Some(BridgeChannel::NewTrade));
        assert_eq!(BridgeChannel::from_name("toggle-theme"), Some(BridgeChannel::ToggleTheme));
        assert_eq!(BridgeChannel::from_name("export-data"), Some(BridgeChannel::ExportData));
        assert_eq!(BridgeChannel::from_name("shell-exec"), None);
        assert_eq!(BridgeChannel::from_name("NEW-TRADE"), None);
    }

    #[test]
    fn subscribe_replaces_previous_sink() {
        let first = RecordingSink::default();
        let second = RecordingSink::default();
        let mut bridge = SignalBridge::default();

        assert!(!bridge.subscribe(BridgeChannel::NewTrade, first.clone()));
        assert!(bridge.subscribe(BridgeChannel::NewTrade, second.clone()));

        let delivered = bridge
            .dispatch(BridgeChannel::NewTrade, BridgeSignal::new(BridgeChannel::NewTrade))
            .expect("dispatch");
        assert!(delivered);
        assert!(first.received.borrow().is_empty());
        assert_eq!(second.received.borrow().len(), 1);
    }

    #[test]
    fn remove_all_listeners_ignores_unknown_channels() {
        let sink = RecordingSink::default();
        let mut bridge = SignalBridge::default();
        bridge.subscribe(BridgeChannel::ToggleTheme, sink.clone());

        assert!(!bridge.remove_all_listeners("ipc-internal"));
        assert!(!bridge.remove_all_listeners(""));
        assert!(bridge.has_listener(BridgeChannel::ToggleTheme));

        assert!(bridge.remove_all_listeners("toggle-theme"));
        assert!(!bridge.has_listener(BridgeChannel::ToggleTheme));
        assert!(!bridge.remove_all_listeners("toggle-theme"));
    }

    #[test]
    fn dispatch_without_listener_is_a_silent_no_op() {
        let bridge: SignalBridge<RecordingSink> = SignalBridge::default();
        let delivered = bridge
            .dispatch(BridgeChannel::ToggleTheme, BridgeSignal::new(BridgeChannel::ToggleTheme))
            .expect("dispatch");
        assert!(!delivered);
    }

    #[test]
    fn export_signal_carries_path_payload() {
        let sink = RecordingSink::default();
        let mut bridge = SignalBridge::default();
        bridge.subscribe(BridgeChannel::ExportData, sink.clone());

        let signal =
            BridgeSignal::with_path(BridgeChannel::ExportData, "/tmp/trades.json".to_string());
        bridge
            .dispatch(BridgeChannel::ExportData, signal)
            .expect("dispatch");

        let received = sink.received.borrow();
        assert_eq!(received[0].path.as_deref(), Some("/tmp/trades.json"));
        assert_eq!(
            serde_json::to_value(&received[0]).unwrap(),
            serde_json::json!({ "channel": "export-data", "path": "/tmp/trades.json" })
        );
    }

    #[test]
    fn bridge_script_lists_exactly_the_allowed_channels() {
        let script = bridge_script();
        assert!(script.contains(r#"new Set(["new-trade","toggle-theme","export-data"])"#));
        assert!(script.contains("bridge_subscribe"));
        assert!(script.contains("bridge_unsubscribe"));
        assert!(!script.contains("__CHANNELS__"));
        assert!(!script.contains("__PLATFORM__"));
    }

    #[test]
    fn bridge_script_relies_only_on_internal_ipc() {
        let script = bridge_script();
        assert!(script.contains("window.__TAURI_INTERNALS__"));
        assert!(!script.contains("window.__TAURI__"));
        assert!(script.contains("__CHANNEL__:${id}"));
    }

    #[test]
    fn content_gets_no_global_api_and_no_permissions() {
        let config: serde_json::Value = serde_json::from_str(include_str!("../tauri.conf.json"))
            .expect("parse tauri.conf.json");
        assert_ne!(config["app"]["withGlobalTauri"], serde_json::Value::Bool(true));

        let capability: serde_json::Value =
            serde_json::from_str(include_str!("../capabilities/default.json"))
                .expect("parse default capability");
        assert_eq!(capability["windows"], serde_json::json!(["main"]));
        assert_eq!(capability["permissions"], serde_json::json!([]));
        assert!(capability.get("remote").is_none());
    }
}
