use std::panic::{self, PanicHookInfo};

use crate::append_desktop_log;

pub(crate) fn describe_panic(info: &PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    let location = info
        .location()
        .map(|location| format!("{}:{}", location.file(), location.line()))
        .unwrap_or_else(|| "unknown location".to_string());
    let thread_name = std::thread::current()
        .name()
        .unwrap_or("unnamed")
        .to_string();

    format!("uncaught panic on thread '{thread_name}' at {location}: {payload}")
}

/// Panics are logged and otherwise left alone; async tasks that panic just end.
pub fn install_panic_logger() {
    panic::set_hook(Box::new(|info| {
        append_desktop_log(&describe_panic(info));
    }));
}
