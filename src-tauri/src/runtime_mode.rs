use std::{
    env,
    path::{Component, Path},
    sync::OnceLock,
};

use crate::DEV_MODE_ENV;

static DEV_MODE: OnceLock<bool> = OnceLock::new();

/// Development mode is decided once per process and never changes afterwards.
pub fn is_dev_mode() -> bool {
    *DEV_MODE.get_or_init(|| {
        let env_value = env::var(DEV_MODE_ENV).ok();
        let exe_path = env::current_exe().unwrap_or_default();
        detect_dev_mode(env_value.as_deref(), tauri::is_dev(), &exe_path)
    })
}

pub(crate) fn detect_dev_mode(
    env_value: Option<&str>,
    runtime_is_dev: bool,
    exe_path: &Path,
) -> bool {
    env_value.map(str::trim) == Some("development")
        || runtime_is_dev
        || is_cargo_debug_executable(exe_path)
}

fn is_cargo_debug_executable(exe_path: &Path) -> bool {
    let components: Vec<&str> = exe_path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    components
        .windows(2)
        .any(|pair| pair[0] == "target" && pair[1] == "debug")
}
