use std::{
    future::Future,
    sync::atomic::AtomicBool,
    time::{Duration, Instant},
};

use semver::Version;
use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_updater::{Update, UpdaterExt};

use crate::{
    append_update_log, runtime_mode, shell_locale, ui_dispatch, AtomicFlagGuard, PendingUpdate,
    PendingUpdateState, UpdateCheckState, AUTO_UPDATE_CHECK_DELAY, DEFAULT_SHELL_LOCALE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOrigin {
    Scheduled,
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAvailability {
    Available(String),
    UpToDate,
}

/// Runs `task` only if no other guarded task holds `flag`; the flag is released once it settles.
pub(crate) async fn run_exclusive<F, Fut, T>(flag: &AtomicBool, task: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let _guard = AtomicFlagGuard::try_set(flag)?;
    Some(task().await)
}

pub fn classify_check_result(
    current_version: &str,
    latest_version: Option<&str>,
) -> UpdateAvailability {
    let Some(latest) = latest_version.map(str::trim).filter(|value| !value.is_empty()) else {
        return UpdateAvailability::UpToDate;
    };
    if latest == current_version {
        return UpdateAvailability::UpToDate;
    }

    match (Version::parse(current_version), Version::parse(latest)) {
        (Ok(current), Ok(remote)) if remote <= current => UpdateAvailability::UpToDate,
        _ => UpdateAvailability::Available(latest.to_string()),
    }
}

pub fn accept_remote_version(current: &Version, remote: &Version, allow_prerelease: bool) -> bool {
    if !allow_prerelease && !remote.pre.is_empty() {
        return false;
    }
    remote > current
}

pub(crate) fn download_percent(downloaded: u64, content_length: Option<u64>) -> Option<f64> {
    match content_length {
        Some(total) if total > 0 => Some(downloaded as f64 * 100.0 / total as f64),
        _ => None,
    }
}

pub fn schedule_startup_check(app_handle: &AppHandle) {
    if runtime_mode::is_dev_mode() {
        append_update_log("development mode, skipping scheduled update check");
        return;
    }

    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        run_after(AUTO_UPDATE_CHECK_DELAY, check_for_updates(app_handle, CheckOrigin::Scheduled))
            .await;
    });
}

pub(crate) async fn run_after<Fut>(delay: Duration, task: Fut) -> Fut::Output
where
    Fut: Future,
{
    tokio::time::sleep(delay).await;
    task.await
}

pub fn spawn_update_check(app_handle: AppHandle, origin: CheckOrigin) {
    tauri::async_runtime::spawn(async move {
        check_for_updates(app_handle, origin).await;
    });
}

pub async fn check_for_updates(app_handle: AppHandle, origin: CheckOrigin) {
    let state = app_handle.state::<UpdateCheckState>();
    let outcome = run_exclusive(&state.checking, || run_update_flow(&app_handle, origin)).await;
    if outcome.is_none() {
        append_update_log(&format!("{origin:?} update check ignored: a check is already running"));
    }
}

async fn run_update_flow(app_handle: &AppHandle, origin: CheckOrigin) {
    let texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);
    let current_version = app_handle.package_info().version.to_string();
    let allow_prerelease = runtime_mode::is_dev_mode();

    let updater = match app_handle
        .updater_builder()
        .version_comparator(move |current, release| {
            accept_remote_version(&current, &release.version, allow_prerelease)
        })
        .build()
    {
        Ok(updater) => updater,
        Err(error) => {
            append_update_log(&format!("failed to initialize updater: {error}"));
            report_check_failure(app_handle, origin);
            return;
        }
    };

    append_update_log(&format!(
        "checking for updates: origin={origin:?} current_version={current_version}"
    ));
    let check_started = Instant::now();
    let update = match updater.check().await {
        Ok(update) => update,
        Err(error) => {
            append_update_log(&format!(
                "check failed: elapsed_ms={} error={}",
                check_started.elapsed().as_millis(),
                error
            ));
            report_check_failure(app_handle, origin);
            return;
        }
    };

    let latest_version = update.as_ref().map(|update| update.version.clone());
    append_update_log(&format!(
        "check finished: current_version={} latest_version={} elapsed_ms={}",
        current_version,
        latest_version.as_deref().unwrap_or("none"),
        check_started.elapsed().as_millis()
    ));

    let update = match (
        classify_check_result(&current_version, latest_version.as_deref()),
        update,
    ) {
        (UpdateAvailability::Available(_), Some(update)) => update,
        _ => {
            if origin == CheckOrigin::Interactive {
                app_handle
                    .dialog()
                    .message(texts.update_none_message)
                    .title(texts.update_none_title)
                    .kind(MessageDialogKind::Info)
                    .show(|_| {});
            }
            return;
        }
    };

    let should_download = app_handle
        .dialog()
        .message(format!("{} ({})", texts.update_available_message, update.version))
        .title(texts.update_available_title)
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::OkCancelCustom(
            texts.update_download.to_string(),
            texts.update_later.to_string(),
        ))
        .blocking_show();
    if !should_download {
        append_update_log("user postponed the update download");
        return;
    }

    let bytes = match download_update(&update).await {
        Ok(bytes) => bytes,
        Err(error) => {
            append_update_log(&error);
            report_update_error(app_handle, &error);
            return;
        }
    };

    let should_restart = app_handle
        .dialog()
        .message(texts.update_ready_message)
        .title(texts.update_ready_title)
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::OkCancelCustom(
            texts.update_restart_now.to_string(),
            texts.update_later.to_string(),
        ))
        .blocking_show();
    if !should_restart {
        append_update_log(&format!(
            "update {} will be installed when the application exits",
            update.version
        ));
        if let Err(error) = app_handle
            .state::<PendingUpdateState>()
            .store(PendingUpdate { update, bytes })
        {
            append_update_log(&error);
        }
        return;
    }

    let dispatch = ui_dispatch::run_on_main_thread_dispatch(
        app_handle,
        "install update and restart",
        move |main_app| {
            if let Err(error) = update.install(&bytes) {
                let reason = format!("failed to install update {}: {error}", update.version);
                append_update_log(&reason);
                report_update_error(main_app, &reason);
                return;
            }
            append_update_log(&format!("update {} installed, restarting", update.version));
            main_app.request_restart();
        },
    );
    if let Err(error) = dispatch {
        append_update_log(&error);
    }
}

async fn download_update(update: &Update) -> Result<Vec<u8>, String> {
    let mut downloaded: u64 = 0;
    let mut last_logged_percent: i64 = -10;
    update
        .download(
            |chunk_length, content_length| {
                downloaded += chunk_length as u64;
                if let Some(percent) = download_percent(downloaded, content_length) {
                    let rounded = percent.floor() as i64;
                    if rounded >= last_logged_percent + 10 {
                        last_logged_percent = rounded;
                        append_update_log(&format!("download progress: {percent:.1}%"));
                    }
                }
            },
            || append_update_log("download finished"),
        )
        .await
        .map_err(|error| format!("failed to download update {}: {error}", update.version))
}

fn report_check_failure(app_handle: &AppHandle, origin: CheckOrigin) {
    if origin != CheckOrigin::Interactive {
        return;
    }
    let texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);
    app_handle
        .dialog()
        .message(texts.update_failed_message)
        .title(texts.update_none_title)
        .kind(MessageDialogKind::Error)
        .show(|_| {});
}

fn report_update_error(app_handle: &AppHandle, detail: &str) {
    let texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);
    app_handle
        .dialog()
        .message(format!("{}\n\n{}", texts.update_error_message, detail))
        .title(texts.update_error_title)
        .kind(MessageDialogKind::Error)
        .show(|_| {});
}

/// Installs an update the user deferred; called once the event loop is exiting.
pub fn install_pending_update(app_handle: &AppHandle) {
    let Some(state) = app_handle.try_state::<PendingUpdateState>() else {
        return;
    };
    let Some(pending) = state.take() else {
        return;
    };

    append_update_log(&format!("installing deferred update {}", pending.update.version));
    if let Err(error) = pending.update.install(&pending.bytes) {
        append_update_log(&format!(
            "failed to install deferred update {}: {error}",
            pending.update.version
        ));
    }
}
