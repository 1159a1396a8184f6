use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use tauri_plugin_updater::Update;

const ZOOM_STEP: f64 = 0.5;
const ZOOM_BASE: f64 = 1.2;

#[derive(Debug, serde::Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn accepted() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn rejected(reason: String) -> Self {
        Self {
            ok: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct UpdateCheckState {
    pub(crate) checking: AtomicBool,
}

/// A downloaded update the user chose to install later.
pub(crate) struct PendingUpdate {
    pub(crate) update: Update,
    pub(crate) bytes: Vec<u8>,
}

#[derive(Default)]
pub(crate) struct PendingUpdateState {
    pub(crate) pending: Mutex<Option<PendingUpdate>>,
}

impl PendingUpdateState {
    pub(crate) fn store(&self, pending: PendingUpdate) -> Result<(), String> {
        let mut guard = self
            .pending
            .lock()
            .map_err(|_| "Pending update lock poisoned.".to_string())?;
        *guard = Some(pending);
        Ok(())
    }

    pub(crate) fn take(&self) -> Option<PendingUpdate> {
        self.pending.lock().ok().and_then(|mut guard| guard.take())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZoomAction {
    In,
    Out,
    Reset,
}

#[derive(Debug, Default)]
pub(crate) struct ZoomState {
    level: Mutex<f64>,
}

impl ZoomState {
    /// Applies the action and returns the resulting zoom factor.
    pub(crate) fn apply(&self, action: ZoomAction) -> Result<f64, String> {
        let mut level = self
            .level
            .lock()
            .map_err(|_| "Zoom level lock poisoned.".to_string())?;
        *level = next_zoom_level(*level, action);
        Ok(zoom_factor(*level))
    }

    pub(crate) fn reset(&self) {
        if let Ok(mut level) = self.level.lock() {
            *level = 0.0;
        }
    }
}

pub(crate) fn next_zoom_level(level: f64, action: ZoomAction) -> f64 {
    match action {
        ZoomAction::In => level + ZOOM_STEP,
        ZoomAction::Out => level - ZOOM_STEP,
        ZoomAction::Reset => 0.0,
    }
}

pub(crate) fn zoom_factor(level: f64) -> f64 {
    ZOOM_BASE.powf(level)
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn atomic_flag_guard_try_set_rejects_double_set_until_drop() {
        let flag = AtomicBool::new(false);

        let guard = AtomicFlagGuard::try_set(&flag).expect("first set should succeed");
        assert!(flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_some());
    }

    #[test]
    fn zoom_steps_by_half_levels_and_resets() {
        assert_eq!(next_zoom_level(0.0, ZoomAction::In), 0.5);
        assert_eq!(next_zoom_level(0.5, ZoomAction::Out), 0.0);
        assert_eq!(next_zoom_level(-1.0, ZoomAction::Out), -1.5);
        assert_eq!(next_zoom_level(3.5, ZoomAction::Reset), 0.0);
    }

    #[test]
    fn zoom_state_returns_chromium_style_factors() {
        let state = ZoomState::default();
        assert_eq!(state.apply(ZoomAction::Reset).unwrap(), 1.0);

        let factor = state.apply(ZoomAction::In).unwrap();
        assert!((factor - 1.2_f64.sqrt()).abs() < 1e-9);
        state.apply(ZoomAction::In).unwrap();
        let factor = state.apply(ZoomAction::Out).unwrap();
        assert!((factor - 1.2_f64.sqrt()).abs() < 1e-9);

        state.reset();
        assert_eq!(state.apply(ZoomAction::Out).unwrap(), zoom_factor(-0.5));
    }
}
