use std::{
    io,
    path::{Path, PathBuf},
};

use crate::webui_paths::{first_existing, AssetRoots};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    FileNotFound,
    Failed,
}

impl LoadOutcome {
    pub fn from_read<T>(result: &io::Result<T>) -> Self {
        match result {
            Ok(_) => Self::Loaded,
            Err(error) if error.kind() == io::ErrorKind::NotFound => Self::FileNotFound,
            Err(_) => Self::Failed,
        }
    }
}

/// Picks the index to retry with after a failed load. Development loads are never retried.
pub fn recovery_target<F>(
    outcome: LoadOutcome,
    dev_mode: bool,
    roots: &AssetRoots,
    exists: F,
) -> Option<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    if dev_mode || outcome != LoadOutcome::FileNotFound {
        return None;
    }
    first_existing(&roots.recovery_candidates(), exists)
}
