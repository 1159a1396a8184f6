use std::{
    env,
    path::{Path, PathBuf},
};

use tauri::{AppHandle, Manager};

/// Directories the packaged front end is searched from.
#[derive(Debug, Clone)]
pub struct AssetRoots {
    pub app_dir: PathBuf,
    pub resource_dir: Option<PathBuf>,
}

impl AssetRoots {
    pub fn resolve(app_handle: &AppHandle) -> Self {
        let app_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        let resource_dir = app_handle.path().resource_dir().ok();
        Self {
            app_dir,
            resource_dir,
        }
    }

    fn default_index(&self) -> PathBuf {
        self.app_dir.join("index.html")
    }

    fn packaged_dist_index(&self) -> Option<PathBuf> {
        self.resource_dir
            .as_ref()
            .map(|dir| dir.join("app").join("dist").join("index.html"))
    }

    /// Candidates probed when the surface is first created.
    pub fn startup_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = vec![
            self.default_index(),
            self.app_dir.join("..").join("dist").join("index.html"),
        ];
        candidates.extend(self.packaged_dist_index());
        candidates
    }

    /// Candidates probed after a file-not-found load failure.
    pub fn recovery_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = vec![self.app_dir.join("..").join("dist").join("index.html")];
        candidates.extend(self.packaged_dist_index());
        candidates.push(
            self.app_dir
                .join("..")
                .join("..")
                .join("dist")
                .join("index.html"),
        );
        candidates
    }
}

pub fn first_existing<F>(candidates: &[PathBuf], exists: F) -> Option<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    candidates.iter().find(|path| exists(path)).cloned()
}

/// Returns the first packaged index that exists, or the unverified default.
pub fn resolve_packaged_index<F>(roots: &AssetRoots, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    first_existing(&roots.startup_candidates(), exists).unwrap_or_else(|| roots.default_index())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn roots_in(dir: &Path) -> AssetRoots {
        AssetRoots {
            app_dir: dir.join("bin"),
            resource_dir: Some(dir.join("resources")),
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(path, "<html></html>").expect("write index");
    }

    #[test]
    fn resolve_packaged_index_skips_missing_candidates() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let roots = roots_in(dir.path());
        let present = dir.path().join("bin").join("..").join("dist").join("index.html");
        touch(&present);

        let resolved = resolve_packaged_index(&roots, Path::is_file);
        assert_eq!(resolved, present);
    }

    #[test]
    fn resolve_packaged_index_prefers_earlier_candidates() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let roots = roots_in(dir.path());
        touch(&dir.path().join("bin").join("index.html"));
        touch(&dir.path().join("resources").join("app").join("dist").join("index.html"));

        let resolved = resolve_packaged_index(&roots, Path::is_file);
        assert_eq!(resolved, dir.path().join("bin").join("index.html"));
    }

    #[test]
    fn resolve_packaged_index_falls_back_to_unverified_default() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let roots = roots_in(dir.path());

        let resolved = resolve_packaged_index(&roots, Path::is_file);
        assert_eq!(resolved, dir.path().join("bin").join("index.html"));
        assert!(!resolved.exists());
    }

    #[test]
    fn recovery_candidates_differ_from_startup_candidates() {
        let roots = AssetRoots {
            app_dir: PathBuf::from("/app/bin"),
            resource_dir: Some(PathBuf::from("/app/resources")),
        };

        let startup = roots.startup_candidates();
        let recovery = roots.recovery_candidates();
        assert_eq!(startup.len(), 3);
        assert_eq!(recovery.len(), 3);
        assert_eq!(startup[0], PathBuf::from("/app/bin/index.html"));
        assert_eq!(recovery[0], PathBuf::from("/app/bin/../dist/index.html"));
        assert_eq!(recovery[2], PathBuf::from("/app/bin/../../dist/index.html"));
    }

    #[test]
    fn candidates_skip_resource_dir_when_unknown() {
        let roots = AssetRoots {
            app_dir: PathBuf::from("/app/bin"),
            resource_dir: None,
        };
        assert_eq!(roots.startup_candidates().len(), 2);
        assert_eq!(roots.recovery_candidates().len(), 2);
    }
}
