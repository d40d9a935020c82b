use std::{fs, path::PathBuf};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "chatbot-tui";

/// On-disk locations owned by the application. Only logs are written; the
/// transcript itself is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub log_dir: PathBuf,
}

impl StorageLayout {
    pub fn resolve() -> Result<Self, AppError> {
        let base = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve state directory (XDG_STATE_HOME/HOME)".into(),
            })?;

        Ok(Self::under(base.join(APP_DIR_NAME)))
    }

    pub fn under(root: PathBuf) -> Self {
        Self {
            log_dir: root.join("logs"),
        }
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.log_dir).map_err(|source| AppError::StorageDirCreate {
            path: self.log_dir.clone(),
            source,
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(crate::infra::logging::log_file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_is_inside_log_dir() {
        let layout = StorageLayout::under(PathBuf::from("/tmp/chatbot-tui-test"));

        assert!(layout.log_file().starts_with(&layout.log_dir));
        assert!(layout.log_dir.ends_with("logs"));
    }

    #[test]
    fn ensure_dirs_creates_log_dir() {
        let root = tempfile::tempdir().expect("temp dir");
        let layout = StorageLayout::under(root.path().join("app"));

        layout.ensure_dirs().expect("dirs should be created");

        assert!(layout.log_dir.is_dir());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn resolves_under_xdg_state_home() {
        let _guard = crate::test_support::env_lock();
        let root = tempfile::tempdir().expect("temp dir");

        let old = std::env::var_os("XDG_STATE_HOME");
        // SAFETY: env is guarded by process-wide test mutex.
        unsafe { std::env::set_var("XDG_STATE_HOME", root.path()) };

        let layout = StorageLayout::resolve().expect("layout should resolve");

        match old {
            // SAFETY: restoring env while guard is held.
            Some(value) => unsafe { std::env::set_var("XDG_STATE_HOME", value) },
            // SAFETY: restoring env while guard is held.
            None => unsafe { std::env::remove_var("XDG_STATE_HOME") },
        }

        assert!(layout.log_dir.starts_with(root.path().join(APP_DIR_NAME)));
    }
}
