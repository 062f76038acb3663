use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Log file location; the terminal itself is owned by the UI
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("tempotype");
            Some(state_dir.join("tempotype.log"))
        } else {
            ProjectDirs::from("", "", "tempotype")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("tempotype.log"))
        }
    }
}
