use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Default log file; the terminal itself is owned by the reader UI.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("zone-reader");
            Some(state_dir.join("zone.log"))
        } else {
            ProjectDirs::from("", "", "zone-reader")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("zone.log"))
        }
    }
}
