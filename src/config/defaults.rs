use super::Config;
use directories::ProjectDirs;
use std::path::PathBuf;

pub const QUALIFIER: &str = "dev";
pub const ORGANIZATION: &str = "huewave";
pub const APPLICATION: &str = "huewave";

pub const HISTORY_LIMIT: usize = 100;
pub const BASE_URL: &str = "http://localhost:5000";
/// Prefix for share links printed by the CLI and shown in the share dialog.
pub const SHARE_BASE: &str = "https://huewave.app/palette";

pub fn data_dir() -> PathBuf {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|p| p.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APPLICATION))
}

/// Config written on first run.
pub fn defaults() -> Config {
    Config::default()
}
