use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub input: InputConfig,
    pub paths: PathsConfig,
    pub palette: PaletteConfig,
    pub keys: KeysConfig,
    pub backend: BackendConfig,
    pub account: AccountConfig,
    pub log: LogConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub dark_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub mouse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Swatches per palette (1-10)
    pub size: usize,
    /// Undo entries kept; 0 keeps everything
    pub history_limit: usize,
    /// Luminance above which swatch text turns dark
    pub contrast_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// "auto", "mac" or "other"
    pub platform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Owner id for palettes kept in the local database
    pub local_user: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    /// Working palette at last quit, restored on startup
    pub last_palette: Vec<String>,
    pub last_screen: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { mouse: true }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            size: crate::palette::DEFAULT_SIZE,
            history_limit: defaults::HISTORY_LIMIT,
            contrast_threshold: crate::color::DEFAULT_CONTRAST_THRESHOLD,
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            platform: "auto".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Local,
            base_url: defaults::BASE_URL.to_string(),
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            local_user: "local".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Palette size clamped to what a palette can hold.
    pub fn palette_size(&self) -> usize {
        self.palette.size.clamp(1, crate::palette::MAX_COLORS)
    }

    pub fn database_path(&self) -> PathBuf {
        self.paths.data_dir.join("palettes.sqlite3")
    }

    pub fn log_path(&self) -> PathBuf {
        self.paths.data_dir.join("huewave.log")
    }

    /// Cookies of the remote session, kept between runs.
    pub fn session_path(&self) -> PathBuf {
        self.paths.data_dir.join("session")
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write_config(cfg, &path)
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(defaults::QUALIFIER, defaults::ORGANIZATION, defaults::APPLICATION)
        .context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn resolve_path(override_path: Option<&Path>) -> anyhow::Result<PathBuf> {
    match override_path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = resolve_path(override_path)?;

    if !path.exists() {
        let cfg = defaults::defaults();
        write_config(&cfg, &path).context("write default config")?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let raw = r#"
[palette]
size = 7

[backend]
kind = "remote"
"#;
        let cfg: Config = toml::from_str(raw).unwrap();
        assert_eq!(cfg.palette.size, 7);
        assert_eq!(cfg.palette.history_limit, defaults::HISTORY_LIMIT);
        assert_eq!(cfg.backend.kind, BackendKind::Remote);
        assert_eq!(cfg.backend.base_url, defaults::BASE_URL);
        assert!(cfg.theme.dark_mode);
        assert_eq!(cfg.account.local_user, "local");
    }

    #[test]
    fn test_palette_size_is_clamped() {
        let mut cfg = Config::default();
        cfg.palette.size = 0;
        assert_eq!(cfg.palette_size(), 1);
        cfg.palette.size = 40;
        assert_eq!(cfg.palette_size(), 10);
    }

    #[test]
    fn test_roundtrip_through_disk() {
        let path = std::env::temp_dir().join(format!(
            "huewave-config-{}-{}.toml",
            std::process::id(),
            time::OffsetDateTime::now_utc().unix_timestamp_nanos()
        ));
        let created = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(created.keys.platform, "auto");

        let mut cfg = created;
        cfg.ui.last_palette = vec!["#FF0000".into()];
        cfg.theme.dark_mode = false;
        save(&cfg, Some(&path)).unwrap();

        let reloaded = load(Some(&path)).unwrap();
        assert_eq!(reloaded.ui.last_palette, vec!["#FF0000".to_string()]);
        assert!(!reloaded.theme.dark_mode);
        let _ = fs::remove_file(path);
    }
}
