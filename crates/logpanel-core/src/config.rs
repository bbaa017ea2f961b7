//! Settings for the log panel, read from `config.toml`.
//!
//! The struct defaults are the source of truth. The first run writes them out
//! as [`DEFAULT_CONFIG`] so users have a file to edit; afterwards the user file
//! is layered over the defaults and any key it omits keeps its default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{extension::PANEL_LABEL, types::DEFAULT_TIME_FORMAT};

/// Written to disk when no config file exists yet.
pub const DEFAULT_CONFIG: &str = r#"[ui]
panel_title        = "Console Log Output"
show_timestamps    = true
timestamp_format   = "%H:%M:%S"
strip_markup       = true
auto_show          = true
auto_show_delay_ms = 2000

[keybindings]
clear         = "c"
toggle_panel  = "l"
scroll_to_top = "g"
"#;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub keybindings: KeybindingsConfig,
}

/// `[ui]`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub panel_title: String,
    pub show_timestamps: bool,
    /// chrono format string for the time-of-day column.
    pub timestamp_format: String,
    /// Render display content with HTML tags removed. Stored content is
    /// never modified.
    pub strip_markup: bool,
    /// Open the panel automatically once the application is ready.
    pub auto_show: bool,
    pub auto_show_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            panel_title: PANEL_LABEL.into(),
            show_timestamps: true,
            timestamp_format: DEFAULT_TIME_FORMAT.into(),
            strip_markup: true,
            auto_show: true,
            auto_show_delay_ms: 2000,
        }
    }
}

impl UiConfig {
    pub fn auto_show_delay(&self) -> Duration {
        Duration::from_millis(self.auto_show_delay_ms)
    }
}

/// `[keybindings]`: each value names a single key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub clear: String,
    pub toggle_panel: String,
    pub scroll_to_top: String,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self { clear: "c".into(), toggle_panel: "l".into(), scroll_to_top: "g".into() }
    }
}

impl Config {
    /// Built-in settings, no filesystem access.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Read the user's config file, writing [`DEFAULT_CONFIG`] there first if
    /// it is missing.
    pub fn load() -> anyhow::Result<Self> {
        let path = default_path();
        if !path.exists() {
            write_defaults(&path)?;
            tracing::info!(path = %path.display(), "wrote default config");
        }
        Self::load_from(&path)
    }

    /// Layer `path` over the defaults. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let layered = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .build()?;
        Ok(layered.try_deserialize()?)
    }
}

fn write_defaults(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, DEFAULT_CONFIG)
}

/// `$XDG_CONFIG_HOME/logpanel/config.toml`, falling back to `$HOME/.config`.
fn default_path() -> PathBuf {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::var_os("HOME")
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
            .join(".config"),
    };
    base.join("logpanel").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert!(cfg.ui.show_timestamps);
        assert!(cfg.ui.strip_markup);
        assert_eq!(cfg.ui.panel_title, "Console Log Output");
        assert_eq!(cfg.ui.timestamp_format, "%H:%M:%S");
        assert_eq!(cfg.ui.auto_show_delay(), Duration::from_secs(2));
        assert_eq!(cfg.keybindings.clear, "c");
        assert_eq!(cfg.keybindings.toggle_panel, "l");
    }

    #[test]
    fn written_defaults_parse_back_to_struct_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        write_defaults(&path).unwrap();

        let cfg = Config::load_from(&path).unwrap();
        let coded = Config::defaults();
        assert_eq!(cfg.ui.panel_title, coded.ui.panel_title);
        assert_eq!(cfg.ui.timestamp_format, coded.ui.timestamp_format);
        assert_eq!(cfg.ui.auto_show_delay_ms, coded.ui.auto_show_delay_ms);
        assert_eq!(cfg.keybindings.scroll_to_top, coded.keybindings.scroll_to_top);
    }

    #[test]
    fn user_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nauto_show = false\ntimestamp_format = \"%H:%M\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert!(!cfg.ui.auto_show);
        assert_eq!(cfg.ui.timestamp_format, "%H:%M");
        assert!(cfg.ui.show_timestamps);
        assert_eq!(cfg.keybindings.clear, "c");
    }

    #[test]
    fn missing_user_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.ui.auto_show);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nauto_show = \"sometimes\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
