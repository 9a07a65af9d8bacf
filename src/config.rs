//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--sort`, `--show-hidden`, `--log-file`)
//! 2. `$TFM_CONFIG` environment variable (path to config file)
//! 3. Project-local `.tfm.toml` in the current working directory
//! 4. Global `~/.config/tfm/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::fs::format::{is_valid_time_format, parse_columns, DEFAULT_TIME_FORMAT};
use crate::nav::Options;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory (overridden by CLI positional arg).
    pub start_path: Option<String>,
    /// Show hidden files by default.
    pub show_hidden: Option<bool>,
    /// Program used to open regular files.
    pub opener: Option<String>,
}

/// Directory listing settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BrowserConfig {
    /// Sort order: "alpha", "last_modified", "size", each with a "_reverse" variant.
    pub sort: Option<String>,
    /// Comma separated metadata columns, e.g. "mode,user,size,mtime".
    pub columns: Option<String>,
    /// strftime format of the mtime column.
    pub time_format: Option<String>,
    /// Filter matching: "substring", "prefix", "fuzzy".
    pub filter_mode: Option<String>,
}

/// Preview panel settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Bytes of a file read for its preview.
    pub size_limit: Option<usize>,
    /// Bytes shown when a binary file is hexdumped.
    pub hexdump_limit: Option<usize>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Log file. Without one nothing is logged.
    pub file: Option<String>,
    /// Level filter, e.g. "info" or "triad_fm=debug".
    pub level: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark" or "light".
    pub scheme: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub browser: BrowserConfig,
    pub preview: PreviewConfig,
    pub log: LogConfig,
    pub theme: ThemeConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default preview read limit (bytes).
pub const DEFAULT_PREVIEW_SIZE_LIMIT: usize = 100_000;
/// Default hexdump limit (bytes).
pub const DEFAULT_HEXDUMP_LIMIT: usize = 4096;
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path, which is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("TFM_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".tfm.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("tfm").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`: `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                start_path: other
                    .general
                    .start_path
                    .clone()
                    .or(self.general.start_path),
                show_hidden: other.general.show_hidden.or(self.general.show_hidden),
                opener: other.general.opener.clone().or(self.general.opener),
            },
            browser: BrowserConfig {
                sort: other.browser.sort.clone().or(self.browser.sort),
                columns: other.browser.columns.clone().or(self.browser.columns),
                time_format: other
                    .browser
                    .time_format
                    .clone()
                    .or(self.browser.time_format),
                filter_mode: other
                    .browser
                    .filter_mode
                    .clone()
                    .or(self.browser.filter_mode),
            },
            preview: PreviewConfig {
                size_limit: other.preview.size_limit.or(self.preview.size_limit),
                hexdump_limit: other.preview.hexdump_limit.or(self.preview.hexdump_limit),
            },
            log: LogConfig {
                file: other.log.file.clone().or(self.log.file),
                level: other.log.level.clone().or(self.log.level),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that the highest-priority file overwrites lower ones.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn start_path(&self) -> Option<&str> {
        self.general.start_path.as_deref()
    }

    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(false)
    }

    pub fn opener(&self) -> Option<&str> {
        self.general.opener.as_deref()
    }

    pub fn sort(&self) -> &str {
        self.browser.sort.as_deref().unwrap_or("alpha")
    }

    pub fn columns(&self) -> &str {
        self.browser
            .columns
            .as_deref()
            .unwrap_or("mode,user,size,mtime")
    }

    pub fn time_format(&self) -> &str {
        self.browser
            .time_format
            .as_deref()
            .unwrap_or(DEFAULT_TIME_FORMAT)
    }

    pub fn filter_mode(&self) -> &str {
        self.browser.filter_mode.as_deref().unwrap_or("substring")
    }

    pub fn preview_size_limit(&self) -> usize {
        self.preview
            .size_limit
            .unwrap_or(DEFAULT_PREVIEW_SIZE_LIMIT)
    }

    pub fn hexdump_limit(&self) -> usize {
        self.preview.hexdump_limit.unwrap_or(DEFAULT_HEXDUMP_LIMIT)
    }

    pub fn log_file(&self) -> Option<&str> {
        self.log.file.as_deref()
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Theme scheme: "dark" or "light".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }

    /// Session options seeded from this configuration.
    ///
    /// Values that do not parse keep their defaults and are logged.
    pub fn options(&self) -> Options {
        let defaults = Options::default();
        let sort = self.sort().parse().unwrap_or_else(|_| {
            warn!(value = self.sort(), "invalid sort in config");
            defaults.sort
        });
        let columns = parse_columns(self.columns()).unwrap_or_else(|bad| {
            warn!(column = %bad, "invalid column in config");
            defaults.columns.clone()
        });
        let time_format = if is_valid_time_format(self.time_format()) {
            self.time_format().to_string()
        } else {
            warn!(value = self.time_format(), "invalid time_format in config");
            defaults.time_format.clone()
        };
        let filter_mode = self.filter_mode().parse().unwrap_or_else(|_| {
            warn!(value = self.filter_mode(), "invalid filter_mode in config");
            defaults.filter_mode
        });
        Options {
            sort,
            columns,
            time_format,
            show_hidden: self.show_hidden(),
            filter_mode,
            preview_size_limit: self.preview_size_limit(),
            hexdump_limit: self.hexdump_limit(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
