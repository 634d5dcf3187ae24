//! Read-through access to the settings that drive the hint panel.
//!
//! The panel never owns configuration; it asks a [`ConfigService`] for each named
//! value whenever a display is requested. Every lookup has a documented default and
//! a value that is unset or of the wrong type silently falls back to it.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::model::SortOption;

pub mod keys {
    pub const DELAY_MS: &str = "key_hint.delay_ms";
    pub const SORT_ORDER: &str = "key_hint.sort_order";
    pub const SORT_CASE_SENSITIVE: &str = "key_hint.sort_case_sensitive";
    pub const POSITION: &str = "key_hint.position";
    pub const CANCEL_ON_CLICK_OUTSIDE: &str = "key_hint.cancel_on_click_outside";
    pub const SHOW_TYPED_SEQUENCE: &str = "key_hint.show_typed_sequence";
    pub const TIMEOUT: &str = "timeout";
    pub const TIMEOUT_LEN: &str = "timeoutlen";
}

pub const DEFAULT_DELAY_MS: i64 = 200;
pub const DEFAULT_SORT_CASE_SENSITIVE: bool = true;
pub const DEFAULT_CANCEL_ON_CLICK_OUTSIDE: bool = true;
pub const DEFAULT_SHOW_TYPED_SEQUENCE: bool = true;
pub const DEFAULT_TIMEOUT: bool = true;
pub const DEFAULT_TIMEOUT_LEN_MS: i64 = 1000;

/// Source of resolved configuration values.
///
/// Lookups return `None` both when a name is unset and when it holds a value of
/// another type.
pub trait ConfigService: Send + Sync {
    fn get_int(&self, name: &str) -> Option<i64>;

    fn get_string(&self, name: &str) -> Option<String>;

    fn get_bool(&self, name: &str) -> Option<bool>;

    /// Whether pending sequences time out, which also enables auto-dismiss.
    fn timeout_enabled(&self) -> bool { self.get_bool(keys::TIMEOUT).unwrap_or(DEFAULT_TIMEOUT) }

    fn timeout_len_ms(&self) -> i64 {
        self.get_int(keys::TIMEOUT_LEN).unwrap_or(DEFAULT_TIMEOUT_LEN_MS)
    }
}

/// A configuration with nothing set; every setting resolves to its default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConfig;

impl ConfigService for DefaultConfig {
    fn get_int(&self, _: &str) -> Option<i64> { None }

    fn get_string(&self, _: &str) -> Option<String> { None }

    fn get_bool(&self, _: &str) -> Option<bool> { None }
}

/// Where the panel is placed relative to the host window.
#[derive(
    Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[strum(ascii_case_insensitive)]
pub enum PopupPosition {
    Center,
    Top,
    #[default]
    Bottom,
}

fn millis(ms: i64) -> Duration { Duration::from_millis(ms.max(0) as u64) }

fn parsed<T: FromStr + Default>(config: &dyn ConfigService, name: &str) -> T {
    let Some(raw) = config.get_string(name) else {
        return T::default();
    };
    raw.trim().parse().unwrap_or_else(|_| {
        debug!(name, value = %raw, "unrecognized setting value; using default");
        T::default()
    })
}

pub fn delay(config: &dyn ConfigService) -> Duration {
    millis(config.get_int(keys::DELAY_MS).unwrap_or(DEFAULT_DELAY_MS))
}

pub fn sort_option(config: &dyn ConfigService) -> SortOption { parsed(config, keys::SORT_ORDER) }

pub fn sort_case_sensitive(config: &dyn ConfigService) -> bool {
    config.get_bool(keys::SORT_CASE_SENSITIVE).unwrap_or(DEFAULT_SORT_CASE_SENSITIVE)
}

pub fn position(config: &dyn ConfigService) -> PopupPosition { parsed(config, keys::POSITION) }

pub fn cancel_on_click_outside(config: &dyn ConfigService) -> bool {
    config.get_bool(keys::CANCEL_ON_CLICK_OUTSIDE).unwrap_or(DEFAULT_CANCEL_ON_CLICK_OUTSIDE)
}

pub fn show_typed_sequence(config: &dyn ConfigService) -> bool {
    config.get_bool(keys::SHOW_TYPED_SEQUENCE).unwrap_or(DEFAULT_SHOW_TYPED_SEQUENCE)
}

/// Auto-dismiss follows the sequence timeout; zero means the panel stays until it is
/// hidden or replaced.
pub fn dismiss_timeout(config: &dyn ConfigService) -> Duration {
    if config.timeout_enabled() {
        millis(config.timeout_len_ms())
    } else {
        Duration::ZERO
    }
}

/// Every setting a display request needs, read once so the request sees a
/// consistent snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHintSettings {
    pub delay: Duration,
    pub sort_option: SortOption,
    pub sort_case_sensitive: bool,
    pub position: PopupPosition,
    pub cancel_on_click_outside: bool,
    pub show_typed_sequence: bool,
    pub dismiss_timeout: Duration,
}

impl Default for KeyHintSettings {
    fn default() -> Self { Self::resolve(&DefaultConfig) }
}

impl KeyHintSettings {
    pub fn resolve(config: &dyn ConfigService) -> Self {
        Self {
            delay: delay(config),
            sort_option: sort_option(config),
            sort_case_sensitive: sort_case_sensitive(config),
            position: position(config),
            cancel_on_click_outside: cancel_on_click_outside(config),
            show_typed_sequence: show_typed_sequence(config),
            dismiss_timeout: dismiss_timeout(config),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

/// A [`ConfigService`] backed by a TOML document. Dotted names walk nested tables,
/// so `key_hint.delay_ms` reads `delay_ms` from the `[key_hint]` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TomlConfig {
    table: toml::Table,
}

impl TomlConfig {
    pub fn new(table: toml::Table) -> Self { Self { table } }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
        let config = text.parse()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn lookup(&self, name: &str) -> Option<&toml::Value> {
        let mut parts = name.split('.');
        let mut value = self.table.get(parts.next()?)?;
        for part in parts {
            value = value.as_table()?.get(part)?;
        }
        Some(value)
    }
}

impl FromStr for TomlConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::new(toml::from_str(s)?)) }
}

impl ConfigService for TomlConfig {
    fn get_int(&self, name: &str) -> Option<i64> { self.lookup(name)?.as_integer() }

    fn get_string(&self, name: &str) -> Option<String> {
        self.lookup(name)?.as_str().map(str::to_owned)
    }

    fn get_bool(&self, name: &str) -> Option<bool> { self.lookup(name)?.as_bool() }
}
