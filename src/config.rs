// SPDX-License-Identifier: GPL-3.0-only

//! User settings for the overlay.
//!
//! Settings are stored as a flat camelCase JSON record in a key-value store
//! synced across the user's devices. Keys missing from the store take their
//! default value, and malformed values fall back to the default for that key
//! rather than failing the whole record.
//!
//! At startup the record is resolved once into an immutable [`OverlayConfig`],
//! which is what the controller consumes.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::app_settings;
use crate::fl;
use crate::state::{Anchor, HorizontalPosition, VerticalPosition};

/// Default module size, as stored.
pub const DEFAULT_SIZE: &str = "120";

// ============================================================================
// Settings Record
// ============================================================================

/// Settings record as persisted in the synced store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Target size of the code graphic in pixels, as an integer string.
    #[serde(deserialize_with = "deserialize_size")]
    pub size: String,
    /// Explicit dark module color as six hex digits, without `#`.
    /// Stored as `false` when absent.
    #[serde(
        deserialize_with = "deserialize_color",
        serialize_with = "serialize_color"
    )]
    pub color: Option<String>,
    /// Show the overlay automatically when the page is printed.
    #[serde(deserialize_with = "deserialize_auto_display")]
    pub auto_display: bool,
    #[serde(deserialize_with = "lenient")]
    pub vertical_position: VerticalPosition,
    #[serde(deserialize_with = "lenient")]
    pub horizontal_position: HorizontalPosition,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE.to_string(),
            color: None,
            auto_display: true,
            vertical_position: VerticalPosition::Top,
            horizontal_position: HorizontalPosition::Right,
        }
    }
}

impl Settings {
    /// Parses a settings record, filling missing keys with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Normalizes the record the way the settings form does before saving.
    ///
    /// - `size` becomes the absolute value of its leading integer, or the
    ///   default when it holds no number.
    /// - `color` must be exactly six hex digits (a leading `#` is tolerated),
    ///   otherwise it is cleared and the color is derived automatically.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let size = parse_leading_integer(&self.size)
            .map(|value| value.unsigned_abs().to_string())
            .unwrap_or_else(|| DEFAULT_SIZE.to_string());

        let color = self
            .color
            .as_deref()
            .map(|color| color.trim().trim_start_matches('#'))
            .filter(|color| is_hex_color(color))
            .map(str::to_string);

        Self {
            size,
            color,
            ..self.clone()
        }
    }

    /// Returns the size in pixels, falling back to the default size.
    pub fn size_px(&self) -> u32 {
        parse_leading_integer(&self.size)
            .and_then(|value| u32::try_from(value.unsigned_abs()).ok())
            .unwrap_or(120)
    }

    /// Checks the record for values that work but are likely to print badly.
    pub fn validate(&self) -> Vec<SettingsWarning> {
        let mut warnings = Vec::new();

        if self.size_px() < app_settings::MIN_RECOMMENDED_SIZE {
            warnings.push(SettingsWarning::SizeTooSmall);
        }

        if let Some(lightness) = self.color.as_deref().and_then(color_lightness) {
            if lightness > app_settings::MAX_COLOR_LIGHTNESS {
                warnings.push(SettingsWarning::ColorTooLight);
            }
        }

        warnings
    }

    /// Returns the anchor corner.
    pub fn anchor(&self) -> Anchor {
        Anchor::new(self.vertical_position, self.horizontal_position)
    }
}

/// Non-fatal issues reported by [`Settings::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsWarning {
    /// The size is below the recommended minimum.
    SizeTooSmall,
    /// The explicit color is too light to scan reliably.
    ColorTooLight,
}

impl SettingsWarning {
    /// Localized message for the warning.
    pub fn message(&self) -> String {
        match self {
            SettingsWarning::SizeTooSmall => fl!("size-too-small"),
            SettingsWarning::ColorTooLight => fl!("color-too-light"),
        }
    }
}

// ============================================================================
// Resolved Configuration
// ============================================================================

/// Settings resolved against the page, immutable for the life of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Target size of the code graphic in pixels.
    pub size: u32,
    /// Dark module color as a CSS color.
    pub color: String,
    pub anchor: Anchor,
    pub auto_display: bool,
}

impl OverlayConfig {
    /// Resolves settings for a page.
    ///
    /// The color is the explicit setting when valid, otherwise the page's
    /// `theme-color` metadata, otherwise black.
    pub fn resolve(settings: &Settings, theme_color: Option<&str>) -> Self {
        let settings = settings.sanitized();

        let color = match (&settings.color, theme_color.map(str::trim)) {
            (Some(hex), _) => format!("#{}", hex.to_ascii_lowercase()),
            (None, Some(meta)) if !meta.is_empty() => meta.to_string(),
            _ => app_settings::FALLBACK_COLOR.to_string(),
        };

        Self {
            size: settings.size_px(),
            color,
            anchor: settings.anchor(),
            auto_display: settings.auto_display,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::resolve(&Settings::default(), None)
    }
}

// ============================================================================
// Settings Stores
// ============================================================================

/// Persistent key-value storage for the settings record.
pub trait SettingsStore {
    /// Reads the record, merged over defaults.
    fn load(&self) -> Result<Settings, ConfigError>;

    /// Writes the record.
    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError>;
}

/// Store kept in memory, holding the raw JSON value like a synced storage
/// area would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<serde_json::Value>,
}

impl MemoryStore {
    /// Creates a store holding an arbitrary raw record.
    pub fn with_value(value: serde_json::Value) -> Self {
        Self { value: Some(value) }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        match &self.value {
            Some(value) => Ok(Settings::deserialize(value)?),
            None => Ok(Settings::default()),
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        self.value = Some(serde_json::to_value(settings)?);
        Ok(())
    }
}

/// Store backed by a JSON file. A missing file reads as defaults.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No settings at {}, using defaults", self.path.display());
                return Ok(Settings::default());
            }
            Err(e) => return Err(ConfigError::io(e, &self.path)),
        };

        serde_json::from_str(&json).map_err(|e| ConfigError::json(e, &self.path))
    }

    fn save(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        let json =
            serde_json::to_string_pretty(settings).map_err(|e| ConfigError::json(e, &self.path))?;
        fs::write(&self.path, json).map_err(|e| ConfigError::io(e, &self.path))?;
        tracing::info!("Settings saved to {}", self.path.display());
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while reading or writing settings.
#[derive(Debug)]
pub enum ConfigError {
    /// The store could not be read or written.
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    /// The stored record is not valid JSON.
    Json {
        source: serde_json::Error,
        path: Option<PathBuf>,
    },
}

impl ConfigError {
    fn io(source: std::io::Error, path: &Path) -> Self {
        Self::Io {
            source,
            path: Some(path.to_path_buf()),
        }
    }

    fn json(source: serde_json::Error, path: &Path) -> Self {
        Self::Json {
            source,
            path: Some(path.to_path_buf()),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { source, path } => {
                write!(f, "settings I/O error")?;
                if let Some(path) = path {
                    write!(f, " for '{}'", path.display())?;
                }
                write!(f, ": {}", source)
            }
            ConfigError::Json { source, path } => {
                write!(f, "settings JSON error")?;
                if let Some(path) = path {
                    write!(f, " in '{}'", path.display())?;
                }
                write!(f, ": {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}

// ============================================================================
// Serde Helpers
// ============================================================================

/// Deserializes a value, falling back to its default when malformed.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Anything but a boolean reads as the default (enabled).
fn deserialize_auto_display<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(true))
}

/// Accepts the size as a string or a bare number.
fn deserialize_size<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(size) => size,
        serde_json::Value::Number(size) => size.to_string(),
        _ => DEFAULT_SIZE.to_string(),
    })
}

/// Accepts the color as a string, or `false`/`null` for "automatic".
fn deserialize_color<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(color) if !color.is_empty() => Some(color),
        _ => None,
    })
}

fn serialize_color<S>(color: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match color {
        Some(color) => serializer.serialize_str(color),
        None => serializer.serialize_bool(false),
    }
}

// ============================================================================
// Value Helpers
// ============================================================================

/// Parses the leading integer of a string (`"125px"` -> 125, `"-90"` -> -90).
fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}

/// Mean RGB intensity of a six-digit hex color, in `[0, 1]`.
fn color_lightness(color: &str) -> Option<f32> {
    let color = color.trim_start_matches('#');
    if !is_hex_color(color) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&color[i..i + 2], 16).ok();
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    Some((r as f32 + g as f32 + b as f32) / (3.0 * 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // ========================================================================
    // Record parsing
    // ========================================================================

    /// Test 1: Missing keys take their default value
    #[test]
    fn test_missing_keys_default() {
        let settings = Settings::from_json(r#"{ "size": "200" }"#).unwrap();

        assert_eq!(settings.size, "200");
        assert_eq!(settings.color, None);
        assert!(settings.auto_display);
        assert_eq!(settings.vertical_position, VerticalPosition::Top);
        assert_eq!(settings.horizontal_position, HorizontalPosition::Right);
    }

    /// Test 2: Full record with the stored key names
    #[test]
    fn test_full_record() {
        let json = r#"{
            "size": "125",
            "color": "1a2B3c",
            "autoDisplay": false,
            "verticalPosition": "bottom",
            "horizontalPosition": "left"
        }"#;
        let settings = Settings::from_json(json).unwrap();

        assert_eq!(settings.size, "125");
        assert_eq!(settings.color.as_deref(), Some("1a2B3c"));
        assert!(!settings.auto_display);
        assert_eq!(
            settings.anchor(),
            Anchor::new(VerticalPosition::Bottom, HorizontalPosition::Left)
        );
    }

    /// Test 3: `false` color means automatic, malformed values fall back
    #[test]
    fn test_lenient_values() {
        let json = r#"{
            "size": 90,
            "color": false,
            "autoDisplay": "yes",
            "verticalPosition": "middle"
        }"#;
        let settings = Settings::from_json(json).unwrap();

        assert_eq!(settings.size, "90");
        assert_eq!(settings.color, None);
        assert!(settings.auto_display, "Malformed flag should fall back to default");
        assert_eq!(settings.vertical_position, VerticalPosition::Top);
    }

    /// Test 4: Absent color is stored as `false`
    #[test]
    fn test_serialize_absent_color() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(value["color"], serde_json::Value::Bool(false));
        assert_eq!(value["autoDisplay"], serde_json::Value::Bool(true));
        assert_eq!(value["horizontalPosition"], "right");
    }

    // ========================================================================
    // Sanitization and validation
    // ========================================================================

    /// Test 5: Sanitization normalizes size and color
    #[test]
    fn test_sanitized() {
        let settings = Settings {
            size: "-150px".to_string(),
            color: Some("#ABCDEF".to_string()),
            ..Settings::default()
        };
        let sanitized = settings.sanitized();
        assert_eq!(sanitized.size, "150");
        assert_eq!(sanitized.color.as_deref(), Some("ABCDEF"));

        let invalid = Settings {
            size: "big".to_string(),
            color: Some("blue".to_string()),
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(invalid.size, DEFAULT_SIZE);
        assert_eq!(invalid.color, None);
    }

    /// Test 6: Validation warns about small sizes and light colors
    #[test]
    fn test_validate_warnings() {
        assert!(Settings::default().validate().is_empty());

        let settings = Settings {
            size: "60".to_string(),
            color: Some("f0f0f0".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            vec![SettingsWarning::SizeTooSmall, SettingsWarning::ColorTooLight]
        );
        assert!(!SettingsWarning::SizeTooSmall.message().is_empty());
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Test 7: Explicit color wins over page metadata
    #[test]
    fn test_resolve_explicit_color() {
        let settings = Settings {
            color: Some("336699".to_string()),
            ..Settings::default()
        };
        let config = OverlayConfig::resolve(&settings, Some("#ff0000"));
        assert_eq!(config.color, "#336699");
        assert_eq!(config.size, 120);
        assert!(config.auto_display);
    }

    /// Test 8: Automatic color uses theme-color metadata, then black
    #[test]
    fn test_resolve_automatic_color() {
        let settings = Settings::default();
        assert_eq!(OverlayConfig::resolve(&settings, Some("#123456")).color, "#123456");
        assert_eq!(OverlayConfig::resolve(&settings, Some("  ")).color, "#000000");
        assert_eq!(OverlayConfig::resolve(&settings, None).color, "#000000");
    }

    // ========================================================================
    // Stores
    // ========================================================================

    /// Test 9: Memory store round-trips and starts with defaults
    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load().unwrap(), Settings::default());

        let settings = Settings {
            size: "200".to_string(),
            auto_display: false,
            ..Settings::default()
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    /// Test 10: JSON file store reads partial records and writes full ones
    #[test]
    fn test_json_file_store() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "horizontalPosition": "left" }}"#).unwrap();

        let mut store = JsonFileStore::new(file.path());
        let settings = store.load().unwrap();
        assert_eq!(settings.horizontal_position, HorizontalPosition::Left);
        assert_eq!(settings.size, DEFAULT_SIZE);

        store.save(&settings).unwrap();
        let written = fs::read_to_string(file.path()).unwrap();
        assert!(written.contains("\"autoDisplay\": true"));
    }

    /// Test 11: Missing file reads as defaults, broken file is an error
    #[test]
    fn test_json_file_store_errors() {
        let missing = JsonFileStore::new("/nonexistent/printqr/settings.json");
        assert_eq!(missing.load().unwrap(), Settings::default());

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = JsonFileStore::new(file.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::Json { path: Some(_), .. }));
        assert!(err.to_string().contains("settings JSON error"));
    }
}
