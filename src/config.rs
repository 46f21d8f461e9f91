//! Simulation configuration
//!
//! Layered: defaults, then JSON saved in LocalStorage, then URL query
//! parameters. Native builds read an optional JSON file instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Color, Variant};

/// Half-open `[min, max)` range sampled at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Both ends finite and positive, `min <= max`
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }
}

/// Everything that shapes a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub variant: Variant,
    /// Circles spawned at startup
    pub circle_count: usize,
    pub radius: SpawnRange,
    /// Speed magnitude per step, applied to each velocity component
    pub speed: SpawnRange,
    /// Steps a collision highlight lasts
    pub flash_frames: u32,
    pub highlight_color: Color,
    pub background_color: Color,
    pub label_color: Color,
    pub label_font: String,
    /// Outline stroke width in canvas pixels
    pub line_width: f32,
    /// Fixed seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Step at a fixed rate instead of once per animation frame
    pub fixed_step_hz: Option<f32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Rising,
            circle_count: DEFAULT_CIRCLE_COUNT,
            radius: SpawnRange::new(RADIUS_MIN, RADIUS_MAX),
            speed: SpawnRange::new(SPEED_MIN, SPEED_MAX),
            flash_frames: FLASH_FRAMES,
            highlight_color: HIGHLIGHT_COLOR,
            background_color: BACKGROUND_COLOR,
            label_color: LABEL_COLOR,
            label_font: LABEL_FONT.to_string(),
            line_width: LINE_WIDTH,
            seed: None,
            fixed_step_hz: None,
        }
    }
}

/// Failure reading a config file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Json(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl SimConfig {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "circle_bounce_config";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Read a JSON config file; missing keys take their defaults
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text)?)
    }

    /// Human-readable problems with this config; empty when usable as-is
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.radius.is_valid() {
            warnings.push(format!(
                "radius range [{}, {}) must be positive with min <= max",
                self.radius.min, self.radius.max
            ));
        }
        if !self.speed.is_valid() {
            warnings.push(format!(
                "speed range [{}, {}) must be positive with min <= max",
                self.speed.min, self.speed.max
            ));
        }
        if self.flash_frames == 0 {
            warnings.push("flash_frames must be at least 1".to_string());
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            warnings.push(format!("line_width {} must be positive", self.line_width));
        }
        if self.circle_count > MAX_CIRCLE_COUNT {
            warnings.push(format!(
                "circle_count {} exceeds {} (collision checks are pairwise)",
                self.circle_count, MAX_CIRCLE_COUNT
            ));
        }
        if let Some(hz) = self.fixed_step_hz {
            if !(hz.is_finite() && hz > 0.0) {
                warnings.push(format!("fixed_step_hz {hz} must be positive"));
            }
        }
        if self.label_font.trim().is_empty() {
            warnings.push("label_font is empty".to_string());
        }

        warnings
    }

    /// Copy with every invalid field replaced by a usable value
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        self.radius = sanitize_range(self.radius, defaults.radius);
        self.speed = sanitize_range(self.speed, defaults.speed);
        self.flash_frames = self.flash_frames.max(1);
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            self.line_width = defaults.line_width;
        }
        self.circle_count = self.circle_count.min(MAX_CIRCLE_COUNT);
        self.fixed_step_hz = self.fixed_step_hz.filter(|hz| hz.is_finite() && *hz > 0.0);
        if self.label_font.trim().is_empty() {
            self.label_font = defaults.label_font;
        }

        self
    }

    /// Override fields from a URL query string (`?variant=enclosed&count=20`)
    ///
    /// Returns a warning for each parameter that was not understood.
    /// Colors may be given with or without `#` (or its `%23` escape).
    pub fn apply_query(&mut self, query: &str) -> Vec<String> {
        let mut warnings = Vec::new();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let applied = match key {
                "variant" => Variant::parse(value).map(|v| self.variant = v),
                "count" => value.parse().ok().map(|n| self.circle_count = n),
                "seed" => value.parse().ok().map(|s| self.seed = Some(s)),
                "flash" => value.parse().ok().map(|n| self.flash_frames = n),
                "hz" => value.parse().ok().map(|hz| self.fixed_step_hz = Some(hz)),
                "radius_min" => value.parse().ok().map(|v| self.radius.min = v),
                "radius_max" => value.parse().ok().map(|v| self.radius.max = v),
                "speed_min" => value.parse().ok().map(|v| self.speed.min = v),
                "speed_max" => value.parse().ok().map(|v| self.speed.max = v),
                "highlight" => parse_query_color(value).map(|c| self.highlight_color = c),
                "background" => parse_query_color(value).map(|c| self.background_color = c),
                _ => {
                    warnings.push(format!("unknown query parameter {key:?}"));
                    continue;
                }
            };
            if applied.is_none() {
                warnings.push(format!("invalid value {value:?} for {key:?}"));
            }
        }

        warnings
    }

    /// Load from LocalStorage and the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let mut config = window
            .as_ref()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|json| match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from LocalStorage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Ignoring stored config: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        if let Some(search) = window.and_then(|w| w.location().search().ok()) {
            for warning in config.apply_query(&search) {
                log::warn!("{}", warning);
            }
        }

        config
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Config saved");
                }
                Err(e) => log::warn!("Failed to serialize config: {}", e),
            }
        }
    }
}

fn sanitize_range(range: SpawnRange, fallback: SpawnRange) -> SpawnRange {
    if range.is_valid() {
        return range;
    }
    if range.min.is_finite() && range.max.is_finite() && range.min > 0.0 && range.max > 0.0 {
        // Only inverted
        SpawnRange::new(range.max, range.min)
    } else {
        fallback
    }
}

fn parse_query_color(value: &str) -> Option<Color> {
    let hex = value
        .strip_prefix("%23")
        .or_else(|| value.strip_prefix('#'))
        .unwrap_or(value);
    format!("#{hex}").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate_cleanly() {
        let config = SimConfig::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.circle_count, 10);
        assert_eq!(config.flash_frames, 10);
        assert_eq!(config.highlight_color, Color::BLUE);
        assert_eq!(config.radius, SpawnRange::new(20.0, 50.0));
        assert_eq!(config.speed, SpawnRange::new(1.0, 5.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r##"{"variant":"enclosed","highlight_color":"#ff0000"}"##)
            .unwrap();
        assert_eq!(config.variant, Variant::Enclosed);
        assert_eq!(config.highlight_color, Color::from_rgb(255, 0, 0));
        assert_eq!(config.circle_count, DEFAULT_CIRCLE_COUNT);
        assert_eq!(config.label_font, LABEL_FONT);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimConfig {
            seed: Some(77),
            fixed_step_hz: Some(60.0),
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(SimConfig::from_json("{\"circle_count\": -3}").is_err());
        assert!(SimConfig::from_json("{\"highlight_color\": \"blue\"}").is_err());
        assert!(SimConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_validate_and_sanitize() {
        let bad = SimConfig {
            radius: SpawnRange::new(50.0, 20.0),
            speed: SpawnRange::new(-1.0, f32::NAN),
            flash_frames: 0,
            line_width: 0.0,
            circle_count: MAX_CIRCLE_COUNT + 1,
            fixed_step_hz: Some(-5.0),
            label_font: "  ".to_string(),
            ..Default::default()
        };
        let warnings = bad.validate();
        assert_eq!(warnings.len(), 7, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.contains("radius")));
        assert!(warnings.iter().any(|w| w.contains("flash_frames")));

        let fixed = bad.sanitized();
        assert!(fixed.validate().is_empty(), "{:?}", fixed.validate());
        assert_eq!(fixed.radius, SpawnRange::new(20.0, 50.0));
        assert_eq!(fixed.speed, SpawnRange::new(SPEED_MIN, SPEED_MAX));
        assert_eq!(fixed.flash_frames, 1);
        assert_eq!(fixed.fixed_step_hz, None);
        assert_eq!(fixed.circle_count, MAX_CIRCLE_COUNT);
    }

    #[test]
    fn test_apply_query() {
        let mut config = SimConfig::default();
        let warnings =
            config.apply_query("?variant=enclosed&count=25&seed=7&highlight=%23ff8800&speed_max=8");
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.variant, Variant::Enclosed);
        assert_eq!(config.circle_count, 25);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.highlight_color, Color::from_rgb(0xff, 0x88, 0x00));
        assert_eq!(config.speed.max, 8.0);
    }

    #[test]
    fn test_apply_query_reports_bad_params() {
        let mut config = SimConfig::default();
        let warnings = config.apply_query("count=lots&colour=red&variant=");
        assert_eq!(warnings.len(), 3, "{warnings:?}");
        assert_eq!(config, SimConfig::default());

        assert!(config.apply_query("").is_empty());
    }

    #[test]
    fn test_load_file_missing() {
        let err = SimConfig::load_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
