//! # Configuration
//!
//! Tunables for smoothing and the defaults a new session starts with. Saved and loaded as TOML from the
//! user's preference directory, or defaulted if unavailable for some reason.

use crate::color::{Color, ColorKey, ColorMode};

const DOCUMENTATION: &str = r##"# Scribble settings. You may edit this file, but be aware that formatting and comments will not
# be preserved.

# [smoothing]
# smoothing_factor: control point distance, as a fraction of the neighbour chord (capped at 1/5 of it).
# max_width_delta: largest width change in pixels between consecutive points of a curve.
# straight_epsilon: segments shorter than this many pixels are drawn straight.
# round_joint_threshold: joints of points wider than this are rounded with a filled circle.
# erase_width_factor: provisional lines are erased with this multiple of their width.
#
# [palette.light] / [palette.dark] override colors by name, e.g.
# blue = "#0b6e99"

"##;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("no preferences directory found")]
    NoPreferencesDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid setting `{0}`: must be finite and non-negative")]
    Invalid(&'static str),
}

/// Constants of the smoothing and rendering pipeline.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub smoothing_factor: f64,
    pub max_width_delta: f64,
    pub straight_epsilon: f64,
    pub round_joint_threshold: f64,
    pub erase_width_factor: f64,
}
impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.1,
            max_width_delta: 0.5,
            straight_epsilon: 3.0,
            round_joint_threshold: 5.0,
            erase_width_factor: 2.0,
        }
    }
}
impl SmoothingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("smoothing.smoothing_factor", self.smoothing_factor),
            ("smoothing.max_width_delta", self.max_width_delta),
            ("smoothing.straight_epsilon", self.straight_epsilon),
            ("smoothing.round_joint_threshold", self.round_joint_threshold),
            ("smoothing.erase_width_factor", self.erase_width_factor),
        ];
        match fields
            .into_iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            Some((name, _)) => Err(ConfigError::Invalid(name)),
            None => Ok(()),
        }
    }
}

/// What a fresh session starts out with.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DrawingDefaults {
    pub width_class: f64,
    pub color: ColorKey,
    pub color_mode: ColorMode,
}
impl Default for DrawingDefaults {
    fn default() -> Self {
        Self {
            width_class: 5.0,
            color: ColorKey::Default,
            color_mode: ColorMode::Light,
        }
    }
}

/// Color overrides by key name. Unknown names are skipped with a warning when the palette is built.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PaletteOverrides {
    pub light: std::collections::BTreeMap<String, Color>,
    pub dark: std::collections::BTreeMap<String, Color>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub smoothing: SmoothingConfig,
    pub drawing: DrawingDefaults,
    pub palette: PaletteOverrides,
}

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push("scribble");
    Some(base_dir)
}

impl Config {
    const FILENAME: &'static str = "config.toml";
    /// Parse and validate a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(string: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(string)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.smoothing.validate()?;
        if !(self.drawing.width_class.is_finite() && self.drawing.width_class > 0.0) {
            return Err(ConfigError::Invalid("drawing.width_class"));
        }
        Ok(())
    }
    /// Load the user's settings, defaulting on any failure.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            None => {
                log::warn!("Preferences dir unavailable, using default settings.");
                Self::default()
            }
            Some(mut path) => {
                path.push(Self::FILENAME);
                Self::load_or_default(&path)
            }
        }
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|string| Self::from_toml_str(&string));
        match loaded {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {path:?}, using defaults.");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings from {path:?}, using defaults: {e}");
                Self::default()
            }
        }
    }
    pub fn save(&self) -> Result<(), ConfigError> {
        let mut preferences = preferences_dir().ok_or(ConfigError::NoPreferencesDir)?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        std::fs::write(preferences, self.to_toml_string()?)?;
        Ok(())
    }
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let string = toml::ser::to_string_pretty(self)?;
        Ok(DOCUMENTATION.to_owned() + &string)
    }
}

#[cfg(test)]
mod test {
    use super::{Config, ConfigError};
    use crate::color::{Color, ColorKey, ColorMode};
    #[test]
    fn empty_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }
    #[test]
    fn partial_document() {
        let config = Config::from_toml_str(
            r##"
            [smoothing]
            smoothing_factor = 0.2

            [drawing]
            color = "blue"
            color_mode = "dark"

            [palette.dark]
            red = "#ff0000"
            "##,
        )
        .unwrap();
        assert!((config.smoothing.smoothing_factor - 0.2).abs() < f64::EPSILON);
        // Untouched fields keep their defaults.
        assert!((config.smoothing.max_width_delta - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.drawing.color, ColorKey::Blue);
        assert_eq!(config.drawing.color_mode, ColorMode::Dark);
        assert_eq!(config.palette.dark.get("red"), Some(&Color::rgb(255, 0, 0)));
    }
    #[test]
    fn rejects_nonsense() {
        assert!(matches!(
            Config::from_toml_str("[smoothing]\nmax_width_delta = -1.0"),
            Err(ConfigError::Invalid("smoothing.max_width_delta"))
        ));
        assert!(matches!(
            Config::from_toml_str("[drawing]\nwidth_class = 0.0"),
            Err(ConfigError::Invalid("drawing.width_class"))
        ));
        assert!(matches!(
            Config::from_toml_str("[palette.light]\nred = \"red\""),
            Err(ConfigError::Parse(_))
        ));
    }
    #[test]
    fn saved_form_reloads() {
        let mut config = Config::default();
        config.drawing.width_class = 8.0;
        config
            .palette
            .light
            .insert("gray".to_owned(), Color::rgb(1, 1, 1));
        let string = config.to_toml_string().unwrap();
        // The documentation header, example entry included, stays a comment.
        assert!(string.starts_with("# Scribble settings."));
        assert!(string.contains("# blue = \"#0b6e99\"\n"));
        assert_eq!(Config::from_toml_str(&string).unwrap(), config);
    }
    #[test]
    fn missing_file_defaults() {
        let config = Config::load_or_default(std::path::Path::new(
            "/definitely/not/a/real/path/config.toml",
        ));
        assert_eq!(config, Config::default());
    }
}
