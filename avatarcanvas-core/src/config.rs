//! Widget configuration as supplied by the embedding page.
//!
//! Every field is optional. Loose JS shapes (string-or-object, name-or-points)
//! are modelled as untagged enums and resolved once here, at the boundary.

use crate::error::{AvatarError, Result};
use crate::viewport::DEFAULT_SCALE_MAX;
use serde::{Deserialize, Serialize};

/// Wheel zoom coefficient applied to `deltaY`.
pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 0.025;

/// Constructor options for an avatar canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvatarConfig {
    /// Initial image source (URL or object URL)
    pub image: Option<String>,
    /// Zoom slider binding
    pub slider: Option<SliderOptions>,
    /// Id of an existing `<input type="file">` that replaces the image on change
    pub loader: Option<String>,
    /// Clip shape applied on every paint
    pub clip: Option<ClipOptions>,
    /// Zoom change per unit of wheel `deltaY`
    pub wheel_sensitivity: f64,
    /// Upper bound for the zoom multiplier (a bound slider's `max` overrides it)
    pub scale_max: f64,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            image: None,
            slider: None,
            loader: None,
            clip: None,
            wheel_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
            scale_max: DEFAULT_SCALE_MAX,
        }
    }
}

impl AvatarConfig {
    /// Parse from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|e| AvatarError::InvalidConfig(e.to_string()))
    }
}

/// Slider binding: either the element id, or an object with overrides.
///
/// Anything else lands in `Invalid` so a bad slider entry never rejects the
/// whole configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SliderOptions {
    ById(String),
    Config(SliderConfig),
    Invalid(serde_json::Value),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderConfig {
    /// Element id; when absent the currently bound slider is reconfigured
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub step: Option<f64>,
    #[serde(default)]
    pub disabled: Option<bool>,
}

impl SliderOptions {
    /// Split into the element id to bind (if any) and the overrides to apply.
    pub fn resolve(&self) -> Result<(Option<&str>, SliderConfig)> {
        match self {
            SliderOptions::ById(id) => Ok((Some(id.as_str()), SliderConfig::default())),
            SliderOptions::Config(config) => Ok((config.id.as_deref(), config.clone())),
            SliderOptions::Invalid(value) => {
                log::warn!("Slider config must be a string or an object, got {}", value);
                Err(AvatarError::InvalidSliderConfig)
            }
        }
    }
}

/// Clip selection: a named shape or a list of `[x, y]` canvas coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClipOptions {
    Named(String),
    Points(Vec<(f64, f64)>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_gives_defaults() {
        let config = AvatarConfig::from_value(json!({})).unwrap();

        assert_eq!(config, AvatarConfig::default());
        assert_eq!(config.wheel_sensitivity, 0.025);
        assert_eq!(config.scale_max, 5.0);
    }

    #[test]
    fn null_gives_defaults() {
        assert_eq!(
            AvatarConfig::from_value(serde_json::Value::Null).unwrap(),
            AvatarConfig::default()
        );
    }

    #[test]
    fn full_config_parses() {
        let config = AvatarConfig::from_value(json!({
            "image": "avatar.png",
            "slider": { "id": "zoom", "max": 8, "step": 0.5, "disabled": false },
            "loader": "file",
            "clip": [[0, 0], [100, 0], [50, 80]],
            "wheelSensitivity": 0.1
        }))
        .unwrap();

        assert_eq!(config.image.as_deref(), Some("avatar.png"));
        assert_eq!(
            config.slider,
            Some(SliderOptions::Config(SliderConfig {
                id: Some("zoom".to_string()),
                max: Some(8.0),
                step: Some(0.5),
                disabled: Some(false),
            }))
        );
        assert_eq!(config.loader.as_deref(), Some("file"));
        assert_eq!(
            config.clip,
            Some(ClipOptions::Points(vec![(0.0, 0.0), (100.0, 0.0), (50.0, 80.0)]))
        );
        assert_eq!(config.wheel_sensitivity, 0.1);
    }

    #[test]
    fn slider_by_id_string() {
        let config = AvatarConfig::from_value(json!({ "slider": "zoom", "clip": "circle" })).unwrap();

        assert_eq!(config.slider, Some(SliderOptions::ById("zoom".to_string())));
        assert_eq!(config.clip, Some(ClipOptions::Named("circle".to_string())));

        let (id, overrides) = config.slider.as_ref().unwrap().resolve().unwrap();
        assert_eq!(id, Some("zoom"));
        assert_eq!(overrides, SliderConfig::default());
    }

    #[test]
    fn slider_of_wrong_shape_is_rejected_without_failing_config() {
        let config = AvatarConfig::from_value(json!({ "slider": 42 })).unwrap();

        assert_eq!(config.slider, Some(SliderOptions::Invalid(json!(42))));
        assert!(matches!(
            config.slider.unwrap().resolve(),
            Err(AvatarError::InvalidSliderConfig)
        ));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let result = AvatarConfig::from_value(json!({ "wheelSensitivity": "fast" }));

        assert!(matches!(result, Err(AvatarError::InvalidConfig(_))));
    }
}
