//! Range-input attribute resolution for the zoom slider.
//!
//! Pure: takes the attributes currently on the element plus the caller's
//! overrides and decides what to write back.

use crate::config::SliderConfig;

/// Step written when the element has none
pub const DEFAULT_SLIDER_STEP: &str = "0.1";

/// `max` / `step` attributes as read from the element (empty = unset)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliderAttributes {
    pub max: String,
    pub step: String,
}

/// What to apply to the widget and the element after binding
#[derive(Debug, Clone, PartialEq)]
pub struct SliderSetup {
    pub scale_max: f64,
    pub max: String,
    pub step: String,
    /// `Some(enabled)` when the config carried a `disabled` flag
    pub slider_enabled: Option<bool>,
    /// First binding also resets `min` and `value` to "1"
    pub reset_range: bool,
}

/// Format a number the way JS `String(n)` does for the values sliders use
pub fn format_attribute(value: f64) -> String {
    format!("{}", value)
}

pub fn resolve_slider(
    current: &SliderAttributes,
    overrides: &SliderConfig,
    fallback_max: f64,
    first_binding: bool,
) -> SliderSetup {
    let mut scale_max = if current.max.trim().is_empty() {
        fallback_max
    } else {
        match current.max.trim().parse::<f64>() {
            Ok(max) => max,
            Err(_) => {
                log::warn!(
                    "Slider max '{}' is not a number, using {}",
                    current.max,
                    fallback_max
                );
                fallback_max
            }
        }
    };
    if let Some(max) = overrides.max {
        scale_max = max;
    }
    // Modifier range starts at 1
    scale_max = scale_max.max(1.0);

    let step = match overrides.step {
        Some(step) => format_attribute(step),
        None if current.step.trim().is_empty() => DEFAULT_SLIDER_STEP.to_string(),
        None => current.step.clone(),
    };

    SliderSetup {
        scale_max,
        max: format_attribute(scale_max),
        step,
        slider_enabled: overrides.disabled.map(|disabled| !disabled),
        reset_range: first_binding,
    }
}
