//! Configuration system for viewport behaviour and animation defaults
//!
//! Options are grouped per concern and resolved from a preset profile, so a
//! host can pick `Responsive` or `Precise` without spelling out every knob,
//! or load a full `EngineOptions` from JSON.

use crate::animation::easing::Easing;
use crate::core::constants::{
    DEFAULT_ANIMATION_DURATION_MS, DEFAULT_BOUNDS_SOFT_MARGIN, DEFAULT_FIT_PADDING,
    DEFAULT_WHEEL_ZOOM_IN, DEFAULT_WHEEL_ZOOM_OUT,
};
use crate::core::viewport::CanvasConstraints;
use crate::{Result, ViewError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EngineProfile {
    #[default]
    Balanced,
    /// Snappier wheel steps and shorter animations
    Responsive,
    /// Small wheel steps, wide scale range, grid snapping on release
    Precise,
    Custom(EngineOptions),
}

impl EngineProfile {
    pub fn resolve(&self) -> EngineOptions {
        match self {
            Self::Balanced => EngineOptions {
                constraints: CanvasConstraints::default(),
                interaction: InteractionConfig::default(),
                animation: AnimationConfig::default(),
            },
            Self::Responsive => EngineOptions {
                constraints: CanvasConstraints::default(),
                interaction: InteractionConfig {
                    wheel_zoom_in_factor: 1.25,
                    wheel_zoom_out_factor: 0.8,
                    ..InteractionConfig::default()
                },
                animation: AnimationConfig {
                    default_duration_ms: 150.0,
                    default_easing: Easing::EaseOutQuad,
                    zoom_easing: Easing::EaseOutQuad,
                    pan_easing: Easing::EaseOutQuad,
                    rotate_easing: Easing::EaseOutQuad,
                },
            },
            Self::Precise => EngineOptions {
                constraints: CanvasConstraints {
                    min_scale: 0.01,
                    max_scale: 100.0,
                    snap_to_grid: true,
                    grid_size: 10.0,
                    ..CanvasConstraints::default()
                },
                interaction: InteractionConfig {
                    wheel_zoom_in_factor: 1.05,
                    wheel_zoom_out_factor: 0.95,
                    fit_padding: 0.05,
                    ..InteractionConfig::default()
                },
                animation: AnimationConfig {
                    default_duration_ms: 400.0,
                    ..AnimationConfig::default()
                },
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    pub constraints: CanvasConstraints,
    pub interaction: InteractionConfig,
    pub animation: AnimationConfig,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineProfile::default().resolve()
    }
}

impl EngineOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: EngineOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.constraints.validate()?;
        self.interaction.validate()?;
        self.animation.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionConfig {
    /// Zoom factor for one wheel notch towards the user
    pub wheel_zoom_in_factor: f64,
    /// Zoom factor for one wheel notch away from the user
    pub wheel_zoom_out_factor: f64,
    /// Padding fraction used by `fit_to_content` when none is given
    pub fit_padding: f64,
    /// Fraction of the viewport kept inside the constraint bounding box
    pub bounds_soft_margin: f64,
}

impl InteractionConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("wheel_zoom_in_factor", self.wheel_zoom_in_factor),
            ("wheel_zoom_out_factor", self.wheel_zoom_out_factor),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ViewError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.bounds_soft_margin) {
            return Err(ViewError::Config(format!(
                "bounds_soft_margin must be within [0, 1], got {}",
                self.bounds_soft_margin
            )));
        }
        if self.fit_padding < 0.0 {
            return Err(ViewError::Config(format!(
                "fit_padding must not be negative, got {}",
                self.fit_padding
            )));
        }
        Ok(())
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            wheel_zoom_in_factor: DEFAULT_WHEEL_ZOOM_IN,
            wheel_zoom_out_factor: DEFAULT_WHEEL_ZOOM_OUT,
            fit_padding: DEFAULT_FIT_PADDING,
            bounds_soft_margin: DEFAULT_BOUNDS_SOFT_MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationConfig {
    pub default_duration_ms: f64,
    pub default_easing: Easing,
    pub zoom_easing: Easing,
    pub pan_easing: Easing,
    pub rotate_easing: Easing,
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.default_duration_ms >= 0.0 && self.default_duration_ms.is_finite()) {
            return Err(ViewError::Config(format!(
                "default_duration_ms must be non-negative, got {}",
                self.default_duration_ms
            )));
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            default_easing: Easing::EaseInOutCubic,
            zoom_easing: Easing::EaseOutCubic,
            pan_easing: Easing::EaseOutCubic,
            rotate_easing: Easing::EaseInOutQuad,
        }
    }
}
