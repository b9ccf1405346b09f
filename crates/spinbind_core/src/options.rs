//! Engine options, settings patches, and renderer selection
//!
//! [`EngineOptions`] is the options object an engine is constructed with: the
//! renderer, the structural numeric/affix settings, and a free-form
//! pass-through bag. [`SettingsPatch`] is the subset that can be changed on a
//! live engine through [`SpinEngine::update_settings`].
//!
//! Field names follow the engine's vocabulary, so the display suffix travels
//! as `postfix`.
//!
//! [`SpinEngine::update_settings`]: crate::engine::SpinEngine::update_settings

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EngineError;

// ============================================================================
// Renderer
// ============================================================================

/// Presentation skin the engine renders its buttons and affixes with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    /// Framework-free markup
    #[default]
    Vanilla,
    /// Bootstrap 3 input groups
    Bootstrap3,
    /// Bootstrap 4 input groups
    Bootstrap4,
    /// Bootstrap 5 input groups
    Bootstrap5,
    /// Tailwind utility classes
    Tailwind,
}

impl Renderer {
    /// Every renderer
    pub const ALL: [Renderer; 5] = [
        Renderer::Vanilla,
        Renderer::Bootstrap3,
        Renderer::Bootstrap4,
        Renderer::Bootstrap5,
        Renderer::Tailwind,
    ];

    /// Stable renderer name, as passed to the engine
    pub fn name(self) -> &'static str {
        match self {
            Renderer::Vanilla => "vanilla",
            Renderer::Bootstrap3 => "bootstrap3",
            Renderer::Bootstrap4 => "bootstrap4",
            Renderer::Bootstrap5 => "bootstrap5",
            Renderer::Tailwind => "tailwind",
        }
    }
}

impl std::fmt::Display for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Renderer {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Renderer::ALL
            .into_iter()
            .find(|renderer| renderer.name() == wanted)
            .ok_or_else(|| EngineError::RendererUnavailable(s.to_string()))
    }
}

// ============================================================================
// Settings patch
// ============================================================================

/// Non-structural engine settings
///
/// Absent fields are left untouched when a patch is applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
}

impl SettingsPatch {
    /// Whether the patch carries no field
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
            && self.max.is_none()
            && self.step.is_none()
            && self.decimals.is_none()
            && self.prefix.is_none()
            && self.postfix.is_none()
    }

    /// Overlay every field present in `other` onto `self`
    pub fn merge(&mut self, other: &SettingsPatch) {
        if other.min.is_some() {
            self.min = other.min;
        }
        if other.max.is_some() {
            self.max = other.max;
        }
        if other.step.is_some() {
            self.step = other.step;
        }
        if other.decimals.is_some() {
            self.decimals = other.decimals;
        }
        if other.prefix.is_some() {
            self.prefix.clone_from(&other.prefix);
        }
        if other.postfix.is_some() {
            self.postfix.clone_from(&other.postfix);
        }
    }

    /// The present fields as an engine options map
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(min) = self.min {
            map.insert("min".into(), Value::from(min));
        }
        if let Some(max) = self.max {
            map.insert("max".into(), Value::from(max));
        }
        if let Some(step) = self.step {
            map.insert("step".into(), Value::from(step));
        }
        if let Some(decimals) = self.decimals {
            map.insert("decimals".into(), Value::from(decimals));
        }
        if let Some(prefix) = &self.prefix {
            map.insert("prefix".into(), Value::from(prefix.as_str()));
        }
        if let Some(postfix) = &self.postfix {
            map.insert("postfix".into(), Value::from(postfix.as_str()));
        }
        map
    }
}

// ============================================================================
// Engine options
// ============================================================================

/// The options object an engine is constructed with
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EngineOptions {
    map: Map<String, Value>,
}

impl EngineOptions {
    /// Derive construction options
    ///
    /// Structural fields are written first, then the pass-through bag is
    /// merged over them, so bag keys win. The renderer cannot be overridden
    /// from the bag.
    pub fn derive(renderer: Renderer, settings: &SettingsPatch, extra: &Map<String, Value>) -> Self {
        let mut map = Map::new();
        map.insert("renderer".into(), Value::from(renderer.name()));
        map.extend(settings.to_map());
        for (key, value) in extra {
            if key == "renderer" {
                tracing::debug!("ignoring `renderer` in pass-through options");
                continue;
            }
            map.insert(key.clone(), value.clone());
        }
        Self { map }
    }

    /// Raw option value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Numeric option value
    pub fn number(&self, key: &str) -> Option<f64> {
        self.map.get(key).and_then(Value::as_f64)
    }

    /// String option value
    pub fn text(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// The selected renderer, if the `renderer` entry names a known one
    pub fn renderer(&self) -> Option<Renderer> {
        self.text("renderer").and_then(|name| name.parse().ok())
    }

    /// The settings fields carried by these options
    pub fn settings(&self) -> SettingsPatch {
        SettingsPatch {
            min: self.number("min"),
            max: self.number("max"),
            step: self.number("step"),
            decimals: self
                .map
                .get("decimals")
                .and_then(Value::as_u64)
                .and_then(|d| u32::try_from(d).ok()),
            prefix: self.text("prefix").map(str::to_string),
            postfix: self.text("postfix").map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renderer_names_round_trip() {
        for renderer in Renderer::ALL {
            assert_eq!(renderer.name().parse::<Renderer>().unwrap(), renderer);
        }
        assert_eq!("Bootstrap5".parse::<Renderer>().unwrap(), Renderer::Bootstrap5);
        assert!(matches!(
            "material".parse::<Renderer>(),
            Err(EngineError::RendererUnavailable(_))
        ));
    }

    #[test]
    fn test_patch_serializes_present_fields_only() {
        let patch = SettingsPatch {
            max: Some(10.0),
            postfix: Some("%".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"max": 10.0, "postfix": "%"})
        );
        assert_eq!(Value::Object(patch.to_map()), json!({"max": 10.0, "postfix": "%"}));
    }

    #[test]
    fn test_patch_merge_keeps_absent_fields() {
        let mut current = SettingsPatch {
            min: Some(0.0),
            max: Some(100.0),
            prefix: Some("$".into()),
            ..Default::default()
        };
        current.merge(&SettingsPatch {
            max: Some(50.0),
            ..Default::default()
        });
        assert_eq!(current.min, Some(0.0));
        assert_eq!(current.max, Some(50.0));
        assert_eq!(current.prefix.as_deref(), Some("$"));
    }

    #[test]
    fn test_derive_merges_bag_over_structural_fields() {
        let settings = SettingsPatch {
            min: Some(0.0),
            step: Some(1.0),
            ..Default::default()
        };
        let mut extra = Map::new();
        extra.insert("step".into(), json!(5));
        extra.insert("boostat".into(), json!(10));
        extra.insert("renderer".into(), json!("tailwind"));

        let options = EngineOptions::derive(Renderer::Bootstrap4, &settings, &extra);
        assert_eq!(options.renderer(), Some(Renderer::Bootstrap4));
        assert_eq!(options.number("min"), Some(0.0));
        assert_eq!(options.number("step"), Some(5.0));
        assert_eq!(options.number("boostat"), Some(10.0));
        assert!(options.get("max").is_none());
        assert_eq!(options.settings().step, Some(5.0));
    }
}
