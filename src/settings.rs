//! Game settings and preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::DEBRIS_COUNT;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset in the Low -> Medium -> High cycle
    pub fn next(self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Background specks drawn behind the lane
    pub fn debris_count(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium => DEBRIS_COUNT / 2,
            QualityPreset::High => DEBRIS_COUNT,
        }
    }

    /// Triangles per circle
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 12,
            QualityPreset::High => 24,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    /// Camera shake as the score climbs
    pub screen_shake: bool,
    /// Grade popups on catch
    pub grade_popups: bool,
    /// Floating background debris
    pub debris: bool,

    /// FPS readout in the corner
    pub show_fps: bool,

    /// Reduced motion (no shake, no avatar jitter)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            grade_popups: true,
            debris: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Defaults with `preset` applied
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Switch presets. Debris is off on Low and back on above it.
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.debris = preset != QualityPreset::Low;
    }

    /// Shake only when motion is allowed
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Whether the panicking avatar may jitter
    pub fn effective_jitter(&self) -> bool {
        !self.reduced_motion
    }

    /// Debris specks to draw this frame
    pub fn debris_count(&self) -> usize {
        if self.debris {
            self.quality.debris_count()
        } else {
            0
        }
    }

    const STORAGE_KEY: &'static str = "tani_rush_settings";

    #[cfg(target_arch = "wasm32")]
    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Stored preferences, or defaults when absent or unreadable
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::local_storage()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok().flatten());
        let Some(json) = stored else {
            log::info!("Using default settings");
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Discarding stored settings: {e}");
            Self::default()
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::local_storage() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
                    log::warn!("Failed to save settings: {e:?}");
                }
            }
            Err(e) => log::warn!("Failed to encode settings: {e}"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings are not persisted natively ({:?})", Self::STORAGE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_cycle_wraps() {
        assert_eq!(QualityPreset::Low.next(), QualityPreset::Medium);
        assert_eq!(QualityPreset::Medium.next(), QualityPreset::High);
        assert_eq!(QualityPreset::High.next(), QualityPreset::Low);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_low_preset_drops_debris() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.debris_count(), 0);
        assert_eq!(Settings::from_preset(QualityPreset::High).debris_count(), DEBRIS_COUNT);
    }

    #[test]
    fn test_leaving_low_restores_debris() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.apply_preset(QualityPreset::Medium);
        assert!(settings.debris);
        assert_eq!(settings.debris_count(), DEBRIS_COUNT / 2);
    }

    #[test]
    fn test_reduced_motion_wins() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
        assert!(!settings.effective_jitter());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "show_fps": true }"#).unwrap();
        assert!(settings.show_fps);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.grade_popups);
    }
}
