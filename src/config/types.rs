use serde::{Deserialize, Serialize};

use super::defaults::{
    MAX_PADDING_RATIO, MIN_FRAME_PX_FLOOR, clamp_unit, default_alpha_threshold,
    default_area_divisor, default_base_alphabet, default_log_filter, default_max_log_files,
    default_min_frame_px, default_min_padding, default_min_pixel_floor, default_overlap_fraction,
    default_padding_ratio, default_rng_seed, default_true,
};

/// Aggregate engine configuration loaded from `inkmark.toml`.
///
/// Config sections: `detection`, `suggestions`, `session`, `logging`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub detection: DetectionSettings,
    #[serde(default)]
    pub suggestions: SuggestionSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub logging: LogSettings,
}

impl EngineConfig {
    /// Clamp every section into its valid range.
    pub fn normalized(self) -> Self {
        Self {
            detection: self.detection.normalized(),
            suggestions: self.suggestions.normalized(),
            session: self.session.normalized(),
            logging: self.logging.normalized(),
        }
    }
}

/// Tuning for ink region detection and overlap reconciliation.
///
/// Config keys: `alpha_threshold`, `min_pixel_floor`, `area_divisor`,
/// `min_padding`, `padding_ratio`, `overlap_fraction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Pixels with alpha strictly above this value count as ink.
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,
    /// Smallest component size kept, regardless of surface area.
    #[serde(default = "default_min_pixel_floor")]
    pub min_pixel_floor: u32,
    /// Surface area divided by this value gives the area-scaled size floor.
    #[serde(default = "default_area_divisor")]
    pub area_divisor: u32,
    /// Smallest padding added around a detected blob, in pixels.
    #[serde(default = "default_min_padding")]
    pub min_padding: u32,
    /// Padding as a fraction of the smaller surface dimension.
    #[serde(default = "default_padding_ratio")]
    pub padding_ratio: f32,
    /// Share of a new region that must be covered by an existing annotation
    /// before the region is treated as a duplicate.
    #[serde(default = "default_overlap_fraction")]
    pub overlap_fraction: f32,
}

impl DetectionSettings {
    pub(crate) fn normalized(mut self) -> Self {
        self.area_divisor = self.area_divisor.max(1);
        self.padding_ratio = if self.padding_ratio.is_finite() {
            self.padding_ratio.clamp(0.0, MAX_PADDING_RATIO)
        } else {
            default_padding_ratio()
        };
        self.overlap_fraction = clamp_unit(self.overlap_fraction, default_overlap_fraction());
        self
    }
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            alpha_threshold: default_alpha_threshold(),
            min_pixel_floor: default_min_pixel_floor(),
            area_divisor: default_area_divisor(),
            min_padding: default_min_padding(),
            padding_ratio: default_padding_ratio(),
            overlap_fraction: default_overlap_fraction(),
        }
    }
}

/// Config keys: `base_alphabet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSettings {
    /// Characters appended after the trained ones when building candidates.
    #[serde(default = "default_base_alphabet")]
    pub base_alphabet: Vec<String>,
}

impl SuggestionSettings {
    pub(crate) fn normalized(mut self) -> Self {
        self.base_alphabet = self
            .base_alphabet
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        self
    }
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            base_alphabet: default_base_alphabet(),
        }
    }
}

/// Annotation session behaviour.
///
/// Config keys: `min_frame_px`, `rng_seed`, `persist_session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Manual frames narrower or shorter than this (in frame pixels) are ignored.
    #[serde(default = "default_min_frame_px")]
    pub min_frame_px: f32,
    /// Seed for the generator that picks re-analysis suggestion offsets.
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
    /// Write the annotation set to storage after every change.
    #[serde(default = "default_true")]
    pub persist_session: bool,
}

impl SessionSettings {
    pub(crate) fn normalized(mut self) -> Self {
        self.min_frame_px = if self.min_frame_px.is_finite() {
            self.min_frame_px.max(MIN_FRAME_PX_FLOOR)
        } else {
            default_min_frame_px()
        };
        self
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            min_frame_px: default_min_frame_px(),
            rng_seed: default_rng_seed(),
            persist_session: true,
        }
    }
}

/// Config keys: `default_filter`, `max_files`, `stdout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Filter directive used when `INKMARK_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub default_filter: String,
    /// Number of log files kept in the logs directory.
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
    /// Mirror log output to stdout.
    #[serde(default = "default_true")]
    pub stdout: bool,
}

impl LogSettings {
    pub(crate) fn normalized(mut self) -> Self {
        self.max_files = self.max_files.max(1);
        if self.default_filter.trim().is_empty() {
            self.default_filter = default_log_filter();
        }
        self
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            default_filter: default_log_filter(),
            max_files: default_max_log_files(),
            stdout: true,
        }
    }
}
