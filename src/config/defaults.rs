/// Hiragana offered after trained characters, one candidate per char.
pub(super) const DEFAULT_BASE_ALPHABET: &str = "あいうえおかきくけこさしすせそ";

pub(super) const MAX_PADDING_RATIO: f32 = 0.5;
pub(super) const MIN_FRAME_PX_FLOOR: f32 = 1.0;

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_alpha_threshold() -> u8 {
    16
}

pub(super) fn default_min_pixel_floor() -> u32 {
    60
}

pub(super) fn default_area_divisor() -> u32 {
    20_000
}

pub(super) fn default_min_padding() -> u32 {
    2
}

pub(super) fn default_padding_ratio() -> f32 {
    0.004
}

pub(super) fn default_overlap_fraction() -> f32 {
    0.5
}

pub(super) fn default_base_alphabet() -> Vec<String> {
    DEFAULT_BASE_ALPHABET.chars().map(String::from).collect()
}

pub(super) fn default_min_frame_px() -> f32 {
    12.0
}

pub(super) fn default_rng_seed() -> u64 {
    0x1f2e_3d4c
}

pub(super) fn default_log_filter() -> String {
    "info".to_string()
}

pub(super) fn default_max_log_files() -> usize {
    10
}

pub(super) fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}
