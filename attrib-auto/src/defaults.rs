//! Canonical per-modality defaults and the override-aware resolver.
//!
//! Defaults live in one closed table keyed by modality; call sites never
//! branch on modality themselves. Every resolver follows the same rule: a
//! user-supplied override wins verbatim, otherwise the primary modality's
//! canonical default applies.

use attrib_core::functions::{BaselineFn, FeatureMaskFn};
use attrib_core::modality::{Modalities, Modality};

/// Grid cell size for the canonical image feature mask.
const IMAGE_GRID_CELL: usize = 8;

/// Canonical channel dimension for a modality.
///
/// Image batches are channels-first (`NCHW`); tabular and text treat the
/// trailing axis as the feature/token axis.
pub fn default_channel_dim(modality: Modality) -> i64 {
    match modality {
        Modality::Image => 1,
        Modality::Tabular => -1,
        Modality::Text => -1,
    }
}

/// Canonical feature-mask function for a modality.
pub fn default_feature_mask_fn(modality: Modality) -> FeatureMaskFn {
    match modality {
        Modality::Image => FeatureMaskFn::grid(IMAGE_GRID_CELL),
        Modality::Tabular | Modality::Text => FeatureMaskFn::feature_units(),
    }
}

/// Canonical baseline generator for a modality. Text baselines fill with
/// the mask token id; image and tabular baselines are all zeros.
pub fn default_baseline_fn(modality: Modality, mask_token_id: i64) -> BaselineFn {
    match modality {
        Modality::Image | Modality::Tabular => BaselineFn::zeros(),
        Modality::Text => BaselineFn::token_fill(mask_token_id),
    }
}

/// Resolve the feature-mask function: override wins, else the primary
/// modality's default.
pub fn resolve_feature_mask_fn(
    modalities: &Modalities,
    override_fn: Option<FeatureMaskFn>,
) -> FeatureMaskFn {
    override_fn.unwrap_or_else(|| default_feature_mask_fn(modalities.primary()))
}

/// Resolve the baseline generator: override wins, else the primary
/// modality's default. `mask_token_id` defaults to 0 when absent.
pub fn resolve_baseline_fn(
    modalities: &Modalities,
    mask_token_id: Option<i64>,
    override_fn: Option<BaselineFn>,
) -> BaselineFn {
    override_fn
        .unwrap_or_else(|| default_baseline_fn(modalities.primary(), mask_token_id.unwrap_or(0)))
}

/// Resolve the channel dimension: override wins, else the primary
/// modality's default.
pub fn resolve_channel_dim(modalities: &Modalities, override_dim: Option<i64>) -> i64 {
    override_dim.unwrap_or_else(|| default_channel_dim(modalities.primary()))
}
