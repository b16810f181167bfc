//! Evaluation metric definitions and instances.
//!
//! The pixel-flipping family (MoRF, LeRF, AbPC) perturbs inputs toward a
//! baseline along a channel axis, so those instances require a baseline
//! function and a channel dimension. Everything else constructs from the
//! model handle alone.

use crate::explainer::ExplainerKind;
use crate::functions::BaselineFn;
use crate::model::Model;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a known evaluation metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    MuFidelity,
    Sensitivity,
    Complexity,
    MoRF,
    LeRF,
    AbPC,
}

impl MetricKind {
    /// The canonical fixed metric list used by the fixed-metric facade.
    pub const DEFAULT_METRICS: [MetricKind; 6] = [
        MetricKind::AbPC,
        MetricKind::MoRF,
        MetricKind::LeRF,
        MetricKind::MuFidelity,
        MetricKind::Sensitivity,
        MetricKind::Complexity,
    ];

    /// The pixel-flipping family.
    pub const PIXEL_FLIPPING: [MetricKind; 3] =
        [MetricKind::MoRF, MetricKind::LeRF, MetricKind::AbPC];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::MuFidelity => "mu_fidelity",
            MetricKind::Sensitivity => "sensitivity",
            MetricKind::Complexity => "complexity",
            MetricKind::MoRF => "morf",
            MetricKind::LeRF => "lerf",
            MetricKind::AbPC => "abpc",
        }
    }

    pub fn is_pixel_flipping(&self) -> bool {
        Self::PIXEL_FLIPPING.contains(self)
    }

    /// Whether construction requires a resolved baseline function.
    pub fn requires_baseline_fn(&self) -> bool {
        self.is_pixel_flipping()
    }

    /// Whether construction requires a resolved channel dimension.
    pub fn requires_channel_dim(&self) -> bool {
        self.is_pixel_flipping()
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A constructed evaluation metric.
pub trait Metric: Send + Sync {
    fn kind(&self) -> MetricKind;

    /// Companion explainer for paired construction, if any.
    fn companion(&self) -> Option<ExplainerKind> {
        None
    }

    fn baseline_fn(&self) -> Option<&BaselineFn> {
        None
    }

    fn channel_dim(&self) -> Option<i64> {
        None
    }
}

/// Pixel-flipping metric instance: model, baseline function, channel
/// dimension, optional companion explainer.
pub struct PixelFlippingMetric {
    kind: MetricKind,
    model: Arc<dyn Model>,
    baseline_fn: BaselineFn,
    channel_dim: i64,
    companion: Option<ExplainerKind>,
}

impl PixelFlippingMetric {
    pub fn new(
        kind: MetricKind,
        model: Arc<dyn Model>,
        baseline_fn: BaselineFn,
        channel_dim: i64,
        companion: Option<ExplainerKind>,
    ) -> Self {
        debug_assert!(kind.is_pixel_flipping());
        Self {
            kind,
            model,
            baseline_fn,
            channel_dim,
            companion,
        }
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }
}

impl Metric for PixelFlippingMetric {
    fn kind(&self) -> MetricKind {
        self.kind
    }

    fn companion(&self) -> Option<ExplainerKind> {
        self.companion
    }

    fn baseline_fn(&self) -> Option<&BaselineFn> {
        Some(&self.baseline_fn)
    }

    fn channel_dim(&self) -> Option<i64> {
        Some(self.channel_dim)
    }
}

/// Metric instance constructed from the model handle alone
/// (MuFidelity, Sensitivity, Complexity).
pub struct StandardMetric {
    kind: MetricKind,
    model: Arc<dyn Model>,
    companion: Option<ExplainerKind>,
}

impl StandardMetric {
    pub fn new(kind: MetricKind, model: Arc<dyn Model>, companion: Option<ExplainerKind>) -> Self {
        debug_assert!(!kind.is_pixel_flipping());
        Self {
            kind,
            model,
            companion,
        }
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }
}

impl Metric for StandardMetric {
    fn kind(&self) -> MetricKind {
        self.kind
    }

    fn companion(&self) -> Option<ExplainerKind> {
        self.companion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tensor;
    use pretty_assertions::assert_eq;

    struct NullModel;

    impl Model for NullModel {
        fn forward(&self, inputs: &Tensor) -> Tensor {
            inputs.clone()
        }
    }

    #[test]
    fn test_pixel_flipping_family() {
        assert!(MetricKind::MoRF.requires_baseline_fn());
        assert!(MetricKind::LeRF.requires_channel_dim());
        assert!(MetricKind::AbPC.is_pixel_flipping());
        assert!(!MetricKind::MuFidelity.requires_baseline_fn());
        assert!(!MetricKind::Complexity.requires_channel_dim());
    }

    #[test]
    fn test_default_metric_list_order() {
        assert_eq!(
            MetricKind::DEFAULT_METRICS[..3],
            [MetricKind::AbPC, MetricKind::MoRF, MetricKind::LeRF]
        );
        assert_eq!(MetricKind::DEFAULT_METRICS.len(), 6);
    }

    #[test]
    fn test_pixel_flipping_metric_exposes_requirements() {
        let metric = PixelFlippingMetric::new(
            MetricKind::MoRF,
            Arc::new(NullModel),
            BaselineFn::zeros(),
            1,
            Some(ExplainerKind::GradCam),
        );
        assert_eq!(metric.kind(), MetricKind::MoRF);
        assert_eq!(metric.baseline_fn().unwrap().name(), "zeros");
        assert_eq!(metric.channel_dim(), Some(1));
        assert_eq!(metric.companion(), Some(ExplainerKind::GradCam));
    }

    #[test]
    fn test_standard_metric_has_no_requirements() {
        let metric = StandardMetric::new(MetricKind::Complexity, Arc::new(NullModel), None);
        assert!(metric.baseline_fn().is_none());
        assert!(metric.channel_dim().is_none());
        assert!(metric.companion().is_none());
    }
}
