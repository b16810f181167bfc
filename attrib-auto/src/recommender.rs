//! Modality-driven recommendation of explainers and metrics.
//!
//! The default policy filters the explainer catalog on declared modality
//! support. Model architecture detection is out of scope, so the model
//! participates only as an opaque handle; the trait seam exists for callers
//! with smarter policies.

use attrib_core::catalog::ExplainerCatalog;
use attrib_core::explainer::ExplainerKind;
use attrib_core::metric::MetricKind;
use attrib_core::modality::{Modalities, Modality};
use attrib_core::model::Model;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The recommendation bundle: ordered explainer and metric kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub explainers: Vec<ExplainerKind>,
    pub metrics: Vec<MetricKind>,
}

/// Maps (modalities, model) to a recommendation bundle.
pub trait Recommender {
    fn recommend(&self, modalities: &Modalities, model: &dyn Model) -> Recommendation;
}

/// Default recommender: explainers are the catalog entries supporting every
/// requested modality, in registration order; metrics are the pixel-flipping
/// family plus the correctness set, except for tabular-primary models where
/// pixel flipping (a channel-axis perturbation scheme) is skipped.
pub struct XaiRecommender {
    catalog: ExplainerCatalog,
}

impl XaiRecommender {
    pub fn new() -> Self {
        Self {
            catalog: ExplainerCatalog::builtin(),
        }
    }

    pub fn with_catalog(catalog: ExplainerCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ExplainerCatalog {
        &self.catalog
    }

    fn recommend_metrics(&self, modalities: &Modalities) -> Vec<MetricKind> {
        let mut metrics = Vec::new();
        if modalities.primary() != Modality::Tabular {
            metrics.extend(MetricKind::PIXEL_FLIPPING);
        }
        metrics.extend([
            MetricKind::MuFidelity,
            MetricKind::Sensitivity,
            MetricKind::Complexity,
        ]);
        metrics
    }
}

impl Default for XaiRecommender {
    fn default() -> Self {
        Self::new()
    }
}

impl Recommender for XaiRecommender {
    fn recommend(&self, modalities: &Modalities, model: &dyn Model) -> Recommendation {
        let explainers: Vec<ExplainerKind> = self
            .catalog
            .supporting_all(modalities.as_slice())
            .map(|def| def.kind)
            .collect();
        let metrics = self.recommend_metrics(modalities);
        info!(
            model = model.name(),
            modalities = %modalities,
            explainers = explainers.len(),
            metrics = metrics.len(),
            "Recommended explainers and metrics"
        );
        Recommendation {
            explainers,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrib_core::model::Tensor;
    use pretty_assertions::assert_eq;

    struct NullModel;

    impl Model for NullModel {
        fn forward(&self, inputs: &Tensor) -> Tensor {
            inputs.clone()
        }
    }

    #[test]
    fn test_image_recommendation_includes_cam_family() {
        let rec = XaiRecommender::new()
            .recommend(&Modalities::single(Modality::Image), &NullModel);
        assert!(rec.explainers.contains(&ExplainerKind::GradCam));
        assert!(rec.explainers.contains(&ExplainerKind::Lime));
        assert_eq!(
            rec.metrics[..3],
            [MetricKind::MoRF, MetricKind::LeRF, MetricKind::AbPC]
        );
    }

    #[test]
    fn test_tabular_recommendation_skips_cam_and_flipping() {
        let rec = XaiRecommender::new()
            .recommend(&Modalities::single(Modality::Tabular), &NullModel);
        assert!(!rec.explainers.contains(&ExplainerKind::GradCam));
        assert!(rec.explainers.contains(&ExplainerKind::KernelShap));
        assert_eq!(
            rec.metrics,
            vec![
                MetricKind::MuFidelity,
                MetricKind::Sensitivity,
                MetricKind::Complexity
            ]
        );
    }

    #[test]
    fn test_composite_recommendation_intersects_support() {
        let modalities = Modalities::parse(&["image", "text"]).unwrap();
        let rec = XaiRecommender::new().recommend(&modalities, &NullModel);
        assert!(rec.explainers.contains(&ExplainerKind::AttentionRollout));
        assert!(!rec.explainers.contains(&ExplainerKind::GradCam));
    }

    #[test]
    fn test_text_recommendation_keeps_flipping_metrics() {
        let rec = XaiRecommender::new()
            .recommend(&Modalities::single(Modality::Text), &NullModel);
        assert!(rec.metrics.contains(&MetricKind::MoRF));
    }
}
