//! Explainer and metric factories.
//!
//! The explainer factory dispatches on the construction profile registered
//! in the catalog, then applies broadcast tunables filtered against each
//! instance's advertised capability set. The metric factory keeps its two
//! entry points distinct: paired construction (one instance per explainer)
//! and the fixed canonical list.

use attrib_core::catalog::ExplainerCatalog;
use attrib_core::explainer::{
    AttentionExplainer, CamExplainer, ConstructionProfile, Explainer, ExplainerKind,
    GradientExplainer, SurrogateExplainer,
};
use attrib_core::functions::{BaselineFn, FeatureMaskFn};
use attrib_core::metric::{Metric, MetricKind, PixelFlippingMetric, StandardMetric};
use attrib_core::model::{ForwardArgExtractor, Model, TargetLayer, Tensor};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// The resolved default-argument set handed to the explainer factory.
///
/// Computed fresh per instantiation request; user-supplied overrides have
/// already been folded in by the resolver.
#[derive(Clone)]
pub struct DefaultArgs {
    pub layer: Option<TargetLayer>,
    pub background_data: Option<Tensor>,
    pub forward_arg_extractor: Option<ForwardArgExtractor>,
    pub additional_forward_arg_extractor: Option<ForwardArgExtractor>,
    pub feature_mask_fn: FeatureMaskFn,
    pub baseline_fn: BaselineFn,
}

/// Extra user tunables broadcast to every constructed explainer.
pub type Tunables = BTreeMap<String, serde_json::Value>;

/// Constructs explainer instances from catalog-registered profiles.
pub struct ExplainerFactory {
    catalog: ExplainerCatalog,
}

impl ExplainerFactory {
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

    /// Construct one explainer, then apply the broadcast tunables that the
    /// instance declares support for. Unsupported keys are skipped.
    pub fn build(
        &self,
        kind: ExplainerKind,
        model: &Arc<dyn Model>,
        args: &DefaultArgs,
        tunables: &Tunables,
    ) -> Box<dyn Explainer> {
        let profile = self.catalog.profile(kind);
        debug!(explainer = %kind, profile = ?profile, "Constructing explainer");
        let mut explainer: Box<dyn Explainer> = match profile {
            ConstructionProfile::ModelOnly => Box::new(CamExplainer::new(kind, model.clone())),
            ConstructionProfile::ForwardArgs => Box::new(AttentionExplainer::new(
                kind,
                model.clone(),
                args.forward_arg_extractor.clone(),
                args.additional_forward_arg_extractor.clone(),
            )),
            ConstructionProfile::LayerAndForwardArgs => Box::new(GradientExplainer::new(
                kind,
                model.clone(),
                args.layer.clone(),
                args.forward_arg_extractor.clone(),
                args.additional_forward_arg_extractor.clone(),
            )),
            ConstructionProfile::SurrogateSampling => Box::new(SurrogateExplainer::new(
                kind,
                model.clone(),
                args.feature_mask_fn.clone(),
                args.baseline_fn.clone(),
                args.background_data.clone(),
            )),
        };
        apply_tunables(explainer.as_mut(), tunables);
        explainer
    }

    /// Construct one explainer per recommended kind.
    pub fn build_all(
        &self,
        kinds: &[ExplainerKind],
        model: &Arc<dyn Model>,
        args: &DefaultArgs,
        tunables: &Tunables,
    ) -> Vec<Box<dyn Explainer>> {
        kinds
            .iter()
            .map(|&kind| self.build(kind, model, args, tunables))
            .collect()
    }
}

impl Default for ExplainerFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_tunables(explainer: &mut dyn Explainer, tunables: &Tunables) {
    for (key, value) in tunables {
        if !explainer.tunable_keys().contains(&key.as_str()) {
            debug!(explainer = %explainer.kind(), key = %key, "Skipping unsupported tunable");
            continue;
        }
        if !explainer.set_tunable(key, value) {
            debug!(explainer = %explainer.kind(), key = %key, "Tunable value rejected");
        }
    }
}

/// The resolved argument set for metric construction.
#[derive(Clone)]
pub struct MetricArgs {
    pub baseline_fn: BaselineFn,
    pub channel_dim: i64,
}

/// Constructs metric instances.
pub struct MetricFactory;

impl MetricFactory {
    fn build_one(
        kind: MetricKind,
        model: &Arc<dyn Model>,
        companion: Option<ExplainerKind>,
        args: &MetricArgs,
    ) -> Box<dyn Metric> {
        if kind.requires_baseline_fn() || kind.requires_channel_dim() {
            Box::new(PixelFlippingMetric::new(
                kind,
                model.clone(),
                args.baseline_fn.clone(),
                args.channel_dim,
                companion,
            ))
        } else {
            Box::new(StandardMetric::new(kind, model.clone(), companion))
        }
    }

    /// Paired entry point: one instance of `kind` per constructed explainer,
    /// each carrying its companion explainer's kind.
    pub fn build_paired(
        kind: MetricKind,
        model: &Arc<dyn Model>,
        explainers: &[Box<dyn Explainer>],
        args: &MetricArgs,
    ) -> Vec<Box<dyn Metric>> {
        explainers
            .iter()
            .map(|explainer| Self::build_one(kind, model, Some(explainer.kind()), args))
            .collect()
    }

    /// Default-list entry point: one instance per kind in the fixed
    /// canonical metric list, independent of any explainer.
    pub fn build_default(model: &Arc<dyn Model>, args: &MetricArgs) -> Vec<Box<dyn Metric>> {
        MetricKind::DEFAULT_METRICS
            .iter()
            .map(|&kind| Self::build_one(kind, model, None, args))
            .collect()
    }
}
