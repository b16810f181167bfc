//! Auto-configuration facades.
//!
//! Two variants with different metric policies:
//! - [`AutoExperiment`]: explainers *and* metrics come from the recommender;
//!   metrics are paired, one instance per explainer.
//! - [`AutoExplanation`]: explainers come from the recommender; metrics are
//!   always the fixed canonical list and postprocessors the full catalog.
//!
//! Both validate modality preconditions before constructing anything.

use crate::defaults::{resolve_baseline_fn, resolve_channel_dim, resolve_feature_mask_fn};
use crate::factory::{DefaultArgs, ExplainerFactory, MetricArgs, MetricFactory, Tunables};
use crate::recommender::{Recommendation, Recommender, XaiRecommender};
use attrib_core::error::ConfigError;
use attrib_core::experiment::{Experiment, ExperimentHooks};
use attrib_core::functions::{BaselineFn, FeatureMaskFn};
use attrib_core::metric::Metric;
use attrib_core::modality::{Modalities, Modality};
use attrib_core::model::{DataSource, ForwardArgExtractor, Model, TargetLayer, Tensor};
use attrib_core::postprocess::all_postprocessors;
use std::sync::Arc;
use tracing::info;

/// User-supplied overrides and wiring hooks for facade construction.
///
/// Every field is optional; absent values fall back to modality defaults.
#[derive(Clone, Default)]
pub struct ExperimentOptions {
    /// Target layer for layer-dependent explainers. Required when any
    /// modality is text.
    pub layer: Option<TargetLayer>,
    /// Reference sample for tabular models. Required by the fixed-metric
    /// facade when the primary modality is tabular.
    pub background_data: Option<Tensor>,
    pub forward_arg_extractor: Option<ForwardArgExtractor>,
    pub additional_forward_arg_extractor: Option<ForwardArgExtractor>,
    pub feature_mask_fn: Option<FeatureMaskFn>,
    pub baseline_fn: Option<BaselineFn>,
    pub channel_dim: Option<i64>,
    pub mask_token_id: Option<i64>,
    /// Extra tunables broadcast to every explainer; keys an instance does
    /// not support are skipped.
    pub tunables: Tunables,
    pub hooks: ExperimentHooks,
}

impl ExperimentOptions {
    pub fn with_layer(mut self, layer: TargetLayer) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn with_background_data(mut self, background_data: Tensor) -> Self {
        self.background_data = Some(background_data);
        self
    }

    pub fn with_baseline_fn(mut self, baseline_fn: BaselineFn) -> Self {
        self.baseline_fn = Some(baseline_fn);
        self
    }

    pub fn with_feature_mask_fn(mut self, feature_mask_fn: FeatureMaskFn) -> Self {
        self.feature_mask_fn = Some(feature_mask_fn);
        self
    }

    pub fn with_channel_dim(mut self, channel_dim: i64) -> Self {
        self.channel_dim = Some(channel_dim);
        self
    }

    pub fn with_mask_token_id(mut self, mask_token_id: i64) -> Self {
        self.mask_token_id = Some(mask_token_id);
        self
    }

    pub fn with_tunable(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.tunables.insert(key.into(), value);
        self
    }

    /// Baseline resolution order: explicit override, then the background
    /// mean for tabular models with background data, then the modality
    /// default.
    fn resolved_baseline_fn(&self, modalities: &Modalities) -> BaselineFn {
        let effective = self.baseline_fn.clone().or_else(|| {
            if modalities.primary() == Modality::Tabular {
                self.background_data.as_ref().map(BaselineFn::background_mean)
            } else {
                None
            }
        });
        resolve_baseline_fn(modalities, self.mask_token_id, effective)
    }

    fn default_args(&self, modalities: &Modalities) -> DefaultArgs {
        DefaultArgs {
            layer: self.layer.clone(),
            background_data: self.background_data.clone(),
            forward_arg_extractor: self.forward_arg_extractor.clone(),
            additional_forward_arg_extractor: self.additional_forward_arg_extractor.clone(),
            feature_mask_fn: resolve_feature_mask_fn(modalities, self.feature_mask_fn.clone()),
            baseline_fn: self.resolved_baseline_fn(modalities),
        }
    }

    fn metric_args(&self, modalities: &Modalities) -> MetricArgs {
        MetricArgs {
            baseline_fn: self.resolved_baseline_fn(modalities),
            channel_dim: resolve_channel_dim(modalities, self.channel_dim),
        }
    }
}

fn check_layer(modalities: &Modalities, options: &ExperimentOptions) -> Result<(), ConfigError> {
    if modalities.has_text() && options.layer.is_none() {
        return Err(ConfigError::MissingLayer);
    }
    Ok(())
}

fn check_background_data(
    modalities: &Modalities,
    options: &ExperimentOptions,
) -> Result<(), ConfigError> {
    if modalities.primary() == Modality::Tabular && options.background_data.is_none() {
        return Err(ConfigError::MissingBackgroundData);
    }
    Ok(())
}

/// Recommendation-driven facade: explainers and metrics are exactly what
/// the recommender returns, metrics paired per explainer.
pub struct AutoExperiment {
    experiment: Experiment,
    recommendation: Recommendation,
}

impl AutoExperiment {
    /// Build with the default recommender.
    pub fn new<S: AsRef<str>>(
        model: Arc<dyn Model>,
        data: Arc<dyn DataSource>,
        modalities: &[S],
        options: ExperimentOptions,
    ) -> Result<Self, ConfigError> {
        Self::with_recommender(model, data, modalities, options, &XaiRecommender::new())
    }

    pub fn with_recommender<S: AsRef<str>>(
        model: Arc<dyn Model>,
        data: Arc<dyn DataSource>,
        modalities: &[S],
        options: ExperimentOptions,
        recommender: &dyn Recommender,
    ) -> Result<Self, ConfigError> {
        let modalities = Modalities::parse(modalities)?;
        check_layer(&modalities, &options)?;

        let recommendation = recommender.recommend(&modalities, model.as_ref());
        let args = options.default_args(&modalities);
        let metric_args = options.metric_args(&modalities);

        let factory = ExplainerFactory::new();
        let explainers =
            factory.build_all(&recommendation.explainers, &model, &args, &options.tunables);

        let mut metrics: Vec<Box<dyn Metric>> = Vec::new();
        for &kind in &recommendation.metrics {
            metrics.extend(MetricFactory::build_paired(
                kind,
                &model,
                &explainers,
                &metric_args,
            ));
        }

        info!(
            modalities = %modalities,
            explainers = explainers.len(),
            metrics = metrics.len(),
            "Auto-configured experiment"
        );
        let experiment = Experiment::new(
            model,
            data,
            explainers,
            metrics,
            Vec::new(),
            modalities,
            options.hooks,
        );
        Ok(Self {
            experiment,
            recommendation,
        })
    }

    pub fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    pub fn recommendation(&self) -> &Recommendation {
        &self.recommendation
    }

    pub fn into_experiment(self) -> Experiment {
        self.experiment
    }
}

impl std::fmt::Debug for AutoExperiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoExperiment")
            .field("recommendation", &self.recommendation)
            .finish_non_exhaustive()
    }
}

/// Fixed-metric facade: explainers come from the recommender; metrics are
/// always the canonical list and postprocessors the full catalog.
pub struct AutoExplanation {
    experiment: Experiment,
    recommendation: Recommendation,
}

impl AutoExplanation {
    /// Build with the default recommender.
    pub fn new<S: AsRef<str>>(
        model: Arc<dyn Model>,
        data: Arc<dyn DataSource>,
        modalities: &[S],
        options: ExperimentOptions,
    ) -> Result<Self, ConfigError> {
        Self::with_recommender(model, data, modalities, options, &XaiRecommender::new())
    }

    pub fn with_recommender<S: AsRef<str>>(
        model: Arc<dyn Model>,
        data: Arc<dyn DataSource>,
        modalities: &[S],
        options: ExperimentOptions,
        recommender: &dyn Recommender,
    ) -> Result<Self, ConfigError> {
        let modalities = Modalities::parse(modalities)?;
        check_layer(&modalities, &options)?;
        check_background_data(&modalities, &options)?;

        let recommendation = recommender.recommend(&modalities, model.as_ref());
        let args = options.default_args(&modalities);
        let metric_args = options.metric_args(&modalities);
        let channel_dim = metric_args.channel_dim;

        let factory = ExplainerFactory::new();
        let explainers =
            factory.build_all(&recommendation.explainers, &model, &args, &options.tunables);
        let metrics = MetricFactory::build_default(&model, &metric_args);
        let postprocessors = all_postprocessors(channel_dim);

        info!(
            modalities = %modalities,
            explainers = explainers.len(),
            metrics = metrics.len(),
            postprocessors = postprocessors.len(),
            "Auto-configured explanation experiment"
        );
        let experiment = Experiment::new(
            model,
            data,
            explainers,
            metrics,
            postprocessors,
            modalities,
            options.hooks,
        );
        Ok(Self {
            experiment,
            recommendation,
        })
    }

    pub fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    pub fn recommendation(&self) -> &Recommendation {
        &self.recommendation
    }

    pub fn into_experiment(self) -> Experiment {
        self.experiment
    }
}

impl std::fmt::Debug for AutoExplanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoExplanation")
            .field("recommendation", &self.recommendation)
            .finish_non_exhaustive()
    }
}
