//! The experiment container.
//!
//! Owns a model, a data source, and the configured explainers, metrics, and
//! postprocessors. Assembly is the end of this subsystem's responsibility;
//! running explanations and evaluations happens elsewhere.

use crate::explainer::{Explainer, ExplainerKind};
use crate::metric::{Metric, MetricKind};
use crate::modality::Modalities;
use crate::model::{DataSource, InputExtractor, LabelExtractor, Model, Visualizer};
use crate::postprocess::PostProcessor;
use std::sync::Arc;
use tracing::info;

/// Optional wiring hooks for batch handling and display.
#[derive(Clone, Default)]
pub struct ExperimentHooks {
    pub input_extractor: Option<InputExtractor>,
    pub label_extractor: Option<LabelExtractor>,
    pub target_extractor: Option<LabelExtractor>,
    pub input_visualizer: Option<Visualizer>,
    pub target_visualizer: Option<Visualizer>,
    /// Explain fixed target labels instead of predicted classes.
    pub target_labels: bool,
}

/// A fully configured experiment.
pub struct Experiment {
    model: Arc<dyn Model>,
    data: Arc<dyn DataSource>,
    explainers: Vec<Box<dyn Explainer>>,
    metrics: Vec<Box<dyn Metric>>,
    postprocessors: Vec<PostProcessor>,
    modalities: Modalities,
    hooks: ExperimentHooks,
}

impl Experiment {
    pub fn new(
        model: Arc<dyn Model>,
        data: Arc<dyn DataSource>,
        explainers: Vec<Box<dyn Explainer>>,
        metrics: Vec<Box<dyn Metric>>,
        postprocessors: Vec<PostProcessor>,
        modalities: Modalities,
        hooks: ExperimentHooks,
    ) -> Self {
        info!(
            model = model.name(),
            modalities = %modalities,
            explainers = explainers.len(),
            metrics = metrics.len(),
            postprocessors = postprocessors.len(),
            "Assembled experiment"
        );
        Self {
            model,
            data,
            explainers,
            metrics,
            postprocessors,
            modalities,
            hooks,
        }
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }

    pub fn data(&self) -> &Arc<dyn DataSource> {
        &self.data
    }

    pub fn explainers(&self) -> &[Box<dyn Explainer>] {
        &self.explainers
    }

    pub fn metrics(&self) -> &[Box<dyn Metric>] {
        &self.metrics
    }

    pub fn postprocessors(&self) -> &[PostProcessor] {
        &self.postprocessors
    }

    pub fn modalities(&self) -> &Modalities {
        &self.modalities
    }

    pub fn hooks(&self) -> &ExperimentHooks {
        &self.hooks
    }

    pub fn explainer_kinds(&self) -> Vec<ExplainerKind> {
        self.explainers.iter().map(|e| e.kind()).collect()
    }

    pub fn metric_kinds(&self) -> Vec<MetricKind> {
        self.metrics.iter().map(|m| m.kind()).collect()
    }
}
