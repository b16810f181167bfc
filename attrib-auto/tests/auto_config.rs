//! Integration tests for the auto-configuration facades.
//!
//! These tests exercise the full path end-to-end: modality validation,
//! recommendation, default resolution, factory dispatch, and experiment
//! assembly, using a mock model and an in-memory data source.

use attrib_auto::{AutoExperiment, AutoExplanation, ExperimentOptions, Recommender, XaiRecommender};
use attrib_core::error::ConfigError;
use attrib_core::explainer::ExplainerKind;
use attrib_core::metric::MetricKind;
use attrib_core::modality::Modalities;
use attrib_core::model::{Batch, DataSource, InMemoryData, Model, TargetLayer, Tensor};
use ndarray::IxDyn;
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// Mock classifier that maps any input to a fixed logit vector.
struct ConstNet {
    n_classes: usize,
}

impl Model for ConstNet {
    fn forward(&self, _inputs: &Tensor) -> Tensor {
        Tensor::zeros(IxDyn(&[1, self.n_classes]))
    }

    fn name(&self) -> &str {
        "const_net"
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn model() -> Arc<dyn Model> {
    Arc::new(ConstNet { n_classes: 10 })
}

fn image_data() -> Arc<dyn DataSource> {
    Arc::new(InMemoryData::new(vec![Batch {
        inputs: Tensor::zeros(IxDyn(&[2, 3, 16, 16])),
        labels: vec![0, 1],
    }]))
}

#[test]
fn image_experiment_configures_end_to_end() {
    init_tracing();
    let auto = AutoExperiment::new(
        model(),
        image_data(),
        &["image"],
        ExperimentOptions::default().with_layer(TargetLayer::new("features.28")),
    )
    .unwrap();

    let kinds = auto.experiment().explainer_kinds();
    assert!(kinds.contains(&ExplainerKind::GradCam));
    assert!(kinds.contains(&ExplainerKind::IntegratedGradients));

    // Every recommended metric kind is instantiated once per explainer.
    let expected = kinds.len() * auto.recommendation().metrics.len();
    assert_eq!(auto.experiment().metrics().len(), expected);

    // CAM explainers took the model-only path despite the supplied layer.
    let grad_cam = auto
        .experiment()
        .explainers()
        .iter()
        .find(|e| e.kind() == ExplainerKind::GradCam)
        .unwrap();
    assert!(grad_cam.target_layer().is_none());

    // Layer-dependent explainers received it.
    let ig = auto
        .experiment()
        .explainers()
        .iter()
        .find(|e| e.kind() == ExplainerKind::IntegratedGradients)
        .unwrap();
    assert_eq!(ig.target_layer().unwrap().path(), "features.28");
}

#[test]
fn explanation_facade_uses_fixed_metrics_and_postprocessors() {
    init_tracing();
    let auto = AutoExplanation::new(
        model(),
        image_data(),
        &["image"],
        ExperimentOptions::default(),
    )
    .unwrap();

    assert_eq!(
        auto.experiment().metric_kinds(),
        MetricKind::DEFAULT_METRICS.to_vec()
    );
    assert_eq!(auto.experiment().postprocessors().len(), 10);

    // Pixel-flipping metrics resolved the image defaults.
    let morf = auto
        .experiment()
        .metrics()
        .iter()
        .find(|m| m.kind() == MetricKind::MoRF)
        .unwrap();
    assert_eq!(morf.baseline_fn().unwrap().name(), "zeros");
    assert_eq!(morf.channel_dim(), Some(1));
}

#[test]
fn text_modality_requires_word_embedding_layer() {
    init_tracing();
    let err = AutoExplanation::new(
        model(),
        image_data(),
        &["text"],
        ExperimentOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingLayer));
    assert!(err.to_string().contains("word embedding"));

    let auto = AutoExplanation::new(
        model(),
        image_data(),
        &["text"],
        ExperimentOptions::default()
            .with_layer(TargetLayer::new("encoder.embeddings"))
            .with_mask_token_id(103),
    )
    .unwrap();

    // Text defaults: mask-token baseline, trailing channel axis.
    let abpc = auto
        .experiment()
        .metrics()
        .iter()
        .find(|m| m.kind() == MetricKind::AbPC)
        .unwrap();
    assert_eq!(abpc.baseline_fn().unwrap().name(), "mask_token");
    assert_eq!(abpc.channel_dim(), Some(-1));
}

#[test]
fn tabular_explanation_requires_background_data() {
    init_tracing();
    let err = AutoExplanation::new(
        model(),
        image_data(),
        &["tabular"],
        ExperimentOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingBackgroundData));

    let auto = AutoExplanation::new(
        model(),
        image_data(),
        &["tabular"],
        ExperimentOptions::default().with_background_data(Tensor::zeros(IxDyn(&[8, 4]))),
    )
    .unwrap();

    // Tabular recommendation leans on the surrogate family.
    let kinds = auto.experiment().explainer_kinds();
    assert!(kinds.contains(&ExplainerKind::Lime));
    assert!(kinds.contains(&ExplainerKind::KernelShap));
    assert!(!kinds.contains(&ExplainerKind::GradCam));

    // The supplied background data becomes the surrogate baseline.
    let lime = auto
        .experiment()
        .explainers()
        .iter()
        .find(|e| e.kind() == ExplainerKind::Lime)
        .unwrap();
    assert_eq!(lime.baseline_fn().unwrap().name(), "background_mean");
    // And the surrogate sampler receives the dataset itself.
    assert_eq!(lime.background_data().unwrap().shape(), &[8, 4]);
}

#[test]
fn unsupported_modality_fails_fast_naming_it() {
    init_tracing();
    let err = AutoExperiment::new(
        model(),
        image_data(),
        &["audio"],
        ExperimentOptions::default(),
    )
    .unwrap_err();
    match err {
        ConfigError::UnsupportedModality { modality } => assert_eq!(modality, "audio"),
        e => panic!("Expected UnsupportedModality, got: {:?}", e),
    }
}

#[test]
fn custom_recommender_drives_selection() {
    init_tracing();

    struct OnlyLime;

    impl Recommender for OnlyLime {
        fn recommend(
            &self,
            _modalities: &Modalities,
            _model: &dyn Model,
        ) -> attrib_auto::Recommendation {
            attrib_auto::Recommendation {
                explainers: vec![ExplainerKind::Lime],
                metrics: vec![MetricKind::Complexity],
            }
        }
    }

    let auto = AutoExperiment::with_recommender(
        model(),
        image_data(),
        &["image"],
        ExperimentOptions::default(),
        &OnlyLime,
    )
    .unwrap();
    assert_eq!(
        auto.experiment().explainer_kinds(),
        vec![ExplainerKind::Lime]
    );
    assert_eq!(
        auto.experiment().metric_kinds(),
        vec![MetricKind::Complexity]
    );
    assert_eq!(
        auto.experiment().metrics()[0].companion(),
        Some(ExplainerKind::Lime)
    );
}

#[test]
fn tunable_broadcast_reaches_only_supporting_explainers() {
    init_tracing();
    let auto = AutoExperiment::new(
        model(),
        image_data(),
        &["image"],
        ExperimentOptions::default()
            .with_layer(TargetLayer::new("features.28"))
            .with_tunable("n_samples", serde_json::json!(64))
            .with_tunable("made_up", serde_json::json!("ignored")),
    )
    .unwrap();

    // Construction succeeded for every recommended kind, including the ones
    // that support neither key.
    assert!(auto
        .experiment()
        .explainer_kinds()
        .contains(&ExplainerKind::GradCam));

    // The sampler default used by the recommender still resolved baselines.
    let lime = auto
        .experiment()
        .explainers()
        .iter()
        .find(|e| e.kind() == ExplainerKind::Lime)
        .unwrap();
    assert_eq!(lime.baseline_fn().unwrap().name(), "zeros");
    assert_eq!(lime.feature_mask_fn().unwrap().name(), "grid8");
}

#[test]
fn recommendation_bundle_is_stable_across_accessors() {
    init_tracing();
    let recommender = XaiRecommender::new();
    let modalities = Modalities::parse(&["image"]).unwrap();
    let direct = recommender.recommend(&modalities, &ConstNet { n_classes: 2 });

    let auto = AutoExperiment::new(
        model(),
        image_data(),
        &["image"],
        ExperimentOptions::default(),
    )
    .unwrap();
    assert_eq!(auto.recommendation().explainers, direct.explainers);
    assert_eq!(auto.recommendation().metrics, direct.metrics);
}
