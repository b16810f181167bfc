//! Explainer definitions, construction profiles, and instances.
//!
//! Each explainer kind carries a [`ConstructionProfile`] describing the
//! constructor shape it needs. The profile is attached at catalog
//! registration time, so factories dispatch on an explicit discriminator
//! instead of matching type names.
//!
//! Instances advertise the set of tunable keys they accept after
//! construction; factories filter broadcast overrides against that set, so
//! an irrelevant key is skipped rather than attempted and swallowed.

use crate::functions::{BaselineFn, FeatureMaskFn};
use crate::model::{ForwardArgExtractor, Model, TargetLayer, Tensor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a known explanation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplainerKind {
    GradCam,
    GuidedGradCam,
    AttentionRollout,
    TransformerAttribution,
    Lime,
    KernelShap,
    Gradient,
    GradientXInput,
    SmoothGrad,
    VarGrad,
    IntegratedGradients,
    LrpEpsilon,
}

impl ExplainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplainerKind::GradCam => "grad_cam",
            ExplainerKind::GuidedGradCam => "guided_grad_cam",
            ExplainerKind::AttentionRollout => "attention_rollout",
            ExplainerKind::TransformerAttribution => "transformer_attribution",
            ExplainerKind::Lime => "lime",
            ExplainerKind::KernelShap => "kernel_shap",
            ExplainerKind::Gradient => "gradient",
            ExplainerKind::GradientXInput => "gradient_x_input",
            ExplainerKind::SmoothGrad => "smooth_grad",
            ExplainerKind::VarGrad => "var_grad",
            ExplainerKind::IntegratedGradients => "integrated_gradients",
            ExplainerKind::LrpEpsilon => "lrp_epsilon",
        }
    }
}

impl fmt::Display for ExplainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constructor shape an explainer kind requires.
///
/// Resolved once at catalog registration; `SurrogateSampling` takes
/// precedence over every other profile for the kinds that carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionProfile {
    /// CAM family: the model handle alone, all other state derived from the
    /// model's architecture by the method itself.
    ModelOnly,
    /// Attention-specific and perturbation-based methods: model plus
    /// forward-argument extractors, no target layer.
    ForwardArgs,
    /// Gradient-based and layer-dependent methods (the default path):
    /// model, target layer, forward-argument extractors.
    LayerAndForwardArgs,
    /// Sampling-based surrogate methods: model plus feature-mask and
    /// baseline functions instead of a layer.
    SurrogateSampling,
}

/// A constructed explanation method.
pub trait Explainer: Send + Sync {
    fn kind(&self) -> ExplainerKind;

    /// Target layer, for layer-dependent methods only.
    fn target_layer(&self) -> Option<&TargetLayer> {
        None
    }

    fn baseline_fn(&self) -> Option<&BaselineFn> {
        None
    }

    fn feature_mask_fn(&self) -> Option<&FeatureMaskFn> {
        None
    }

    /// Reference dataset for sampling-based methods only.
    fn background_data(&self) -> Option<&Tensor> {
        None
    }

    /// Tunable keys this instance accepts after construction. Factories
    /// filter broadcast overrides against this set before applying them.
    fn tunable_keys(&self) -> &'static [&'static str];

    /// Apply a tunable value. Returns `false` when the key is unknown or
    /// the value has the wrong shape; never panics.
    fn set_tunable(&mut self, key: &str, value: &serde_json::Value) -> bool;
}

/// CAM-family explainer: holds only the model handle.
pub struct CamExplainer {
    kind: ExplainerKind,
    model: Arc<dyn Model>,
}

impl CamExplainer {
    pub fn new(kind: ExplainerKind, model: Arc<dyn Model>) -> Self {
        Self { kind, model }
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }
}

impl Explainer for CamExplainer {
    fn kind(&self) -> ExplainerKind {
        self.kind
    }

    fn tunable_keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn set_tunable(&mut self, _key: &str, _value: &serde_json::Value) -> bool {
        false
    }
}

/// Attention-specific explainer: model plus forward-argument extractors.
pub struct AttentionExplainer {
    kind: ExplainerKind,
    model: Arc<dyn Model>,
    forward_arg_extractor: Option<ForwardArgExtractor>,
    additional_forward_arg_extractor: Option<ForwardArgExtractor>,
    head_fusion: String,
    discard_ratio: f64,
}

impl AttentionExplainer {
    pub fn new(
        kind: ExplainerKind,
        model: Arc<dyn Model>,
        forward_arg_extractor: Option<ForwardArgExtractor>,
        additional_forward_arg_extractor: Option<ForwardArgExtractor>,
    ) -> Self {
        Self {
            kind,
            model,
            forward_arg_extractor,
            additional_forward_arg_extractor,
            head_fusion: "mean".to_string(),
            discard_ratio: 0.9,
        }
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }

    pub fn head_fusion(&self) -> &str {
        &self.head_fusion
    }

    pub fn discard_ratio(&self) -> f64 {
        self.discard_ratio
    }

    pub fn has_forward_arg_extractor(&self) -> bool {
        self.forward_arg_extractor.is_some()
    }

    pub fn has_additional_forward_arg_extractor(&self) -> bool {
        self.additional_forward_arg_extractor.is_some()
    }
}

impl Explainer for AttentionExplainer {
    fn kind(&self) -> ExplainerKind {
        self.kind
    }

    fn tunable_keys(&self) -> &'static [&'static str] {
        &["head_fusion", "discard_ratio"]
    }

    fn set_tunable(&mut self, key: &str, value: &serde_json::Value) -> bool {
        match key {
            "head_fusion" => match value.as_str() {
                Some(v) => {
                    self.head_fusion = v.to_string();
                    true
                }
                None => false,
            },
            "discard_ratio" => match value.as_f64() {
                Some(v) => {
                    self.discard_ratio = v;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

/// Gradient-based explainer: model, optional target layer, forward-argument
/// extractors, plus the sampling knobs shared by the family.
pub struct GradientExplainer {
    kind: ExplainerKind,
    model: Arc<dyn Model>,
    layer: Option<TargetLayer>,
    forward_arg_extractor: Option<ForwardArgExtractor>,
    additional_forward_arg_extractor: Option<ForwardArgExtractor>,
    n_steps: u32,
    n_samples: u32,
    noise_level: f64,
    epsilon: f64,
}

impl GradientExplainer {
    pub fn new(
        kind: ExplainerKind,
        model: Arc<dyn Model>,
        layer: Option<TargetLayer>,
        forward_arg_extractor: Option<ForwardArgExtractor>,
        additional_forward_arg_extractor: Option<ForwardArgExtractor>,
    ) -> Self {
        Self {
            kind,
            model,
            layer,
            forward_arg_extractor,
            additional_forward_arg_extractor,
            n_steps: 20,
            n_samples: 25,
            noise_level: 0.1,
            epsilon: 1e-6,
        }
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }

    pub fn n_steps(&self) -> u32 {
        self.n_steps
    }

    pub fn n_samples(&self) -> u32 {
        self.n_samples
    }

    pub fn noise_level(&self) -> f64 {
        self.noise_level
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn has_forward_arg_extractor(&self) -> bool {
        self.forward_arg_extractor.is_some()
    }

    pub fn has_additional_forward_arg_extractor(&self) -> bool {
        self.additional_forward_arg_extractor.is_some()
    }
}

impl Explainer for GradientExplainer {
    fn kind(&self) -> ExplainerKind {
        self.kind
    }

    fn target_layer(&self) -> Option<&TargetLayer> {
        self.layer.as_ref()
    }

    fn tunable_keys(&self) -> &'static [&'static str] {
        &["n_steps", "n_samples", "noise_level", "epsilon"]
    }

    fn set_tunable(&mut self, key: &str, value: &serde_json::Value) -> bool {
        match key {
            "n_steps" => match value.as_u64() {
                Some(v) => {
                    self.n_steps = v as u32;
                    true
                }
                None => false,
            },
            "n_samples" => match value.as_u64() {
                Some(v) => {
                    self.n_samples = v as u32;
                    true
                }
                None => false,
            },
            "noise_level" => match value.as_f64() {
                Some(v) => {
                    self.noise_level = v;
                    true
                }
                None => false,
            },
            "epsilon" => match value.as_f64() {
                Some(v) => {
                    self.epsilon = v;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

/// Sampling-based surrogate explainer (Lime, KernelShap): model plus
/// feature-mask and baseline functions, no layer. Carries the reference
/// dataset its sampler perturbs against when one is available.
pub struct SurrogateExplainer {
    kind: ExplainerKind,
    model: Arc<dyn Model>,
    feature_mask_fn: FeatureMaskFn,
    baseline_fn: BaselineFn,
    background_data: Option<Tensor>,
    n_samples: u32,
}

impl SurrogateExplainer {
    pub fn new(
        kind: ExplainerKind,
        model: Arc<dyn Model>,
        feature_mask_fn: FeatureMaskFn,
        baseline_fn: BaselineFn,
        background_data: Option<Tensor>,
    ) -> Self {
        Self {
            kind,
            model,
            feature_mask_fn,
            baseline_fn,
            background_data,
            n_samples: 25,
        }
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }

    pub fn n_samples(&self) -> u32 {
        self.n_samples
    }
}

impl Explainer for SurrogateExplainer {
    fn kind(&self) -> ExplainerKind {
        self.kind
    }

    fn baseline_fn(&self) -> Option<&BaselineFn> {
        Some(&self.baseline_fn)
    }

    fn feature_mask_fn(&self) -> Option<&FeatureMaskFn> {
        Some(&self.feature_mask_fn)
    }

    fn background_data(&self) -> Option<&Tensor> {
        self.background_data.as_ref()
    }

    fn tunable_keys(&self) -> &'static [&'static str] {
        &["n_samples"]
    }

    fn set_tunable(&mut self, key: &str, value: &serde_json::Value) -> bool {
        match key {
            "n_samples" => match value.as_u64() {
                Some(v) => {
                    self.n_samples = v as u32;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}
