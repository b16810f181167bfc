//! # attrib-core: shared vocabulary for XAI experiment auto-configuration
//!
//! This crate defines the building blocks the auto-configuration layer in
//! `attrib-auto` assembles: input modalities, explainer and metric
//! definitions with their construction profiles, baseline and feature-mask
//! function handles, postprocessors, and the [`Experiment`] container that
//! owns a finished configuration.
//!
//! Attribution algorithms and metric math are out of scope; instances here
//! carry the configuration state those algorithms would consume.

pub mod catalog;
pub mod error;
pub mod experiment;
pub mod explainer;
pub mod functions;
pub mod metric;
pub mod modality;
pub mod model;
pub mod postprocess;

pub use catalog::{ExplainerCatalog, ExplainerDef};
pub use error::ConfigError;
pub use experiment::{Experiment, ExperimentHooks};
pub use explainer::{ConstructionProfile, Explainer, ExplainerKind};
pub use functions::{BaselineFn, FeatureMaskFn};
pub use metric::{Metric, MetricKind};
pub use modality::{Modalities, Modality};
pub use model::{Batch, DataSource, InMemoryData, Model, TargetLayer, Tensor};
pub use postprocess::{all_postprocessors, NormalizationMethod, PoolingMethod, PostProcessor};
