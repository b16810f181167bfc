//! # attrib-auto: auto-configuration for XAI experiments
//!
//! Given a trained model and a data source, this crate recommends a set of
//! explanation methods and evaluation metrics appropriate to the model's
//! input modality, instantiates them with modality-appropriate defaults,
//! and wires them into an [`Experiment`](attrib_core::Experiment).
//!
//! Entry points:
//! - [`AutoExperiment`]: recommendation-driven explainers *and* metrics.
//! - [`AutoExplanation`]: recommendation-driven explainers with the fixed
//!   canonical metric list and the full postprocessor catalog.
//!
//! ```no_run
//! use attrib_auto::{AutoExplanation, ExperimentOptions};
//! # use attrib_core::model::{InMemoryData, Model, Tensor};
//! # use std::sync::Arc;
//! # struct Net;
//! # impl Model for Net {
//! #     fn forward(&self, inputs: &Tensor) -> Tensor { inputs.clone() }
//! # }
//! # fn main() -> Result<(), attrib_core::ConfigError> {
//! let model: Arc<dyn Model> = Arc::new(Net);
//! let data = Arc::new(InMemoryData::default());
//! let auto = AutoExplanation::new(model, data, &["image"], ExperimentOptions::default())?;
//! println!("configured {} explainers", auto.experiment().explainers().len());
//! # Ok(())
//! # }
//! ```

pub mod auto;
pub mod defaults;
pub mod factory;
pub mod recommender;

pub use auto::{AutoExperiment, AutoExplanation, ExperimentOptions};
pub use factory::{DefaultArgs, ExplainerFactory, MetricArgs, MetricFactory, Tunables};
pub use recommender::{Recommendation, Recommender, XaiRecommender};
